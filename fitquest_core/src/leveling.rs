//! Level resolution: turning accumulated experience into levels.
//!
//! A single award can cross several thresholds at once; resolution keeps
//! consuming thresholds until the remainder no longer reaches the next one.

use crate::curve::threshold;
use crate::{Error, Result};

/// Normalized outcome of resolving experience against the curve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelResolution {
    pub level: u32,
    /// Experience carried into `level`, always below `next_threshold`
    pub remaining_exp: u64,
    pub next_threshold: u64,
    pub levels_gained: u32,
    pub did_level_up: bool,
}

/// Resolve any level-ups for `total_exp` accumulated at `level`
///
/// Returns `Error::InvalidArgument` for level 0.
pub fn resolve_level(level: u32, total_exp: u64) -> Result<LevelResolution> {
    if level == 0 {
        return Err(Error::InvalidArgument(
            "cannot resolve experience at level 0".to_string(),
        ));
    }

    let mut level = level;
    let mut exp = total_exp;
    let mut next_threshold = threshold(level);
    let mut levels_gained = 0u32;

    while exp >= next_threshold {
        exp -= next_threshold;
        level = level.checked_add(1).ok_or_else(|| {
            Error::InvalidArgument("level overflow while resolving experience".to_string())
        })?;
        levels_gained += 1;
        next_threshold = threshold(level);
    }

    if levels_gained > 0 {
        tracing::debug!(
            "Resolved {} level-up(s): now level {} with {}/{} exp",
            levels_gained,
            level,
            exp,
            next_threshold
        );
    }

    Ok(LevelResolution {
        level,
        remaining_exp: exp,
        next_threshold,
        levels_gained,
        did_level_up: levels_gained > 0,
    })
}
