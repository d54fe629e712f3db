//! Experience curve: how much experience each level requires.

use crate::{Error, Result};

/// Experience required to advance from level 1
pub const BASE_EXP: u64 = 100;

/// Multiplier applied to the requirement for every further level
pub const GROWTH_FACTOR: f64 = 1.5;

/// Experience required to advance from `level` to `level + 1`
///
/// `floor(100 * 1.5^(level - 1))`, so 100, 150, 225, 337, ...
pub fn exp_for_level(level: u32) -> Result<u64> {
    if level == 0 {
        return Err(Error::InvalidArgument(
            "level must be at least 1".to_string(),
        ));
    }
    Ok(threshold(level))
}

/// Curve evaluation for a level already known to be >= 1
pub(crate) fn threshold(level: u32) -> u64 {
    debug_assert!(level >= 1);
    let exponent = f64::from(level.saturating_sub(1));
    // `as` saturates at u64::MAX once the curve leaves the representable range
    (BASE_EXP as f64 * GROWTH_FACTOR.powf(exponent)).floor() as u64
}
