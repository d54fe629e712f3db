//! Completion ledger guaranteeing at-most-once awards per exercise slot.
//!
//! Slots are scoped by week, so the same day/exercise position in a new
//! week's plan is tracked independently of earlier weeks.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Identifies one exercise slot: exercise `exercise_index` of plan day `day`
/// in program week `week`
///
/// Persisted in its canonical string form, `week{W}-day{D}-exercise{I}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompletionKey {
    pub week: u32,
    pub day: u32,
    pub exercise_index: usize,
}

impl CompletionKey {
    pub fn new(week: u32, day: u32, exercise_index: usize) -> Self {
        Self {
            week,
            day,
            exercise_index,
        }
    }
}

impl fmt::Display for CompletionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "week{}-day{}-exercise{}",
            self.week, self.day, self.exercise_index
        )
    }
}

impl FromStr for CompletionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidArgument(format!("malformed completion key '{}'", s));

        let rest = s.strip_prefix("week").ok_or_else(invalid)?;
        let (week, rest) = rest.split_once("-day").ok_or_else(invalid)?;
        let (day, index) = rest.split_once("-exercise").ok_or_else(invalid)?;

        Ok(Self {
            week: parse_component(week).ok_or_else(invalid)?,
            day: parse_component(day).ok_or_else(invalid)?,
            exercise_index: parse_component(index).ok_or_else(invalid)?,
        })
    }
}

/// Parse a key component in the exact form `Display` writes it
///
/// Signs and leading zeros are rejected so every accepted key round-trips
/// byte-for-byte.
fn parse_component<T: FromStr>(raw: &str) -> Option<T> {
    let canonical = !raw.is_empty()
        && raw.bytes().all(|b| b.is_ascii_digit())
        && (raw == "0" || !raw.starts_with('0'));
    if canonical {
        raw.parse().ok()
    } else {
        None
    }
}

impl Serialize for CompletionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CompletionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Completion summary for a single plan day
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayProgress {
    pub completed: usize,
    pub total: usize,
    /// Rounded completion percentage (0 for a day without exercises)
    pub percent: u32,
}

impl DayProgress {
    pub fn is_finished(&self) -> bool {
        self.completed == self.total
    }
}

/// Record of exercise slots that have already earned experience
///
/// Entries are only ever added; the ledger is cleared solely by a full
/// progress reset.
///
/// Deserializing skips keys that are not canonical completion keys, so a
/// stray entry never costs the rest of a saved state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompletionLedger {
    entries: HashMap<CompletionKey, bool>,
}

impl<'de> Deserialize<'de> for CompletionLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = HashMap::<String, bool>::deserialize(deserializer)?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, done) in raw {
            match key.parse::<CompletionKey>() {
                Ok(parsed) => {
                    entries.insert(parsed, done);
                }
                Err(e) => {
                    tracing::warn!("Skipping completion entry '{}': {}", key, e);
                }
            }
        }

        Ok(Self { entries })
    }
}

impl CompletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is marked complete
    pub fn is_completed(&self, key: &CompletionKey) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    /// Record `key` as complete
    ///
    /// Returns `false` without touching the ledger if it already was.
    pub fn try_complete(&mut self, key: CompletionKey) -> bool {
        if self.is_completed(&key) {
            tracing::debug!("Exercise {} already completed", key);
            return false;
        }
        self.entries.insert(key, true);
        true
    }

    /// Number of completed slots in `week`
    pub fn completed_in_week(&self, week: u32) -> usize {
        self.entries
            .iter()
            .filter(|(key, done)| key.week == week && **done)
            .count()
    }

    /// Completion summary for a plan day with `exercise_count` exercises
    pub fn day_progress(&self, week: u32, day: u32, exercise_count: usize) -> DayProgress {
        let completed = (0..exercise_count)
            .filter(|&index| self.is_completed(&CompletionKey::new(week, day, index)))
            .count();

        let percent = if exercise_count == 0 {
            0
        } else {
            ((completed * 200 + exercise_count) / (exercise_count * 2)) as u32
        };

        DayProgress {
            completed,
            total: exercise_count,
            percent,
        }
    }

    /// Iterate over completed keys
    pub fn keys(&self) -> impl Iterator<Item = &CompletionKey> {
        self.entries
            .iter()
            .filter(|(_, done)| **done)
            .map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry; only a full progress reset should call this
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_canonical_form() {
        let key = CompletionKey::new(1, 2, 0);
        assert_eq!(key.to_string(), "week1-day2-exercise0");
        assert_eq!("week1-day2-exercise0".parse::<CompletionKey>().unwrap(), key);
    }

    #[test]
    fn test_key_keeps_multi_digit_components_apart() {
        let a = CompletionKey::new(1, 12, 3);
        let b = CompletionKey::new(11, 2, 3);
        assert_ne!(a.to_string(), b.to_string());
        assert_eq!(a.to_string().parse::<CompletionKey>().unwrap(), a);
        assert_eq!(b.to_string().parse::<CompletionKey>().unwrap(), b);
    }

    #[test]
    fn test_malformed_keys_rejected() {
        for raw in ["", "week1", "week1-day2", "day1-week2-exercise3", "weekX-day1-exercise0"] {
            assert!(raw.parse::<CompletionKey>().is_err(), "accepted '{}'", raw);
        }
    }

    #[test]
    fn test_non_canonical_components_rejected() {
        for raw in [
            "week+1-day1-exercise0",
            "week1-day01-exercise0",
            "week1-day1-exercise00",
            "week1-day1-exercise-1",
            "week 1-day1-exercise0",
            "week1-day-exercise0",
        ] {
            assert!(raw.parse::<CompletionKey>().is_err(), "accepted '{}'", raw);
        }

        let zero: CompletionKey = "week0-day0-exercise0".parse().unwrap();
        assert_eq!(zero, CompletionKey::new(0, 0, 0));
        assert_eq!(
            "week10-day20-exercise30".parse::<CompletionKey>().unwrap(),
            CompletionKey::new(10, 20, 30)
        );
    }

    #[test]
    fn test_unparsable_entries_are_skipped() {
        let json = r#"{
            "week5-day1-exercise0": true,
            "week5-day1-exercise0-legacy": true,
            "week+5-day01-exercise1": true,
            "notes": true
        }"#;
        let ledger: CompletionLedger = serde_json::from_str(json).unwrap();

        assert_eq!(ledger.len(), 1);
        assert!(ledger.is_completed(&CompletionKey::new(5, 1, 0)));
        assert!(!ledger.is_completed(&CompletionKey::new(5, 1, 1)));
    }

    #[test]
    fn test_try_complete_is_idempotent() {
        let mut ledger = CompletionLedger::new();
        let key = CompletionKey::new(1, 1, 0);

        assert!(ledger.try_complete(key));
        assert!(!ledger.try_complete(key));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.is_completed(&key));
    }

    #[test]
    fn test_weeks_are_independent() {
        let mut ledger = CompletionLedger::new();
        assert!(ledger.try_complete(CompletionKey::new(1, 1, 0)));
        assert!(ledger.try_complete(CompletionKey::new(2, 1, 0)));
        assert_eq!(ledger.completed_in_week(1), 1);
        assert_eq!(ledger.completed_in_week(2), 1);
    }

    #[test]
    fn test_day_progress() {
        let mut ledger = CompletionLedger::new();
        ledger.try_complete(CompletionKey::new(1, 1, 0));
        ledger.try_complete(CompletionKey::new(1, 1, 2));
        // Same slot in another week does not count
        ledger.try_complete(CompletionKey::new(2, 1, 1));

        let progress = ledger.day_progress(1, 1, 3);
        assert_eq!(progress.completed, 2);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.percent, 67);
        assert!(!progress.is_finished());

        ledger.try_complete(CompletionKey::new(1, 1, 1));
        let progress = ledger.day_progress(1, 1, 3);
        assert_eq!(progress.percent, 100);
        assert!(progress.is_finished());
    }

    #[test]
    fn test_false_markers_do_not_count() {
        let json = r#"{"week1-day1-exercise0": false, "week1-day1-exercise1": true}"#;
        let mut ledger: CompletionLedger = serde_json::from_str(json).unwrap();

        assert!(!ledger.is_completed(&CompletionKey::new(1, 1, 0)));
        assert_eq!(ledger.keys().count(), 1);
        assert!(ledger.try_complete(CompletionKey::new(1, 1, 0)));
    }

    #[test]
    fn test_serialized_with_string_keys() {
        let mut ledger = CompletionLedger::new();
        ledger.try_complete(CompletionKey::new(3, 2, 1));

        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"week3-day2-exercise1":true}"#);

        let restored: CompletionLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ledger);
    }
}
