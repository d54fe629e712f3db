#![forbid(unsafe_code)]

//! Core progression engine for the FitQuest workout tracker.
//!
//! This crate provides:
//! - Domain types (exercises, workout plans, progress state, level-up events)
//! - Experience curve, award calculation and level resolution
//! - Per-week completion ledger guaranteeing at-most-once awards
//! - The award pipeline tying them together
//! - Persistence (state file, level-up log, CSV rollup)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod curve;
pub mod award;
pub mod leveling;
pub mod ledger;
pub mod plan;
pub mod state;
pub mod wal;
pub mod csv_rollup;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use curve::exp_for_level;
pub use award::exp_gain;
pub use leveling::{resolve_level, LevelResolution};
pub use ledger::{CompletionKey, CompletionLedger, DayProgress};
pub use wal::{JsonlSink, LevelUpSink};
pub use engine::{complete_exercise, complete_in_plan, CompletionOutcome, ExpAward};
