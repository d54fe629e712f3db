//! Core domain types for the FitQuest progression engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their categories
//! - Workout plans as produced by the external generator
//! - The user's progress state
//! - Level-up notification events

use crate::ledger::{CompletionKey, CompletionLedger};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Exercise Types
// ============================================================================

/// Category tag of an exercise
///
/// Unrecognized tags deserialize into `Other` so that a plan from a newer
/// generator still loads and earns the default award.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Strength,
    Cardio,
    Core,
    Flexibility,
    Warmup,
    Cooldown,
    #[serde(other)]
    Other,
}

/// A single exercise within a workout day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    #[serde(rename = "type")]
    pub category: ExerciseCategory,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<u32>,
    /// Rest in seconds between sets
    #[serde(default)]
    pub rest: Option<u32>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

impl Exercise {
    /// Create an exercise with only the fields the award calculation reads
    pub fn new(name: impl Into<String>, category: ExerciseCategory, sets: Option<u32>) -> Self {
        Self {
            name: name.into(),
            category,
            sets,
            reps: None,
            duration: None,
            rest: None,
            equipment: None,
            instructions: None,
        }
    }

    /// Number of sets, treating a missing or zero count as a single set
    pub fn effective_sets(&self) -> u32 {
        match self.sets {
            Some(sets) if sets >= 1 => sets,
            _ => 1,
        }
    }
}

// ============================================================================
// Workout Plan Types
// ============================================================================

/// One training day of a weekly plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDay {
    /// 1-based day number within the week
    pub day: u32,
    pub focus: String,
    pub exercises: Vec<Exercise>,
    /// Total duration in minutes
    #[serde(default)]
    pub total_duration: u32,
}

/// A weekly workout plan supplied by the external generator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlan {
    pub id: String,
    #[serde(default = "default_duration_weeks")]
    pub duration_weeks: u32,
    pub weekly_schedule: Vec<WorkoutDay>,
}

fn default_duration_weeks() -> u32 {
    1
}

// ============================================================================
// Progress State
// ============================================================================

/// The user's persistent leveling and completion state
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProgressState {
    pub level: u32,
    pub current_exp: u64,
    pub exp_to_next_level: u64,
    pub total_exercises_completed: u64,
    pub current_week: u32,
    pub total_days: u32,
    pub completed_exercises: CompletionLedger,
}

// ============================================================================
// Notification Types
// ============================================================================

/// Emitted once per pipeline run that crossed at least one level threshold
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LevelUpEvent {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub key: CompletionKey,
    pub previous_level: u32,
    pub new_level: u32,
    pub levels_gained: u32,
}

impl LevelUpEvent {
    pub fn new(key: CompletionKey, previous_level: u32, new_level: u32, levels_gained: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            key,
            previous_level,
            new_level,
            levels_gained,
        }
    }
}
