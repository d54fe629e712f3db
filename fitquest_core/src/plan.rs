//! Workout plan loading and validation.
//!
//! Plans are produced by an external generator and handed to us as JSON.
//! Only the structure the progression engine relies on is checked here.

use crate::{Error, Exercise, Result, WorkoutDay, WorkoutPlan};
use std::collections::HashSet;
use std::path::Path;

impl WorkoutPlan {
    /// Load a plan from a JSON file
    ///
    /// Unlike state files, a malformed plan is an error: it is an explicit
    /// input and silently substituting a default would award nothing.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let plan: WorkoutPlan = serde_json::from_str(&contents)?;
        tracing::info!(
            "Loaded workout plan {} ({} days) from {:?}",
            plan.id,
            plan.weekly_schedule.len(),
            path
        );
        Ok(plan)
    }

    /// Load a plan if the file exists
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!("No workout plan found at {:?}", path);
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Write the plan as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        tracing::debug!("Saved workout plan {} to {:?}", self.id, path);
        Ok(())
    }

    /// Validate the plan structure
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.id.is_empty() {
            errors.push("Plan has empty ID".to_string());
        }
        if self.weekly_schedule.is_empty() {
            errors.push(format!("Plan '{}' has no training days", self.id));
        }

        let mut seen_days = HashSet::new();
        for day in &self.weekly_schedule {
            if day.day == 0 {
                errors.push("Day numbers start at 1, found day 0".to_string());
            }
            if !seen_days.insert(day.day) {
                errors.push(format!("Day {} appears more than once", day.day));
            }
            if day.exercises.is_empty() {
                errors.push(format!("Day {} has no exercises", day.day));
            }
            for (index, exercise) in day.exercises.iter().enumerate() {
                if exercise.name.trim().is_empty() {
                    errors.push(format!("Day {} exercise {} has empty name", day.day, index));
                }
            }
        }

        errors
    }

    /// Validate, folding any problems into a single error
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::PlanValidation(errors.join("; ")))
        }
    }

    /// Look up a training day by its 1-based number
    pub fn day(&self, day: u32) -> Option<&WorkoutDay> {
        self.weekly_schedule.iter().find(|d| d.day == day)
    }

    /// Look up exercise `index` of `day`
    pub fn exercise(&self, day: u32, index: usize) -> Result<&Exercise> {
        let workout_day = self
            .day(day)
            .ok_or_else(|| Error::Plan(format!("plan '{}' has no day {}", self.id, day)))?;
        workout_day.exercises.get(index).ok_or_else(|| {
            Error::Plan(format!(
                "day {} has {} exercises, no exercise at index {}",
                day,
                workout_day.exercises.len(),
                index
            ))
        })
    }

    /// Number of training days in the plan
    pub fn days_in_week(&self) -> u32 {
        self.weekly_schedule.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExerciseCategory;

    fn sample_plan() -> WorkoutPlan {
        WorkoutPlan {
            id: "plan-1".into(),
            duration_weeks: 1,
            weekly_schedule: vec![
                WorkoutDay {
                    day: 1,
                    focus: "Upper Body".into(),
                    exercises: vec![
                        Exercise::new("Push-ups", ExerciseCategory::Strength, Some(3)),
                        Exercise::new("Plank", ExerciseCategory::Core, Some(2)),
                    ],
                    total_duration: 40,
                },
                WorkoutDay {
                    day: 2,
                    focus: "Cardio".into(),
                    exercises: vec![Exercise::new("Jog", ExerciseCategory::Cardio, None)],
                    total_duration: 30,
                },
            ],
        }
    }

    #[test]
    fn test_valid_plan() {
        assert!(sample_plan().validate().is_empty());
        assert!(sample_plan().ensure_valid().is_ok());
    }

    #[test]
    fn test_validation_reports_problems() {
        let mut plan = sample_plan();
        plan.weekly_schedule[1].day = 1;
        plan.weekly_schedule[1].exercises.clear();
        plan.weekly_schedule[0].exercises[0].name = "  ".into();

        let errors = plan.validate();
        assert_eq!(errors.len(), 3, "{:?}", errors);
        assert!(matches!(
            plan.ensure_valid(),
            Err(Error::PlanValidation(_))
        ));
    }

    #[test]
    fn test_empty_schedule_invalid() {
        let mut plan = sample_plan();
        plan.weekly_schedule.clear();
        assert!(!plan.validate().is_empty());
    }

    #[test]
    fn test_exercise_lookup() {
        let plan = sample_plan();
        assert_eq!(plan.exercise(1, 1).unwrap().name, "Plank");
        assert!(matches!(plan.exercise(3, 0), Err(Error::Plan(_))));
        assert!(matches!(plan.exercise(2, 1), Err(Error::Plan(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plan.json");

        let plan = sample_plan();
        plan.save(&path).unwrap();

        let loaded = WorkoutPlan::load(&path).unwrap();
        assert_eq!(loaded, plan);
    }

    #[test]
    fn test_load_optional_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.json");
        assert!(WorkoutPlan::load_optional(&path).unwrap().is_none());
    }

    #[test]
    fn test_malformed_plan_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plan.json");
        std::fs::write(&path, "{ not a plan }").unwrap();
        assert!(matches!(WorkoutPlan::load(&path), Err(Error::Json(_))));
    }
}
