//! Experience awarded for completing an exercise.

use crate::{Exercise, ExerciseCategory};

/// Base award for categories without a specific rate
pub const DEFAULT_BASE_EXP: u64 = 10;

/// Bonus experience per set, applied when an exercise has more than one set
pub const EXP_PER_SET: u64 = 2;

/// Base award for a category
///
/// Strength 15, cardio 12, core 13, everything else (including
/// unrecognized tags) 10.
pub fn base_exp(category: ExerciseCategory) -> u64 {
    match category {
        ExerciseCategory::Strength => 15,
        ExerciseCategory::Cardio => 12,
        ExerciseCategory::Core => 13,
        ExerciseCategory::Flexibility
        | ExerciseCategory::Warmup
        | ExerciseCategory::Cooldown
        | ExerciseCategory::Other => DEFAULT_BASE_EXP,
    }
}

/// Experience gained by completing `exercise`
pub fn exp_gain(exercise: &Exercise) -> u64 {
    let sets = exercise.effective_sets();
    let mut exp = base_exp(exercise.category);
    if sets > 1 {
        exp += u64::from(sets) * EXP_PER_SET;
    }
    exp
}
