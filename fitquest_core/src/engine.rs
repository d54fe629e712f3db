//! Award pipeline: completing an exercise and applying its experience.
//!
//! One call is one atomic read-modify-write of the progress state:
//! 1. The completion ledger rejects slots that already earned experience
//! 2. The exercise's award is added to the current experience
//! 3. Level resolution normalizes level, experience and threshold
//! 4. The completion counter advances
//! 5. A single level-up event is emitted, however many levels were gained
//!
//! Callers serving several requests for the same user must hold a per-user
//! lock around the whole call.

use crate::{
    exp_gain, resolve_level, CompletionKey, Error, Exercise, LevelResolution, LevelUpEvent,
    LevelUpSink, ProgressState, Result, WorkoutPlan,
};

/// Experience applied by a successful completion
#[derive(Clone, Debug, PartialEq)]
pub struct ExpAward {
    pub key: CompletionKey,
    pub exp_gained: u64,
    pub resolution: LevelResolution,
    /// Present only when at least one level was gained
    pub level_up: Option<LevelUpEvent>,
}

/// Result of asking to complete an exercise
#[derive(Clone, Debug, PartialEq)]
pub enum CompletionOutcome {
    /// The slot had already earned experience; nothing changed
    AlreadyCompleted(CompletionKey),
    Awarded(ExpAward),
}

impl CompletionOutcome {
    pub fn exp_gained(&self) -> u64 {
        match self {
            CompletionOutcome::AlreadyCompleted(_) => 0,
            CompletionOutcome::Awarded(award) => award.exp_gained,
        }
    }

    pub fn did_level_up(&self) -> bool {
        matches!(
            self,
            CompletionOutcome::Awarded(ExpAward {
                level_up: Some(_),
                ..
            })
        )
    }
}

/// Complete the exercise in slot `key` and apply its experience
///
/// Re-completing a slot is a no-op returning `AlreadyCompleted`. Errors are
/// raised before any mutation, so a failed call leaves `state` untouched.
/// Sink failures are logged and do not fail the completion.
pub fn complete_exercise(
    state: &mut ProgressState,
    key: CompletionKey,
    exercise: &Exercise,
    sink: &mut dyn LevelUpSink,
) -> Result<CompletionOutcome> {
    if state.completed_exercises.is_completed(&key) {
        tracing::info!("Exercise {} already completed, no experience awarded", key);
        return Ok(CompletionOutcome::AlreadyCompleted(key));
    }

    let exp_gained = exp_gain(exercise);
    let total_exp = state.current_exp.checked_add(exp_gained).ok_or_else(|| {
        Error::InvalidArgument("experience total overflowed".to_string())
    })?;
    let resolution = resolve_level(state.level, total_exp)?;

    // Nothing below can fail
    let previous_level = state.level;
    state.completed_exercises.try_complete(key);
    state.level = resolution.level;
    state.current_exp = resolution.remaining_exp;
    state.exp_to_next_level = resolution.next_threshold;
    state.total_exercises_completed += 1;

    tracing::info!(
        "Completed {} ({}): +{} exp, level {} ({}/{})",
        key,
        exercise.name,
        exp_gained,
        state.level,
        state.current_exp,
        state.exp_to_next_level
    );

    let level_up = if resolution.did_level_up {
        let event = LevelUpEvent::new(
            key,
            previous_level,
            resolution.level,
            resolution.levels_gained,
        );
        if let Err(e) = sink.notify(&event) {
            tracing::warn!("Failed to deliver level-up notification: {}", e);
        }
        tracing::info!(
            "Level up: {} -> {} (+{})",
            previous_level,
            resolution.level,
            resolution.levels_gained
        );
        Some(event)
    } else {
        None
    };

    Ok(CompletionOutcome::Awarded(ExpAward {
        key,
        exp_gained,
        resolution,
        level_up,
    }))
}

/// Complete exercise `index` of plan day `day` in the state's current week
pub fn complete_in_plan(
    state: &mut ProgressState,
    plan: &WorkoutPlan,
    day: u32,
    index: usize,
    sink: &mut dyn LevelUpSink,
) -> Result<CompletionOutcome> {
    if state.current_week == 0 {
        return Err(Error::Plan(
            "no workout week started; load a plan first".to_string(),
        ));
    }
    let exercise = plan.exercise(day, index)?;
    let key = CompletionKey::new(state.current_week, day, index);
    complete_exercise(state, key, exercise, sink)
}
