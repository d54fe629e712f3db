use clap::{Parser, Subcommand};
use fitquest_core::config::DataConfig;
use fitquest_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fitquest")]
#[command(about = "Workout progress tracker with levels and experience", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, experience and this week's progress (default)
    Status,

    /// Start a new week with a generated workout plan
    Plan {
        /// Workout plan JSON file
        file: PathBuf,
    },

    /// Mark an exercise of the current plan as complete
    Complete {
        /// Day number within the plan (1-based)
        #[arg(long)]
        day: u32,

        /// Exercise position within the day (0-based)
        #[arg(long)]
        exercise: usize,
    },

    /// Reset all progress and forget the current plan
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Roll up the level-up log to CSV
    Rollup {
        /// Clean up processed logs after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    fitquest_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data = match cli.data_dir {
        Some(data_dir) => DataConfig { data_dir },
        None => config.data.clone(),
    };
    tracing::debug!("Using data directory {:?}", data.data_dir);

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => cmd_status(&data),
        Commands::Plan { file } => cmd_plan(&data, &file),
        Commands::Complete { day, exercise } => cmd_complete(&data, &config, day, exercise),
        Commands::Reset { yes } => cmd_reset(&data, yes),
        Commands::Rollup { cleanup } => cmd_rollup(&data, cleanup),
    }
}

fn cmd_status(data: &DataConfig) -> Result<()> {
    let state = ProgressState::load(&data.state_path())?;
    let plan = WorkoutPlan::load_optional(&data.plan_path())?;

    display_progress(&state);

    match plan {
        Some(plan) => {
            println!();
            println!("  Week {} plan:", state.current_week);
            for day in &plan.weekly_schedule {
                let progress = state.completed_exercises.day_progress(
                    state.current_week,
                    day.day,
                    day.exercises.len(),
                );
                let mark = if progress.is_finished() { "✓" } else { " " };
                println!(
                    "  {} Day {}: {} - {}/{} completed ({}%)",
                    mark, day.day, day.focus, progress.completed, progress.total, progress.percent
                );
            }
        }
        None => {
            println!();
            println!("  No workout plan loaded. Run `fitquest plan <FILE>` to start a week.");
        }
    }

    println!();
    Ok(())
}

fn cmd_plan(data: &DataConfig, file: &Path) -> Result<()> {
    let plan = WorkoutPlan::load(file)?;

    plan.ensure_valid()?;

    let (state, ()) = ProgressState::update(&data.state_path(), |state| {
        state.advance_week(&plan);
        Ok(())
    })?;
    plan.save(&data.plan_path())?;

    println!(
        "✓ Week {} started: {} training days",
        state.current_week,
        plan.days_in_week()
    );
    for day in &plan.weekly_schedule {
        println!(
            "  Day {}: {} ({} exercises, {} min)",
            day.day,
            day.focus,
            day.exercises.len(),
            day.total_duration
        );
    }

    Ok(())
}

fn cmd_complete(data: &DataConfig, config: &Config, day: u32, exercise: usize) -> Result<()> {
    let plan = WorkoutPlan::load_optional(&data.plan_path())?.ok_or_else(|| {
        Error::Plan("No workout plan loaded. Run `fitquest plan <FILE>` first.".into())
    })?;

    // Events are held back until the state is saved so a failed save never
    // leaves a logged level-up behind
    let mut pending: Vec<LevelUpEvent> = Vec::new();
    let (state, outcome) = ProgressState::update(&data.state_path(), |state| {
        complete_in_plan(state, &plan, day, exercise, &mut pending)
    })?;

    if config.notifications.record_level_ups {
        let mut sink = JsonlSink::new(data.level_up_log_path());
        for event in &pending {
            if let Err(e) = sink.notify(event) {
                tracing::warn!("Failed to record level-up {}: {}", event.id, e);
            }
        }
    }

    let name = &plan.exercise(day, exercise)?.name;
    match outcome {
        CompletionOutcome::AlreadyCompleted(_) => {
            println!("{} is already completed this week - no XP awarded.", name);
        }
        CompletionOutcome::Awarded(award) => {
            println!("✓ Completed {}: +{} XP", name, award.exp_gained);
            println!(
                "  Level {}: {} / {} XP",
                state.level, state.current_exp, state.exp_to_next_level
            );

            if let Some(event) = &award.level_up {
                println!();
                println!("★ LEVEL UP! You reached level {}!", event.new_level);
            }

            if let Some(workout_day) = plan.day(day) {
                let progress = state.completed_exercises.day_progress(
                    state.current_week,
                    day,
                    workout_day.exercises.len(),
                );
                if progress.is_finished() {
                    println!();
                    println!("Great job! You've completed today's workout!");
                }
            }
        }
    }

    Ok(())
}

fn cmd_reset(data: &DataConfig, yes: bool) -> Result<()> {
    if !yes {
        eprintln!("This clears your level, XP, weeks, completed exercises and current plan.");
        eprintln!("Re-run with --yes to confirm.");
        return Err(Error::Other("Reset not confirmed".into()));
    }

    let mut state = ProgressState::load(&data.state_path())?;
    state.reset();
    state.save(&data.state_path())?;

    let plan_path = data.plan_path();
    if plan_path.exists() {
        std::fs::remove_file(&plan_path)?;
    }

    println!("✓ Progress reset");
    Ok(())
}

fn cmd_rollup(data: &DataConfig, cleanup: bool) -> Result<()> {
    let log_path = data.level_up_log_path();
    let csv_path = data.history_csv_path();

    if !log_path.exists() {
        println!("No level-up log found - nothing to roll up.");
        return Ok(());
    }

    let count = fitquest_core::csv_rollup::log_to_csv_and_archive(&log_path, &csv_path)?;

    println!("✓ Rolled up {} level-ups to CSV", count);
    println!("  CSV: {}", csv_path.display());

    if cleanup {
        let cleaned = fitquest_core::csv_rollup::cleanup_processed_logs(&data.log_dir())?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed logs", cleaned);
        }
    }

    Ok(())
}

fn display_progress(state: &ProgressState) {
    const BAR_WIDTH: u64 = 20;

    let filled = (state.current_exp.saturating_mul(BAR_WIDTH) / state.exp_to_next_level.max(1))
        .min(BAR_WIDTH);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  LEVEL {}", state.level);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  XP [{}{}] {} / {}",
        "#".repeat(filled as usize),
        "-".repeat((BAR_WIDTH - filled) as usize),
        state.current_exp,
        state.exp_to_next_level
    );
    println!(
        "  Week: {}   Training days: {}",
        state.current_week, state.total_days
    );
    println!(
        "  Exercises completed: {}",
        state.total_exercises_completed
    );
}
