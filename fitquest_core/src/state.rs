//! Progress state lifecycle and persistence with file locking.
//!
//! This module handles creating, resetting and normalizing the progress
//! state, and saving/loading it with proper file locking.

use crate::curve::threshold;
use crate::{resolve_level, CompletionLedger, Error, ProgressState, Result, WorkoutPlan};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            level: 1,
            current_exp: 0,
            exp_to_next_level: threshold(1),
            total_exercises_completed: 0,
            current_week: 0,
            total_days: 0,
            completed_exercises: CompletionLedger::new(),
        }
    }
}

impl ProgressState {
    /// Fresh state: level 1, no experience, nothing completed
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all progress, including the completion ledger
    pub fn reset(&mut self) {
        *self = Self::new();
        tracing::info!("Progress reset to initial state");
    }

    /// Move to the next program week after a new plan was generated
    pub fn advance_week(&mut self, plan: &WorkoutPlan) {
        self.current_week += 1;
        self.total_days += plan.days_in_week();
        tracing::info!(
            "Advanced to week {} ({} training days so far)",
            self.current_week,
            self.total_days
        );
    }

    /// Re-establish `current_exp < exp_to_next_level` and recompute the
    /// threshold from the level
    ///
    /// Restored snapshots may come from older or hand-edited files.
    pub fn normalize(&mut self) -> Result<()> {
        let resolution = resolve_level(self.level, self.current_exp)?;
        if resolution.did_level_up || self.exp_to_next_level != resolution.next_threshold {
            tracing::warn!(
                "Normalized progress state: level {} -> {}, exp {} -> {}",
                self.level,
                resolution.level,
                self.current_exp,
                resolution.remaining_exp
            );
        }
        self.level = resolution.level;
        self.current_exp = resolution.remaining_exp;
        self.exp_to_next_level = resolution.next_threshold;
        Ok(())
    }

    /// Load progress state from a file with shared locking
    ///
    /// A missing, unreadable or unparsable file yields the initial state
    /// (logged as a warning). A parsed snapshot is normalized; one whose
    /// invariant cannot be restored is `Error::State`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No state file found, using default state");
            return Ok(Self::default());
        }

        let contents = match read_locked(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Unable to read state file {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        let mut state: ProgressState = match serde_json::from_str(&contents) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Failed to parse state file {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        state
            .normalize()
            .map_err(|e| Error::State(format!("state file {:?} is invalid: {}", path, e)))?;

        tracing::debug!(
            "Loaded progress state from {:?}: level {}, {} completions",
            path,
            state.level,
            state.completed_exercises.len()
        );
        Ok(state)
    }

    /// Save progress state to a file with exclusive locking
    ///
    /// Atomically writes state by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "state path missing parent")
        })?)?;

        // Acquire exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace old state file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved progress state to {:?}", path);
        Ok(())
    }

    /// Load state, modify it, and save it back
    ///
    /// The closure's error aborts the update before anything is written.
    pub fn update<F, T>(path: &Path, f: F) -> Result<(Self, T)>
    where
        F: FnOnce(&mut ProgressState) -> Result<T>,
    {
        let mut state = Self::load(path)?;
        let value = f(&mut state)?;
        state.save(path)?;
        Ok((state, value))
    }
}

/// Read the whole file while holding a shared lock
fn read_locked(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    let unlocked = file.unlock();

    read?;
    unlocked?;
    Ok(contents)
}
