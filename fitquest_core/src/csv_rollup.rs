//! CSV rollup for archiving the level-up log.
//!
//! Logged level-ups are appended to a CSV history and the log is archived,
//! with the CSV synced before the log is renamed so nothing is lost.

use crate::{LevelUpEvent, Result};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    occurred_at: String,
    week: u32,
    day: u32,
    exercise_index: usize,
    previous_level: u32,
    new_level: u32,
    levels_gained: u32,
}

impl From<&LevelUpEvent> for CsvRow {
    fn from(event: &LevelUpEvent) -> Self {
        CsvRow {
            id: event.id.to_string(),
            occurred_at: event.occurred_at.to_rfc3339(),
            week: event.key.week,
            day: event.key.day,
            exercise_index: event.key.exercise_index,
            previous_level: event.previous_level,
            new_level: event.new_level,
            levels_gained: event.levels_gained,
        }
    }
}

/// Roll up logged level-ups into CSV and archive the log
///
/// 1. Reads all events from the log
/// 2. Appends them to the CSV file (creates with headers if needed)
/// 3. Syncs the CSV to disk
/// 4. Renames the log to `.wal.processed`
///
/// Returns the number of events processed.
pub fn log_to_csv_and_archive(log_path: &Path, csv_path: &Path) -> Result<usize> {
    let events = crate::wal::read_events(log_path)?;

    if events.is_empty() {
        tracing::info!("No level-ups in log to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Headers only on a fresh file
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for event in &events {
        writer.serialize(CsvRow::from(event))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Wrote {} level-ups to CSV", events.len());

    let processed_path = log_path.with_extension("wal.processed");
    std::fs::rename(log_path, &processed_path)?;

    tracing::info!("Archived level-up log to {:?}", processed_path);

    Ok(events.len())
}

/// Remove archived `.wal.processed` logs in `dir`
pub fn cleanup_processed_logs(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.extension().is_some_and(|ext| ext == "processed") {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed processed log: {:?}", path);
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed logs", count);
    }

    Ok(count)
}
