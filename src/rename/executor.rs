use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::progress::Progress;

use super::backup::{create_backup, BackupOptions};
use super::paths::{is_same_file, path_occupied};
use super::types::{ExecutionRecord, Outcome, PlannedEntry, RenamePlan, RenamePlanItem, RenameResult};

/// Execute one planned rename.
///
/// Never panics and never returns an error: every problem becomes an
/// [`Outcome`]. With backups enabled the source is copied first and a failed
/// copy aborts the item before anything is moved.
pub fn execute_item(item: &RenamePlanItem, backup: &BackupOptions) -> Outcome {
    if item.is_noop() {
        info!(file = %item.source_name, "Already named correctly");
        return Outcome::Renamed { backup_path: None };
    }

    if destination_blocked(item) {
        return destination_exists(item);
    }

    let backup_path = if backup.enabled {
        match create_backup(&item.source_path, &backup.directory) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(file = %item.source_name, error = %e, "Backup failed, file left untouched");
                return Outcome::Failed(format!("backup failed: {}", e));
            }
        }
    } else {
        None
    };

    // The destination may have appeared while the backup was copied
    if destination_blocked(item) {
        if let Some(path) = &backup_path {
            discard_backup(path);
        }
        return destination_exists(item);
    }

    if item.overwrite
        && path_occupied(&item.destination_path)
        && !is_same_file(&item.source_path, &item.destination_path)
    {
        if let Err(e) = fs::remove_file(&item.destination_path) {
            warn!(destination = %item.destination_name, error = %e, "Failed to remove existing destination");
            return Outcome::Failed(format!("could not replace destination: {}", e));
        }
        info!(destination = %item.destination_name, "Removed existing destination");
    }

    match fs::rename(&item.source_path, &item.destination_path) {
        Ok(()) => {
            info!("Renamed: {} -> {}", item.source_name, item.destination_name);
            Outcome::Renamed { backup_path }
        }
        Err(e) => {
            warn!(file = %item.source_name, error = %e, "Rename failed");
            Outcome::Failed(e.to_string())
        }
    }
}

/// Execute every entry of `plan` in order. Entries the planner already
/// skipped are carried over unchanged; a failure never stops the batch.
pub fn execute_plan(
    plan: &RenamePlan,
    backup: &BackupOptions,
    progress: &mut Progress,
) -> RenameResult {
    let mut result = RenameResult::new();
    let total = plan.len();

    progress.rename_start(plan.item_count());

    for (i, entry) in plan.entries.iter().enumerate() {
        let record = match entry {
            PlannedEntry::Rename(item) => {
                ExecutionRecord::from_item(item, execute_item(item, backup))
            }
            PlannedEntry::Skip {
                source_path,
                source_name,
                outcome,
            } => {
                info!(file = %source_name, reason = %outcome.description(), "Skipped");
                ExecutionRecord::from_skip(source_path, source_name, outcome)
            }
        };

        progress.outcome(i + 1, total, &record);
        result.add_record(record);
    }

    progress.rename_complete(&result.summary());

    result
}

fn destination_blocked(item: &RenamePlanItem) -> bool {
    !item.overwrite
        && path_occupied(&item.destination_path)
        && !is_same_file(&item.source_path, &item.destination_path)
}

/// Drop a backup taken for a rename that did not happen
fn discard_backup(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(backup = ?path, "Unused backup removed"),
        Err(e) => warn!(backup = ?path, error = %e, "Failed to remove unused backup"),
    }
}

fn destination_exists(item: &RenamePlanItem) -> Outcome {
    info!(destination = %item.destination_name, "Destination exists, skipping");
    Outcome::SkippedDestinationExists {
        destination: item.destination_path.clone(),
    }
}
