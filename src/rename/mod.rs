mod backup;
mod executor;
mod name_builder;
mod paths;
mod planner;
mod types;

pub use backup::{backup_file_name, create_backup, BackupOptions};
pub use executor::{execute_item, execute_plan};
pub use name_builder::{build_episode_name, format_episode_number, DEFAULT_SERIES_PREFIX};
pub use planner::{plan_renames, PlanOptions};
pub use types::{
    ExecutionRecord, Outcome, OutcomeSummary, PlannedEntry, RenamePlan, RenamePlanItem,
    RenameResult,
};
