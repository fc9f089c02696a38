pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod progress;
pub mod rename;
pub mod rules;
pub mod scanner;
pub mod storage;

pub use catalog::{Catalog, CatalogError, CatalogStore, EpisodeEntry};
pub use config::{AppConfig, ConfigError, ConfigLayer};
pub use error::{AppError, ExitCode};
pub use normalize::normalize_title;
pub use rename::{
    build_episode_name, execute_item, execute_plan, plan_renames, BackupOptions, Outcome,
    PlanOptions, RenamePlan, RenamePlanItem, RenameResult,
};
pub use rules::{default_rules, PatternRule, RuleError, RuleSet, RuleStore};
pub use scanner::{scan_directory, ExtensionFilter, FileEntry, ScannerError};
