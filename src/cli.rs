use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::config::ConfigLayer;
use crate::rules::PatternRule;

#[derive(Parser, Debug)]
#[command(name = "episode-renamer")]
#[command(author, version, about, long_about = None)]
#[command(about = "Rename Detective Conan episode files to '<series> <NNN> - <title>.<ext>'")]
#[command(group(ArgGroup::new("rule_target").args(["add_rule", "edit_rule"])))]
pub struct Args {
    /// Directory containing the video files to rename
    #[arg(required_unless_present_any = [
        "list_rules",
        "add_rule",
        "remove_rule",
        "enable_rule",
        "edit_rule",
        "disable_rule",
        "import_catalog",
        "list_episodes",
        "test_name",
    ])]
    pub target_dir: Option<PathBuf>,

    /// Simulate changes without modifying the filesystem
    #[arg(short, long)]
    pub dry: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Replace destination files that already exist
    #[arg(short, long)]
    pub force: bool,

    /// Directory holding the catalogue and rule files
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory receiving backup copies
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Do not copy files before renaming them
    #[arg(long)]
    pub no_backup: bool,

    /// Comma-separated list of accepted extensions
    #[arg(short, long, value_name = "LIST")]
    pub extensions: Option<String>,

    /// Series name at the start of every new file name
    #[arg(short, long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Merge a JSON catalogue file into the stored catalogue
    #[arg(long, value_name = "FILE")]
    pub import_catalog: Option<PathBuf>,

    /// Print the stored catalogue
    #[arg(long)]
    pub list_episodes: bool,

    /// Print the extraction rules in precedence order
    #[arg(long)]
    pub list_rules: bool,

    /// Add an extraction rule (requires --pattern)
    #[arg(long, value_name = "NAME", requires = "pattern")]
    pub add_rule: Option<String>,

    /// Edit the extraction rule with this name, keeping its position
    #[arg(long, value_name = "NAME")]
    pub edit_rule: Option<String>,

    /// Regular expression for --add-rule or --edit-rule
    #[arg(long, value_name = "REGEX", requires = "rule_target")]
    pub pattern: Option<String>,

    /// Capture group holding the episode number (1 for new rules)
    #[arg(long, value_name = "N", requires = "rule_target")]
    pub capture_group: Option<usize>,

    /// Rule description for --add-rule or --edit-rule
    #[arg(long, value_name = "TEXT", requires = "rule_target")]
    pub description: Option<String>,

    /// Mark the rule as a default rule (true/false)
    #[arg(long = "default", value_name = "BOOL", requires = "rule_target")]
    pub is_default: Option<bool>,

    /// New name for --edit-rule
    #[arg(long, value_name = "NAME", requires = "edit_rule")]
    pub rename_to: Option<String>,

    /// 1-based position for --add-rule (appended by default)
    #[arg(long, value_name = "N", requires = "add_rule", value_parser = clap::value_parser!(u32).range(1..))]
    pub position: Option<u32>,

    /// Remove the extraction rule with this name
    #[arg(long, value_name = "NAME")]
    pub remove_rule: Option<String>,

    /// Enable the extraction rule with this name
    #[arg(long, value_name = "NAME")]
    pub enable_rule: Option<String>,

    /// Disable the extraction rule with this name
    #[arg(long, value_name = "NAME")]
    pub disable_rule: Option<String>,

    /// Show which rule extracts which number from a file name
    #[arg(long, value_name = "FILENAME")]
    pub test_name: Option<String>,
}

impl Args {
    /// Configuration values given on the command line
    pub fn config_layer(&self) -> ConfigLayer {
        ConfigLayer {
            data_dir: self.data_dir.clone(),
            backup_dir: self.backup_dir.clone(),
            create_backups: self.no_backup.then_some(false),
            extensions: self.extensions.clone(),
            series_prefix: self.prefix.clone(),
        }
    }

    /// True when a rule-management flag was given
    pub fn manages_rules(&self) -> bool {
        self.list_rules
            || self.add_rule.is_some()
            || self.edit_rule.is_some()
            || self.remove_rule.is_some()
            || self.enable_rule.is_some()
            || self.disable_rule.is_some()
    }

    /// The rule described by `--add-rule` and its companion flags
    pub fn new_rule(&self) -> Option<PatternRule> {
        let name = self.add_rule.as_deref()?;
        let pattern = self.pattern.as_deref()?;
        Some(self.apply_rule_fields(PatternRule::new(name, pattern, 1)))
    }

    /// `rule` with the fields given alongside `--edit-rule` replaced
    pub fn edited_rule(&self, mut rule: PatternRule) -> PatternRule {
        if let Some(name) = &self.rename_to {
            rule.name = name.clone();
        }
        if let Some(pattern) = &self.pattern {
            rule.pattern = pattern.clone();
        }
        self.apply_rule_fields(rule)
    }

    fn apply_rule_fields(&self, mut rule: PatternRule) -> PatternRule {
        if let Some(group) = self.capture_group {
            rule.capture_group = group;
        }
        if let Some(description) = &self.description {
            rule.description = description.clone();
        }
        if let Some(is_default) = self.is_default {
            rule.is_default = is_default;
        }
        rule
    }

    /// True when a catalogue-management flag was given
    pub fn manages_catalog(&self) -> bool {
        self.import_catalog.is_some() || self.list_episodes
    }
}
