use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{default_rules, PatternRule};
use crate::storage::write_json_atomic;

pub const RULES_VERSION: &str = "1.0";
pub const RULES_FILE_NAME: &str = "regex-patterns.json";

/// The rule file structure (serialized to JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesFile {
    pub version: String,
    pub rules: Vec<PatternRule>,
}

#[derive(Error, Debug)]
pub enum RuleStoreError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Rule file corrupted: {0}")]
    Corrupted(String),

    #[error("Rule file version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },
}

/// Persistent ordered list of pattern rules
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(RULES_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the rule list for a rename run.
    ///
    /// A missing file is seeded with the default rules. An unreadable file
    /// falls back to the defaults without touching it.
    pub fn load(&self) -> Vec<PatternRule> {
        match self.try_load() {
            Ok(rules) => rules,
            Err(e) => {
                warn!("Failed to load rules: {}, using defaults", e);
                default_rules()
            }
        }
    }

    /// Load the rule list, seeding the defaults only when the file is
    /// missing. Anything else is an error, so the file is never replaced
    /// by an edit of the fallback list.
    pub fn try_load(&self) -> Result<Vec<PatternRule>, RuleStoreError> {
        match self.read() {
            Ok(rules) => {
                info!("Loaded {} rules from {:?}", rules.len(), self.path);
                Ok(rules)
            }
            Err(RuleStoreError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No rule file found, seeding defaults");
                let rules = default_rules();
                if let Err(e) = self.save(&rules) {
                    warn!("Failed to save default rules: {}", e);
                }
                Ok(rules)
            }
            Err(e) => Err(e),
        }
    }

    fn read(&self) -> Result<Vec<PatternRule>, RuleStoreError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let data: RulesFile = serde_json::from_reader(reader)
            .map_err(|e| RuleStoreError::Corrupted(e.to_string()))?;

        if data.version != RULES_VERSION {
            return Err(RuleStoreError::VersionMismatch {
                expected: RULES_VERSION.to_string(),
                found: data.version,
            });
        }

        Ok(data.rules)
    }

    pub fn save(&self, rules: &[PatternRule]) -> Result<(), RuleStoreError> {
        let data = RulesFile {
            version: RULES_VERSION.to_string(),
            rules: rules.to_vec(),
        };

        write_json_atomic(&self.path, &data)?;

        info!("Saved {} rules to {:?}", rules.len(), self.path);
        Ok(())
    }
}
