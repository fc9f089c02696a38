use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_capture_group() -> usize {
    1
}

fn default_enabled() -> bool {
    true
}

/// A single episode-number extraction rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub name: String,
    /// Regular expression source, matched case-insensitively
    pub pattern: String,
    /// Index of the capture group holding the episode number
    #[serde(default = "default_capture_group")]
    pub capture_group: usize,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub description: String,
}

impl PatternRule {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, capture_group: usize) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            capture_group,
            enabled: true,
            is_default: false,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// What happened when a single rule was tried against a file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTrace {
    Disabled,
    Invalid,
    NoMatch,
    /// The pattern matched but the capture group did not participate
    MissingGroup,
    NotANumber(String),
    Number(u32),
}

impl RuleTrace {
    pub fn description(&self) -> String {
        match self {
            RuleTrace::Disabled => "disabled".to_string(),
            RuleTrace::Invalid => "invalid pattern".to_string(),
            RuleTrace::NoMatch => "no match".to_string(),
            RuleTrace::MissingGroup => "matched, capture group missing".to_string(),
            RuleTrace::NotANumber(text) => format!("matched '{}', not a number", text),
            RuleTrace::Number(n) => format!("episode {}", n),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Invalid pattern for rule '{name}': {message}")]
    InvalidPattern { name: String, message: String },

    #[error("Rule '{name}' uses capture group {capture_group} but its pattern has only {available}")]
    CaptureGroupOutOfRange {
        name: String,
        capture_group: usize,
        available: usize,
    },

    #[error("No rule named '{0}'")]
    UnknownRule(String),
}
