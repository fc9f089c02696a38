use std::path::{Path, PathBuf};

/// A single planned rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlanItem {
    /// Full path to the source file
    pub source_path: PathBuf,
    /// Original file name
    pub source_name: String,
    /// Full path to the destination
    pub destination_path: PathBuf,
    /// New file name
    pub destination_name: String,
    pub episode_number: u32,
    /// Normalized catalogue title
    pub title: String,
    /// Replace an existing destination. Only set when overwriting was
    /// explicitly allowed and the destination existed at plan time.
    pub overwrite: bool,
}

impl RenamePlanItem {
    pub fn new(
        source_path: PathBuf,
        destination_name: String,
        episode_number: u32,
        title: String,
    ) -> Self {
        let source_name = file_name_of(&source_path);

        let destination_path = source_path
            .parent()
            .map(|p| p.join(&destination_name))
            .unwrap_or_else(|| PathBuf::from(&destination_name));

        Self {
            source_path,
            source_name,
            destination_path,
            destination_name,
            episode_number,
            title,
            overwrite: false,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// The file already carries its target name
    pub fn is_noop(&self) -> bool {
        self.source_path == self.destination_path
    }
}

/// Final state of one file after planning or execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Renamed { backup_path: Option<PathBuf> },
    SkippedNoNumberMatch,
    SkippedNoTitleForNumber { episode_number: u32 },
    SkippedDestinationExists { destination: PathBuf },
    Failed(String),
}

impl Outcome {
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Outcome::SkippedNoNumberMatch
                | Outcome::SkippedNoTitleForNumber { .. }
                | Outcome::SkippedDestinationExists { .. }
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn description(&self) -> String {
        match self {
            Outcome::Renamed { .. } => "renamed".to_string(),
            Outcome::SkippedNoNumberMatch => "no episode number found".to_string(),
            Outcome::SkippedNoTitleForNumber { episode_number } => {
                format!("no title for episode {}", episode_number)
            }
            Outcome::SkippedDestinationExists { destination } => {
                format!("destination exists: {}", file_name_of(destination))
            }
            Outcome::Failed(reason) => format!("failed: {}", reason),
        }
    }
}

/// One entry of a plan: either an item to execute or a file already skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedEntry {
    Rename(RenamePlanItem),
    Skip {
        source_path: PathBuf,
        source_name: String,
        outcome: Outcome,
    },
}

impl PlannedEntry {
    pub fn skip(source_path: &Path, outcome: Outcome) -> Self {
        PlannedEntry::Skip {
            source_path: source_path.to_path_buf(),
            source_name: file_name_of(source_path),
            outcome,
        }
    }

    pub fn source_name(&self) -> &str {
        match self {
            PlannedEntry::Rename(item) => &item.source_name,
            PlannedEntry::Skip { source_name, .. } => source_name,
        }
    }
}

/// Ordered plan for one directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    pub entries: Vec<PlannedEntry>,
}

impl RenamePlan {
    pub fn items(&self) -> impl Iterator<Item = &RenamePlanItem> {
        self.entries.iter().filter_map(|e| match e {
            PlannedEntry::Rename(item) => Some(item),
            PlannedEntry::Skip { .. } => None,
        })
    }

    pub fn skips(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries.iter().filter_map(|e| match e {
            PlannedEntry::Skip {
                source_name,
                outcome,
                ..
            } => Some((source_name.as_str(), outcome)),
            PlannedEntry::Rename(_) => None,
        })
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// What happened to one file during execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRecord {
    pub source_path: PathBuf,
    pub source_name: String,
    pub destination_path: Option<PathBuf>,
    pub destination_name: Option<String>,
    pub episode_number: Option<u32>,
    pub outcome: Outcome,
}

impl ExecutionRecord {
    pub fn from_item(item: &RenamePlanItem, outcome: Outcome) -> Self {
        Self {
            source_path: item.source_path.clone(),
            source_name: item.source_name.clone(),
            destination_path: Some(item.destination_path.clone()),
            destination_name: Some(item.destination_name.clone()),
            episode_number: Some(item.episode_number),
            outcome,
        }
    }

    pub fn from_skip(source_path: &Path, source_name: &str, outcome: &Outcome) -> Self {
        Self {
            source_path: source_path.to_path_buf(),
            source_name: source_name.to_string(),
            destination_path: None,
            destination_name: None,
            episode_number: None,
            outcome: outcome.clone(),
        }
    }
}

/// Per-outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeSummary {
    pub renamed: usize,
    pub no_number: usize,
    pub no_title: usize,
    pub destination_exists: usize,
    pub failed: usize,
}

impl OutcomeSummary {
    pub fn skipped(&self) -> usize {
        self.no_number + self.no_title + self.destination_exists
    }

    pub fn total(&self) -> usize {
        self.renamed + self.skipped() + self.failed
    }
}

/// Result of executing a plan
#[derive(Debug, Clone, Default)]
pub struct RenameResult {
    pub records: Vec<ExecutionRecord>,
}

impl RenameResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: ExecutionRecord) {
        self.records.push(record);
    }

    pub fn summary(&self) -> OutcomeSummary {
        let mut summary = OutcomeSummary::default();
        for record in &self.records {
            match record.outcome {
                Outcome::Renamed { .. } => summary.renamed += 1,
                Outcome::SkippedNoNumberMatch => summary.no_number += 1,
                Outcome::SkippedNoTitleForNumber { .. } => summary.no_title += 1,
                Outcome::SkippedDestinationExists { .. } => summary.destination_exists += 1,
                Outcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.records.iter().any(|r| r.outcome.is_failure())
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
