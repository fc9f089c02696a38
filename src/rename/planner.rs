use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::normalize::normalize_title;
use crate::rules::RuleSet;
use crate::scanner::ExtensionFilter;

use super::name_builder::{build_episode_name, DEFAULT_SERIES_PREFIX};
use super::paths::{is_same_file, path_occupied};
use super::types::{Outcome, PlannedEntry, RenamePlan, RenamePlanItem};

/// Options for building a rename plan
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub extensions: ExtensionFilter,
    pub series_prefix: String,
    /// Replace destinations that already exist instead of skipping them
    pub allow_overwrite: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            extensions: ExtensionFilter::default(),
            series_prefix: DEFAULT_SERIES_PREFIX.to_string(),
            allow_overwrite: false,
        }
    }
}

/// Build a rename plan for `files`.
///
/// Files whose extension is not accepted are left out. Every other file gets
/// exactly one entry, in input order. No two items share a destination: the
/// later one is demoted to a skip.
pub fn plan_renames(
    files: &[PathBuf],
    catalog: &Catalog,
    rules: &RuleSet,
    options: &PlanOptions,
) -> RenamePlan {
    let mut plan = RenamePlan::default();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for source in files {
        if !options.extensions.accepts(source) {
            debug!(path = ?source, "Extension not accepted, leaving out of plan");
            continue;
        }

        let entry = plan_file(source, catalog, rules, options, &mut claimed);
        plan.entries.push(entry);
    }

    info!(
        files = plan.len(),
        renames = plan.item_count(),
        "Rename plan built"
    );

    plan
}

fn plan_file(
    source: &Path,
    catalog: &Catalog,
    rules: &RuleSet,
    options: &PlanOptions,
    claimed: &mut HashSet<PathBuf>,
) -> PlannedEntry {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let Some((episode_number, rule)) = rules.extract(&file_name) else {
        debug!(file = %file_name, "No rule produced an episode number");
        return PlannedEntry::skip(source, Outcome::SkippedNoNumberMatch);
    };

    debug!(file = %file_name, episode = episode_number, rule = %rule, "Episode number extracted");

    // Catalogues built in memory may still carry raw titles
    let title = match catalog.title(episode_number).map(normalize_title) {
        Some(title) if !title.is_empty() => title,
        _ => {
            debug!(episode = episode_number, "No catalogue title");
            return PlannedEntry::skip(source, Outcome::SkippedNoTitleForNumber { episode_number });
        }
    };

    let extension = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let destination_name =
        build_episode_name(&options.series_prefix, episode_number, &title, &extension);
    let item = RenamePlanItem::new(source.to_path_buf(), destination_name, episode_number, title);

    if !claimed.insert(item.destination_path.clone()) {
        debug!(file = %file_name, destination = %item.destination_name, "Destination already planned");
        return PlannedEntry::skip(
            source,
            Outcome::SkippedDestinationExists {
                destination: item.destination_path,
            },
        );
    }

    let occupied =
        path_occupied(&item.destination_path) && !is_same_file(source, &item.destination_path);

    if occupied && !options.allow_overwrite {
        debug!(destination = %item.destination_name, "Destination exists on disk");
        return PlannedEntry::skip(
            source,
            Outcome::SkippedDestinationExists {
                destination: item.destination_path,
            },
        );
    }

    PlannedEntry::Rename(item.with_overwrite(occupied))
}
