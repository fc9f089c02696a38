mod store;
mod types;

pub use store::CatalogStore;
pub use types::*;

use std::collections::BTreeMap;

/// Episode number to title mapping, kept in ascending numeric order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    episodes: BTreeMap<u32, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a title. Returns the previous title, if any.
    pub fn insert(&mut self, number: u32, title: impl Into<String>) -> Option<String> {
        self.episodes.insert(number, title.into())
    }

    pub fn title(&self, number: u32) -> Option<&str> {
        self.episodes.get(&number).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.episodes.iter().map(|(n, t)| (*n, t.as_str()))
    }

    /// Merge `other` into this catalogue; titles from `other` win.
    pub fn merge(&mut self, other: Catalog) {
        self.episodes.extend(other.episodes);
    }

    pub fn to_entries(&self) -> Vec<EpisodeEntry> {
        self.iter()
            .map(|(number, title)| EpisodeEntry {
                number,
                title: title.to_string(),
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        Self {
            episodes: iter.into_iter().map(|(n, t)| (n, t.into())).collect(),
        }
    }
}
