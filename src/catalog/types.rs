use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const CATALOG_VERSION: &str = "1.0";
pub const CATALOG_FILE_NAME: &str = "episodes.json";

/// A single catalogue row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeEntry {
    pub number: u32,
    pub title: String,
}

/// The catalogue file structure (serialized to JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub version: String,
    pub episodes: Vec<EpisodeEntry>,
}

impl Default for CatalogFile {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION.to_string(),
            episodes: Vec::new(),
        }
    }
}

/// Formats accepted by `--import-catalog`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CatalogImport {
    Store(CatalogFile),
    /// `{"1": "title", "2": "title"}`
    Map(BTreeMap<u32, String>),
}

impl CatalogImport {
    pub fn into_entries(self) -> Vec<EpisodeEntry> {
        match self {
            CatalogImport::Store(file) => file.episodes,
            CatalogImport::Map(map) => map
                .into_iter()
                .map(|(number, title)| EpisodeEntry { number, title })
                .collect(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Catalogue file corrupted: {0}")]
    Corrupted(String),

    #[error("Catalogue version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_accepts_store_format() {
        let json = r#"{"version": "1.0", "episodes": [{"number": 2, "title": "B"}]}"#;
        let import: CatalogImport = serde_json::from_str(json).unwrap();

        assert_eq!(
            import.into_entries(),
            vec![EpisodeEntry {
                number: 2,
                title: "B".into()
            }]
        );
    }

    #[test]
    fn test_import_accepts_plain_map() {
        let json = r#"{"10": "Ten", "2": "Two"}"#;
        let import: CatalogImport = serde_json::from_str(json).unwrap();
        let entries = import.into_entries();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].number, 2);
        assert_eq!(entries[1].title, "Ten");
    }

    #[test]
    fn test_import_rejects_other_shapes() {
        assert!(serde_json::from_str::<CatalogImport>(r#"["a", "b"]"#).is_err());
        assert!(serde_json::from_str::<CatalogImport>(r#"{"x": "a"}"#).is_err());
    }
}
