use super::types::{
    CatalogError, CatalogFile, CatalogImport, EpisodeEntry, CATALOG_FILE_NAME, CATALOG_VERSION,
};
use super::Catalog;
use crate::normalize::normalize_title;
use crate::storage::write_json_atomic;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Persistent episode catalogue in the data directory
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(CATALOG_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the catalogue. A missing file is an empty catalogue; a corrupt
    /// one is an error.
    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No catalogue file at {:?}", self.path);
                return Ok(Catalog::new());
            }
            Err(e) => return Err(e.into()),
        };

        let data: CatalogFile = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| CatalogError::Corrupted(e.to_string()))?;

        if data.version != CATALOG_VERSION {
            return Err(CatalogError::VersionMismatch {
                expected: CATALOG_VERSION.to_string(),
                found: data.version,
            });
        }

        let catalog = entries_to_catalog(data.episodes);
        info!("Loaded {} episodes from {:?}", catalog.len(), self.path);
        Ok(catalog)
    }

    pub fn save(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let data = CatalogFile {
            version: CATALOG_VERSION.to_string(),
            episodes: catalog.to_entries(),
        };

        write_json_atomic(&self.path, &data)?;

        info!("Saved {} episodes to {:?}", catalog.len(), self.path);
        Ok(())
    }

    /// Merge the episodes of `source` into the stored catalogue and save it.
    /// Returns the number of episodes read from `source`.
    pub fn import(&self, source: &Path) -> Result<usize, CatalogError> {
        let file = File::open(source)?;
        let import: CatalogImport = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| CatalogError::Corrupted(format!("{}: {}", source.display(), e)))?;

        let incoming = entries_to_catalog(import.into_entries());
        let count = incoming.len();

        let mut catalog = self.load()?;
        catalog.merge(incoming);
        self.save(&catalog)?;

        info!("Imported {} episodes from {:?}", count, source);
        Ok(count)
    }
}

fn entries_to_catalog(entries: Vec<EpisodeEntry>) -> Catalog {
    let mut catalog = Catalog::new();

    for entry in entries {
        if entry.number == 0 {
            warn!("Ignoring catalogue entry with episode number 0");
            continue;
        }

        let title = normalize_title(&entry.title);
        if title.is_empty() {
            warn!(episode = entry.number, "Ignoring catalogue entry with empty title");
            continue;
        }

        catalog.insert(entry.number, title);
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path());

        let catalog = store.load().unwrap();

        assert!(catalog.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        let catalog: Catalog = [(12, "Douze"), (3, "Trois")].into_iter().collect();

        store.save(&catalog).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, catalog);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.find("Trois").unwrap() < raw.find("Douze").unwrap());
    }

    #[test]
    fn test_load_normalizes_and_filters() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        fs::write(
            store.path(),
            r#"{"version": "1.0", "episodes": [
                {"number": 0, "title": "Zero"},
                {"number": 1, "title": "Le \"Secret\" : fin"},
                {"number": 2, "title": "<small>only markup</small>"}
            ]}"#,
        )
        .unwrap();

        let catalog = store.load().unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.title(1), Some("Le 'Secret' - fin"));
    }

    #[test]
    fn test_corrupted_file_is_error() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        fs::write(store.path(), "{ nope").unwrap();

        assert!(matches!(store.load(), Err(CatalogError::Corrupted(_))));
    }

    #[test]
    fn test_version_mismatch() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        fs::write(store.path(), r#"{"version": "0.1", "episodes": []}"#).unwrap();

        assert!(matches!(
            store.load(),
            Err(CatalogError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_import_merges() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path());
        store
            .save(&[(1, "Old"), (2, "Kept")].into_iter().collect())
            .unwrap();

        let source = dir.path().join("import.json");
        fs::write(&source, r#"{"1": "New: title", "5": "Five"}"#).unwrap();

        let count = store.import(&source).unwrap();
        let catalog = store.load().unwrap();

        assert_eq!(count, 2);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.title(1), Some("New- title"));
        assert_eq!(catalog.title(2), Some("Kept"));
    }

    #[test]
    fn test_import_missing_source() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path());

        let result = store.import(&dir.path().join("missing.json"));

        assert!(matches!(result, Err(CatalogError::IoError(_))));
    }
}
