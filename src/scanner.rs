use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Failed to read directory: {0}")]
    IoError(#[from] std::io::Error),
}

/// A candidate video file found in the target directory
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
}

impl FileEntry {
    pub fn new(name: String, path: PathBuf) -> Self {
        Self { name, path }
    }
}

/// Case-insensitive set of accepted file extensions, stored without dots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { extensions }
    }

    /// Parse a comma-separated list such as `"mkv, .MP4"`
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                self.extensions
                    .contains(&ext.to_string_lossy().to_lowercase())
            })
            .unwrap_or(false)
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(["mkv", "mp4"])
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        write!(f, "{}", list.join(","))
    }
}

/// List the regular files directly inside `target` whose extension passes
/// the filter. Hidden entries and subdirectories are skipped; the result is
/// sorted by name.
pub fn scan_directory(
    target: &Path,
    filter: &ExtensionFilter,
) -> Result<Vec<FileEntry>, ScannerError> {
    debug!(path = ?target, extensions = %filter, "Scanning directory");

    if !target.exists() {
        return Err(ScannerError::PathNotFound(target.to_path_buf()));
    }

    if !target.is_dir() {
        return Err(ScannerError::NotADirectory(target.to_path_buf()));
    }

    let mut entries = Vec::new();

    let read_dir = fs::read_dir(target).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ScannerError::PermissionDenied(target.to_path_buf())
        } else {
            ScannerError::IoError(e)
        }
    })?;

    for entry in read_dir {
        let entry = entry?;
        let path = entry.path();

        trace!(entry = ?path, "Examining entry");

        if !entry.file_type()?.is_file() {
            trace!(path = ?path, "Skipping non-file");
            continue;
        }

        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().to_string(),
            None => continue,
        };

        if name.starts_with('.') {
            trace!(name = %name, "Skipping hidden file");
            continue;
        }

        if !filter.accepts(&path) {
            trace!(name = %name, "Skipping unlisted extension");
            continue;
        }

        debug!(name = %name, "Found candidate file");
        entries.push(FileEntry::new(name, path));
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(count = entries.len(), "Scan complete");

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempdir().unwrap();
        let result = scan_directory(dir.path(), &ExtensionFilter::default()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_scan_filters_extensions() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Conan 1.mkv"), "").unwrap();
        fs::write(dir.path().join("Conan 2.MP4"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("noext"), "").unwrap();

        let result = scan_directory(dir.path(), &ExtensionFilter::default()).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Conan 1.mkv");
        assert_eq!(result[1].name, "Conan 2.MP4");
    }

    #[test]
    fn test_ignores_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("season.mkv")).unwrap();
        fs::write(dir.path().join("file.mkv"), "").unwrap();

        let result = scan_directory(dir.path(), &ExtensionFilter::default()).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "file.mkv");
    }

    #[test]
    fn test_ignores_hidden_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mkv"), "").unwrap();
        fs::write(dir.path().join("visible.mkv"), "").unwrap();

        let result = scan_directory(dir.path(), &ExtensionFilter::default()).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "visible.mkv");
    }

    #[test]
    fn test_path_not_found() {
        let result = scan_directory(Path::new("/nonexistent/path"), &ExtensionFilter::default());
        assert!(matches!(result, Err(ScannerError::PathNotFound(_))));
    }

    #[test]
    fn test_not_a_directory() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("file.mkv");
        fs::write(&file_path, "content").unwrap();

        let result = scan_directory(&file_path, &ExtensionFilter::default());
        assert!(matches!(result, Err(ScannerError::NotADirectory(_))));
    }

    #[test]
    fn test_alphabetical_sorting() {
        let dir = tempdir().unwrap();
        for name in ["zebra.mkv", "alpha.mkv", "beta.mkv"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let result = scan_directory(dir.path(), &ExtensionFilter::default()).unwrap();

        assert_eq!(result[0].name, "alpha.mkv");
        assert_eq!(result[1].name, "beta.mkv");
        assert_eq!(result[2].name, "zebra.mkv");
    }

    #[test]
    fn test_extension_filter_parse() {
        let filter = ExtensionFilter::parse(" .MKV, avi ,,");

        assert!(filter.accepts(Path::new("a.mkv")));
        assert!(filter.accepts(Path::new("a.AVI")));
        assert!(!filter.accepts(Path::new("a.mp4")));
        assert!(!filter.accepts(Path::new("mkv")));
        assert_eq!(filter.to_string(), "avi,mkv");
        assert!(ExtensionFilter::parse(" , ").is_empty());
    }
}
