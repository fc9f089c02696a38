use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Where and whether to copy a file before it is renamed
#[derive(Debug, Clone)]
pub struct BackupOptions {
    pub enabled: bool,
    pub directory: PathBuf,
}

impl BackupOptions {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::new(),
        }
    }

    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            directory: directory.into(),
        }
    }
}

/// `<stem>_<YYYYMMDDHHMMSS><ext>`
pub fn backup_file_name(source: &Path, at: &DateTime<Local>) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = source
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    format!(
        "{}_{}{}",
        stem,
        at.format(BACKUP_TIMESTAMP_FORMAT),
        extension
    )
}

/// Copy `source` into `directory`, creating it if needed. Returns the path
/// of the copy.
pub fn create_backup(source: &Path, directory: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(directory)?;

    let backup_path = directory.join(backup_file_name(source, &Local::now()));
    fs::copy(source, &backup_path)?;

    debug!(source = ?source, backup = ?backup_path, "Backup created");
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_backup_file_name() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        assert_eq!(
            backup_file_name(Path::new("/v/Detective Conan 001.mkv"), &at),
            "Detective Conan 001_20240309140507.mkv"
        );
        assert_eq!(backup_file_name(Path::new("/v/noext"), &at), "noext_20240309140507");
    }

    #[test]
    fn test_create_backup_copies_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("episode.mkv");
        fs::write(&source, "video").unwrap();
        let backups = dir.path().join("nested").join("backups");

        let backup = create_backup(&source, &backups).unwrap();

        assert!(backup.starts_with(&backups));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "video");
        assert!(source.exists());
        let name = backup.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("episode_"));
        assert!(name.ends_with(".mkv"));
    }

    #[test]
    fn test_create_backup_fails_for_missing_source() {
        let dir = tempdir().unwrap();

        let result = create_backup(&dir.path().join("missing.mkv"), dir.path());

        assert!(result.is_err());
    }
}
