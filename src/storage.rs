use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write `value` as pretty-printed JSON, through a temporary file renamed
/// into place so readers never see a half-written file.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("json.tmp");

    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }

    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_parent_and_removes_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");

        write_json_atomic(&path, &vec![1, 2, 3]).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains('\n'));
        let back: Vec<u32> = serde_json::from_str(&content).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "old").unwrap();

        write_json_atomic(&path, &"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "\"new\"");
    }
}
