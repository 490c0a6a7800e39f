//! Atomic file replacement
//!
//! Content goes to a sibling temp file, is synced, then renamed over the
//! target. Readers see either the old file or the new one, never a torn write.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Sibling temp path used while writing `path`
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace `path` with `contents`, creating parent directories as needed
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp = temp_path(path);
    if temp.exists() {
        log::debug!(
            "[atomic_write::write_atomic] Removing stale temp file {}",
            temp.display()
        );
        fs::remove_file(&temp)?;
    }

    {
        let mut file = fs::OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp)?;
        file.write_all(contents)?;
        file.sync_all()?;
    }

    if let Err(err) = fs::rename(&temp, path) {
        // Some platforms refuse to rename over an existing file
        let retried = if path.exists() {
            fs::remove_file(path).and_then(|_| fs::rename(&temp, path))
        } else {
            Err(err)
        };
        if let Err(err) = retried {
            let _ = fs::remove_file(&temp);
            return Err(err);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents_and_replaces() {
        let dir = TempDir::new().expect("Failed to create temporary directory for test");
        let path = dir.path().join("a").join("b").join("file.json");

        write_atomic(&path, b"first").expect("first write");
        write_atomic(&path, b"second").expect("second write");

        let contents = fs::read_to_string(&path).expect("file exists");
        assert_eq!(contents, "second");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_stale_temp_is_replaced() {
        let dir = TempDir::new().expect("Failed to create temporary directory for test");
        let path = dir.path().join("toolRegistry.conf");
        fs::write(temp_path(&path), b"leftover").expect("seed stale temp");

        write_atomic(&path, b"fresh").expect("write over stale temp");
        assert_eq!(fs::read_to_string(&path).expect("file exists"), "fresh");
    }

    #[test]
    fn test_failed_replace_leaves_no_temp() {
        let dir = TempDir::new().expect("Failed to create temporary directory for test");
        let path = dir.path().join("toolRegistry.conf");
        fs::create_dir_all(path.join("blocker")).expect("occupy target with a directory");

        assert!(write_atomic(&path, b"contents").is_err());
        assert!(!temp_path(&path).exists());
        assert!(path.join("blocker").is_dir());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let path = Path::new("/srv/config/toolRegistry.conf");
        assert_eq!(
            temp_path(path),
            PathBuf::from("/srv/config/toolRegistry.conf.tmp")
        );
    }
}
