//! Live filesystem adapter using `std::fs`.

use std::io::{self, Read};
use std::path::Path;

use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn read_head(
        &self,
        path: &Path,
        len: usize,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        let file = std::fs::File::open(path)?;
        let mut buf = Vec::with_capacity(len);
        file.take(len as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn try_exists(&self, path: &Path) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        match path.try_exists() {
            Ok(found) => Ok(found),
            // A path below a regular file is missing, not inaccessible.
            Err(err) if err.kind() == io::ErrorKind::NotADirectory => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_head_stops_at_len() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob");
        std::fs::write(&path, b"0123456789").unwrap();

        let head = LiveFileSystem.read_head(&path, 4).unwrap();
        assert_eq!(head, b"0123");

        let all = LiveFileSystem.read_head(&path, 64).unwrap();
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn list_dir_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha", "mid"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let entries = LiveFileSystem.list_dir(dir.path()).unwrap();
        assert_eq!(entries, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn try_exists_reports_missing_paths_as_false() {
        let dir = tempfile::tempdir().unwrap();
        assert!(LiveFileSystem.try_exists(dir.path()).unwrap());
        assert!(!LiveFileSystem.try_exists(&dir.path().join("nope")).unwrap());
    }

    #[test]
    fn try_exists_below_a_file_is_false() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README"), "").unwrap();
        assert!(!LiveFileSystem.try_exists(&dir.path().join("README").join("sub")).unwrap());
    }
}
