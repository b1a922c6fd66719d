use crate::utils::error::Result;
use std::path::Path;
use tempfile::TempPath;

/// A temporary text file owned by one run. Removed on drop.
#[derive(Debug)]
pub struct TextFile {
    path: TempPath,
}

impl TextFile {
    /// Creates an empty, closed file with a unique name inside `dir`.
    ///
    /// The handle is closed straight away so external tools can rewrite the
    /// file while we only hold on to its name.
    pub fn create(dir: &Path) -> Result<Self> {
        let path = tempfile::Builder::new()
            .prefix("diff-sap-")
            .suffix(".txt")
            .tempfile_in(dir)?
            .into_temp_path();
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort removal; a failure is logged and otherwise ignored.
    pub fn discard(self) {
        let shown = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            tracing::debug!("Could not delete {}: {}", shown, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_gives_distinct_files_in_dir() {
        let dir = TempDir::new().unwrap();
        let first = TextFile::create(dir.path()).unwrap();
        let second = TextFile::create(dir.path()).unwrap();

        assert_ne!(first.path(), second.path());
        assert!(first.path().starts_with(dir.path()));
        assert!(first.path().is_file());
        assert_eq!(first.path().extension().unwrap(), "txt");
    }

    #[test]
    fn test_discard_and_drop_remove_file() {
        let dir = TempDir::new().unwrap();
        let kept = TextFile::create(dir.path()).unwrap();
        let dropped = TextFile::create(dir.path()).unwrap();
        let kept_path = kept.path().to_path_buf();
        let dropped_path = dropped.path().to_path_buf();

        kept.discard();
        drop(dropped);

        assert!(!kept_path.exists());
        assert!(!dropped_path.exists());
    }

    #[test]
    fn test_discard_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let file = TextFile::create(dir.path()).unwrap();
        std::fs::remove_file(file.path()).unwrap();
        file.discard();
    }

    #[test]
    fn test_create_in_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        assert!(TextFile::create(&dir.path().join("nope")).is_err());
    }
}
