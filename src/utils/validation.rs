use crate::utils::error::{DiffSapError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Rejects paths that can never name a file: empty or containing NUL.
pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let raw = path.as_os_str();
    if raw.is_empty() {
        return Err(DiffSapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if raw.to_string_lossy().contains('\0') {
        return Err(DiffSapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.display().to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_existing_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(DiffSapError::InputMissingError {
            path: path.to_path_buf(),
        })
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DiffSapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("base", Path::new("tune.sap")).is_ok());
        assert!(validate_path("base", Path::new("")).is_err());
        assert!(validate_path("base", &PathBuf::from("bad\0name.sap")).is_err());
    }

    #[test]
    fn test_validate_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(validate_existing_file(file.path()).is_ok());

        let dir = tempfile::TempDir::new().unwrap();
        let err = validate_existing_file(&dir.path().join("missing.sap")).unwrap_err();
        assert!(matches!(err, DiffSapError::InputMissingError { .. }));
        // directories are not SAP files either
        assert!(validate_existing_file(dir.path()).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("merge_tool.sources.var", "TMERGE").is_ok());
        assert!(validate_non_empty_string("merge_tool.sources.var", "  ").is_err());
    }
}
