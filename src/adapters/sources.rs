use crate::domain::ports::ToolPathSource;
use crate::utils::error::{DiffSapError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const TORTOISE_SVN_KEY: &str = r"HKLM\SOFTWARE\TortoiseSVN";
pub const TORTOISE_GIT_KEY: &str = r"HKLM\SOFTWARE\TortoiseGit";
pub const TMERGE_VALUE: &str = "TMergePath";

/// A configured place holding the merge tool path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolSource {
    /// Windows registry value, e.g. `HKLM\SOFTWARE\TortoiseSVN` / `TMergePath`.
    Registry { key: String, value: String },
    /// Environment variable holding the path.
    Env { var: String },
    Fixed { path: PathBuf },
}

impl ToolSource {
    /// TortoiseSVN first, then TortoiseGit.
    pub fn defaults() -> Vec<ToolSource> {
        vec![
            ToolSource::Registry {
                key: TORTOISE_SVN_KEY.to_string(),
                value: TMERGE_VALUE.to_string(),
            },
            ToolSource::Registry {
                key: TORTOISE_GIT_KEY.to_string(),
                value: TMERGE_VALUE.to_string(),
            },
        ]
    }
}

impl ToolPathSource for ToolSource {
    fn describe(&self) -> String {
        match self {
            ToolSource::Registry { key, value } => format!(r"registry {}\{}", key, value),
            ToolSource::Env { var } => format!("env {}", var),
            ToolSource::Fixed { path } => format!("fixed {}", path.display()),
        }
    }

    fn lookup(&self) -> Option<PathBuf> {
        let found = match self {
            ToolSource::Registry { key, value } => query_registry(key, value),
            ToolSource::Env { var } => std::env::var_os(var).map(PathBuf::from),
            ToolSource::Fixed { path } => Some(path.clone()),
        };
        found.filter(|path| !path.as_os_str().is_empty())
    }
}

impl Validate for ToolSource {
    fn validate(&self) -> Result<()> {
        match self {
            ToolSource::Registry { key, value } => {
                validate_non_empty_string("merge_tool.sources.key", key)?;
                if split_root(key).is_none() {
                    return Err(DiffSapError::InvalidConfigValueError {
                        field: "merge_tool.sources.key".to_string(),
                        value: key.clone(),
                        reason: r"must start with HKLM\ or HKCU\ followed by a subkey".to_string(),
                    });
                }
                validate_non_empty_string("merge_tool.sources.value", value)
            }
            ToolSource::Env { var } => validate_non_empty_string("merge_tool.sources.var", var),
            ToolSource::Fixed { path } => validate_path("merge_tool.sources.path", path),
        }
    }
}

/// Predefined registry hive a configured key starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryRoot {
    LocalMachine,
    CurrentUser,
}

/// Splits `HKLM\SOFTWARE\TortoiseSVN` into its hive and subkey path.
pub fn split_root(key: &str) -> Option<(RegistryRoot, &str)> {
    let (root, subkey) = key.split_once('\\')?;
    let root = match root.to_ascii_uppercase().as_str() {
        "HKLM" | "HKEY_LOCAL_MACHINE" => RegistryRoot::LocalMachine,
        "HKCU" | "HKEY_CURRENT_USER" => RegistryRoot::CurrentUser,
        _ => return None,
    };
    (!subkey.is_empty()).then_some((root, subkey))
}

/// Reads a `REG_SZ` value as UTF-16, so non-ASCII install paths survive intact.
#[cfg(windows)]
fn query_registry(key: &str, value: &str) -> Option<PathBuf> {
    use std::ffi::{OsStr, OsString};
    use std::os::windows::ffi::{OsStrExt, OsStringExt};
    use windows_sys::Win32::Foundation::ERROR_SUCCESS;
    use windows_sys::Win32::System::Registry::{
        RegGetValueW, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, RRF_RT_REG_SZ,
    };

    let (root, subkey) = split_root(key)?;
    let hkey = match root {
        RegistryRoot::LocalMachine => HKEY_LOCAL_MACHINE,
        RegistryRoot::CurrentUser => HKEY_CURRENT_USER,
    };
    let wide = |s: &str| -> Vec<u16> { OsStr::new(s).encode_wide().chain(Some(0)).collect() };
    let subkey = wide(subkey);
    let name = wide(value);

    let mut size: u32 = 0;
    // SAFETY: both names are NUL-terminated and outlive the call; a null data
    // pointer asks only for the required size in bytes.
    let status = unsafe {
        RegGetValueW(
            hkey,
            subkey.as_ptr(),
            name.as_ptr(),
            RRF_RT_REG_SZ,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            &mut size,
        )
    };
    if status != ERROR_SUCCESS {
        tracing::debug!(r"Registry value {}\{} not readable (error {})", key, value, status);
        return None;
    }

    let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
    // SAFETY: `buffer` holds `size` bytes, and `size` tells the API so.
    let status = unsafe {
        RegGetValueW(
            hkey,
            subkey.as_ptr(),
            name.as_ptr(),
            RRF_RT_REG_SZ,
            std::ptr::null_mut(),
            buffer.as_mut_ptr().cast(),
            &mut size,
        )
    };
    if status != ERROR_SUCCESS {
        tracing::debug!(r"Registry value {}\{} not readable (error {})", key, value, status);
        return None;
    }

    buffer.truncate(size as usize / 2);
    while buffer.last() == Some(&0) {
        buffer.pop();
    }
    Some(PathBuf::from(OsString::from_wide(&buffer)))
}

#[cfg(not(windows))]
fn query_registry(key: &str, value: &str) -> Option<PathBuf> {
    tracing::debug!(r"Skipping registry lookup of {}\{} on this platform", key, value);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_root() {
        assert_eq!(
            split_root(TORTOISE_SVN_KEY),
            Some((RegistryRoot::LocalMachine, r"SOFTWARE\TortoiseSVN"))
        );
        assert_eq!(
            split_root(r"HKEY_CURRENT_USER\Software\Café Tools"),
            Some((RegistryRoot::CurrentUser, r"Software\Café Tools"))
        );
        assert_eq!(
            split_root(r"hklm\SOFTWARE\TortoiseGit"),
            Some((RegistryRoot::LocalMachine, r"SOFTWARE\TortoiseGit"))
        );
        assert_eq!(split_root(r"HKCR\Applications"), None);
        assert_eq!(split_root("HKLM"), None);
        assert_eq!(split_root(r"HKLM\"), None);
    }

    #[cfg(windows)]
    #[test]
    fn test_missing_registry_value_is_not_a_hit() {
        let source = ToolSource::Registry {
            key: r"HKCU\Software\diff-sap-test-no-such-key".to_string(),
            value: TMERGE_VALUE.to_string(),
        };
        assert_eq!(source.lookup(), None);
    }

    #[test]
    fn test_env_source() {
        let var = "DIFF_SAP_TEST_ENV_SOURCE";
        let source = ToolSource::Env {
            var: var.to_string(),
        };
        std::env::remove_var(var);
        assert_eq!(source.lookup(), None);

        std::env::set_var(var, "");
        assert_eq!(source.lookup(), None);

        std::env::set_var(var, "/opt/tmerge/bin/tmerge");
        assert_eq!(source.lookup(), Some(PathBuf::from("/opt/tmerge/bin/tmerge")));
        assert_eq!(source.describe(), "env DIFF_SAP_TEST_ENV_SOURCE");

        std::env::remove_var(var);
    }

    #[test]
    fn test_defaults_are_svn_then_git() {
        let defaults = ToolSource::defaults();
        assert_eq!(defaults.len(), 2);
        assert_eq!(
            defaults[0].describe(),
            r"registry HKLM\SOFTWARE\TortoiseSVN\TMergePath"
        );
        assert_eq!(
            defaults[1].describe(),
            r"registry HKLM\SOFTWARE\TortoiseGit\TMergePath"
        );
    }

    #[test]
    fn test_validate_sources() {
        assert!(ToolSource::Env { var: " ".to_string() }.validate().is_err());
        assert!(ToolSource::Fixed {
            path: PathBuf::new()
        }
        .validate()
        .is_err());
        assert!(ToolSource::Registry {
            key: r"SOFTWARE\TortoiseSVN".to_string(),
            value: TMERGE_VALUE.to_string(),
        }
        .validate()
        .is_err());
        assert!(ToolSource::defaults().iter().all(|s| s.validate().is_ok()));
    }
}
