use crate::adapters::sources::ToolSource;
use crate::domain::model::WritebackPolicy;
use crate::utils::error::{DiffSapError, Result};
use crate::utils::validation::{validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "diff-sap.toml";

/// Contents of `diff-sap.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub converter: Option<ConverterConfig>,
    pub merge_tool: Option<MergeToolConfig>,
    pub run: Option<RunConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConverterConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeToolConfig {
    /// Tried in order; replaces the built-in TortoiseSVN/TortoiseGit lookup.
    pub sources: Vec<ToolSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub strict: Option<bool>,
    pub writeback: Option<WritebackPolicy>,
    pub temp_dir: Option<PathBuf>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DiffSapError::ConfigError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DiffSapError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable; unknown
    /// variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DiffSapError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn converter_path(&self) -> Option<&Path> {
        self.converter.as_ref().map(|c| c.path.as_path())
    }

    pub fn tool_sources(&self) -> Option<&[ToolSource]> {
        self.merge_tool.as_ref().map(|m| m.sources.as_slice())
    }

    pub fn strict(&self) -> Option<bool> {
        self.run.as_ref().and_then(|r| r.strict)
    }

    pub fn writeback(&self) -> Option<WritebackPolicy> {
        self.run.as_ref().and_then(|r| r.writeback)
    }

    pub fn temp_dir(&self) -> Option<&Path> {
        self.run.as_ref().and_then(|r| r.temp_dir.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = self.converter_path() {
            validate_path("converter.path", path)?;
        }

        if let Some(sources) = self.tool_sources() {
            if sources.is_empty() {
                return Err(DiffSapError::InvalidConfigValueError {
                    field: "merge_tool.sources".to_string(),
                    value: "[]".to_string(),
                    reason: "At least one source is required".to_string(),
                });
            }
            for source in sources {
                source.validate()?;
            }
        }

        if let Some(dir) = self.temp_dir() {
            validate_path("run.temp_dir", dir)?;
        }

        Ok(())
    }
}
