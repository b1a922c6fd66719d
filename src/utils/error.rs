use crate::domain::model::Step;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffSapError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Usage error: {message}")]
    UsageError { message: String },

    #[error("TortoiseMerge not found! (tried: {tried})")]
    ToolNotFoundError { tried: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Input file not found: {}", .path.display())]
    InputMissingError { path: PathBuf },

    #[error("{step} failed: {detail}")]
    StepFailedError { step: Step, detail: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Usage,
    Configuration,
    ExternalTool,
    FileSystem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl DiffSapError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::UsageError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UsageError { .. } | Self::InputMissingError { .. } => ErrorCategory::Usage,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::SerializationError(_) => ErrorCategory::Configuration,
            Self::ToolNotFoundError { .. } | Self::StepFailedError { .. } => {
                ErrorCategory::ExternalTool
            }
            Self::IoError(_) => ErrorCategory::FileSystem,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::StepFailedError { .. } => ErrorSeverity::Medium,
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::UsageError { .. } => "Specify two filenames and optionally two titles".to_string(),
            Self::ToolNotFoundError { .. } => "TortoiseMerge not found!".to_string(),
            Self::InputMissingError { path } => {
                format!("Cannot open '{}': no such file", path.display())
            }
            Self::StepFailedError { step, detail } => format!("{} failed ({})", step, detail),
            Self::ConfigError { message } => format!("Bad settings: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Bad value for {}: {}", field, reason)
            }
            Self::IoError(e) => format!("File system error: {}", e),
            Self::SerializationError(e) => format!("Could not serialize output: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::UsageError { .. } => "Run: diff-sap <base.sap> <mine.sap> [<base title> <mine title>]",
            Self::ToolNotFoundError { .. } => {
                "Install TortoiseSVN or TortoiseGit, or pass --merge-tool <path>"
            }
            Self::InputMissingError { .. } => "Check the SAP file paths",
            Self::StepFailedError { .. } => {
                "Check that the converter and merge tool run on their own, or drop --strict"
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the settings file or pass --config with a valid file"
            }
            Self::IoError(_) => "Check permissions and free space in the temp directory",
            Self::SerializationError(_) => "Re-run with --verbose and report the problem",
        }
    }
}

pub type Result<T> = std::result::Result<T, DiffSapError>;
