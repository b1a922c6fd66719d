use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One diff/merge session: two SAP files and the labels shown for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffRequest {
    pub base: PathBuf,
    pub mine: PathBuf,
    pub base_title: String,
    pub mine_title: String,
}

/// The external invocations of a run, in the order they happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    ConvertBase,
    ConvertMine,
    Merge,
    WriteBack,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::ConvertBase => "Converting base to text",
            Step::ConvertMine => "Converting mine to text",
            Step::Merge => "Merge tool",
            Step::WriteBack => "Writing mine back to SAP",
        };
        f.write_str(name)
    }
}

/// How an external process ended. Callers must decide whether a failure matters.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolStatus {
    Success,
    Failed { code: Option<i32> },
    NotLaunched { reason: String },
}

impl ToolStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolStatus::Success)
    }

    pub fn describe(&self) -> String {
        match self {
            ToolStatus::Success => "ok".to_string(),
            ToolStatus::Failed { code: Some(code) } => format!("exit code {}", code),
            ToolStatus::Failed { code: None } => "terminated by signal".to_string(),
            ToolStatus::NotLaunched { reason } => format!("could not start: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: Step,
    pub status: ToolStatus,
}

/// What happens to the mine file once the merge tool exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum WritebackPolicy {
    /// Re-encode even if the user cancelled or changed nothing.
    #[default]
    Always,
    /// Skip when the text of mine is byte-identical after the merge.
    WhenChanged,
}

/// Reaction to an external step that failed or never started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Log a warning and carry on with the next step.
    #[default]
    Lenient,
    /// Abort the run at the first failure.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub base_text: PathBuf,
    pub mine_text: PathBuf,
    pub outcomes: Vec<StepOutcome>,
    pub wrote_back: bool,
}

impl RunReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.status.is_success())
    }
}
