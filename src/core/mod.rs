pub mod discovery;
pub mod engine;
pub mod workspace;

pub use crate::domain::model::{DiffRequest, RunReport, Step, StepOutcome, ToolStatus};
pub use crate::domain::ports::{Converter, MergeSession, MergeTool, ToolPathSource};
pub use crate::utils::error::Result;
