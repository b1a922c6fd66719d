pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ProcessConverter, ProcessMergeTool, ToolSource};
pub use config::RunOptions;
pub use crate::core::discovery::ToolLocator;
pub use crate::core::engine::{DiffEngine, EngineOptions};
pub use domain::model::{DiffRequest, FailurePolicy, RunReport, WritebackPolicy};
pub use utils::error::{DiffSapError, Result};
