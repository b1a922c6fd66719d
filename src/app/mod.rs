//! Wiring between the command line, the settings file and the engine.

use crate::adapters::{ProcessConverter, ProcessMergeTool, ToolSource};
use crate::config::toml_config::{TomlConfig, DEFAULT_CONFIG_FILE};
use crate::config::RunOptions;
use crate::core::discovery::{LocatedTool, ToolLocator};
use crate::core::engine::{DiffEngine, EngineOptions};
use crate::domain::model::{DiffRequest, FailurePolicy, RunReport, WritebackPolicy};
use crate::utils::error::Result;
use crate::utils::validation::{validate_existing_file, Validate};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CONVERTER_NAME: &str = "sap2txt";

/// Command line flags layered over the settings file over built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub converter: PathBuf,
    pub sources: Vec<ToolSource>,
    pub failure_policy: FailurePolicy,
    pub writeback_policy: WritebackPolicy,
    pub temp_dir: PathBuf,
}

impl Settings {
    pub fn resolve(options: &RunOptions, file: Option<&TomlConfig>) -> Settings {
        let converter = options
            .converter
            .clone()
            .or_else(|| file.and_then(|f| f.converter_path()).map(Path::to_path_buf))
            .unwrap_or_else(default_converter);

        let mut sources: Vec<ToolSource> = options
            .merge_tool
            .iter()
            .map(|path| ToolSource::Fixed { path: path.clone() })
            .collect();
        match file.and_then(|f| f.tool_sources()) {
            Some(configured) => sources.extend_from_slice(configured),
            None => sources.extend(ToolSource::defaults()),
        }

        let strict = options.strict || file.and_then(|f| f.strict()).unwrap_or(false);

        Settings {
            converter,
            sources,
            failure_policy: if strict {
                FailurePolicy::Strict
            } else {
                FailurePolicy::Lenient
            },
            writeback_policy: options
                .writeback
                .or_else(|| file.and_then(|f| f.writeback()))
                .unwrap_or_default(),
            temp_dir: file
                .and_then(|f| f.temp_dir())
                .map(Path::to_path_buf)
                .unwrap_or_else(std::env::temp_dir),
        }
    }

    pub fn locator(&self) -> ToolLocator {
        let mut locator = ToolLocator::new();
        for source in &self.sources {
            locator.push(Box::new(source.clone()));
        }
        locator
    }
}

/// What `--dry-run` prints.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub request: DiffRequest,
    pub merge_tool: LocatedTool,
    pub settings: Settings,
}

#[derive(Debug)]
pub enum Outcome {
    Planned(Plan),
    Completed(RunReport),
}

pub async fn run(options: RunOptions) -> Result<Outcome> {
    let request = options.request()?;

    let file = load_config(options.config.as_deref())?;
    if let Some(config) = &file {
        config.validate()?;
    }
    let settings = Settings::resolve(&options, file.as_ref());
    tracing::debug!("Settings: {:?}", settings);

    if settings.failure_policy == FailurePolicy::Strict {
        validate_existing_file(&request.base)?;
        validate_existing_file(&request.mine)?;
    }

    let merge_tool = settings.locator().locate()?;
    tracing::info!(
        "Using merge tool {} ({})",
        merge_tool.path.display(),
        merge_tool.source
    );

    if options.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be converted or merged");
        return Ok(Outcome::Planned(Plan {
            request,
            merge_tool,
            settings,
        }));
    }

    let engine = DiffEngine::with_options(
        ProcessConverter::new(&settings.converter),
        ProcessMergeTool::new(&merge_tool.path),
        EngineOptions {
            failure_policy: settings.failure_policy,
            writeback_policy: settings.writeback_policy,
            temp_dir: settings.temp_dir.clone(),
        },
    );

    let report = engine.run(&request).await?;
    Ok(Outcome::Completed(report))
}

/// An explicit `--config` must load; the default file is optional.
fn load_config(explicit: Option<&Path>) -> Result<Option<TomlConfig>> {
    if let Some(path) = explicit {
        tracing::info!("📁 Loading settings from: {}", path.display());
        return TomlConfig::from_file(path).map(Some);
    }

    match beside_executable(DEFAULT_CONFIG_FILE) {
        Some(path) if path.is_file() => {
            tracing::info!("📁 Loading settings from: {}", path.display());
            TomlConfig::from_file(path).map(Some)
        }
        _ => Ok(None),
    }
}

fn default_converter() -> PathBuf {
    let name = format!("{}{}", CONVERTER_NAME, std::env::consts::EXE_SUFFIX);
    beside_executable(&name).unwrap_or_else(|| PathBuf::from(name))
}

fn beside_executable(file_name: &str) -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(file_name))
}
