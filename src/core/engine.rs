use crate::core::workspace::TextFile;
use crate::domain::model::{
    DiffRequest, FailurePolicy, RunReport, Step, StepOutcome, ToolStatus, WritebackPolicy,
};
use crate::domain::ports::{Converter, MergeSession, MergeTool};
use crate::utils::error::{DiffSapError, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub failure_policy: FailurePolicy,
    pub writeback_policy: WritebackPolicy,
    /// Where the two text files are created.
    pub temp_dir: PathBuf,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            writeback_policy: WritebackPolicy::default(),
            temp_dir: std::env::temp_dir(),
        }
    }
}

/// Runs convert, merge and write-back one after another.
///
/// Each external step is awaited to completion before the next starts. The
/// two text files are scoped to [`DiffEngine::run`]: they are removed on every
/// way out of it, including strict-mode aborts.
pub struct DiffEngine<C: Converter, M: MergeTool> {
    converter: C,
    merge_tool: M,
    options: EngineOptions,
}

impl<C: Converter, M: MergeTool> DiffEngine<C, M> {
    pub fn with_options(converter: C, merge_tool: M, options: EngineOptions) -> Self {
        Self {
            converter,
            merge_tool,
            options,
        }
    }

    pub async fn run(&self, request: &DiffRequest) -> Result<RunReport> {
        tracing::info!(
            "Comparing {} with {}",
            request.base.display(),
            request.mine.display()
        );
        let mut outcomes = Vec::with_capacity(4);

        let base_text = self
            .convert_to_text(Step::ConvertBase, &request.base, &mut outcomes)
            .await?;
        let mine_text = self
            .convert_to_text(Step::ConvertMine, &request.mine, &mut outcomes)
            .await?;

        let before_merge = match self.options.writeback_policy {
            WritebackPolicy::Always => None,
            WritebackPolicy::WhenChanged => Some(tokio::fs::read(mine_text.path()).await?),
        };

        tracing::info!("Waiting for the merge tool to close...");
        let session = MergeSession {
            base: base_text.path(),
            mine: mine_text.path(),
            base_name: &request.base_title,
            mine_name: &request.mine_title,
        };
        let status = self.merge_tool.merge(&session).await;
        self.record(Step::Merge, status, &mut outcomes)?;

        let wrote_back = if self.is_unchanged(before_merge, mine_text.path()).await? {
            tracing::info!("No changes to {}, leaving it untouched", request.mine.display());
            false
        } else {
            tracing::info!("Writing changes back to {}", request.mine.display());
            let status = self
                .converter
                .write_back(mine_text.path(), &request.mine)
                .await;
            self.record(Step::WriteBack, status, &mut outcomes)?;
            true
        };

        let report = RunReport {
            base_text: base_text.path().to_path_buf(),
            mine_text: mine_text.path().to_path_buf(),
            outcomes,
            wrote_back,
        };

        mine_text.discard();
        base_text.discard();

        Ok(report)
    }

    async fn convert_to_text(
        &self,
        step: Step,
        sap: &Path,
        outcomes: &mut Vec<StepOutcome>,
    ) -> Result<TextFile> {
        let text = TextFile::create(&self.options.temp_dir)?;
        tracing::debug!("{}: {} -> {}", step, sap.display(), text.path().display());

        let status = self.converter.to_text(sap, text.path()).await;
        self.record(step, status, outcomes)?;
        Ok(text)
    }

    async fn is_unchanged(&self, before: Option<Vec<u8>>, mine_text: &Path) -> Result<bool> {
        match before {
            Some(before) => Ok(tokio::fs::read(mine_text).await? == before),
            None => Ok(false),
        }
    }

    fn record(&self, step: Step, status: ToolStatus, outcomes: &mut Vec<StepOutcome>) -> Result<()> {
        let failure = (!status.is_success()).then(|| status.describe());
        outcomes.push(StepOutcome { step, status });

        match (failure, self.options.failure_policy) {
            (None, _) => {
                tracing::debug!("{}: ok", step);
                Ok(())
            }
            (Some(detail), FailurePolicy::Strict) => {
                tracing::error!("❌ {}: {}", step, detail);
                Err(DiffSapError::StepFailedError { step, detail })
            }
            (Some(detail), FailurePolicy::Lenient) => {
                tracing::warn!("⚠️ {}: {} (continuing)", step, detail);
                Ok(())
            }
        }
    }
}
