use crate::domain::model::ToolStatus;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// One place the merge tool path may be configured.
pub trait ToolPathSource: Send + Sync {
    /// Human readable name, used when reporting which sources were tried.
    fn describe(&self) -> String;

    /// `None` when the source has no usable value.
    fn lookup(&self) -> Option<PathBuf>;
}

/// The SAP <-> text converter.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Writes the text form of `sap` into `text`.
    async fn to_text(&self, sap: &Path, text: &Path) -> ToolStatus;

    /// Re-encodes `text`, overwriting `sap`.
    async fn write_back(&self, text: &Path, sap: &Path) -> ToolStatus;
}

pub struct MergeSession<'a> {
    pub base: &'a Path,
    pub mine: &'a Path,
    pub base_name: &'a str,
    pub mine_name: &'a str,
}

/// A visual merge tool. Returns once the user closes it; edits land in `mine`.
#[async_trait]
pub trait MergeTool: Send + Sync {
    async fn merge(&self, session: &MergeSession<'_>) -> ToolStatus;
}
