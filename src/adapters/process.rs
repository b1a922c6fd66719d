use crate::domain::model::ToolStatus;
use crate::domain::ports::{Converter, MergeSession, MergeTool};
use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// `sap2txt`-style converter: `conv <sap>` prints text, `conv <txt> <sap>` writes SAP.
#[derive(Debug, Clone)]
pub struct ProcessConverter {
    program: PathBuf,
}

impl ProcessConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Converter for ProcessConverter {
    async fn to_text(&self, sap: &Path, text: &Path) -> ToolStatus {
        let output = match tokio::fs::File::create(text).await {
            Ok(file) => file.into_std().await,
            Err(e) => {
                return ToolStatus::NotLaunched {
                    reason: format!("cannot open {}: {}", text.display(), e),
                }
            }
        };

        let mut command = Command::new(&self.program);
        command
            .arg(sap)
            .stdin(Stdio::null())
            .stdout(Stdio::from(output));
        hide_console(&mut command);

        wait_for(command, &self.program).await
    }

    async fn write_back(&self, text: &Path, sap: &Path) -> ToolStatus {
        let mut command = Command::new(&self.program);
        command.arg(text).arg(sap).stdin(Stdio::null());
        hide_console(&mut command);

        wait_for(command, &self.program).await
    }
}

/// TortoiseMerge command line: `/base:` `/mine:` `/basename:` `/minename:`.
#[derive(Debug, Clone)]
pub struct ProcessMergeTool {
    program: PathBuf,
}

impl ProcessMergeTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn arguments(session: &MergeSession<'_>) -> Vec<OsString> {
        vec![
            named("/base:", session.base.as_os_str()),
            named("/mine:", session.mine.as_os_str()),
            named("/basename:", OsStr::new(session.base_name)),
            named("/minename:", OsStr::new(session.mine_name)),
        ]
    }
}

#[async_trait]
impl MergeTool for ProcessMergeTool {
    async fn merge(&self, session: &MergeSession<'_>) -> ToolStatus {
        let mut command = Command::new(&self.program);
        command.args(Self::arguments(session)).stdin(Stdio::null());

        wait_for(command, &self.program).await
    }
}

fn named(flag: &str, value: &OsStr) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(value);
    arg
}

async fn wait_for(mut command: Command, program: &Path) -> ToolStatus {
    tracing::debug!("Running {:?}", command.as_std());
    match command.status().await {
        Ok(status) if status.success() => ToolStatus::Success,
        Ok(status) => ToolStatus::Failed {
            code: status.code(),
        },
        Err(e) => ToolStatus::NotLaunched {
            reason: format!("{}: {}", program.display(), e),
        },
    }
}

#[cfg(windows)]
fn hide_console(command: &mut Command) {
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console(_command: &mut Command) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_arguments_are_named_and_unquoted() {
        let session = MergeSession {
            base: Path::new("/tmp/diff-sap-a.txt"),
            mine: Path::new("/tmp/diff-sap-b.txt"),
            base_name: "Base revision",
            mine_name: "",
        };

        let args = ProcessMergeTool::arguments(&session);
        assert_eq!(
            args,
            vec![
                OsString::from("/base:/tmp/diff-sap-a.txt"),
                OsString::from("/mine:/tmp/diff-sap-b.txt"),
                OsString::from("/basename:Base revision"),
                OsString::from("/minename:"),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_not_launched() {
        let dir = tempfile::TempDir::new().unwrap();
        let converter = ProcessConverter::new(dir.path().join("no-such-sap2txt"));

        let status = converter
            .write_back(&dir.path().join("a.txt"), &dir.path().join("a.sap"))
            .await;
        assert!(matches!(status, ToolStatus::NotLaunched { .. }));
    }

    #[tokio::test]
    async fn test_unwritable_text_target_is_not_launched() {
        let dir = tempfile::TempDir::new().unwrap();
        let converter = ProcessConverter::new("sap2txt");

        let status = converter
            .to_text(
                &dir.path().join("a.sap"),
                &dir.path().join("missing").join("a.txt"),
            )
            .await;
        match status {
            ToolStatus::NotLaunched { reason } => assert!(reason.contains("cannot open")),
            other => panic!("unexpected status: {:?}", other),
        }
    }
}
