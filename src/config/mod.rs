#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::{DiffRequest, WritebackPolicy};
use crate::utils::error::{DiffSapError, Result};
use crate::utils::validation::validate_path;
use std::path::PathBuf;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

/// Everything a run needs from the command line, independent of clap.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// `<base> <mine> [<base title> <mine title>]`
    pub positional: Vec<String>,
    pub config: Option<PathBuf>,
    pub converter: Option<PathBuf>,
    pub merge_tool: Option<PathBuf>,
    pub strict: bool,
    pub writeback: Option<WritebackPolicy>,
    pub dry_run: bool,
}

impl RunOptions {
    pub fn request(&self) -> Result<DiffRequest> {
        parse_request(&self.positional)
    }
}

/// Two file names, optionally followed by two titles. Titles default to "".
pub fn parse_request(args: &[String]) -> Result<DiffRequest> {
    let (base, mine, base_title, mine_title) = match args {
        [base, mine] => (base, mine, "", ""),
        [base, mine, base_title, mine_title] => {
            (base, mine, base_title.as_str(), mine_title.as_str())
        }
        _ => {
            return Err(DiffSapError::usage(format!(
                "expected 2 or 4 arguments, got {}",
                args.len()
            )))
        }
    };

    let request = DiffRequest {
        base: PathBuf::from(base),
        mine: PathBuf::from(mine),
        base_title: base_title.to_string(),
        mine_title: mine_title.to_string(),
    };

    for (field, path) in [("base", &request.base), ("mine", &request.mine)] {
        validate_path(field, path).map_err(|e| DiffSapError::usage(e.to_string()))?;
    }

    Ok(request)
}
