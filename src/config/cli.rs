use crate::config::RunOptions;
use crate::domain::model::WritebackPolicy;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "diff-sap", version)]
#[command(about = "Diff and merge two SAP files in TortoiseMerge via their text form")]
pub struct CliConfig {
    /// Two SAP files, optionally followed by their two titles.
    /// Options must come first; everything from the first file on is taken verbatim.
    #[arg(value_name = "ARGS", allow_hyphen_values = true, trailing_var_arg = true)]
    pub positional: Vec<String>,

    /// Settings file (default: diff-sap.toml next to the executable, if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// SAP <-> text converter (default: sap2txt next to the executable)
    #[arg(long)]
    pub converter: Option<PathBuf>,

    /// Merge tool executable, tried before the configured sources
    #[arg(long)]
    pub merge_tool: Option<PathBuf>,

    /// Abort at the first converter or merge tool failure
    #[arg(long)]
    pub strict: bool,

    /// When to convert the merged text back into the second SAP file
    #[arg(long, value_enum)]
    pub writeback: Option<WritebackPolicy>,

    /// Print the resolved plan as JSON without running anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<CliConfig> for RunOptions {
    fn from(cli: CliConfig) -> Self {
        Self {
            positional: cli.positional,
            config: cli.config,
            converter: cli.converter,
            merge_tool: cli.merge_tool,
            strict: cli.strict,
            writeback: cli.writeback,
            dry_run: cli.dry_run,
        }
    }
}
