// Adapters layer: the external programs and configuration stores behind the ports.

pub mod process;
pub mod sources;

pub use process::{ProcessConverter, ProcessMergeTool};
pub use sources::ToolSource;
