use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::datastage::stage::Stage;

/// Every way a deployment can stop
///
/// Nothing is recovered from: each variant ends the run with a non-zero exit status.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingConfiguration(Vec<&'static str>),
    #[error("can't render job definition: {0}")]
    TemplateRender(#[from] RenderError),
    #[error("{stage} stage failed: {failure}")]
    ExternalTool { stage: Stage, failure: ToolFailure },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown placeholder ${name} on line {line}")]
    UnknownPlaceholder { name: String, line: usize },
    #[error("invalid placeholder on line {line}, column {column}")]
    InvalidPlaceholder { line: usize, column: usize },
    #[error("can't create build directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("can't read template {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("can't write rendered document {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Why a single `istool` / `dsjob` invocation didn't succeed
#[derive(Debug, Error)]
pub enum ToolFailure {
    #[error("exited with status {0}")]
    Exit(i32),
    #[error("terminated by signal")]
    Signal,
    #[error("could not be launched: {0}")]
    Launch(#[source] io::Error),
}
