//! Errors surfaced by the CLI.

use std::io;

use thiserror::Error;

use waymark::WaymarkError;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Waymark(#[from] WaymarkError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("flowchart `{0}` has not been synced yet")]
    MissingFlowchart(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
