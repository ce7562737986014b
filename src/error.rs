use std::path::PathBuf;

use thiserror::Error;

/// Main error type for rstdoc operations
#[derive(Error, Debug)]
pub enum RstdocError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cannot create documentation root {}: {source}", path.display())]
    OutputRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Documentation generation is disabled; run a full rebuild to re-enable it")]
    Disabled,

    #[error("Invalid source path: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, RstdocError>;
