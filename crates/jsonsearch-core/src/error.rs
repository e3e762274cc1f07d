use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Pipeline stage an embedding failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Build,
    Query,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Build => f.write_str("index build"),
            Stage::Query => f.write_str("query"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No indexable text found under {}: every file was missing, malformed or too short", root.display())]
    EmptyCorpus { root: PathBuf },

    #[error("Embedding failed during {stage}: {message}")]
    Embedding { stage: Stage, message: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedder mismatch: index was built with '{index}' but query uses '{query}'")]
    EmbedderMismatch { index: String, query: String },

    #[error("Index error: {0}")]
    Index(String),
}

impl Error {
    pub fn embedding(stage: Stage, err: impl fmt::Display) -> Self {
        Error::Embedding { stage, message: err.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
