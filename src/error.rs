//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while scanning and analyzing a project.
///
/// Only I/O, configuration and serialization problems surface here. Malformed
/// decorator arguments and unresolved references never fail extraction.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to parse file: {path}")]
    Parse { path: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,

    #[error("Failed to (de)serialize graph: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
