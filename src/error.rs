use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Import resolution error. Any of these aborts the whole run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Empty import detected")]
    EmptyImport,

    #[error("Failed to read import {}: {source}", .path.display())]
    UnreadableTarget {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cyclic import detected: {}", format_chain(.chain))]
    CyclicImport { chain: Vec<PathBuf> },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Cache operation error
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Deserialization error: {0}")]
    Deserialize(String),

    #[error("Cache version mismatch")]
    VersionMismatch,

    #[error("Cache not found")]
    NotFound,
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Deserialize(e.to_string())
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
