use std::path::PathBuf;

use thiserror::Error;

/// Classifies allocation failures while growing the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocErrorKind {
    /// A node's child map could not reserve room for a new child
    ChildMap,
}

/// Blocklist error types
#[derive(Error, Debug)]
pub enum BlocklistError {
    #[error("Failed to read block list file {}: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Allocation failed while inserting {domain:?}")]
    Allocation {
        domain: String,
        kind: AllocErrorKind,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BlocklistError>;
