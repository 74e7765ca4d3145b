//! Error Types
//!
//! Typed outcomes for queries, source loading and command parsing.

use std::path::PathBuf;

/// Outcome of a query that did not produce a value.
///
/// Every lookup that takes a word reports a missing word as
/// [`QueryError::NotFound`] instead of an empty vector or a NaN.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("\"{0}\" couldn't be found")]
    NotFound(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("No real word pair selected (both words were \"{0}\")")]
    DegenerateQuery(String),

    #[error("No vectors given")]
    EmptyInput,

    /// A search had nothing to choose from (empty store or everything excluded)
    #[error("No candidate entries")]
    NoCandidates,
}

impl QueryError {
    pub fn not_found<S: Into<String>>(word: S) -> Self {
        Self::NotFound(word.into())
    }

    /// True for the "data absent" outcomes
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NoCandidates)
    }
}

/// Result type for query operations
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Failure to read a word vector source
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Opening \"{path}\" failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),

    #[error("Line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("No word vectors found")]
    Empty,
}

/// Failure to parse a text command
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}. Type 'help' for available commands.")]
    Unknown(String),

    #[error("{0}")]
    Usage(&'static str),

    #[error("Invalid number \"{0}\"")]
    InvalidNumber(String),
}
