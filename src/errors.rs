//! Error types
//!
//! [`TextRankError`] is fatal and aborts a run. [`DocumentError`] is scoped to
//! one document and is recorded in the run summary while the batch continues.
//! [`DocumentWarning`] marks non-fatal conditions worth reporting.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::validation::ValidationReport;

/// Fatal errors for a ranking run
#[derive(Error, Debug)]
pub enum TextRankError {
    /// The configuration failed validation; nothing was processed
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(ValidationReport),

    /// The stop-word list could not be loaded
    #[error("failed to load stop-word list {path}: {source}")]
    Stopwords {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration file could not be parsed
    #[error("failed to parse configuration file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The input path does not exist or cannot be traversed
    #[error("cannot read input {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Two documents would be written to the same per-document output file
    #[error("{first} and {second} would both be written to {path}")]
    OutputCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    /// Writing the result table failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for fallible crate operations
pub type Result<T> = std::result::Result<T, TextRankError>;

/// A document that could not be ranked
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document could not be read
    #[error("{document}: unreadable: {source}")]
    Unreadable {
        document: String,
        #[source]
        source: io::Error,
    },

    /// The document is not UTF-8 text
    #[error("{document}: not text: {reason}")]
    NotText { document: String, reason: String },
}

impl DocumentError {
    /// Identifier of the failed document
    pub fn document(&self) -> &str {
        match self {
            DocumentError::Unreadable { document, .. } => document,
            DocumentError::NotText { document, .. } => document,
        }
    }
}

/// A non-fatal condition observed while ranking a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentWarning {
    /// No tokens survived normalization; the document produced no rows
    #[error("{document}: no tokens survived normalization")]
    Empty { document: String },

    /// The ranker hit its iteration cap; scores are from the last iteration
    #[error("{document}: ranking did not converge after {iterations} iterations (delta {delta:e})")]
    NotConverged {
        document: String,
        iterations: usize,
        delta: f64,
    },
}

impl DocumentWarning {
    pub fn document(&self) -> &str {
        match self {
            DocumentWarning::Empty { document } => document,
            DocumentWarning::NotConverged { document, .. } => document,
        }
    }
}
