//! Error types for the campus NLU library.
//!
//! All fallible operations return [`Result`], whose error side is
//! [`NluError`]. Most variants are recovered inside the pipeline: a missing
//! model falls back to rule-based classification, a cache outage is treated
//! as a miss, and anything else becomes a degraded `unknown` result.
//!
//! # Examples
//!
//! ```
//! use campus_nlu::error::{NluError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(NluError::classification("model returned no probabilities"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for NLU operations.
#[derive(Error, Debug)]
pub enum NluError {
    /// No trained model was loaded at startup.
    ///
    /// This is an expected state: callers skip the learned classifier and
    /// never retry per request.
    #[error("Intent model not loaded")]
    ModelUnavailable,

    /// Unexpected failure inside a classifier.
    #[error("Classification error: {0}")]
    ClassificationFailure(String),

    /// Unexpected failure while extracting entities.
    #[error("Extraction error: {0}")]
    ExtractionFailure(String),

    /// The result cache could not be reached.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Model artifact content is malformed or inconsistent.
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A request-scoped deadline expired.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// I/O errors (artifact files, CLI input files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error raised by an external collaborator closure
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with NluError.
pub type Result<T> = std::result::Result<T, NluError>;

impl NluError {
    /// Create a new classification error.
    pub fn classification<S: Into<String>>(msg: S) -> Self {
        NluError::ClassificationFailure(msg.into())
    }

    /// Create a new extraction error.
    pub fn extraction<S: Into<String>>(msg: S) -> Self {
        NluError::ExtractionFailure(msg.into())
    }

    /// Create a new cache error.
    pub fn cache<S: Into<String>>(msg: S) -> Self {
        NluError::CacheUnavailable(msg.into())
    }

    /// Create a new artifact error.
    pub fn artifact<S: Into<String>>(msg: S) -> Self {
        NluError::Artifact(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        NluError::InvalidConfig(msg.into())
    }

    /// Create a new timeout error.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        NluError::Timeout(msg.into())
    }

    /// Whether this error only signals that the learned model is absent.
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, NluError::ModelUnavailable)
    }
}
