//! Error types for analysis

use thiserror::Error;

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur during analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The buffer holds no frames
    #[error("No audio samples provided for analysis")]
    EmptyBuffer,

    /// The caller abandoned the request
    #[error("Analysis cancelled")]
    Cancelled,
}
