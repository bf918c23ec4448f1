/// Engine-specific errors
use thiserror::Error;

/// Result type alias using `EngineError`
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine error types
///
/// Every variant is terminal for the request that raised it; the caller
/// decides whether to resubmit with different input or parameters. The
/// variant names the stage that failed.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Unparseable or unsupported input container
    #[error("Decode error: {0}")]
    Decode(String),

    /// A parameter is outside its documented range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Failure while rendering the offline graph
    #[error("Render error: {0}")]
    Render(String),

    /// Failure while serializing the output container
    #[error("Encode error: {0}")]
    Encode(String),

    /// The caller abandoned the request
    #[error("Processing cancelled")]
    Cancelled,

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<patina_core::CoreError> for EngineError {
    fn from(err: patina_core::CoreError) -> Self {
        match err {
            patina_core::CoreError::InvalidParameter(msg) => Self::InvalidParameter(msg),
            other => Self::Render(other.to_string()),
        }
    }
}

impl From<patina_analysis::AnalysisError> for EngineError {
    fn from(err: patina_analysis::AnalysisError) -> Self {
        match err {
            patina_analysis::AnalysisError::Cancelled => Self::Cancelled,
            other => Self::Decode(other.to_string()),
        }
    }
}
