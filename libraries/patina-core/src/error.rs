//! Error types for the core data model

use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while constructing or validating core types
#[derive(Error, Debug)]
pub enum CoreError {
    /// Channel sample arrays have mismatched lengths
    #[error("Channel length mismatch: channel {channel} has {got} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        got: usize,
        expected: usize,
    },

    /// A buffer was constructed with no channels
    #[error("Audio buffer must have at least one channel")]
    NoChannels,

    /// Invalid sample rate
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// An effect parameter is outside its documented range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
