//! Heuristic audio analysis for Patina
//!
//! This crate provides:
//! - Windowed energy/centroid/silence analysis over the first 30 s of audio
//! - Content classification against a fixed preset table
//! - Ordered heuristic parameter adjustment
//! - Onset-spacing tempo estimation
//!
//! Everything here is deliberately approximate: the "spectrum" is a coarse
//! power-sampling estimate, not an FFT, and the classifier is a fixed
//! threshold table, not a model. The effects engine consumes the output;
//! nothing is persisted.
//!
//! # Example
//!
//! ```ignore
//! use patina_analysis::{analyze, classify, estimate_tempo};
//! use patina_core::CancellationToken;
//!
//! let analysis = analyze(&buffer, &CancellationToken::new())?;
//! let class = classify(&analysis);
//! let bpm = estimate_tempo(&buffer);
//! println!("{class}, ~{bpm:.0} BPM");
//! ```

#![deny(unsafe_code)]

mod adjust;
mod analyzer;
mod classify;
mod error;
mod tempo;

pub use adjust::adjust;
pub use analyzer::{analyze, ANALYSIS_WINDOW, ANALYSIS_WINDOW_LIMIT_SECS, SILENCE_RMS_THRESHOLD};
pub use classify::{classify, preset_for, presets};
pub use error::{AnalysisError, Result};
pub use tempo::{estimate_tempo, DEFAULT_BPM};
