//! Core types shared across the Patina workspace
//!
//! This crate defines the data model every other crate speaks:
//! - `PcmBuffer`: decoded floating-point audio, planar per-channel
//! - `AudioParameters`: the six effect controls plus validation
//! - `AudioAnalysis`: the derived, read-only analysis report
//! - `EffectMoment`: a scheduled automation event
//! - `Preset` / `ContentClass`: the content-adaptive parameter table
//! - `CancellationToken`: cooperative cancellation for long stages

mod cancel;
mod error;
pub mod types;

pub use cancel::CancellationToken;
pub use error::{CoreError, Result};
pub use types::{
    AudioAnalysis, AudioParameters, ContentClass, EffectMoment, MomentKind, PcmBuffer, Preset,
    ProcessingMode, SampleRate, SilenceInterval,
};
