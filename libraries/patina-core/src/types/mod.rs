//! Shared type definitions

mod analysis;
mod audio;
mod moment;
mod params;

pub use analysis::{AudioAnalysis, ContentClass, SilenceInterval};
pub use audio::{PcmBuffer, SampleRate};
pub use moment::{EffectMoment, MomentKind};
pub use params::{AudioParameters, Preset, ProcessingMode};
