//! Scheduled automation events
use serde::{Deserialize, Serialize};

/// Kind of dynamic effect a moment triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MomentKind {
    /// Short reverb swell at the end of a bar
    ReverbSwell,
    /// Delay echo burst
    DelayEcho,
    /// Single quarter-beat delay throw
    DelayThrow,
    /// Gentle multi-bar reverb build
    ReverbBuild,
    /// Alternating on/off gate at eighth-beat steps
    Stutter,
}

/// One scheduled gain-envelope event
///
/// Generated from the estimated tempo before rendering begins; the offline
/// graph has no wall-clock feedback loop, so the sequence is a pure
/// function of buffer duration and parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectMoment {
    /// Offset from buffer start, seconds
    pub time: f64,
    /// Envelope length, seconds
    pub duration: f64,
    /// Which effect the envelope drives
    pub kind: MomentKind,
    /// Envelope strength in [0, 1], already scaled by the user intensity
    pub intensity: f32,
}
