//! Derived analysis report types
use serde::{Deserialize, Serialize};

/// A half-open interval of detected silence, in seconds from buffer start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilenceInterval {
    /// Interval start
    pub start: f64,
    /// Interval end (exclusive)
    pub end: f64,
}

impl SilenceInterval {
    /// Interval length in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Read-only report computed once per input buffer
///
/// Window-level sequences cover at most the first 30 seconds of audio;
/// see the analyzer for window and hop sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioAnalysis {
    /// RMS energy per analysis window, in window order
    pub energy: Vec<f32>,
    /// Approximate spectral centroid (Hz), sampled every 4th window
    pub centroids: Vec<f32>,
    /// Detected silence intervals, merged when gaps are below 0.1 s
    pub silences: Vec<SilenceInterval>,
    /// Mean of the energy sequence
    pub overall_energy: f32,
    /// Max minus min of the energy sequence
    pub dynamic_range: f32,
    /// Population standard deviation of the energy sequence
    pub energy_stddev: f32,
}

impl AudioAnalysis {
    /// Mean of the centroid sequence, or 0 when none were sampled
    pub fn mean_centroid(&self) -> f32 {
        if self.centroids.is_empty() {
            return 0.0;
        }
        self.centroids.iter().sum::<f32>() / self.centroids.len() as f32
    }
}

/// Coarse content class chosen by the detector predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentClass {
    Vocal,
    Instrument,
    Speech,
    Music,
}

impl std::fmt::Display for ContentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Vocal => "vocal",
            Self::Instrument => "instrument",
            Self::Speech => "speech",
            Self::Music => "music",
        };
        write!(f, "{name}")
    }
}
