//! Effect parameters, presets, and processing modes
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Flat record of effect-control values
///
/// Consumed exactly once per processing run; the graph builder never
/// mutates a parameter set handed to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioParameters {
    /// Linear gain multiplier, typically 0.5-2.0
    pub gain: f32,
    /// Synthetic reverb impulse length in seconds
    pub reverb_duration: f32,
    /// Power-law decay exponent for the impulse envelope
    pub reverb_decay: f32,
    /// Delay time in seconds, at most 1.0 (the delay line's allocation bound)
    pub delay_time: f32,
    /// Linear gain of the feedback loop, must stay below 1.0
    pub delay_feedback: f32,
    /// Fraction assigned to the unprocessed path; the wet paths get the complement
    pub dry_wet_mix: f32,
}

impl Default for AudioParameters {
    fn default() -> Self {
        Self {
            gain: 1.1,
            reverb_duration: 2.0,
            reverb_decay: 2.0,
            delay_time: 0.2,
            delay_feedback: 0.3,
            dry_wet_mix: 0.7,
        }
    }
}

impl AudioParameters {
    /// Validate every field against its documented range
    ///
    /// Rejection here happens before any graph construction; an unstable
    /// feedback loop or a zero-length impulse is never built.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(CoreError::InvalidParameter(msg));

        if !self.gain.is_finite() || !(0.5..=2.0).contains(&self.gain) {
            return fail(format!("gain {} outside [0.5, 2.0]", self.gain));
        }
        if !self.reverb_duration.is_finite()
            || self.reverb_duration <= 0.0
            || self.reverb_duration > 5.0
        {
            return fail(format!(
                "reverb duration {} s outside (0, 5]",
                self.reverb_duration
            ));
        }
        if !self.reverb_decay.is_finite() || self.reverb_decay <= 0.0 {
            return fail(format!("reverb decay {} must be positive", self.reverb_decay));
        }
        if !self.delay_time.is_finite() || self.delay_time <= 0.0 || self.delay_time > 1.0 {
            return fail(format!("delay time {} s outside (0, 1]", self.delay_time));
        }
        if !self.delay_feedback.is_finite() || !(0.0..1.0).contains(&self.delay_feedback) {
            return fail(format!(
                "delay feedback {} outside [0, 1); the loop would diverge",
                self.delay_feedback
            ));
        }
        if !self.dry_wet_mix.is_finite() || !(0.0..=1.0).contains(&self.dry_wet_mix) {
            return fail(format!("dry/wet mix {} outside [0, 1]", self.dry_wet_mix));
        }
        Ok(())
    }
}

/// How parameters are chosen for a processing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessingMode {
    /// Use the caller's parameters as given
    Manual,
    /// Run the analysis pass and nudge the caller's parameters heuristically
    Assisted,
    /// Classify the content and assign the matching preset's parameters verbatim
    Automatic,
}

/// Named, immutable parameter bundle
#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    /// Display label
    pub label: &'static str,
    /// One-line description
    pub description: &'static str,
    /// The parameter values this preset applies
    pub params: AudioParameters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AudioParameters::default().validate().is_ok());
    }

    #[test]
    fn rejects_unity_feedback() {
        let params = AudioParameters {
            delay_feedback: 1.0,
            ..AudioParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(CoreError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_long_delay() {
        let params = AudioParameters {
            delay_time: 1.5,
            ..AudioParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_zero_reverb_duration() {
        let params = AudioParameters {
            reverb_duration: 0.0,
            ..AudioParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_non_finite() {
        let params = AudioParameters {
            gain: f32::NAN,
            ..AudioParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn mode_serde_names() {
        let json = serde_json::to_string(&ProcessingMode::Assisted).unwrap();
        assert_eq!(json, "\"assisted\"");
    }
}
