//! Single-tap feedback delay line
//!
//! The delay node and its feedback gain loop collapse into one
//! recurrence, `y[n] = x[n-D] + g*y[n-D]`. Stability is enforced at
//! construction: feedback at or above unity would grow the loop signal
//! without bound, so it is rejected, never built.

use crate::error::{EngineError, Result};

/// Hard upper bound of the delay line's allocation, in seconds
pub const MAX_DELAY_SECS: f32 = 1.0;

/// Feedback comb over a whole channel
#[derive(Debug, Clone)]
pub struct FeedbackDelay {
    delay_samples: usize,
    feedback: f32,
}

impl FeedbackDelay {
    /// Create a delay line
    ///
    /// # Errors
    /// Rejects `delay_time` outside (0, 1] s and `feedback` outside [0, 1).
    pub fn new(delay_time: f32, feedback: f32, sample_rate: u32) -> Result<Self> {
        if !delay_time.is_finite() || delay_time <= 0.0 || delay_time > MAX_DELAY_SECS {
            return Err(EngineError::InvalidParameter(format!(
                "delay time {delay_time} s outside (0, {MAX_DELAY_SECS}]"
            )));
        }
        if !feedback.is_finite() || !(0.0..1.0).contains(&feedback) {
            return Err(EngineError::InvalidParameter(format!(
                "delay feedback {feedback} outside [0, 1); the loop would diverge"
            )));
        }

        let delay_samples = ((delay_time * sample_rate as f32).round() as usize).max(1);
        Ok(Self {
            delay_samples,
            feedback,
        })
    }

    /// Delay length in samples
    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    /// Run the recurrence over a full channel, producing the delayed
    /// (wet-only) signal
    pub fn process(&self, input: &[f32]) -> Vec<f32> {
        let mut output = vec![0.0f32; input.len()];
        for n in self.delay_samples..input.len() {
            let echo = output[n - self.delay_samples];
            output[n] = input[n - self.delay_samples] + self.feedback * echo;
        }
        output
    }
}
