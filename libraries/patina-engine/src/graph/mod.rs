//! Offline effects graph
//!
//! One `OfflineGraph` is built, rendered, and discarded per request; no
//! audio context persists across requests. The topology is fixed:
//!
//! ```text
//! source -> input gain -+-> dry gain ----------------------+
//!                       +-> convolver -> reverb wet gain --+-> master -> output
//!                       +-> feedback delay -> delay wet gain
//! ```
//!
//! The dry, wet, and master gains are automation lanes; the scheduler
//! writes envelopes into them before `render` runs.

mod convolver;
mod delay;
mod lane;

pub use convolver::{convolve, ImpulseResponse};
pub use delay::{FeedbackDelay, MAX_DELAY_SECS};
pub use lane::{AutomationLane, LaneSampler};

use patina_core::{AudioParameters, CancellationToken, PcmBuffer, SampleRate};
use rand::Rng;
use tracing::debug;

use crate::error::{EngineError, Result};

/// Per-request signal graph, rendered offline over the full input
pub struct OfflineGraph {
    sample_rate: SampleRate,
    input_gain: f32,
    impulse: ImpulseResponse,
    delay: FeedbackDelay,
    /// Dry path gain, resting at `dry_wet_mix`
    pub dry: AutomationLane,
    /// Reverb wet gain, resting at `1 - dry_wet_mix`
    pub reverb_wet: AutomationLane,
    /// Delay wet gain, resting at `1 - dry_wet_mix`
    pub delay_wet: AutomationLane,
    /// Output gain, resting at unity; the stutter gate lives here
    pub master: AutomationLane,
}

impl OfflineGraph {
    /// Validate parameters and build the graph
    ///
    /// The impulse response is synthesized from `rng`; thread a seeded
    /// generator through for reproducible output.
    ///
    /// # Errors
    /// Any out-of-range parameter rejects with `InvalidParameter` before
    /// any node is constructed.
    pub fn build<R: Rng>(
        params: &AudioParameters,
        sample_rate: SampleRate,
        rng: &mut R,
    ) -> Result<Self> {
        params.validate()?;

        let delay = FeedbackDelay::new(params.delay_time, params.delay_feedback, sample_rate.as_hz())?;
        let impulse = ImpulseResponse::synthesize(
            sample_rate.as_hz(),
            params.reverb_duration,
            params.reverb_decay,
            rng,
        );

        let wet = 1.0 - params.dry_wet_mix;
        Ok(Self {
            sample_rate,
            input_gain: params.gain,
            impulse,
            delay,
            dry: AutomationLane::constant(params.dry_wet_mix),
            reverb_wet: AutomationLane::constant(wet),
            delay_wet: AutomationLane::constant(wet),
            master: AutomationLane::constant(1.0),
        })
    }

    /// Render the graph over the whole input
    ///
    /// Output frame count and channel layout are identical to the input.
    /// There is no partial result: either the full buffer is produced or
    /// the request was abandoned.
    pub fn render(&self, input: &PcmBuffer, cancel: &CancellationToken) -> Result<PcmBuffer> {
        if input.sample_rate() != self.sample_rate {
            return Err(EngineError::Render(format!(
                "graph built for {} Hz, input is {} Hz",
                self.sample_rate.as_hz(),
                input.sample_rate().as_hz()
            )));
        }

        let frames = input.frames();
        let rate = f64::from(self.sample_rate.as_hz());
        let mut rendered: Vec<Vec<f32>> = Vec::with_capacity(input.channel_count());

        // a wet branch whose lane is pinned at zero contributes nothing;
        // skip its convolution or delay pass entirely
        let reverb_active = !(self.reverb_wet.is_static() && self.reverb_wet.base() == 0.0);
        let delay_active = !(self.delay_wet.is_static() && self.delay_wet.base() == 0.0);

        for ch in 0..input.channel_count() {
            if cancel.is_cancelled() {
                return Err(EngineError::Cancelled);
            }

            let pre: Vec<f32> = input
                .channel(ch)
                .iter()
                .map(|s| s * self.input_gain)
                .collect();

            let reverb = if reverb_active {
                Some(convolve(&pre, self.impulse.channel(ch), frames, cancel)?)
            } else {
                None
            };
            let delayed = if delay_active {
                Some(self.delay.process(&pre))
            } else {
                None
            };

            let mut dry = self.dry.sampler();
            let mut reverb_wet = self.reverb_wet.sampler();
            let mut delay_wet = self.delay_wet.sampler();
            let mut master = self.master.sampler();

            let mut out = Vec::with_capacity(frames);
            for i in 0..frames {
                let t = i as f64 / rate;
                let mut sample = pre[i] * dry.value_at(t);
                if let Some(reverb) = &reverb {
                    sample += reverb[i] * reverb_wet.value_at(t);
                }
                if let Some(delayed) = &delayed {
                    sample += delayed[i] * delay_wet.value_at(t);
                }
                out.push(sample * master.value_at(t));
            }
            rendered.push(out);
        }

        debug!(
            frames,
            channels = rendered.len(),
            impulse_frames = self.impulse.len(),
            delay_samples = self.delay.delay_samples(),
            "rendered offline graph"
        );

        PcmBuffer::new(rendered, self.sample_rate).map_err(|e| EngineError::Render(e.to_string()))
    }
}
