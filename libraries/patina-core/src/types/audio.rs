//! Audio buffer types
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Common sample rates
    pub const CD_QUALITY: Self = Self(44_100);
    pub const DVD_QUALITY: Self = Self(48_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

/// Decoded PCM audio
///
/// Samples are stored planar: one `Vec<f32>` per channel, nominally in
/// [-1.0, 1.0]. Every transform produces a new buffer; nothing in the
/// pipeline mutates a `PcmBuffer` after construction.
#[derive(Debug, Clone)]
pub struct PcmBuffer {
    /// Per-channel sample arrays, all of equal length
    channels: Vec<Vec<f32>>,

    /// Sample rate
    sample_rate: SampleRate,
}

impl PcmBuffer {
    /// Create a buffer from planar channel data
    ///
    /// # Errors
    /// Fails if there are no channels or the channel lengths differ.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: SampleRate) -> Result<Self> {
        let Some(first) = channels.first() else {
            return Err(CoreError::NoChannels);
        };
        if sample_rate.as_hz() == 0 {
            return Err(CoreError::InvalidSampleRate(0));
        }
        let expected = first.len();
        for (i, ch) in channels.iter().enumerate() {
            if ch.len() != expected {
                return Err(CoreError::ChannelLengthMismatch {
                    channel: i,
                    got: ch.len(),
                    expected,
                });
            }
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Create an all-zero buffer
    pub fn silence(channel_count: usize, frames: usize, sample_rate: SampleRate) -> Result<Self> {
        if channel_count == 0 {
            return Err(CoreError::NoChannels);
        }
        Self::new(vec![vec![0.0; frames]; channel_count], sample_rate)
    }

    /// Build a buffer from interleaved samples (L R L R ... for stereo)
    pub fn from_interleaved(
        samples: &[f32],
        channel_count: usize,
        sample_rate: SampleRate,
    ) -> Result<Self> {
        if channel_count == 0 {
            return Err(CoreError::NoChannels);
        }
        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (ch, &sample) in channels.iter_mut().zip(frame) {
                ch.push(sample);
            }
        }
        Self::new(channels, sample_rate)
    }

    /// Interleave the channel data frame-by-frame
    pub fn to_interleaved(&self) -> Vec<f32> {
        let frames = self.frames();
        let mut out = Vec::with_capacity(frames * self.channels.len());
        for i in 0..frames {
            for ch in &self.channels {
                out.push(ch[i]);
            }
        }
        out
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Sample data of one channel
    ///
    /// # Panics
    /// Panics if `index` is out of range; callers iterate `0..channel_count()`.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate.as_hz())
    }

    /// Sample rate
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Check if the buffer holds no frames
    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }
}
