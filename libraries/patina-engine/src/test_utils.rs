//! Synthetic test signals
//!
//! Shared by the integration suites; enabled with the `test-utils`
//! feature so downstream crates can reuse them without shipping test
//! code in release builds.

use patina_core::{PcmBuffer, SampleRate};
use std::f32::consts::PI;

/// A sine wave, identical in every channel
pub fn sine_buffer(
    frequency: f32,
    amplitude: f32,
    duration_secs: f32,
    channels: usize,
    sample_rate: SampleRate,
) -> PcmBuffer {
    let frames = (sample_rate.as_hz() as f32 * duration_secs) as usize;
    let samples: Vec<f32> = (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate.as_hz() as f32;
            (2.0 * PI * frequency * t).sin() * amplitude
        })
        .collect();
    PcmBuffer::new(vec![samples; channels], sample_rate).expect("valid signal")
}

/// Evenly spaced 10 ms bursts at the given tempo
pub fn click_track(bpm: f32, duration_secs: f32, sample_rate: SampleRate) -> PcmBuffer {
    let rate = sample_rate.as_hz() as usize;
    let frames = (rate as f32 * duration_secs) as usize;
    let mut samples = vec![0.0f32; frames];
    let interval = (60.0 / bpm * rate as f32) as usize;
    let click_len = rate / 100;

    let mut pos = 0;
    while pos < frames {
        for i in 0..click_len.min(frames - pos) {
            samples[pos + i] = 0.8;
        }
        pos += interval;
    }
    PcmBuffer::new(vec![samples], sample_rate).expect("valid signal")
}

/// RMS of one channel
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}
