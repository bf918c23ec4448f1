//! Onset-spacing tempo estimation
//!
//! Not a beat tracker: onsets are flagged where the mean absolute
//! amplitude of a window jumps past 1.3x its predecessor, and the tempo
//! falls out of the median inter-onset interval. Good enough to place
//! bar-aligned automation; not production beat tracking.

use patina_core::PcmBuffer;
use tracing::debug;

/// Onset-scan window length in samples
const ONSET_WINDOW: usize = 1024;

/// Hop between onset-scan windows
const ONSET_HOP: usize = 512;

/// A window is an onset when it exceeds its predecessor by this ratio
const ONSET_RATIO: f32 = 1.3;

/// ... and its mean absolute amplitude clears this floor
const ONSET_FLOOR: f32 = 0.02;

/// Returned when fewer than 4 onsets are found
pub const DEFAULT_BPM: f32 = 120.0;

/// Estimated tempo is clamped into this range
const BPM_RANGE: (f32, f32) = (80.0, 180.0);

/// Estimate tempo in BPM from onset spacing on the first channel
pub fn estimate_tempo(buffer: &PcmBuffer) -> f32 {
    let rate = buffer.sample_rate().as_hz();
    let samples = buffer.channel(0);

    let mut onsets: Vec<f64> = Vec::new();
    let mut previous = 0.0f32;
    let mut start = 0usize;
    while start + ONSET_WINDOW <= samples.len() {
        let window = &samples[start..start + ONSET_WINDOW];
        let level = window.iter().map(|s| s.abs()).sum::<f32>() / ONSET_WINDOW as f32;

        if level > previous * ONSET_RATIO && level > ONSET_FLOOR {
            onsets.push(start as f64 / f64::from(rate));
        }

        previous = level;
        start += ONSET_HOP;
    }

    if onsets.len() < 4 {
        debug!(onsets = onsets.len(), "too few onsets, using default tempo");
        return DEFAULT_BPM;
    }

    let mut intervals: Vec<f64> = onsets.windows(2).map(|pair| pair[1] - pair[0]).collect();
    intervals.sort_by(|a, b| a.total_cmp(b));
    let median = intervals[intervals.len() / 2];

    let bpm = (60.0 / median) as f32;
    let clamped = bpm.clamp(BPM_RANGE.0, BPM_RANGE.1);
    debug!(onsets = onsets.len(), median_interval = median, bpm = clamped, "estimated tempo");
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use patina_core::SampleRate;

    const RATE: SampleRate = SampleRate::CD_QUALITY;

    /// Evenly spaced short bursts at the given BPM
    fn click_track(bpm: f32, duration_secs: f32) -> PcmBuffer {
        let rate = RATE.as_hz() as usize;
        let frames = (rate as f32 * duration_secs) as usize;
        let mut samples = vec![0.0f32; frames];
        let interval = (60.0 / bpm * rate as f32) as usize;
        let click_len = rate / 100; // 10 ms bursts

        let mut pos = 0;
        while pos < frames {
            for i in 0..click_len.min(frames - pos) {
                samples[pos + i] = 0.8;
            }
            pos += interval;
        }
        PcmBuffer::new(vec![samples], RATE).unwrap()
    }

    #[test]
    fn click_track_at_120() {
        let bpm = estimate_tempo(&click_track(120.0, 5.0));
        assert!((bpm - 120.0).abs() <= 5.0, "got {bpm}");
    }

    #[test]
    fn click_track_at_100() {
        let bpm = estimate_tempo(&click_track(100.0, 6.0));
        assert!((bpm - 100.0).abs() <= 5.0, "got {bpm}");
    }

    #[test]
    fn silence_uses_default() {
        let buffer = PcmBuffer::silence(1, RATE.as_hz() as usize * 3, RATE).unwrap();
        assert_eq!(estimate_tempo(&buffer), DEFAULT_BPM);
    }

    #[test]
    fn short_buffer_uses_default() {
        // two clicks only: below the 4-onset minimum
        let buffer = click_track(120.0, 0.8);
        assert_eq!(estimate_tempo(&buffer), DEFAULT_BPM);
    }

    #[test]
    fn result_is_clamped() {
        // 40 BPM clicks: intervals of 1.5 s, 60/1.5 = 40 -> clamped to 80
        let bpm = estimate_tempo(&click_track(40.0, 10.0));
        assert!(bpm >= 80.0);
        assert!(bpm <= 180.0);
    }
}
