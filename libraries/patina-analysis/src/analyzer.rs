//! Windowed analysis pass
//!
//! Processes the first channel of the first 30 seconds of audio in
//! non-overlapping 2048-sample windows spaced two window-lengths apart —
//! an explicit choice trading frequency resolution for speed. Every
//! window contributes an RMS value; every 4th window additionally
//! contributes an approximate spectral centroid.

use patina_core::{AudioAnalysis, CancellationToken, PcmBuffer, SilenceInterval};
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Analysis window length in samples
pub const ANALYSIS_WINDOW: usize = 2048;

/// Hop between window starts; 2x the window, leaving gaps
const ANALYSIS_HOP: usize = ANALYSIS_WINDOW * 2;

/// Only the leading portion of long files is analyzed
pub const ANALYSIS_WINDOW_LIMIT_SECS: u32 = 30;

/// Windows with RMS below this are silence
pub const SILENCE_RMS_THRESHOLD: f32 = 0.01;

/// A silent window starting within this many seconds of the previous
/// interval's end extends that interval
const SILENCE_MERGE_GAP_SECS: f64 = 0.1;

/// Centroids are sampled on every Nth window
const CENTROID_EVERY: usize = 4;

/// Cancellation checkpoint cadence, in windows
const CANCEL_CHECK_EVERY: usize = 50;

/// Analyze a buffer into an energy profile, centroid sequence, and
/// silence map
///
/// The token is checked every 50 windows so a caller can abandon the
/// request; large files make this pass the dominant cost before
/// rendering.
///
/// # Errors
/// Returns `EmptyBuffer` for a zero-frame input and `Cancelled` when the
/// token is set.
pub fn analyze(buffer: &PcmBuffer, cancel: &CancellationToken) -> Result<AudioAnalysis> {
    if buffer.is_empty() {
        return Err(AnalysisError::EmptyBuffer);
    }

    let rate = buffer.sample_rate().as_hz();
    let limit = (rate as usize) * ANALYSIS_WINDOW_LIMIT_SECS as usize;
    let samples = buffer.channel(0);
    let samples = &samples[..samples.len().min(limit)];

    let mut energy = Vec::new();
    let mut centroids = Vec::new();
    let mut silences: Vec<SilenceInterval> = Vec::new();

    let window_duration = ANALYSIS_WINDOW as f64 / f64::from(rate);

    let mut window_index = 0usize;
    let mut start = 0usize;
    while start + ANALYSIS_WINDOW <= samples.len() {
        if window_index % CANCEL_CHECK_EVERY == 0 && cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }

        let window = &samples[start..start + ANALYSIS_WINDOW];
        let rms = root_mean_square(window);
        energy.push(rms);

        if window_index % CENTROID_EVERY == 0 {
            centroids.push(spectral_centroid(window, rate));
        }

        if rms < SILENCE_RMS_THRESHOLD {
            let window_start = start as f64 / f64::from(rate);
            let window_end = window_start + window_duration;
            match silences.last_mut() {
                Some(last) if window_start - last.end < SILENCE_MERGE_GAP_SECS => {
                    last.end = window_end;
                }
                _ => silences.push(SilenceInterval {
                    start: window_start,
                    end: window_end,
                }),
            }
        }

        window_index += 1;
        start += ANALYSIS_HOP;
    }

    let overall_energy = mean(&energy);
    let dynamic_range = range(&energy);
    let energy_stddev = stddev(&energy, overall_energy);

    debug!(
        windows = energy.len(),
        centroids = centroids.len(),
        silences = silences.len(),
        overall_energy,
        dynamic_range,
        "analysis complete"
    );

    Ok(AudioAnalysis {
        energy,
        centroids,
        silences,
        overall_energy,
        dynamic_range,
        energy_stddev,
    })
}

fn root_mean_square(window: &[f32]) -> f32 {
    let sum: f32 = window.iter().map(|s| s * s).sum();
    (sum / window.len() as f32).sqrt()
}

/// Approximate spectral centroid of one window, in Hz
///
/// This is NOT an FFT. Of the window/2 bins, every 8th is estimated by
/// power-sampling the time-domain window at stride 8 with a bin-dependent
/// phase offset; the bins in between are linearly interpolated. The result
/// is a crude brightness indicator, good enough for the broad bands the
/// classifier reads.
fn spectral_centroid(window: &[f32], sample_rate: u32) -> f32 {
    const BIN_STEP: usize = 8;
    const SAMPLE_STRIDE: usize = 8;

    let bins = window.len() / 2;
    let mut spectrum = vec![0.0f32; bins];

    let mut k = 0;
    while k < bins {
        let offset = (k / BIN_STEP) % SAMPLE_STRIDE;
        let mut power = 0.0f32;
        let mut count = 0usize;
        let mut j = offset;
        while j < window.len() {
            power += window[j] * window[j];
            count += 1;
            j += SAMPLE_STRIDE;
        }
        if count > 0 {
            spectrum[k] = power / count as f32;
        }

        // fill the gap back to the previous sampled bin
        if k > 0 {
            let prev = spectrum[k - BIN_STEP];
            let step = (spectrum[k] - prev) / BIN_STEP as f32;
            for i in 1..BIN_STEP {
                spectrum[k - BIN_STEP + i] = prev + step * i as f32;
            }
        }
        k += BIN_STEP;
    }
    // tail bins past the last sampled one keep that bin's estimate
    let last_sampled = ((bins - 1) / BIN_STEP) * BIN_STEP;
    for i in last_sampled + 1..bins {
        spectrum[i] = spectrum[last_sampled];
    }

    let total: f32 = spectrum.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let bin_hz = f64::from(sample_rate) / window.len() as f64;
    let weighted: f64 = spectrum
        .iter()
        .enumerate()
        .map(|(bin, &p)| bin as f64 * bin_hz * f64::from(p))
        .sum();
    (weighted / f64::from(total)) as f32
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

fn range(values: &[f32]) -> f32 {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if values.is_empty() {
        0.0
    } else {
        max - min
    }
}

fn stddev(values: &[f32], mean: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f32>()
        / values.len() as f32;
    variance.sqrt()
}
