//! Convolution reverb with a synthetic impulse response
//!
//! The impulse is synthesized, not sampled: exponentially-shaped white
//! noise gives a plausible decaying-reverb character without a real room
//! impulse. Convolution runs as FFT block overlap-add over the whole
//! buffer; the tail past the input length is discarded so the output
//! keeps the input's frame count.

use patina_core::CancellationToken;
use rand::Rng;
use rustfft::{num_complex::Complex, FftPlanner};

use crate::error::{EngineError, Result};

/// Input block length for overlap-add convolution
const BLOCK_SIZE: usize = 4096;

/// Minimum FFT size for efficient processing
const MIN_FFT_SIZE: usize = 256;

/// Two-channel synthetic reverb impulse
#[derive(Debug, Clone)]
pub struct ImpulseResponse {
    channels: [Vec<f32>; 2],
}

impl ImpulseResponse {
    /// Synthesize the impulse: for each of 2 channels, sample i of a
    /// `rate x duration` buffer is `uniform(-1,1) x ((len-i)/len)^decay`.
    pub fn synthesize<R: Rng>(
        sample_rate: u32,
        duration_secs: f32,
        decay: f32,
        rng: &mut R,
    ) -> Self {
        let length = ((f64::from(sample_rate) * f64::from(duration_secs)) as usize).max(1);
        let channels = std::array::from_fn(|_| {
            (0..length)
                .map(|i| {
                    let envelope = ((length - i) as f32 / length as f32).powf(decay);
                    (rng.gen::<f32>() * 2.0 - 1.0) * envelope
                })
                .collect()
        });
        Self { channels }
    }

    /// Impulse length in frames
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    /// True if the impulse holds no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Impulse data for an input channel; channels past the second reuse
    /// the right impulse
    pub fn channel(&self, input_channel: usize) -> &[f32] {
        &self.channels[input_channel.min(1)]
    }
}

/// Convolve one channel with one impulse channel, truncated to `out_len`
///
/// FFT block overlap-add: each input block is zero-padded, multiplied
/// with the pre-computed impulse spectrum, inverse-transformed, and
/// accumulated at its block offset. The token is checked between blocks.
pub fn convolve(
    input: &[f32],
    impulse: &[f32],
    out_len: usize,
    cancel: &CancellationToken,
) -> Result<Vec<f32>> {
    if input.is_empty() || impulse.is_empty() {
        return Ok(vec![0.0; out_len]);
    }

    let fft_size = (BLOCK_SIZE + impulse.len() - 1)
        .next_power_of_two()
        .max(MIN_FFT_SIZE);

    let mut planner = FftPlanner::new();
    let fft_forward = planner.plan_fft_forward(fft_size);
    let fft_inverse = planner.plan_fft_inverse(fft_size);

    // pre-computed impulse spectrum
    let mut ir_fft: Vec<Complex<f32>> = impulse
        .iter()
        .map(|&x| Complex::new(x, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(fft_size)
        .collect();
    fft_forward.process(&mut ir_fft);

    let scale = 1.0 / fft_size as f32;
    let mut output = vec![0.0f32; out_len];
    let mut scratch = vec![Complex::new(0.0f32, 0.0); fft_size];

    let mut block_start = 0usize;
    while block_start < input.len() {
        if cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        let chunk = &input[block_start..(block_start + BLOCK_SIZE).min(input.len())];

        for (i, slot) in scratch.iter_mut().enumerate() {
            *slot = if i < chunk.len() {
                Complex::new(chunk[i], 0.0)
            } else {
                Complex::new(0.0, 0.0)
            };
        }

        fft_forward.process(&mut scratch);
        for (slot, ir) in scratch.iter_mut().zip(&ir_fft) {
            *slot *= ir;
        }
        fft_inverse.process(&mut scratch);

        // accumulate the block's convolution tail into the output
        let conv_len = (chunk.len() + impulse.len() - 1).min(fft_size);
        for i in 0..conv_len {
            let out_idx = block_start + i;
            if out_idx >= out_len {
                break;
            }
            output[out_idx] += scratch[i].re * scale;
        }

        block_start += BLOCK_SIZE;
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn impulse_length_matches_duration() {
        let mut rng = SmallRng::seed_from_u64(7);
        let ir = ImpulseResponse::synthesize(44_100, 0.5, 2.0, &mut rng);
        assert_eq!(ir.len(), 22_050);
    }

    #[test]
    fn impulse_envelope_decays() {
        let mut rng = SmallRng::seed_from_u64(7);
        let ir = ImpulseResponse::synthesize(44_100, 1.0, 2.0, &mut rng);
        let data = ir.channel(0);
        let head: f32 = data[..1000].iter().map(|s| s.abs()).sum();
        let tail: f32 = data[data.len() - 1000..].iter().map(|s| s.abs()).sum();
        assert!(head > tail * 10.0, "head {head} vs tail {tail}");
    }

    #[test]
    fn impulse_channels_are_independent_noise() {
        let mut rng = SmallRng::seed_from_u64(7);
        let ir = ImpulseResponse::synthesize(44_100, 0.1, 1.0, &mut rng);
        assert_ne!(ir.channel(0), ir.channel(1));
        // channels past the second map onto the right impulse
        assert_eq!(ir.channel(2), ir.channel(1));
    }

    #[test]
    fn dirac_impulse_passes_signal_through() {
        let cancel = CancellationToken::new();
        let input = vec![0.5, 0.3, 0.0, -0.2, 0.1];
        let out = convolve(&input, &[1.0], input.len(), &cancel).unwrap();
        for (o, i) in out.iter().zip(&input) {
            assert!((o - i).abs() < 1e-4, "expected {i}, got {o}");
        }
    }

    #[test]
    fn delayed_dirac_shifts_signal() {
        let cancel = CancellationToken::new();
        let input = vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let out = convolve(&input, &[0.0, 0.0, 0.5], input.len(), &cancel).unwrap();
        assert!(out[0].abs() < 1e-4);
        assert!(out[1].abs() < 1e-4);
        assert!((out[2] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn output_truncates_to_requested_length() {
        let cancel = CancellationToken::new();
        let input = vec![1.0; 10_000];
        let ir = vec![0.1; 5_000];
        let out = convolve(&input, &ir, 10_000, &cancel).unwrap();
        assert_eq!(out.len(), 10_000);
    }

    #[test]
    fn cancellation_aborts() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = convolve(&[0.0; 1024], &[1.0], 1024, &cancel);
        assert!(matches!(result, Err(EngineError::Cancelled)));
    }
}
