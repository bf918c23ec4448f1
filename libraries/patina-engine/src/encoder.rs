/// WAV encoding via hound
///
/// Output is the one canonical container: RIFF/WAVE, PCM format tag 1,
/// 16-bit signed little-endian, channels interleaved frame-by-frame.
/// Encoding is total — every float maps to an i16 — so the only failures
/// are writer plumbing, which a cursor over a Vec cannot produce in
/// practice but is still surfaced as `Encode` rather than a panic.
use crate::error::{EngineError, Result};
use patina_core::PcmBuffer;
use std::io::Cursor;
use tracing::debug;

/// Serialize a buffer into WAV bytes
///
/// Every sample is clamped to [-1.0, 1.0] and scaled by 32767, truncating
/// toward zero. Non-finite samples encode as silence — the guard that
/// keeps this direction total.
pub fn encode(buffer: &PcmBuffer) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: buffer.channel_count() as u16,
        sample_rate: buffer.sample_rate().as_hz(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| EngineError::Encode(e.to_string()))?;

        for i in 0..buffer.frames() {
            for ch in 0..buffer.channel_count() {
                writer
                    .write_sample(quantize(buffer.channel(ch)[i]))
                    .map_err(|e| EngineError::Encode(e.to_string()))?;
            }
        }

        writer
            .finalize()
            .map_err(|e| EngineError::Encode(e.to_string()))?;
    }

    let bytes = cursor.into_inner();
    debug!(
        frames = buffer.frames(),
        channels = buffer.channel_count(),
        bytes = bytes.len(),
        "encoded output"
    );
    Ok(bytes)
}

/// Float sample to i16, truncating toward zero
fn quantize(sample: f32) -> i16 {
    if !sample.is_finite() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use patina_core::SampleRate;

    #[test]
    fn silence_has_expected_size() {
        // 2 s, 44.1 kHz, mono: 44-byte header + frames * 2 bytes of data
        let frames = 2 * 44_100;
        let buffer = PcmBuffer::silence(1, frames, SampleRate::CD_QUALITY).unwrap();
        let bytes = encode(&buffer).unwrap();

        assert_eq!(bytes.len(), 44 + frames * 2);
        assert!(bytes[44..].iter().all(|&b| b == 0));
    }

    #[test]
    fn header_layout() {
        let buffer = PcmBuffer::silence(2, 100, SampleRate::new(48_000)).unwrap();
        let bytes = encode(&buffer).unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        // PCM format tag
        assert_eq!(u16::from_le_bytes([bytes[20], bytes[21]]), 1);
        // channel count
        assert_eq!(u16::from_le_bytes([bytes[22], bytes[23]]), 2);
        // sample rate
        assert_eq!(
            u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]),
            48_000
        );
        // block align = channels * 2
        assert_eq!(u16::from_le_bytes([bytes[32], bytes[33]]), 4);
        // bits per sample
        assert_eq!(u16::from_le_bytes([bytes[34], bytes[35]]), 16);
        // data chunk size = frames * channels * 2
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(
            u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]),
            100 * 2 * 2
        );
        // RIFF size = total - 8
        assert_eq!(
            u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize,
            bytes.len() - 8
        );
    }

    #[test]
    fn quantize_truncates_toward_zero() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 32767);
        assert_eq!(quantize(-1.0), -32767);
        assert_eq!(quantize(2.0), 32767); // clamped
        assert_eq!(quantize(0.5), 16383); // 16383.5 truncates down
        assert_eq!(quantize(-0.5), -16383); // toward zero, not -16384
    }

    #[test]
    fn non_finite_samples_become_silence() {
        assert_eq!(quantize(f32::NAN), 0);
        assert_eq!(quantize(f32::INFINITY), 0);
        assert_eq!(quantize(f32::NEG_INFINITY), 0);
    }
}
