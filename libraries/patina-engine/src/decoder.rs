/// Audio decoder implementation using Symphonia
///
/// The host decoder is treated as a pluggable external facility: whatever
/// container/codec Symphonia's probe accepts is decoded; anything else is
/// a `Decode` error, fatal for the request.
use crate::error::{EngineError, Result};
use patina_core::{PcmBuffer, SampleRate};
use std::io::Cursor;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Decode an in-memory audio file into planar f32 PCM
///
/// The channel layout is preserved — the render contract requires an
/// output with the input's exact channel count, so no downmixing happens
/// here. Uses symmetric scaling for signed integer formats (divide by
/// 2^(N-1)) so the [-1.0, 1.0] range is symmetric.
pub fn decode(bytes: &[u8]) -> Result<PcmBuffer> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| EngineError::Decode(format!("Failed to probe input: {e}")))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| EngineError::Decode("No audio tracks found".to_string()))?;

    let sample_rate = track.codec_params.sample_rate.unwrap_or(44_100);
    let channel_count = track
        .codec_params
        .channels
        .map_or(2, symphonia::core::audio::Channels::count);
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| EngineError::Decode(format!("Failed to create decoder: {e}")))?;

    let mut channels: Vec<Vec<f32>> = vec![Vec::new(); channel_count];

    loop {
        // Get the next packet
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(EngineError::Decode(format!("Error reading packet: {e}")));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| EngineError::Decode(format!("Decode error: {e}")))?;

        append_planar(&decoded, &mut channels);
    }

    if channels.iter().all(Vec::is_empty) {
        return Err(EngineError::Decode(
            "Input contained no decodable audio".to_string(),
        ));
    }

    debug!(
        sample_rate,
        channels = channel_count,
        frames = channels[0].len(),
        "decoded input"
    );

    PcmBuffer::new(channels, SampleRate::new(sample_rate))
        .map_err(|e| EngineError::Decode(e.to_string()))
}

/// Append one decoded packet to the planar output, converting every
/// sample format to f32
///
/// Uses symmetric scaling for signed integers (divide by 2^(N-1), not
/// 2^(N-1)-1) and re-centers unsigned formats around zero.
fn append_planar(decoded: &AudioBufferRef, channels: &mut [Vec<f32>]) {
    macro_rules! extend {
        ($buf:expr, $normalize:expr) => {{
            let frames = $buf.frames();
            let present = $buf.spec().channels.count().min(channels.len());
            for ch in 0..present {
                channels[ch].extend($buf.chan(ch).iter().map($normalize));
            }
            // a packet with fewer channels than the track pads with silence
            for out in channels.iter_mut().skip(present) {
                out.extend(std::iter::repeat(0.0).take(frames));
            }
        }};
    }

    match decoded {
        AudioBufferRef::F32(buf) => extend!(buf, |&s: &f32| s.clamp(-1.0, 1.0)),
        AudioBufferRef::F64(buf) => extend!(buf, |&s: &f64| (s as f32).clamp(-1.0, 1.0)),
        AudioBufferRef::S32(buf) => extend!(buf, |&s: &i32| s as f32 / 2_147_483_648.0),
        AudioBufferRef::S16(buf) => extend!(buf, |&s: &i16| f32::from(s) / 32_768.0),
        AudioBufferRef::S8(buf) => extend!(buf, |&s: &i8| f32::from(s) / 128.0),
        AudioBufferRef::U32(buf) => {
            extend!(buf, |&s: &u32| (s as f32 / u32::MAX as f32) * 2.0 - 1.0)
        }
        AudioBufferRef::U16(buf) => {
            extend!(buf, |&s: &u16| (f32::from(s) / f32::from(u16::MAX)) * 2.0 - 1.0)
        }
        AudioBufferRef::U8(buf) => {
            extend!(buf, |&s: &u8| (f32::from(s) / f32::from(u8::MAX)) * 2.0 - 1.0)
        }
        AudioBufferRef::U24(buf) => {
            extend!(buf, |s: &symphonia::core::sample::u24| {
                (s.inner() as f32 / 16_777_215.0) * 2.0 - 1.0
            })
        }
        AudioBufferRef::S24(buf) => {
            extend!(buf, |s: &symphonia::core::sample::i24| {
                s.inner() as f32 / 8_388_608.0
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_input_is_a_decode_error() {
        let result = decode(&[0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(EngineError::Decode(_))));
    }

    #[test]
    fn empty_input_is_a_decode_error() {
        assert!(matches!(decode(&[]), Err(EngineError::Decode(_))));
    }
}
