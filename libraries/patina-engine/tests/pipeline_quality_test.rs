//! Signal-quality checks over the full pipeline
//!
//! Run with `--features test-utils`; uses the shared synthetic signal
//! generators.

use patina_core::{AudioParameters, CancellationToken, ProcessingMode, SampleRate};
use patina_engine::graph::OfflineGraph;
use patina_engine::test_utils::{click_track, rms, sine_buffer};
use patina_engine::{decode, encode, Processor};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const RATE: SampleRate = SampleRate::CD_QUALITY;

#[test]
fn tempo_survives_the_full_pipeline() {
    // click track in, tempo report out
    let wav = encode(&click_track(120.0, 5.0, RATE)).unwrap();
    let output = Processor::with_seed(1)
        .process(
            &wav,
            AudioParameters::default(),
            ProcessingMode::Manual,
            50.0,
        )
        .unwrap();

    let bpm = output.report.tempo_bpm.unwrap();
    assert!((bpm - 120.0).abs() <= 5.0, "estimated {bpm} BPM");
}

#[test]
fn reverb_raises_tail_energy() {
    // a burst followed by silence: the wet render must ring into the gap
    let mut buffer = sine_buffer(440.0, 0.8, 0.25, 1, RATE);
    let rate = RATE.as_hz() as usize;
    let mut samples = buffer.channel(0).to_vec();
    samples.resize(rate, 0.0); // pad to 1 s
    buffer = patina_core::PcmBuffer::new(vec![samples], RATE).unwrap();

    let params = AudioParameters {
        gain: 1.0,
        reverb_duration: 0.5,
        reverb_decay: 2.0,
        delay_time: 0.1,
        delay_feedback: 0.0,
        dry_wet_mix: 0.5,
    };
    let mut rng = SmallRng::seed_from_u64(3);
    let graph = OfflineGraph::build(&params, RATE, &mut rng).unwrap();
    let out = graph.render(&buffer, &CancellationToken::new()).unwrap();

    // window just past the burst: silent in the input, ringing in the output
    let window = &out.channel(0)[rate / 4 + rate / 50..rate / 2];
    let dry_window = &buffer.channel(0)[rate / 4 + rate / 50..rate / 2];
    assert!(rms(window) > rms(dry_window) + 1e-4);
}

#[test]
fn gain_scales_output_level() {
    let buffer = sine_buffer(440.0, 0.4, 0.5, 2, RATE);
    let quiet = AudioParameters {
        gain: 0.5,
        dry_wet_mix: 1.0,
        ..AudioParameters::default()
    };
    let loud = AudioParameters {
        gain: 2.0,
        dry_wet_mix: 1.0,
        ..AudioParameters::default()
    };

    let render = |params: &AudioParameters| {
        let mut rng = SmallRng::seed_from_u64(4);
        let graph = OfflineGraph::build(params, RATE, &mut rng).unwrap();
        let out = graph.render(&buffer, &CancellationToken::new()).unwrap();
        rms(out.channel(0))
    };

    let quiet_rms = render(&quiet);
    let loud_rms = render(&loud);
    assert!((loud_rms / quiet_rms - 4.0).abs() < 0.05);
}

#[test]
fn full_automatic_run_produces_playable_wav() {
    let wav = encode(&sine_buffer(220.0, 0.5, 2.0, 2, RATE)).unwrap();
    let output = Processor::with_seed(5)
        .process(
            &wav,
            AudioParameters::default(),
            ProcessingMode::Automatic,
            75.0,
        )
        .unwrap();

    let decoded = decode(&output.wav).unwrap();
    assert_eq!(decoded.channel_count(), 2);
    assert_eq!(decoded.frames(), RATE.as_hz() as usize * 2);
    // automation may push levels around but encoding clamps; nothing blows up
    assert!(decoded.channel(0).iter().all(|s| s.abs() <= 1.0));
}
