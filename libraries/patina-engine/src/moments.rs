//! Dynamic effect moments
//!
//! Walks the buffer bar-by-bar (bar and beat lengths come from the
//! estimated tempo) and probabilistically emits automation events. Higher
//! intensity raises trigger probability and unlocks additional moment
//! kinds. Everything is computed before rendering begins; the sequence is
//! a pure function of duration, intensity, and the injected RNG.

use patina_core::{EffectMoment, MomentKind};
use rand::Rng;
use tracing::debug;

use crate::graph::OfflineGraph;

/// Stutter gates only trigger above this intensity
const STUTTER_THRESHOLD: f32 = 0.6;

/// Reverb builds are gated above this intensity floor
const BUILD_FLOOR: f32 = 0.3;

/// Fraction of a moment spent ramping up to the peak
const ATTACK_FRACTION: f64 = 0.25;

/// Wet lanes swell toward this ceiling
const WET_PEAK_CEILING: f32 = 0.9;

/// Reverb builds stay gentler than swells
const BUILD_PEAK_CEILING: f32 = 0.7;

/// Generate the scheduled moment sequence for a buffer
///
/// `bar` and `beat` are durations in seconds (4 beats to the bar);
/// `intensity_percent` is the user's overall dynamic-effects intensity in
/// [0, 100]. Returned moments are sorted by time and clipped to the
/// buffer duration.
pub fn generate_moments<R: Rng>(
    duration: f64,
    bar: f64,
    beat: f64,
    intensity_percent: f32,
    rng: &mut R,
) -> Vec<EffectMoment> {
    let intensity = (intensity_percent / 100.0).clamp(0.0, 1.0);
    let mut moments = Vec::new();

    if bar <= 0.0 || beat <= 0.0 || intensity <= 0.0 {
        return moments;
    }

    let mut push = |moments: &mut Vec<EffectMoment>, time: f64, len: f64, kind, scale: f32| {
        if time < duration {
            moments.push(EffectMoment {
                time,
                duration: len.min(duration - time),
                kind,
                intensity: scale * intensity,
            });
        }
    };

    let bar_count = (duration / bar).ceil() as usize;
    for bar_index in 0..bar_count {
        let bar_start = bar_index as f64 * bar;

        // end-of-bar reverb swell on every 4th bar
        if bar_index % 4 == 3 && rng.gen::<f32>() < 0.3 + 0.5 * intensity {
            push(
                &mut moments,
                bar_start + 3.0 * beat,
                beat,
                MomentKind::ReverbSwell,
                rng.gen_range(0.5..0.9),
            );
        }

        // delay echo burst every 6th bar
        if bar_index % 6 == 5 {
            push(
                &mut moments,
                bar_start + 2.0 * beat,
                2.0 * beat,
                MomentKind::DelayEcho,
                rng.gen_range(0.4..0.8),
            );
        }

        // delay throw on a random quarter-beat; chance scales linearly
        if rng.gen::<f32>() < 0.1 + 0.4 * intensity {
            let slot = rng.gen_range(0..16u32);
            push(
                &mut moments,
                bar_start + f64::from(slot) * beat / 4.0,
                beat / 2.0,
                MomentKind::DelayThrow,
                rng.gen_range(0.3..0.7),
            );
        }

        // gentle multi-bar reverb build on a longer period
        if bar_index % 8 == 0 && intensity > BUILD_FLOOR {
            push(
                &mut moments,
                bar_start,
                2.0 * bar,
                MomentKind::ReverbBuild,
                rng.gen_range(0.2..0.5),
            );
        }

        // stutter gate, unlocked above the intensity threshold
        if intensity > STUTTER_THRESHOLD && rng.gen::<f32>() < (intensity - STUTTER_THRESHOLD) * 1.5
        {
            let slot = rng.gen_range(0..4u32);
            push(
                &mut moments,
                bar_start + f64::from(slot) * beat,
                beat / 2.0,
                MomentKind::Stutter,
                rng.gen_range(0.5..1.0),
            );
        }
    }

    moments.sort_by(|a, b| a.time.total_cmp(&b.time));
    debug!(count = moments.len(), intensity, "generated effect moments");
    moments
}

/// Write the moment envelopes into the graph's automation lanes
///
/// Reverb kinds drive the reverb wet lane, delay kinds the delay wet
/// lane; each envelope rests at the lane's base gain, ramps linearly to
/// its peak over the first quarter of the moment, then falls back
/// exponentially by the end. Stutters instead gate the master lane with
/// alternating on/off steps of an eighth-beat each.
pub fn schedule(moments: &[EffectMoment], graph: &mut OfflineGraph, beat: f64) {
    for moment in moments {
        match moment.kind {
            MomentKind::ReverbSwell | MomentKind::ReverbBuild => {
                let ceiling = if moment.kind == MomentKind::ReverbBuild {
                    BUILD_PEAK_CEILING
                } else {
                    WET_PEAK_CEILING
                };
                apply_envelope(&mut graph.reverb_wet, moment, ceiling);
            }
            MomentKind::DelayEcho | MomentKind::DelayThrow => {
                apply_envelope(&mut graph.delay_wet, moment, WET_PEAK_CEILING);
            }
            MomentKind::Stutter => {
                apply_stutter(&mut graph.master, moment, beat / 8.0);
            }
        }
    }
}

fn apply_envelope(lane: &mut crate::graph::AutomationLane, moment: &EffectMoment, ceiling: f32) {
    let rest = lane.base();
    let peak = rest + (ceiling - rest).max(0.0) * moment.intensity;

    lane.set_value_at(moment.time, rest);
    lane.linear_ramp_to(moment.time + moment.duration * ATTACK_FRACTION, peak);
    lane.exponential_ramp_to(moment.time + moment.duration, rest);
}

fn apply_stutter(lane: &mut crate::graph::AutomationLane, moment: &EffectMoment, step: f64) {
    if step <= 0.0 {
        return;
    }
    let floor = 1.0 - 0.9 * moment.intensity;
    let end = moment.time + moment.duration;

    let mut t = moment.time;
    let mut open = false;
    while t < end {
        lane.set_value_at(t, if open { 1.0 } else { floor });
        open = !open;
        t += step;
    }
    lane.set_value_at(end, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use patina_core::{AudioParameters, SampleRate};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const BAR: f64 = 2.0;
    const BEAT: f64 = 0.5;

    fn generate(duration: f64, intensity: f32, seed: u64) -> Vec<EffectMoment> {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_moments(duration, BAR, BEAT, intensity, &mut rng)
    }

    #[test]
    fn sorted_and_in_range() {
        let moments = generate(120.0, 80.0, 11);
        assert!(!moments.is_empty());
        for pair in moments.windows(2) {
            assert!(pair[0].time <= pair[1].time);
        }
        for moment in &moments {
            assert!(moment.time >= 0.0 && moment.time < 120.0);
            assert!(moment.time + moment.duration <= 120.0 + 1e-9);
            assert!((0.0..=1.0).contains(&moment.intensity));
        }
    }

    #[test]
    fn no_stutter_at_or_below_threshold() {
        for seed in 0..20 {
            let moments = generate(240.0, 60.0, seed);
            assert!(
                moments.iter().all(|m| m.kind != MomentKind::Stutter),
                "stutter emitted at 60% intensity (seed {seed})"
            );
        }
    }

    #[test]
    fn stutter_appears_at_high_intensity() {
        let found = (0..20).any(|seed| {
            generate(240.0, 100.0, seed)
                .iter()
                .any(|m| m.kind == MomentKind::Stutter)
        });
        assert!(found, "no stutter across 20 seeds at full intensity");
    }

    #[test]
    fn zero_intensity_generates_nothing() {
        assert!(generate(120.0, 0.0, 3).is_empty());
    }

    #[test]
    fn delay_echo_lands_on_sixth_bars() {
        let moments = generate(60.0, 50.0, 5);
        for moment in moments
            .iter()
            .filter(|m| m.kind == MomentKind::DelayEcho)
        {
            // bar 5, 11, 17... with the burst starting on beat 3
            let bar_index = ((moment.time - 2.0 * BEAT) / BAR).round() as usize;
            assert_eq!(bar_index % 6, 5, "echo at {}", moment.time);
        }
    }

    #[test]
    fn deterministic_for_a_seed() {
        assert_eq!(generate(90.0, 70.0, 9), generate(90.0, 70.0, 9));
    }

    #[test]
    fn scheduling_touches_the_right_lanes() {
        let mut rng = SmallRng::seed_from_u64(1);
        let params = AudioParameters {
            dry_wet_mix: 0.7,
            ..AudioParameters::default()
        };
        let mut graph =
            crate::graph::OfflineGraph::build(&params, SampleRate::CD_QUALITY, &mut rng).unwrap();

        let moments = [
            EffectMoment {
                time: 1.0,
                duration: 0.5,
                kind: MomentKind::ReverbSwell,
                intensity: 0.8,
            },
            EffectMoment {
                time: 3.0,
                duration: 0.5,
                kind: MomentKind::Stutter,
                intensity: 0.8,
            },
        ];
        schedule(&moments, &mut graph, BEAT);

        assert!(!graph.reverb_wet.is_static());
        assert!(!graph.master.is_static());
        assert!(graph.delay_wet.is_static());
        assert!(graph.dry.is_static());

        // swell peaks above the resting wet gain mid-envelope
        let mut sampler = graph.reverb_wet.sampler();
        let rest = graph.reverb_wet.base();
        assert!(sampler.value_at(1.0 + 0.5 * ATTACK_FRACTION) > rest);
    }

    #[test]
    fn stutter_gate_alternates() {
        let mut lane = crate::graph::AutomationLane::constant(1.0);
        let moment = EffectMoment {
            time: 0.0,
            duration: 0.25,
            kind: MomentKind::Stutter,
            intensity: 1.0,
        };
        apply_stutter(&mut lane, &moment, BEAT / 8.0);

        let mut sampler = lane.sampler();
        let closed = sampler.value_at(0.01);
        let open = sampler.value_at(BEAT / 8.0 + 0.01);
        assert!(closed < 0.2, "gate floor was {closed}");
        assert!((open - 1.0).abs() < 1e-6);
        // restored after the moment
        assert!((sampler.value_at(1.0) - 1.0).abs() < 1e-6);
    }
}
