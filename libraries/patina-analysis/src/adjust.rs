//! Heuristic parameter adjustment
//!
//! Three independent rules applied unconditionally in sequence — not
//! mutually exclusive branches, so the order is part of the contract.

use patina_core::{AudioAnalysis, AudioParameters};
use tracing::debug;

/// Nudge a base parameter set toward the analyzed content
///
/// Rule order:
/// 1. dynamic range vs. reverb length and dry mix
/// 2. overall energy vs. gain
/// 3. energy variance vs. delay time and feedback
pub fn adjust(analysis: &AudioAnalysis, base: AudioParameters) -> AudioParameters {
    let mut params = base;

    if analysis.dynamic_range > 0.3 {
        // punchy material: shorter tail, more dry signal
        params.reverb_duration = (params.reverb_duration * 0.7).max(0.1);
        params.dry_wet_mix = (params.dry_wet_mix + 0.1).min(1.0);
    } else {
        params.reverb_duration = (params.reverb_duration * 1.3).min(5.0);
    }

    if analysis.overall_energy < 0.1 {
        params.gain = (params.gain * 1.2).min(2.0);
    } else if analysis.overall_energy > 0.5 {
        params.gain = (params.gain * 0.85).max(0.5);
    }

    if analysis.energy_stddev > 0.15 {
        params.delay_time = params.delay_time.clamp(0.15, 0.4);
        params.delay_feedback *= 0.7;
    }

    debug!(?base, adjusted = ?params, "heuristic adjustment");
    params
}
