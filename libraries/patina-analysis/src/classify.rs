//! Content classification against a fixed preset table
//!
//! Each class pairs a detector predicate over the analysis report with the
//! parameter preset applied in automatic mode. Predicates are evaluated in
//! a fixed priority order and the first match wins; the bands deliberately
//! overlap, so the order is load-bearing.

use patina_core::{AudioAnalysis, AudioParameters, ContentClass, Preset};
use tracing::debug;

/// Classify an analysis report, defaulting to `Music` when nothing matches
pub fn classify(analysis: &AudioAnalysis) -> ContentClass {
    let centroid = analysis.mean_centroid();
    let range = analysis.dynamic_range;

    let class = if (1000.0..=3000.0).contains(&centroid) && (0.1..=0.4).contains(&range) {
        ContentClass::Vocal
    } else if (400.0..=2500.0).contains(&centroid) && range > 0.2 {
        ContentClass::Instrument
    } else if (500.0..=2000.0).contains(&centroid) && range < 0.1 {
        ContentClass::Speech
    } else {
        ContentClass::Music
    };

    debug!(%class, centroid, dynamic_range = range, "classified content");
    class
}

/// Preset for a content class
pub fn preset_for(class: ContentClass) -> Preset {
    match class {
        ContentClass::Vocal => Preset {
            label: "Vocal",
            description: "Clear vocal processing with subtle reverb",
            params: AudioParameters {
                gain: 1.2,
                reverb_duration: 1.5,
                reverb_decay: 2.0,
                delay_time: 0.12,
                delay_feedback: 0.15,
                dry_wet_mix: 0.8,
            },
        },
        ContentClass::Instrument => Preset {
            label: "Instrument",
            description: "Warm instrument enhancement",
            params: AudioParameters {
                gain: 1.2,
                reverb_duration: 2.0,
                reverb_decay: 2.2,
                delay_time: 0.2,
                delay_feedback: 0.25,
                dry_wet_mix: 0.7,
            },
        },
        ContentClass::Speech => Preset {
            label: "Speech",
            description: "Clean speech with minimal reverb",
            params: AudioParameters {
                gain: 1.4,
                reverb_duration: 0.3,
                reverb_decay: 1.0,
                delay_time: 0.05,
                delay_feedback: 0.05,
                dry_wet_mix: 0.95,
            },
        },
        ContentClass::Music => Preset {
            label: "Music",
            description: "Spacious atmospheric processing",
            params: AudioParameters {
                gain: 1.1,
                reverb_duration: 2.5,
                reverb_decay: 2.8,
                delay_time: 0.3,
                delay_feedback: 0.3,
                dry_wet_mix: 0.65,
            },
        },
    }
}

/// The full preset table, in detector priority order
pub fn presets() -> [(ContentClass, Preset); 4] {
    [
        ContentClass::Vocal,
        ContentClass::Instrument,
        ContentClass::Speech,
        ContentClass::Music,
    ]
    .map(|class| (class, preset_for(class)))
}
