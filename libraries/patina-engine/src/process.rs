//! The end-to-end processing facade
//!
//! One request is one pipeline: decode -> resolve parameters -> validate
//! -> schedule automation -> render -> encode. Every stage failure is
//! terminal and typed; nothing retries.

use patina_analysis::{adjust, analyze, classify, estimate_tempo, preset_for};
use patina_core::{
    AudioParameters, CancellationToken, ContentClass, PcmBuffer, ProcessingMode,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::error::{EngineError, Result};
use crate::graph::OfflineGraph;
use crate::moments::{generate_moments, schedule};
use crate::{decoder, encoder};

/// Beats per bar; the automation walk assumes common time
const BEATS_PER_BAR: f64 = 4.0;

/// What a finished run chose and did, for caller-side display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    /// Mode the run executed under
    pub mode: ProcessingMode,
    /// Content class, when the mode ran classification
    pub content_class: Option<ContentClass>,
    /// The parameters the graph was actually built with
    pub params: AudioParameters,
    /// Estimated tempo, when automation ran
    pub tempo_bpm: Option<f32>,
    /// Number of scheduled effect moments
    pub moment_count: usize,
}

/// Processed bytes plus the run report
#[derive(Debug)]
pub struct ProcessOutput {
    /// Canonical 16-bit WAV bytes
    pub wav: Vec<u8>,
    /// What the run did
    pub report: ProcessReport,
}

/// Single-request processor
///
/// Owns the cancellation token for its in-flight request and, optionally,
/// a fixed RNG seed. The default seeds from entropy per call, so reverb
/// noise differs run to run; tests pin a seed.
#[derive(Debug, Default)]
pub struct Processor {
    cancel: CancellationToken,
    seed: Option<u64>,
}

impl Processor {
    /// Processor with entropy-seeded randomness
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor with a fixed seed for reproducible output
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Handle for abandoning the in-flight request from another thread
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the full pipeline on an uploaded file
    ///
    /// `intensity_percent` in [0, 100] controls the dynamic-effect
    /// moments; at zero, no automation is scheduled and the static graph
    /// alone renders.
    pub fn process(
        &self,
        input: &[u8],
        params: AudioParameters,
        mode: ProcessingMode,
        intensity_percent: f32,
    ) -> Result<ProcessOutput> {
        if !intensity_percent.is_finite() || !(0.0..=100.0).contains(&intensity_percent) {
            return Err(EngineError::InvalidParameter(format!(
                "intensity {intensity_percent} outside [0, 100]"
            )));
        }

        let buffer = decoder::decode(input)?;

        let (resolved, content_class) = self.resolve_params(&buffer, params, mode)?;
        resolved.validate()?;

        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let mut graph = OfflineGraph::build(&resolved, buffer.sample_rate(), &mut rng)?;

        let (tempo_bpm, moment_count) = if intensity_percent > 0.0 {
            let bpm = estimate_tempo(&buffer);
            let beat = 60.0 / f64::from(bpm);
            let bar = beat * BEATS_PER_BAR;
            let moments = generate_moments(
                buffer.duration_secs(),
                bar,
                beat,
                intensity_percent,
                &mut rng,
            );
            schedule(&moments, &mut graph, beat);
            (Some(bpm), moments.len())
        } else {
            (None, 0)
        };

        let rendered = graph.render(&buffer, &self.cancel)?;
        let wav = encoder::encode(&rendered)?;

        let report = ProcessReport {
            mode,
            content_class,
            params: resolved,
            tempo_bpm,
            moment_count,
        };
        info!(
            ?mode,
            class = ?content_class,
            tempo = ?tempo_bpm,
            moments = moment_count,
            "processing complete"
        );

        Ok(ProcessOutput { wav, report })
    }

    /// Mode-dependent parameter resolution
    ///
    /// Assisted nudges the caller's parameters from the analysis;
    /// Automatic assigns the matched preset's parameters verbatim, without
    /// the adjustment pass.
    fn resolve_params(
        &self,
        buffer: &PcmBuffer,
        params: AudioParameters,
        mode: ProcessingMode,
    ) -> Result<(AudioParameters, Option<ContentClass>)> {
        match mode {
            ProcessingMode::Manual => Ok((params, None)),
            ProcessingMode::Assisted => {
                let analysis = analyze(buffer, &self.cancel)?;
                Ok((adjust(&analysis, params), None))
            }
            ProcessingMode::Automatic => {
                let analysis = analyze(buffer, &self.cancel)?;
                let class = classify(&analysis);
                Ok((preset_for(class).params, Some(class)))
            }
        }
    }
}
