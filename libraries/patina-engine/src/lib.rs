//! Patina Audio Engine
//!
//! Offline audio effects processing for Patina.
//!
//! This crate provides:
//! - Audio decoding via Symphonia (MP3, FLAC, OGG, WAV, AAC, OPUS)
//! - An offline effects graph: gain, synthetic convolution reverb,
//!   feedback delay, dry/wet mixing, gain automation lanes
//! - Bar-aligned dynamic effect moments driven by estimated tempo
//! - Canonical 16-bit WAV encoding
//!
//! # Example: Processing a file
//!
//! ```rust,no_run
//! use patina_engine::{Processor, EngineError};
//! use patina_core::{AudioParameters, ProcessingMode};
//!
//! # fn example() -> Result<(), EngineError> {
//! let bytes = std::fs::read("input.mp3")?;
//! let output = Processor::new().process(
//!     &bytes,
//!     AudioParameters::default(),
//!     ProcessingMode::Assisted,
//!     40.0,
//! )?;
//! std::fs::write("output.wav", &output.wav)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example: Rendering a graph directly
//!
//! ```rust
//! use patina_engine::graph::OfflineGraph;
//! use patina_core::{AudioParameters, CancellationToken, PcmBuffer, SampleRate};
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let input = PcmBuffer::silence(2, 44_100, SampleRate::CD_QUALITY).unwrap();
//! let mut rng = SmallRng::seed_from_u64(0);
//! let graph = OfflineGraph::build(&AudioParameters::default(), input.sample_rate(), &mut rng).unwrap();
//! let output = graph.render(&input, &CancellationToken::new()).unwrap();
//! assert_eq!(output.frames(), input.frames());
//! ```

#![deny(unsafe_code)]

mod decoder;
mod encoder;
mod error;
pub mod graph;
pub mod moments;
mod process;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use decoder::decode;
pub use encoder::encode;
pub use error::{EngineError, Result};
pub use process::{ProcessOutput, ProcessReport, Processor};
