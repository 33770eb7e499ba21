//! Real time [pitch](https://en.wikipedia.org/wiki/Pitch_%28music%29) detection for
//! monophonic, primarily musical, sounds, with the detected frequencies mapped to
//! notes of the twelve tone equal tempered scale (A4 = 440 Hz).
//!
//! Features
//! * The [YIN](crate::yin) estimator, with a configurable threshold and fallback policy.
//! * The [MPM](crate::mpm) estimator as an alternative behind the same [`Estimator`] interface.
//! * A [`Note`] model with conversions between frequencies, note indices and letter/octave pairs.
//! * A synchronous [`PitchDetector`] that handles windowing and overlapping windows.
//! * A threaded [`PitchEngine`] that streams audio from a [`SignalSource`] to a [`ResultSink`].
//!
//! The crate logs through [`tracing`] and never installs a subscriber itself.
//!
//! # Examples
//!
//! Single window API, used to process a window directly.
//! ```
//! use micro_tuner::{Estimator, Note, YinEstimator};
//!
//! let sample_rate = 44100.0;
//! let window = micro_tuner::engine::sine_wave(440.0, sample_rate, 4410);
//! let frequency = YinEstimator::default().estimate(sample_rate, &window).unwrap();
//! assert_eq!(Note::from_frequency(frequency as f64).unwrap().to_string(), "A4");
//! ```
//!
//! Streaming API, used for passing chunks of arbitrary size to the detector.
//! ```
//! use micro_tuner::{Config, PitchDetector};
//!
//! let sample_rate = 44100.0;
//! let config = Config::default().with_buffer_size(2048).with_hop_size(1024);
//! let mut detector = PitchDetector::new(sample_rate, &config).unwrap();
//! let chunk = micro_tuner::engine::sine_wave(261.63, sample_rate, 4096);
//! detector.process(&chunk, |result| match result {
//!     Ok(pitch) => println!("{} ({:+.1} cents)", pitch.note, pitch.cents),
//!     Err(error) => println!("{}", error),
//! });
//! ```

pub mod common;
pub mod engine;
mod error;
mod estimator;
pub mod mpm;
pub mod note;
pub mod yin;

pub use engine::{Config, Pitch, PitchDetector, PitchEngine, ResultSink, SignalSource, SimulatedSource};
pub use error::{PitchError, Result};
pub use estimator::{EstimationStrategy, Estimator};
pub use mpm::MpmEstimator;
pub use note::{Letter, Note};
pub use yin::{ThresholdFallback, YinEstimator};
