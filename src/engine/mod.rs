//! Streaming pitch detection.
//!
//! A [`SignalSource`] pushes chunks of samples into a [`BufferFeed`]. A
//! [`PitchEngine`] drains the feed on a worker thread, runs each completed
//! window through a [`PitchDetector`] and hands every outcome to a
//! [`ResultSink`].

mod config;
mod detector;
mod pitch;
mod pitch_engine;
mod simulated_source;
mod sink;
mod source;

pub use config::{Config, MAX_MPM_BUFFER_SIZE, MIN_BUFFER_SIZE};
pub use detector::PitchDetector;
pub use pitch::Pitch;
pub use pitch_engine::PitchEngine;
pub use simulated_source::{sine_wave, SimulatedSource};
pub use sink::ResultSink;
pub use source::{BufferFeed, SignalSource};
