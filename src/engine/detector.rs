use tracing::trace;

use super::{Config, Pitch};
use crate::common::{F32ArrayExt, WindowProcessor};
use crate::error::{PitchError, Result};
use crate::estimator::Estimator;

/// Collects incoming samples into (possibly overlapping) windows and
/// estimates the pitch of each newly filled window.
///
/// This is the synchronous core of [`PitchEngine`](crate::PitchEngine) and can
/// be driven directly, e.g from an audio callback that already runs on a
/// dedicated thread.
pub struct PitchDetector {
    sample_rate: f32,
    estimator: Box<dyn Estimator>,
    window_processor: WindowProcessor,
    level_threshold_db: Option<f32>,
    processed_window_count: usize,
}

impl PitchDetector {
    /// Creates a detector using the estimator selected by `config.strategy`.
    pub fn new(sample_rate: f32, config: &Config) -> Result<Self> {
        let estimator = config.strategy.estimator(config);
        PitchDetector::with_estimator(sample_rate, config, estimator)
    }

    /// Creates a detector using a custom estimator. The strategy and YIN
    /// settings in `config` are ignored.
    pub fn with_estimator(
        sample_rate: f32,
        config: &Config,
        estimator: Box<dyn Estimator>,
    ) -> Result<Self> {
        config.validate()?;
        validate_sample_rate(sample_rate)?;
        Ok(PitchDetector {
            sample_rate,
            estimator,
            window_processor: WindowProcessor::new(config.buffer_size, config.hop_size()),
            level_threshold_db: config.level_threshold_db,
            processed_window_count: 0,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Changes the sample rate of subsequent input. Samples collected at the
    /// previous rate are discarded.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<()> {
        validate_sample_rate(sample_rate)?;
        self.sample_rate = sample_rate;
        self.reset();
        Ok(())
    }

    pub fn window_size(&self) -> usize {
        self.window_processor.window_size()
    }

    pub fn hop_size(&self) -> usize {
        self.window_processor.hop_size()
    }

    /// The number of windows analyzed so far.
    pub fn processed_window_count(&self) -> usize {
        self.processed_window_count
    }

    /// Discards any partially filled window.
    pub fn reset(&mut self) {
        self.window_processor.reset();
    }

    /// Consumes a chunk of samples of arbitrary length, invoking `handler`
    /// once for every window completed by it, in order.
    pub fn process<F>(&mut self, samples: &[f32], mut handler: F)
    where
        F: FnMut(Result<Pitch>),
    {
        let estimator = &mut self.estimator;
        let sample_rate = self.sample_rate;
        let level_threshold_db = self.level_threshold_db;
        let processed_window_count = &mut self.processed_window_count;
        self.window_processor.process(samples, |window| {
            *processed_window_count += 1;
            handler(analyze(&mut **estimator, sample_rate, level_threshold_db, window));
        });
    }

    /// Analyzes a single complete window, bypassing windowing.
    pub fn process_window(&mut self, window: &[f32]) -> Result<Pitch> {
        self.processed_window_count += 1;
        analyze(
            &mut *self.estimator,
            self.sample_rate,
            self.level_threshold_db,
            window,
        )
    }
}

fn validate_sample_rate(sample_rate: f32) -> Result<()> {
    if sample_rate > 0.0 && sample_rate.is_finite() {
        Ok(())
    } else {
        Err(PitchError::Configuration(format!(
            "sample rate must be positive, got {}",
            sample_rate
        )))
    }
}

fn analyze(
    estimator: &mut dyn Estimator,
    sample_rate: f32,
    level_threshold_db: Option<f32>,
    window: &[f32],
) -> Result<Pitch> {
    let level_db = window.rms_level_db();
    if let Some(threshold_db) = level_threshold_db {
        if level_db < threshold_db {
            trace!(level_db, threshold_db, "window below level threshold");
            return Err(PitchError::LevelBelowThreshold {
                level_db,
                threshold_db,
            });
        }
    }

    let result = estimator
        .estimate(sample_rate, window)
        .and_then(|frequency| Pitch::new(frequency, level_db));
    match &result {
        Ok(pitch) => trace!(frequency = pitch.frequency, note = %pitch.note, cents = pitch.cents, "pitch"),
        Err(error) => trace!(%error, "no pitch"),
    }
    result
}
