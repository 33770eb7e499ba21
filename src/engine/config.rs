use tracing::warn;

use crate::error::{PitchError, Result};
use crate::estimator::EstimationStrategy;
use crate::yin::{ThresholdFallback, DEFAULT_THRESHOLD};

/// The smallest supported window size.
pub const MIN_BUFFER_SIZE: usize = 32;
/// The largest window size supported by [`EstimationStrategy::Mpm`].
pub const MAX_MPM_BUFFER_SIZE: usize = 8192;

/// Pitch detection settings. These are fixed for the lifetime of a
/// [`PitchDetector`](crate::PitchDetector) or [`PitchEngine`](crate::PitchEngine).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Config {
    /// The number of samples in each analyzed window. Must be a power of two.
    pub buffer_size: usize,
    /// The number of samples between the starts of consecutive windows.
    /// Must divide `buffer_size`. `None` means `buffer_size`, i.e no overlap.
    pub hop_size: Option<usize>,
    pub strategy: EstimationStrategy,
    /// The absolute CMND threshold used by [`EstimationStrategy::Yin`].
    pub yin_threshold: f32,
    pub yin_fallback: ThresholdFallback,
    /// Windows with an RMS level below this many dB are reported as
    /// [`PitchError::LevelBelowThreshold`] without being analyzed.
    pub level_threshold_db: Option<f32>,
    /// The number of chunks that may be queued between a signal source and
    /// the engine. Chunks arriving when the queue is full are dropped.
    pub queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            buffer_size: 4096,
            hop_size: None,
            strategy: EstimationStrategy::Yin,
            yin_threshold: DEFAULT_THRESHOLD,
            yin_fallback: ThresholdFallback::GlobalMinimum,
            level_threshold_db: None,
            queue_capacity: 16,
        }
    }
}

impl Config {
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_hop_size(mut self, hop_size: usize) -> Self {
        self.hop_size = Some(hop_size);
        self
    }

    pub fn with_strategy(mut self, strategy: EstimationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_yin_threshold(mut self, threshold: f32) -> Self {
        self.yin_threshold = threshold;
        self
    }

    pub fn with_yin_fallback(mut self, fallback: ThresholdFallback) -> Self {
        self.yin_fallback = fallback;
        self
    }

    pub fn with_level_threshold_db(mut self, threshold_db: f32) -> Self {
        self.level_threshold_db = Some(threshold_db);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// The effective hop size.
    pub fn hop_size(&self) -> usize {
        self.hop_size.unwrap_or(self.buffer_size)
    }

    /// Checks that the settings describe a usable detector.
    pub fn validate(&self) -> Result<()> {
        let result = self.check();
        if let Err(error) = &result {
            warn!(%error, "rejected configuration");
        }
        result
    }

    fn check(&self) -> Result<()> {
        let invalid = |message: String| Err(PitchError::Configuration(message));

        if self.buffer_size < MIN_BUFFER_SIZE || !self.buffer_size.is_power_of_two() {
            return invalid(format!(
                "buffer size must be a power of two of at least {}, got {}",
                MIN_BUFFER_SIZE, self.buffer_size
            ));
        }
        if self.strategy == EstimationStrategy::Mpm && self.buffer_size > MAX_MPM_BUFFER_SIZE {
            return invalid(format!(
                "buffer size must not exceed {} for MPM, got {}",
                MAX_MPM_BUFFER_SIZE, self.buffer_size
            ));
        }
        let hop_size = self.hop_size();
        if hop_size == 0 || hop_size > self.buffer_size || self.buffer_size % hop_size != 0 {
            return invalid(format!(
                "hop size must divide the buffer size {}, got {}",
                self.buffer_size, hop_size
            ));
        }
        if !(self.yin_threshold > 0.0 && self.yin_threshold < 1.0) {
            return invalid(format!(
                "YIN threshold must be between 0 and 1, got {}",
                self.yin_threshold
            ));
        }
        if let Some(threshold_db) = self.level_threshold_db {
            if threshold_db.is_nan() {
                return invalid("level threshold must be a number".to_string());
            }
        }
        if self.queue_capacity == 0 {
            return invalid("queue capacity must be greater than 0".to_string());
        }
        Ok(())
    }
}
