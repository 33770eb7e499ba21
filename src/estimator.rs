use crate::engine::Config;
use crate::error::Result;
use crate::mpm::MpmEstimator;
use crate::yin::YinEstimator;

/// A fundamental frequency estimation algorithm.
pub trait Estimator: Send {
    /// Estimates the fundamental frequency in Hz of `buffer`, sampled at
    /// `sample_rate`. Returns [`PitchError::NoPitchDetected`](crate::PitchError::NoPitchDetected)
    /// if the buffer has no discernible period.
    fn estimate(&mut self, sample_rate: f32, buffer: &[f32]) -> Result<f32>;
}

/// Selects the estimation algorithm used by a [`PitchDetector`](crate::PitchDetector).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EstimationStrategy {
    /// The YIN algorithm, see [`crate::yin`].
    #[default]
    Yin,
    /// The McLeod pitch method, see [`crate::mpm`].
    Mpm,
}

impl EstimationStrategy {
    /// Creates an estimator for the windows described by `config`.
    pub fn estimator(&self, config: &Config) -> Box<dyn Estimator> {
        match self {
            EstimationStrategy::Yin => {
                Box::new(YinEstimator::new(config.yin_threshold, config.yin_fallback))
            }
            EstimationStrategy::Mpm => Box::new(MpmEstimator::new(config.buffer_size)),
        }
    }
}
