//! The [YIN](http://recherche.ircam.fr/equipes/pcm/cheveign/ps/2002_JASA_YIN_proof.pdf)
//! fundamental frequency estimator by Alain de Cheveigné and Hideki Kawahara.
//!
//! For a window of `N` samples, the estimator
//! 1. computes the difference function `d[tau]` for lags `0..N/2`,
//! 2. normalizes it into the cumulative mean normalized difference (CMND),
//! 3. picks the first lag whose CMND dips below an absolute threshold,
//!    walking to the bottom of that dip (or falls back to the global minimum),
//! 4. refines the lag by parabolic interpolation and
//! 5. returns `sample_rate / lag`.
//!
//! ```
//! use micro_tuner::yin::YinEstimator;
//!
//! let sample_rate = 44100.0;
//! let window: Vec<f32> = (0..4096)
//!     .map(|i| (2.0 * core::f32::consts::PI * 440.0 * (i as f32) / sample_rate).sin())
//!     .collect();
//! let frequency = YinEstimator::default().estimate_frequency(sample_rate, &window);
//! assert!((frequency - 440.0).abs() < 1.0);
//! ```

mod util;
mod yin_estimator;

pub use util::{
    absolute_threshold, cumulative_mean_normalized_difference, difference,
    parabolic_interpolation, ThresholdFallback,
};
pub use yin_estimator::{YinEstimator, DEFAULT_THRESHOLD};
