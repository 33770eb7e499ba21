//! The MPM [pitch](https://en.wikipedia.org/wiki/Pitch_%28music%29) detection algorithm,
//! described in the paper [A smarter way to find pitch](http://www.cs.otago.ac.nz/tartini/papers/A_Smarter_Way_to_Find_Pitch.pdf)
//! by Philip McLeod and Geoff Wyvill.
//!
//! An alternative to [YIN](crate::yin) behind the same [`Estimator`](crate::Estimator)
//! interface:
//! * Autocorrelation is computed using FFT.
//! * Computation of the NSDF is accelerated using the incremental scheme described in the paper.
//! * No memory is allocated once the estimator has seen a window of a given size.
//!
//! Windows may hold at most 8192 samples.

mod key_maximum;
mod mpm_estimator;
mod util;

pub use key_maximum::KeyMaximum;
pub use mpm_estimator::{MpmEstimator, MAX_KEY_MAXIMA_COUNT};
