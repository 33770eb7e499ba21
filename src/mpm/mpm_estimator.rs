use microfft::Complex32;
use tracing::{debug, trace};

use super::key_maximum::KeyMaximum;
use super::util::normalized_square_difference;
use crate::common::{autocorr_fft, autocorr_fft_size, MAX_FFT_SIZE};
use crate::error::{PitchError, Result};
use crate::estimator::Estimator;

/// The maximum number of key maxima to gather during the peak finding phase.
pub const MAX_KEY_MAXIMA_COUNT: usize = 16;

/// Key maxima within this fraction of the largest one are pitch candidates.
const KEY_MAXIMUM_SELECTION_RATIO: f32 = 0.9;

/// Estimates the fundamental frequency of a window using the McLeod pitch method.
///
/// All scratch memory is allocated up front for a given window size and reused
/// between calls. Passing a window of a different size reallocates it.
pub struct MpmEstimator {
    /// The normalized square difference function of the last window.
    nsdf: Box<[f32]>,
    r_prime: Box<[Complex32]>,
    /// The number of key maxima found during the peak picking phase. May be 0, in which case
    /// no pitch was found.
    key_max_count: usize,
    /// A fixed array of key maxima. The first `key_max_count` maxima are valid.
    key_maxima: [KeyMaximum; MAX_KEY_MAXIMA_COUNT],
    /// The index into `key_maxima` of the selected key maximum
    selected_key_max_index: usize,
    window_size: usize,
}

impl MpmEstimator {
    /// Creates an estimator for windows of `window_size` samples, using
    /// `window_size / 2` lags.
    pub fn new(window_size: usize) -> Self {
        let lag_count = window_size / 2;
        MpmEstimator {
            nsdf: vec![0.0; lag_count].into_boxed_slice(),
            r_prime: vec![Complex32::new(0.0, 0.0); autocorr_fft_size(window_size, lag_count)]
                .into_boxed_slice(),
            key_max_count: 0,
            key_maxima: [KeyMaximum::default(); MAX_KEY_MAXIMA_COUNT],
            selected_key_max_index: 0,
            window_size,
        }
    }

    /// The NSDF computed for the most recent window.
    pub fn nsdf(&self) -> &[f32] {
        &self.nsdf
    }

    /// The key maxima found in the most recent window.
    pub fn key_maxima(&self) -> &[KeyMaximum] {
        &self.key_maxima[..self.key_max_count]
    }

    /// The key maximum assumed to correspond to the pitch period, if any.
    pub fn selected_key_maximum(&self) -> Option<&KeyMaximum> {
        self.key_maxima().get(self.selected_key_max_index)
    }

    /// The NSDF value at the selected pitch period. Between 0 and 1 (inclusive).
    /// Values close to 1 indicate pure tones and values close to 0 indicate lack
    /// of a discernible pitch.
    pub fn clarity(&self) -> f32 {
        self.selected_key_maximum()
            .map(|maximum| maximum.value.clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    /// Returns the estimated frequency in Hz, or `None` if the window
    /// has no key maxima or needs an autocorrelation FFT longer than
    /// [`MAX_FFT_SIZE`].
    pub fn estimate_frequency(&mut self, sample_rate: f32, window: &[f32]) -> Option<f32> {
        self.key_max_count = 0;
        self.selected_key_max_index = 0;
        if window.len() / 2 < 2 {
            return None;
        }
        if autocorr_fft_size(window.len(), window.len() / 2) > MAX_FFT_SIZE {
            debug!(window_size = window.len(), "window too long for mpm");
            return None;
        }
        if window.len() != self.window_size {
            *self = MpmEstimator::new(window.len());
        }

        self.compute_nsdf(window);
        self.perform_peak_picking();

        let selected_max = self.selected_key_maximum()?;
        trace!(
            lag = selected_max.lag,
            clarity = selected_max.value,
            key_maxima = self.key_max_count,
            "mpm period"
        );
        if selected_max.lag <= 0.0 {
            return None;
        }
        Some(sample_rate / selected_max.lag)
    }

    fn compute_nsdf(&mut self, window: &[f32]) {
        let lag_count = self.nsdf.len();
        autocorr_fft(window, &mut self.r_prime, lag_count);
        normalized_square_difference(window, &self.r_prime, &mut self.nsdf);
    }

    fn perform_peak_picking(&mut self) {
        let nsdf = &self.nsdf[..];

        // Step 1: gather key maxima.
        let mut key_max_count = 0;
        let mut is_detecting = false;
        let mut maximum_value: f32 = 0.0;
        let mut maximum_index: usize = 0;
        let mut prev = nsdf[0];
        for i in 1..nsdf.len() {
            let is_last_lag = i == nsdf.len() - 1;
            let curr = nsdf[i];
            if prev <= 0.0 && curr > 0.0 {
                // positive zero crossing, going from - to +.
                // start looking for a key maximum
                is_detecting = true;
                maximum_value = curr;
                maximum_index = i;
            } else if prev >= 0.0 && curr < 0.0 {
                // We reached a negative zero crossing (going from + to -).
                // Stop looking for a key maximum and store the one we've got
                // (unless we have collected the maximum number of key maxima)
                if is_detecting && key_max_count < MAX_KEY_MAXIMA_COUNT {
                    self.key_maxima[key_max_count].set(nsdf, maximum_index);
                    key_max_count += 1
                }
                is_detecting = false;
            }

            if is_detecting {
                if is_last_lag {
                    // Reached the last lag while looking for a new max.
                    if key_max_count < MAX_KEY_MAXIMA_COUNT {
                        let last_max_index = if curr > maximum_value { i } else { maximum_index };
                        self.key_maxima[key_max_count].set(nsdf, last_max_index);
                        key_max_count += 1
                    }
                } else if curr > maximum_value {
                    // If we're looking for a key maximum and the current
                    // value is greater than the current max, set a new max.
                    maximum_value = curr;
                    maximum_index = i;
                }
            }

            prev = curr;
        }
        self.key_max_count = key_max_count;

        // Step 2: Find the largest key maximum
        let largest_key_maximum = self.key_maxima[..key_max_count]
            .iter()
            .map(|key_max| key_max.value_at_lag_index)
            .fold(f32::MIN, f32::max);

        // Step 3: Select the first maximum that is close enough to the largest one
        let threshold = KEY_MAXIMUM_SELECTION_RATIO * largest_key_maximum;
        self.selected_key_max_index = self.key_maxima[..key_max_count]
            .iter()
            .position(|key_max| key_max.value >= threshold)
            .unwrap_or(0);
    }
}

impl Estimator for MpmEstimator {
    fn estimate(&mut self, sample_rate: f32, buffer: &[f32]) -> Result<f32> {
        match self.estimate_frequency(sample_rate, buffer) {
            Some(frequency) if frequency.is_finite() => Ok(frequency),
            _ => Err(PitchError::NoPitchDetected),
        }
    }
}
