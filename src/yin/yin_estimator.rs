use tracing::trace;

use super::util::{
    absolute_threshold, cumulative_mean_normalized_difference, difference,
    parabolic_interpolation, ThresholdFallback,
};
use crate::error::{PitchError, Result};
use crate::estimator::Estimator;

/// The default absolute threshold applied to the CMND.
pub const DEFAULT_THRESHOLD: f32 = 0.05;

/// Estimates the fundamental frequency of a window using the YIN algorithm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YinEstimator {
    threshold: f32,
    fallback: ThresholdFallback,
}

impl Default for YinEstimator {
    fn default() -> Self {
        YinEstimator::new(DEFAULT_THRESHOLD, ThresholdFallback::default())
    }
}

impl YinEstimator {
    /// Creates an estimator with a given absolute threshold. Lower thresholds
    /// reject more subharmonic errors at the expense of missing weak or noisy tones.
    pub fn new(threshold: f32, fallback: ThresholdFallback) -> Self {
        YinEstimator {
            threshold,
            fallback,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn fallback(&self) -> ThresholdFallback {
        self.fallback
    }

    /// Returns the estimated frequency in Hz, or 0.0 if no period was found.
    ///
    /// `window` must hold at least two periods of the lowest frequency of
    /// interest, since only lags up to half the window are searched.
    pub fn estimate_frequency(&self, sample_rate: f32, window: &[f32]) -> f32 {
        // Scratch buffer owned by this call only.
        let mut yin_buffer = vec![0.0; window.len() / 2];
        difference(window, &mut yin_buffer);
        cumulative_mean_normalized_difference(&mut yin_buffer);

        match absolute_threshold(&yin_buffer, self.threshold, self.fallback) {
            Some(tau) => {
                let interpolated_tau = parabolic_interpolation(&yin_buffer, tau);
                trace!(tau, interpolated_tau, cmnd = yin_buffer[tau], "yin period");
                if interpolated_tau > 0.0 {
                    sample_rate / interpolated_tau
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }
}

impl Estimator for YinEstimator {
    fn estimate(&mut self, sample_rate: f32, buffer: &[f32]) -> Result<f32> {
        let frequency = self.estimate_frequency(sample_rate, buffer);
        if frequency > 0.0 && frequency.is_finite() {
            Ok(frequency)
        } else {
            Err(PitchError::NoPitchDetected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sine_wave;
    use crate::note::{Letter, Note};

    const SAMPLE_RATE: f32 = 44100.0;

    #[test]
    fn test_sine_detection() {
        let frequency: f32 = 467.0;
        let window = sine_wave(frequency, SAMPLE_RATE, 2048);
        let estimate = YinEstimator::default().estimate_frequency(SAMPLE_RATE, &window);
        assert!((frequency - estimate).abs() <= 0.5, "estimated {}", estimate);
    }

    #[test]
    fn test_recovers_every_semitone_from_c4_to_c5() {
        // 100 ms of audio per note
        let sample_count = (SAMPLE_RATE * 0.1) as usize;
        let scale = Note::chromatic_scale(4).unwrap();
        assert_eq!(scale.len(), 13);

        let mut estimator = YinEstimator::default();
        for note in scale {
            let window = sine_wave(note.frequency() as f32, SAMPLE_RATE, sample_count);
            let estimate = estimator.estimate(SAMPLE_RATE, &window).unwrap();
            let detected = Note::from_frequency(estimate as f64).unwrap();
            assert_eq!(detected, note, "estimated {} Hz for {}", estimate, note);
            assert!(detected.offset_cents(estimate as f64).abs() < 5.0);
        }
    }

    #[test]
    fn test_a440() {
        let window = sine_wave(440.0, SAMPLE_RATE, 4410);
        let frequency = YinEstimator::default().estimate(SAMPLE_RATE, &window).unwrap();
        assert!((frequency - 440.0).abs() < 2.0);
        let note = Note::from_frequency(frequency as f64).unwrap();
        assert_eq!(note, Note::from_letter_octave(Letter::A, 4).unwrap());
    }

    #[test]
    fn test_silence() {
        let window = vec![0.0; 4096];
        let mut estimator = YinEstimator::default();
        assert_eq!(estimator.estimate_frequency(SAMPLE_RATE, &window), 0.0);
        assert_eq!(estimator.estimate(SAMPLE_RATE, &window), Err(PitchError::NoPitchDetected));

        let mut strict = YinEstimator::new(DEFAULT_THRESHOLD, ThresholdFallback::NoPitch);
        assert_eq!(strict.estimate(SAMPLE_RATE, &window), Err(PitchError::NoPitchDetected));
    }

    #[test]
    fn test_empty_window() {
        let mut estimator = YinEstimator::default();
        assert_eq!(estimator.estimate(SAMPLE_RATE, &[]), Err(PitchError::NoPitchDetected));
    }

    #[test]
    fn test_lower_threshold_is_not_less_accurate() {
        for frequency in [110.0_f32, 261.63, 440.0, 987.77].iter() {
            let window = sine_wave(*frequency, SAMPLE_RATE, 4096);
            let strict = YinEstimator::new(0.01, ThresholdFallback::GlobalMinimum);
            let loose = YinEstimator::new(0.2, ThresholdFallback::GlobalMinimum);
            let strict_error = (strict.estimate_frequency(SAMPLE_RATE, &window) - frequency).abs();
            let loose_error = (loose.estimate_frequency(SAMPLE_RATE, &window) - frequency).abs();
            assert!(strict_error <= loose_error + 1e-3);
            assert!(strict_error < 0.005 * frequency);
        }
    }
}
