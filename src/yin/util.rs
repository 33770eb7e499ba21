//! The numeric building blocks of the YIN algorithm. Each step works on a
//! buffer of `N / 2` lags, where `N` is the size of the analyzed window.

use microfft::Complex32;

use crate::common::{fft_in_place, parabolic_vertex, MAX_FFT_SIZE, MIN_FFT_SIZE};

/// What to do when no lag of the CMND dips below the absolute threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThresholdFallback {
    /// Use the lag of the global CMND minimum, provided that minimum is below 1.
    #[default]
    GlobalMinimum,
    /// Report that no pitch was found.
    NoPitch,
}

/// Computes the difference function
/// `d[tau] = sum_{j=0}^{N/2-1} (x[j] - x[j + tau])^2` for `tau` in `0..N/2`,
/// where `N` is the length of `window`.
///
/// Expanding the square gives
/// `d[tau] = e[0] + e[tau] - 2 * sum_{j=0}^{N/2-1} x[j] x[j + tau]`, where `e[k]`
/// is the energy of `x[k..k + N/2]`. The cross term is computed with an FFT for
/// windows of up to [`MAX_FFT_SIZE`] samples and by direct summation otherwise.
pub fn difference(window: &[f32], result: &mut [f32]) {
    let lag_count = window.len() / 2;
    if result.len() != lag_count {
        panic!(
            "Got difference buffer of length {}, expected {}.",
            result.len(),
            lag_count
        )
    }

    let fft_size = window.len().next_power_of_two().max(MIN_FFT_SIZE);
    if lag_count == 0 || fft_size > MAX_FFT_SIZE {
        difference_direct(window, result);
    } else {
        difference_fft(window, result, fft_size);
    }
}

fn difference_direct(window: &[f32], result: &mut [f32]) {
    let lag_count = result.len();
    for (tau, value) in result.iter_mut().enumerate() {
        let mut sum: f32 = 0.0;
        for j in 0..lag_count {
            let delta = window[j] - window[j + tau];
            sum += delta * delta;
        }
        *value = sum;
    }
}

fn difference_fft(window: &[f32], result: &mut [f32], fft_size: usize) {
    let lag_count = result.len();

    // Cross correlation of the first half of the window with the whole window.
    // The largest index needed is 2 * lag_count - 2 < fft_size, so the circular
    // correlation never wraps around for the lags of interest.
    let mut head = vec![Complex32::new(0.0, 0.0); fft_size];
    let mut signal = vec![Complex32::new(0.0, 0.0); fft_size];
    for (target, sample) in head.iter_mut().zip(window[..lag_count].iter()) {
        *target = Complex32::new(*sample, 0.0);
    }
    for (target, sample) in signal.iter_mut().zip(window.iter()) {
        *target = Complex32::new(*sample, 0.0);
    }
    fft_in_place(&mut head);
    fft_in_place(&mut signal);
    for (bin, signal_bin) in head.iter_mut().zip(signal.iter()) {
        *bin = bin.conj() * *signal_bin;
    }
    // Inverse FFT by reordering, up to a scale. See common::autocorr_fft.
    head[1..].reverse();
    fft_in_place(&mut head);
    let scale = 1.0 / (fft_size as f32);

    let energy = |samples: &[f32]| -> f64 {
        samples.iter().map(|sample| (*sample as f64) * (*sample as f64)).sum()
    };
    let head_energy = energy(&window[..lag_count]);
    let mut shifted_energy = head_energy;
    for (tau, value) in result.iter_mut().enumerate() {
        if tau > 0 {
            let leaving = window[tau - 1] as f64;
            let entering = window[tau + lag_count - 1] as f64;
            shifted_energy += entering * entering - leaving * leaving;
        }
        let cross = (scale * head[tau].re) as f64;
        *value = (head_energy + shifted_energy - 2.0 * cross).max(0.0) as f32;
    }
}

/// Replaces the difference function in `buffer` with the cumulative mean
/// normalized difference `d'[tau] = d[tau] / ((1 / tau) * sum_{j=1}^{tau} d[j])`,
/// with `d'[0] = 1`. Lags where the running sum is zero are set to 1.
pub fn cumulative_mean_normalized_difference(buffer: &mut [f32]) {
    if buffer.is_empty() {
        return;
    }
    buffer[0] = 1.0;
    let mut running_sum: f32 = 0.0;
    for tau in 1..buffer.len() {
        running_sum += buffer[tau];
        buffer[tau] = if running_sum <= 0.0 {
            1.0
        } else {
            buffer[tau] * (tau as f32) / running_sum
        };
    }
}

/// Returns the first lag whose CMND value is below `threshold`, advanced to the
/// bottom of the dip it belongs to. If there is none, `fallback` decides between
/// the global minimum and `None`. Lag 0 is never returned.
pub fn absolute_threshold(cmnd: &[f32], threshold: f32, fallback: ThresholdFallback) -> Option<usize> {
    let size = cmnd.len();
    let mut tau = 1;
    while tau < size {
        if cmnd[tau] < threshold {
            while tau + 1 < size && cmnd[tau + 1] < cmnd[tau] {
                tau += 1;
            }
            return Some(tau);
        }
        tau += 1;
    }

    match fallback {
        ThresholdFallback::NoPitch => None,
        ThresholdFallback::GlobalMinimum => {
            let mut min_tau = 0;
            let mut min_value: f32 = 1.0;
            for (tau, value) in cmnd.iter().enumerate().skip(1) {
                if *value < min_value {
                    min_value = *value;
                    min_tau = tau;
                }
            }
            // A flat curve (e.g silence) has no minimum below 1.
            if min_tau == 0 {
                None
            } else {
                Some(min_tau)
            }
        }
    }
}

/// Refines an integer lag to a fractional one using the vertex of the
/// parabola through its two neighbors. At the edges of the buffer the
/// smaller of the available values is used instead.
pub fn parabolic_interpolation(cmnd: &[f32], tau: usize) -> f32 {
    let size = cmnd.len();
    if tau >= size {
        panic!("Lag {} is out of bounds for a buffer of {} lags", tau, size);
    }
    let x0 = if tau < 1 { tau } else { tau - 1 };
    let x2 = if tau + 1 < size { tau + 1 } else { tau };

    if x0 == tau {
        return if cmnd[tau] <= cmnd[x2] { tau as f32 } else { x2 as f32 };
    }
    if x2 == tau {
        return if cmnd[tau] <= cmnd[x0] { tau as f32 } else { x0 as f32 };
    }

    let (offset, _) = parabolic_vertex(cmnd[x0], cmnd[tau], cmnd[x2]);
    // The vertex of a valid minimum lies between the neighbors.
    if offset.abs() > 1.0 {
        return tau as f32;
    }
    (tau as f32) + offset
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f32], expected: &[f32], tolerance: f32) {
        assert_eq!(actual.len(), expected.len());
        for (tau, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            assert!((a - e).abs() <= tolerance, "lag {}: {} != {}", tau, a, e);
        }
    }

    #[test]
    fn test_difference() {
        let window: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut direct = vec![0.0; 3];
        difference_direct(&window, &mut direct);
        // tau = 1: three deltas of 1, tau = 2: three deltas of 2
        assert_eq!(direct, vec![0.0, 3.0, 12.0]);

        let mut result = vec![0.0; 3];
        difference(&window, &mut result);
        assert_close(&result, &direct, 1e-4);
    }

    #[test]
    fn test_difference_of_periodic_signal() {
        let window: Vec<f32> = vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let mut result = vec![0.0; 4];
        difference(&window, &mut result);
        assert_close(&result, &[0.0, 16.0, 0.0, 16.0], 1e-4);
    }

    #[test]
    fn test_fft_difference_matches_direct_summation() {
        // A decaying two partial tone of an odd length, padded to the next FFT size.
        let window: Vec<f32> = (0..1001)
            .map(|i| {
                let t = i as f32 / 8000.0;
                (-3.0 * t).exp()
                    * ((2.0 * core::f32::consts::PI * 220.0 * t).sin()
                        + 0.3 * (2.0 * core::f32::consts::PI * 660.0 * t).sin())
            })
            .collect();
        let mut direct = vec![0.0; 500];
        difference_direct(&window, &mut direct);
        let mut result = vec![0.0; 500];
        difference(&window, &mut result);
        assert_close(&result, &direct, 0.05);
    }

    #[test]
    fn test_difference_of_silence() {
        let window = vec![0.0; 256];
        let mut result = vec![1.0; 128];
        difference(&window, &mut result);
        assert!(result.iter().all(|value| *value == 0.0));
    }

    #[test]
    fn test_difference_of_tiny_window() {
        let mut result = vec![0.0; 1];
        difference(&[0.5, -0.5], &mut result);
        assert_close(&result, &[0.0], 1e-6);
        difference(&[0.5], &mut []);
    }

    #[test]
    #[should_panic]
    fn test_difference_wrong_size() {
        let window = vec![0.0; 8];
        let mut result = vec![0.0; 8];
        difference(&window, &mut result);
    }

    #[test]
    fn test_cmnd() {
        let mut buffer: Vec<f32> = vec![0.0, 2.0, 4.0, 0.0];
        cumulative_mean_normalized_difference(&mut buffer);
        // tau 1: 2 * 1 / 2, tau 2: 4 * 2 / 6, tau 3: 0 * 3 / 6
        assert_eq!(buffer[0], 1.0);
        assert_eq!(buffer[1], 1.0);
        assert!((buffer[2] - 4.0 / 3.0).abs() <= f32::EPSILON);
        assert_eq!(buffer[3], 0.0);
    }

    #[test]
    fn test_cmnd_of_silence_is_flat() {
        let mut buffer = vec![0.0_f32; 16];
        cumulative_mean_normalized_difference(&mut buffer);
        assert!(buffer.iter().all(|value| *value == 1.0));
    }

    #[test]
    fn test_absolute_threshold_walks_to_local_minimum() {
        let cmnd: Vec<f32> = vec![1.0, 1.0, 0.5, 0.04, 0.02, 0.01, 0.03, 0.5, 0.001];
        assert_eq!(absolute_threshold(&cmnd, 0.05, ThresholdFallback::NoPitch), Some(5));
    }

    #[test]
    fn test_absolute_threshold_prefers_first_dip() {
        // The deeper dip at lag 7 is a multiple of the period and must be ignored.
        let cmnd: Vec<f32> = vec![1.0, 1.0, 0.6, 0.03, 0.2, 0.8, 0.3, 0.001, 0.4];
        assert_eq!(absolute_threshold(&cmnd, 0.05, ThresholdFallback::GlobalMinimum), Some(3));
    }

    #[test]
    fn test_absolute_threshold_fallback() {
        let cmnd: Vec<f32> = vec![1.0, 1.0, 0.6, 0.3, 0.2, 0.8, 0.9];
        assert_eq!(absolute_threshold(&cmnd, 0.05, ThresholdFallback::GlobalMinimum), Some(4));
        assert_eq!(absolute_threshold(&cmnd, 0.05, ThresholdFallback::NoPitch), None);
        assert_eq!(ThresholdFallback::default(), ThresholdFallback::GlobalMinimum);
    }

    #[test]
    fn test_absolute_threshold_flat_curve() {
        let cmnd = vec![1.0_f32; 32];
        assert_eq!(absolute_threshold(&cmnd, 0.05, ThresholdFallback::GlobalMinimum), None);
        assert_eq!(absolute_threshold(&[], 0.05, ThresholdFallback::GlobalMinimum), None);
    }

    #[test]
    fn test_parabolic_interpolation() {
        // Symmetric neighbors leave the lag unchanged.
        let cmnd: Vec<f32> = vec![1.0, 0.5, 0.1, 0.5, 1.0];
        assert!((parabolic_interpolation(&cmnd, 2) - 2.0).abs() <= f32::EPSILON);

        // Samples of (x - 3.25)^2 around lag 3.
        let cmnd: Vec<f32> = vec![1.0, 1.0, 1.5625, 0.0625, 0.5625];
        assert!((parabolic_interpolation(&cmnd, 3) - 3.25).abs() <= 1e-5);
    }

    #[test]
    fn test_parabolic_interpolation_at_edges() {
        let cmnd: Vec<f32> = vec![0.2, 0.1, 0.3];
        assert_eq!(parabolic_interpolation(&cmnd, 0), 1.0);
        let cmnd: Vec<f32> = vec![0.2, 0.3, 0.1];
        assert_eq!(parabolic_interpolation(&cmnd, 2), 2.0);
        let cmnd: Vec<f32> = vec![0.2, 0.05, 0.1];
        assert_eq!(parabolic_interpolation(&cmnd, 2), 1.0);
    }
}
