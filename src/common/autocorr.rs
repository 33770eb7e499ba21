use microfft::Complex32;

use super::fft::{fft_in_place, MIN_FFT_SIZE};

/// Computes the length of the FFT needed to compute the autocorrelation
/// for a given buffer size and lag count to avoid circular convolution effects.
///
/// # Arguments
///
/// * `buffer_size` - The size of the input buffer.
/// * `lag_count` - The length of the computed autocorrelation.
pub fn autocorr_fft_size(buffer_size: usize, lag_count: usize) -> usize {
    assert!(lag_count <= buffer_size);
    let min_length = (buffer_size + lag_count).saturating_sub(1);
    let mut result: usize = MIN_FFT_SIZE;
    while result < min_length {
        result <<= 1;
    }
    result
}

/// Computes the [autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation)
/// of a given buffer using FFT. The first `lag_count` elements of `result`
/// hold the autocorrelation in their real parts.
///
/// # Arguments
///
/// * `buffer` - Input buffer
/// * `result` - A buffer of length `autocorr_fft_size(buffer.len(), lag_count)`.
/// * `lag_count` - The length of the computed autocorrelation.
pub fn autocorr_fft(buffer: &[f32], result: &mut [Complex32], lag_count: usize) {
    // Sanity checks
    let fft_size = autocorr_fft_size(buffer.len(), lag_count);
    if result.len() != fft_size {
        panic!(
            "Got autocorr fft buffer of length {}, expected {}.",
            result.len(),
            fft_size
        )
    }

    // Build FFT input signal
    for (target, sample) in result.iter_mut().zip(buffer.iter()) {
        *target = Complex32::new(*sample, 0.0);
    }
    for target in result.iter_mut().skip(buffer.len()) {
        *target = Complex32::new(0.0, 0.0);
    }

    // Perform the FFT in place
    fft_in_place(result);

    // Compute the power spectral density by point-wise multiplication by the complex conjugate.
    for bin in result.iter_mut() {
        *bin = Complex32::new(bin.norm_sqr(), 0.0);
    }

    // Perform an inverse FFT to get the autocorrelation. This is done in two steps:
    // 1. Reorder the power spectral density
    result[1..].reverse();
    // 2. Compute the FFT in place, which thanks to the reordering above becomes the inverse FFT (up to a scale)
    fft_in_place(result);

    // Apply scaling factor
    let scale = 1.0 / (fft_size as f32);
    for value in result.iter_mut().take(lag_count) {
        *value = Complex32::new(scale * value.re, 0.0);
    }
}

/// Computes the [autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation)
/// of a given buffer using time domain convolution.
pub fn autocorr_conv(window: &[f32], result: &mut [f32]) {
    let window_size = window.len();
    if window_size < result.len() {
        panic!("Result vector must not be longer than the window.");
    }

    for (tau, value) in result.iter_mut().enumerate() {
        let mut sum: f32 = 0.0;
        for j in 0..(window_size - tau) {
            sum += window[j] * window[j + tau];
        }
        *value = sum;
    }
}

#[cfg(test)]
mod tests {
    use super::{autocorr_conv, autocorr_fft, autocorr_fft_size};
    use microfft::Complex32;

    #[test]
    fn test_autocorr_fft_size() {
        assert_eq!(autocorr_fft_size(8, 4), 16);
        assert_eq!(autocorr_fft_size(1024, 512), 2048);
        assert_eq!(autocorr_fft_size(4096, 2048), 8192);
    }

    #[test]
    fn test_autocorr_fft() {
        // Reference Octave output (https://www.gnu.org/software/octave/index)
        // a = [1   2   3   4   5   6   7   8]
        // conv(a, fliplr(a)) = [8    23    44    70   100   133   168   204   168   133   100    70    44   23     8]
        // ifft(abs(fft([a 0 0 0 0])).^2) = [204.000   168.000   133.000   100.000    70.000    52.000 ....

        let window: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let lag_count = 4;
        let mut autocorr_reference: Vec<f32> = vec![0.0; lag_count];
        autocorr_conv(&window[..], &mut autocorr_reference[..]);
        assert_eq!(autocorr_reference, vec![204.0, 168.0, 133.0, 100.0]);

        let fft_size = autocorr_fft_size(window.len(), lag_count);
        let mut fft_buffer = vec![Complex32::new(0.0, 0.0); fft_size];
        autocorr_fft(&window[..], &mut fft_buffer[..], lag_count);

        let epsilon = 1e-3;
        for (reference, fft_value) in autocorr_reference.iter().zip(fft_buffer.iter()) {
            assert!((*reference - fft_value.re).abs() <= epsilon);
        }
    }
}
