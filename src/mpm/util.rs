use microfft::Complex32;

/// Fills `nsdf` with the normalized square difference function
/// `n'(tau) = 2 r'(tau) / m'(tau)` of `window`, where `autocorr` holds the
/// autocorrelation `r'` in its real parts.
///
/// `m'(tau)`, eq (6) of the paper, starts out at `2 r'(0)` and each further
/// lag removes one sample from either end of the window (section 6, efficient
/// calculation of SDF).
pub(crate) fn normalized_square_difference(window: &[f32], autocorr: &[Complex32], nsdf: &mut [f32]) {
    if nsdf.len() > window.len() {
        panic!(
            "Lag count {} must not be greater than the window size {}",
            nsdf.len(),
            window.len()
        );
    }
    if autocorr.len() < nsdf.len() {
        panic!("Autocorrelation is shorter than the lag count");
    }

    let mut m_prime = autocorr.first().map(|r| 2.0 * r.re).unwrap_or(0.0);
    for (tau, (value, r)) in nsdf.iter_mut().zip(autocorr.iter()).enumerate() {
        if tau > 0 {
            let head = window[tau - 1];
            let tail = window[window.len() - tau];
            m_prime -= head * head + tail * tail;
        }
        *value = if m_prime.abs() <= f32::EPSILON {
            0.0
        } else {
            2.0 * r.re / m_prime
        };
    }
}
