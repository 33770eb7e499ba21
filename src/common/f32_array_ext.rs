//! `[f32]` extensions.

use micromath::F32Ext;

/// `[f32]` extensions.
pub trait F32ArrayExt {
    /// Returns the [root mean square](https://en.wikipedia.org/wiki/Root_mean_square)
    /// level.
    fn rms_level(&self) -> f32;
    /// Returns the [root mean square](https://en.wikipedia.org/wiki/Root_mean_square)
    /// level in dB relative to 1, i.e 0 dB corresponds to a level of 1.
    /// A silent (or empty) slice has a level of negative infinity.
    fn rms_level_db(&self) -> f32;
}

impl F32ArrayExt for [f32] {
    fn rms_level(&self) -> f32 {
        let mean_square = mean_square(self);
        // micromath's sqrt(0) is a tiny positive number, not 0.
        if mean_square <= 0.0 {
            return 0.0;
        }
        F32Ext::sqrt(mean_square)
    }

    fn rms_level_db(&self) -> f32 {
        let mean_square = mean_square(self);
        if mean_square <= 0.0 {
            return f32::NEG_INFINITY;
        }
        20. * F32Ext::log10(F32Ext::sqrt(mean_square))
    }
}

fn mean_square(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|sample| sample * sample).sum();
    sum / (samples.len() as f32)
}
