use crate::common::parabolic_vertex;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
/// A key maximum, i.e an NSDF maximum that may or may not correspond
/// to the pitch period.
pub struct KeyMaximum {
    /// The index into the NSDF array corresponding to this maximum
    pub lag_index: usize,
    /// The NSDF value at `lag_index` for this maximum
    pub value_at_lag_index: f32,
    /// The NSDF value for this maximum, approximated using parabolic interpolation.
    pub value: f32,
    /// The lag, in samples, for this maximum, approximated using parabolic interpolation.
    pub lag: f32,
}

impl KeyMaximum {
    pub(crate) fn set(&mut self, nsdf: &[f32], lag_index: usize) {
        self.lag_index = lag_index;
        let value_at_lag_index = nsdf[lag_index];
        self.value_at_lag_index = value_at_lag_index;

        // Use parabolic interpolation to approximate
        // the true maximum using the left and right neighbors
        let left_index = lag_index.saturating_sub(1);
        let right_index = core::cmp::min(nsdf.len() - 1, lag_index + 1);
        let (x_max, value) =
            parabolic_vertex(nsdf[left_index], value_at_lag_index, nsdf[right_index]);

        self.value = value;
        self.lag = (lag_index as f32) + x_max;
    }
}
