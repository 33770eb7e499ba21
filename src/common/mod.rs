//! Common algorithms and utilities.

mod autocorr;
mod f32_array_ext;
mod fft;
mod parabola;
mod window_processor;

pub use autocorr::{autocorr_conv, autocorr_fft, autocorr_fft_size};
pub use f32_array_ext::F32ArrayExt;
pub use fft::{fft_in_place, MAX_FFT_SIZE, MIN_FFT_SIZE};
pub use parabola::parabolic_vertex;
pub use window_processor::WindowProcessor;
