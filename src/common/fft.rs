use microfft::Complex32;

/// The smallest FFT size supported by [`fft_in_place`].
pub const MIN_FFT_SIZE: usize = 16;
/// The largest FFT size supported by [`fft_in_place`].
pub const MAX_FFT_SIZE: usize = 16384;

fn cfft<const N: usize>(
    buffer: &mut [Complex32],
    fft: for<'a> fn(&'a mut [Complex32; N]) -> &'a mut [Complex32; N],
) {
    if let Ok(array) = <&mut [Complex32; N]>::try_from(buffer) {
        let _ = fft(array);
    }
}

/// Performs an in-place complex FFT on a given buffer, whose length must
/// be a power of two between [`MIN_FFT_SIZE`] and [`MAX_FFT_SIZE`].
pub fn fft_in_place(buffer: &mut [Complex32]) {
    let fft_size = buffer.len();
    match fft_size {
        16 => cfft(buffer, microfft::complex::cfft_16),
        32 => cfft(buffer, microfft::complex::cfft_32),
        64 => cfft(buffer, microfft::complex::cfft_64),
        128 => cfft(buffer, microfft::complex::cfft_128),
        256 => cfft(buffer, microfft::complex::cfft_256),
        512 => cfft(buffer, microfft::complex::cfft_512),
        1024 => cfft(buffer, microfft::complex::cfft_1024),
        2048 => cfft(buffer, microfft::complex::cfft_2048),
        4096 => cfft(buffer, microfft::complex::cfft_4096),
        8192 => cfft(buffer, microfft::complex::cfft_8192),
        16384 => cfft(buffer, microfft::complex::cfft_16384),
        _ => panic!("Unsupported fft size {}", fft_size),
    }
}
