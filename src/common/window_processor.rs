/// Collects incoming samples into fixed-size, possibly overlapping windows.
///
/// Consecutive windows start `hop_size` samples apart. The first window is
/// emitted once `window_size` samples have been collected.
pub struct WindowProcessor {
    window: Box<[f32]>,
    window_size: usize,
    hop_size: usize,
    // The write index within the current sub window. A sub window
    // is a chunk of size hop_size.
    sub_window_write_index: usize,
    // The index of the current sub window mod the number of
    // sub windows per window
    wrapped_sub_window_index: usize,
    has_filled_first_window: bool,
}

fn validate_sizes(window_size: usize, hop_size: usize) {
    if window_size == 0 {
        panic!("Window size must be greater than 0")
    }
    if hop_size == 0 {
        panic!("Hop size must be greater than 0")
    }
    if hop_size > window_size {
        panic!("Hop size must not be greater than window size")
    }
    if window_size % hop_size != 0 {
        panic!("Window size must be divisible by hop size")
    }
}

impl WindowProcessor {
    pub fn new(window_size: usize, hop_size: usize) -> Self {
        validate_sizes(window_size, hop_size);
        WindowProcessor {
            window: vec![0.; window_size].into_boxed_slice(),
            window_size,
            hop_size,
            sub_window_write_index: 0,
            wrapped_sub_window_index: 0,
            has_filled_first_window: false,
        }
    }

    /// Discards any collected samples.
    pub fn reset(&mut self) {
        self.sub_window_write_index = 0;
        self.wrapped_sub_window_index = 0;
        self.has_filled_first_window = false;
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Consumes `buffer`, invoking `handler` with every newly completed window.
    pub fn process<F>(&mut self, buffer: &[f32], mut handler: F)
    where
        F: FnMut(&[f32]),
    {
        let sub_windows_per_window = self.window_size / self.hop_size;
        for input in buffer.iter() {
            self.window[self.sub_window_write_index] = *input;
            self.sub_window_write_index += 1;
            if self.sub_window_write_index == self.hop_size {
                self.wrapped_sub_window_index += 1;
                if self.wrapped_sub_window_index == sub_windows_per_window {
                    self.wrapped_sub_window_index = 0;
                    self.has_filled_first_window = true
                }

                self.sub_window_write_index = 0;

                // Move the newest sub window to the end, oldest samples first.
                self.window.rotate_left(self.hop_size);
                if self.has_filled_first_window {
                    handler(&self.window);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WindowProcessor;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32).collect()
    }

    fn collect_windows(processor: &mut WindowProcessor, chunks: &[&[f32]]) -> Vec<Vec<f32>> {
        let mut windows = Vec::new();
        for chunk in chunks {
            processor.process(chunk, |window| windows.push(window.to_vec()));
        }
        windows
    }

    #[test]
    fn test_non_overlapping_windows() {
        let buffer = ramp(32);
        let mut processor = WindowProcessor::new(8, 8);
        let windows = collect_windows(&mut processor, &[&buffer[..]]);
        assert_eq!(windows.len(), 4);
        for (index, window) in windows.iter().enumerate() {
            assert_eq!(window[..], buffer[8 * index..8 * (index + 1)]);
        }
    }

    #[test]
    fn test_overlapping_windows() {
        const WINDOW_SIZE: usize = 16;
        const HOP_SIZE: usize = 4;
        let buffer = ramp(5 * WINDOW_SIZE);
        let mut processor = WindowProcessor::new(WINDOW_SIZE, HOP_SIZE);

        // Split the input at an arbitrary point, windows must not depend on chunking.
        let windows = collect_windows(&mut processor, &[&buffer[..1], &buffer[1..37], &buffer[37..]]);
        let expected_count = (buffer.len() - WINDOW_SIZE) / HOP_SIZE + 1;
        assert_eq!(windows.len(), expected_count);
        for (index, window) in windows.iter().enumerate() {
            let start = index * HOP_SIZE;
            assert_eq!(window[..], buffer[start..start + WINDOW_SIZE]);
        }
    }

    #[test]
    fn test_reset_discards_partial_window() {
        let buffer = ramp(12);
        let mut processor = WindowProcessor::new(8, 8);
        let windows = collect_windows(&mut processor, &[&buffer[..6]]);
        assert!(windows.is_empty());
        processor.reset();
        let windows = collect_windows(&mut processor, &[&buffer[4..12]]);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0][..], buffer[4..12]);
    }

    #[test]
    #[should_panic]
    fn test_non_dividing_hop_size() {
        WindowProcessor::new(10, 4);
    }

    #[test]
    #[should_panic]
    fn test_zero_window_size() {
        WindowProcessor::new(0, 0);
    }
}
