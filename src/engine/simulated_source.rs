use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{BufferFeed, SignalSource};
use crate::error::{PitchError, Result};

/// Generates `sample_count` samples of a unit amplitude sine wave. A
/// frequency of 0 Hz yields silence.
pub fn sine_wave(frequency: f32, sample_rate: f32, sample_count: usize) -> Vec<f32> {
    (0..sample_count)
        .map(|i| (2.0 * core::f32::consts::PI * frequency * (i as f32) / sample_rate).sin())
        .collect()
}

struct Generator {
    armed: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// A deterministic [`SignalSource`] that emits one buffer of a pure tone
/// per configured frequency, spaced by a fixed interval.
pub struct SimulatedSource {
    sample_rate: f32,
    buffer_size: usize,
    frequencies: Vec<f32>,
    interval: Duration,
    looping: bool,
    generator: Option<Generator>,
}

impl SimulatedSource {
    pub fn new(sample_rate: f32, buffer_size: usize, frequencies: Vec<f32>) -> Self {
        SimulatedSource {
            sample_rate,
            buffer_size,
            frequencies,
            interval: Duration::from_millis(10),
            looping: false,
            generator: None,
        }
    }

    /// Sets the time between consecutive buffers.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Starts over from the first frequency after the last one instead of
    /// going quiet.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn is_running(&self) -> bool {
        self.generator.is_some()
    }
}

impl SignalSource for SimulatedSource {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn start(&mut self, mut feed: BufferFeed) -> Result<()> {
        if self.generator.is_some() {
            return Err(PitchError::Source("simulated source is already running".to_string()));
        }

        let armed = Arc::new(AtomicBool::new(true));
        let generator_armed = armed.clone();
        let sample_rate = self.sample_rate;
        let buffer_size = self.buffer_size;
        let frequencies = self.frequencies.clone();
        let interval = self.interval;
        let looping = self.looping;

        let handle = thread::Builder::new()
            .name("simulated-source".to_string())
            .spawn(move || loop {
                for frequency in frequencies.iter() {
                    if !generator_armed.load(Ordering::Acquire) {
                        return;
                    }
                    feed.push(sine_wave(*frequency, sample_rate, buffer_size));

                    // Sleep until the next buffer is due, waking up early on stop.
                    let deadline = Instant::now() + interval;
                    while generator_armed.load(Ordering::Acquire) {
                        let now = Instant::now();
                        if now >= deadline {
                            break;
                        }
                        thread::park_timeout(deadline - now);
                    }
                }
                if !looping || frequencies.is_empty() {
                    debug!("simulated source exhausted");
                    return;
                }
            })
            .map_err(|error| PitchError::Spawn(error.to_string()))?;

        self.generator = Some(Generator { armed, handle });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(generator) = self.generator.take() {
            generator.armed.store(false, Ordering::Release);
            generator.handle.thread().unpark();
            if generator.handle.join().is_err() {
                warn!("simulated source thread panicked");
            }
        }
    }
}

impl Drop for SimulatedSource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn feed(capacity: usize) -> (BufferFeed, rtrb::Consumer<Vec<f32>>, Arc<AtomicUsize>) {
        let (producer, consumer) = rtrb::RingBuffer::new(capacity);
        let dropped = Arc::new(AtomicUsize::new(0));
        (BufferFeed::new(producer, dropped.clone()), consumer, dropped)
    }

    fn wait_for(mut condition: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !condition() {
            assert!(Instant::now() < deadline, "timed out");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_sine_wave() {
        let wave = sine_wave(11025.0, 44100.0, 5);
        let expected = [0.0, 1.0, 0.0, -1.0, 0.0];
        for (value, expected) in wave.iter().zip(expected.iter()) {
            assert!((value - expected).abs() < 1e-5);
        }
        assert!(sine_wave(0.0, 44100.0, 16).iter().all(|value| *value == 0.0));
    }

    #[test]
    fn test_emits_one_buffer_per_frequency_in_order() {
        let (feed, mut consumer, _) = feed(8);
        let mut source = SimulatedSource::new(8000.0, 64, vec![1000.0, 0.0, 2000.0])
            .with_interval(Duration::from_millis(1));
        source.start(feed).unwrap();

        let mut buffers = Vec::new();
        wait_for(|| {
            while let Ok(buffer) = consumer.pop() {
                buffers.push(buffer);
            }
            buffers.len() == 3
        });
        source.stop();

        assert_eq!(buffers[0], sine_wave(1000.0, 8000.0, 64));
        assert!(buffers[1].iter().all(|value| *value == 0.0));
        assert_eq!(buffers[2], sine_wave(2000.0, 8000.0, 64));
        assert!(consumer.pop().is_err());
    }

    #[test]
    fn test_stop_disarms_looping_source() {
        let (feed, mut consumer, dropped) = feed(4);
        let mut source = SimulatedSource::new(8000.0, 32, vec![440.0])
            .with_interval(Duration::from_millis(1))
            .looping(true);
        source.start(feed).unwrap();
        assert!(source.is_running());

        // Nobody drains the queue, so the source eventually overflows it.
        wait_for(|| dropped.load(Ordering::Relaxed) > 0);
        source.stop();
        assert!(!source.is_running());

        let mut queued = 0;
        while consumer.pop().is_ok() {
            queued += 1;
        }
        assert_eq!(queued, 4);
        thread::sleep(Duration::from_millis(20));
        assert!(consumer.pop().is_err());
    }

    #[test]
    fn test_stop_interrupts_long_interval() {
        let (feed, _consumer, _) = feed(4);
        let mut source =
            SimulatedSource::new(8000.0, 32, vec![440.0, 880.0]).with_interval(Duration::from_secs(60));
        source.start(feed).unwrap();
        let started = Instant::now();
        source.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
