use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rtrb::{Producer, PushError};
use tracing::trace;

use crate::error::Result;

/// The sending half of the queue between a [`SignalSource`] and the engine.
///
/// Pushing never blocks, so it is safe to call from a real time audio callback.
pub struct BufferFeed {
    producer: Producer<Vec<f32>>,
    dropped: Arc<AtomicUsize>,
}

impl BufferFeed {
    pub(crate) fn new(producer: Producer<Vec<f32>>, dropped: Arc<AtomicUsize>) -> Self {
        BufferFeed { producer, dropped }
    }

    /// Queues a chunk of mono samples for analysis. Returns false, dropping the
    /// chunk, if the queue is full.
    pub fn push(&mut self, samples: Vec<f32>) -> bool {
        match self.producer.push(samples) {
            Ok(()) => true,
            Err(PushError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                trace!(dropped, "queue full, dropped chunk");
                false
            }
        }
    }

    /// True once the engine has released the other end of the queue.
    pub fn is_abandoned(&self) -> bool {
        self.producer.is_abandoned()
    }
}

/// Produces audio for a [`PitchEngine`](crate::PitchEngine), e.g from a
/// microphone, a file or a generator.
pub trait SignalSource: Send {
    /// The sample rate in Hz of the produced samples.
    fn sample_rate(&self) -> f32;

    /// Starts delivering chunks of mono samples to `feed`, in order.
    fn start(&mut self, feed: BufferFeed) -> Result<()>;

    /// Stops delivering chunks. No chunks may be pushed once this returns.
    fn stop(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrb::RingBuffer;

    #[test]
    fn test_full_queue_drops_newest_chunk() {
        let (producer, mut consumer) = RingBuffer::new(2);
        let dropped = Arc::new(AtomicUsize::new(0));
        let mut feed = BufferFeed::new(producer, dropped.clone());

        assert!(feed.push(vec![1.0]));
        assert!(feed.push(vec![2.0]));
        assert!(!feed.push(vec![3.0]));
        assert!(!feed.push(vec![4.0]));
        assert_eq!(dropped.load(Ordering::Relaxed), 2);

        assert_eq!(consumer.pop().ok(), Some(vec![1.0]));
        assert!(feed.push(vec![5.0]));
        assert_eq!(consumer.pop().ok(), Some(vec![2.0]));
        assert_eq!(consumer.pop().ok(), Some(vec![5.0]));
    }

    #[test]
    fn test_abandoned_feed() {
        let (producer, consumer) = RingBuffer::<Vec<f32>>::new(1);
        let feed = BufferFeed::new(producer, Arc::new(AtomicUsize::new(0)));
        assert!(!feed.is_abandoned());
        drop(consumer);
        assert!(feed.is_abandoned());
    }
}
