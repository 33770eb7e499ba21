use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rtrb::RingBuffer;
use tracing::{debug, info, warn};

use super::{BufferFeed, Config, PitchDetector, ResultSink, SignalSource};
use crate::error::{PitchError, Result};

/// How long the worker sleeps when the queue is empty.
const POLL_INTERVAL: Duration = Duration::from_millis(2);

struct Worker {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn join(self) {
        self.running.store(false, Ordering::Release);
        if self.handle.join().is_err() {
            warn!("pitch engine worker panicked");
        }
    }
}

/// Streams audio from a [`SignalSource`] through a [`PitchDetector`] running
/// on a dedicated worker thread, delivering one result per analyzed window to
/// a [`ResultSink`].
///
/// Chunks are analyzed one at a time in delivery order. The source hands
/// chunks over through a bounded lock free queue; chunks arriving while the
/// queue is full are dropped and counted, see [`PitchEngine::dropped_chunks`].
///
/// ```no_run
/// use micro_tuner::{Config, Pitch, PitchEngine, Result, SimulatedSource};
///
/// let config = Config::default();
/// let source = SimulatedSource::new(44100.0, config.buffer_size, vec![261.63, 329.63, 392.0]);
/// let sink = |result: Result<Pitch>| println!("{:?}", result);
/// let mut engine = PitchEngine::new(config, Box::new(source), sink)?;
/// engine.start()?;
/// std::thread::sleep(std::time::Duration::from_millis(100));
/// engine.stop();
/// # Ok::<(), micro_tuner::PitchError>(())
/// ```
pub struct PitchEngine {
    config: Config,
    source: Box<dyn SignalSource>,
    sink: Arc<Mutex<Box<dyn ResultSink>>>,
    worker: Option<Worker>,
    dropped_chunks: Arc<AtomicUsize>,
}

impl PitchEngine {
    /// Creates an idle engine. Fails if `config` is invalid.
    pub fn new<S>(config: Config, source: Box<dyn SignalSource>, sink: S) -> Result<Self>
    where
        S: ResultSink + 'static,
    {
        config.validate()?;
        Ok(PitchEngine {
            config,
            source,
            sink: Arc::new(Mutex::new(Box::new(sink))),
            worker: None,
            dropped_chunks: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether the worker is alive. Becomes false after [`PitchEngine::stop`]
    /// and once the worker has drained the queue of a source that closed its
    /// feed.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map_or(false, |worker| worker.running.load(Ordering::Acquire))
    }

    /// The number of chunks dropped because the queue was full, over the
    /// lifetime of the engine.
    pub fn dropped_chunks(&self) -> usize {
        self.dropped_chunks.load(Ordering::Relaxed)
    }

    /// Spawns the worker and arms the signal source.
    ///
    /// Returns [`PitchError::AlreadyRunning`] if the engine is running, see
    /// [`PitchEngine::is_running`].
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(PitchError::AlreadyRunning);
        }
        // Reap a worker that finished on its own.
        self.stop();

        let sample_rate = self.source.sample_rate();
        let mut detector = PitchDetector::new(sample_rate, &self.config)?;
        let (producer, mut consumer) = RingBuffer::<Vec<f32>>::new(self.config.queue_capacity);

        let running = Arc::new(AtomicBool::new(true));
        let worker_running = running.clone();
        let sink = self.sink.clone();
        let handle = thread::Builder::new()
            .name("pitch-engine".to_string())
            .spawn(move || {
                while worker_running.load(Ordering::Acquire) {
                    match consumer.pop() {
                        Ok(chunk) => {
                            let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
                            detector.process(&chunk, |result| sink.on_result(result));
                        }
                        // The source may have pushed its last chunk between the
                        // failed pop and this check.
                        Err(_) if consumer.is_abandoned() => {
                            if consumer.is_empty() {
                                debug!("signal source closed its feed");
                                break;
                            }
                        }
                        Err(_) => thread::sleep(POLL_INTERVAL),
                    }
                }
                worker_running.store(false, Ordering::Release);
            })
            .map_err(|error| PitchError::Spawn(error.to_string()))?;
        let worker = Worker { running, handle };

        let feed = BufferFeed::new(producer, self.dropped_chunks.clone());
        if let Err(error) = self.source.start(feed) {
            warn!(%error, "failed to start signal source");
            worker.join();
            return Err(error);
        }

        self.worker = Some(worker);
        info!(
            sample_rate,
            buffer_size = self.config.buffer_size,
            hop_size = self.config.hop_size(),
            strategy = ?self.config.strategy,
            "pitch engine started"
        );
        Ok(())
    }

    /// Disarms the signal source and waits for the worker to finish the chunk
    /// it is analyzing. The sink is not invoked after this returns.
    ///
    /// Stopping an idle engine does nothing. Must not be called from within
    /// the sink.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.running.store(false, Ordering::Release);
            self.source.stop();
            worker.join();
            info!(dropped_chunks = self.dropped_chunks(), "pitch engine stopped");
        }
    }
}

impl Drop for PitchEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
