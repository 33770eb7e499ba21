use super::Pitch;
use crate::error::Result;

/// Receives the outcome of every analyzed window: a [`Pitch`] or the
/// reason no pitch could be reported.
///
/// The engine calls the sink from its worker thread. Sinks that need results
/// on a particular thread must forward them there themselves.
pub trait ResultSink: Send {
    fn on_result(&mut self, result: Result<Pitch>);
}

impl<F> ResultSink for F
where
    F: FnMut(Result<Pitch>) + Send,
{
    fn on_result(&mut self, result: Result<Pitch>) {
        self(result)
    }
}
