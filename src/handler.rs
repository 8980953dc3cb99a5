use thiserror::Error;

use crate::log_record::LogRecord;

/// Errors surfaced to producers when dispatching a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandlerError {
    /// The handler has been closed; the record was dropped.
    #[error("handler is closed")]
    Closed,
}

/// Trait implemented by log handlers.
///
/// Handlers are `Send + Sync` so they can be invoked from multiple
/// producer threads. Implementations forward the record to their own
/// consumer thread without blocking the caller.
pub trait Handler: Send + Sync {
    /// Dispatch a log record for handling.
    fn handle(&self, record: LogRecord) -> Result<(), HandlerError>;

    /// Block until previously dispatched records have been handed to the
    /// transport, or the handler's flush timeout elapses.
    ///
    /// Returns `true` when the flush was acknowledged in time.
    fn flush(&self) -> bool {
        true
    }
}
