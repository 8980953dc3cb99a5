//! Public handler type exported by the crate.

use std::{thread, time::Duration};

use parking_lot::{Mutex, RwLock};

use crate::{
    blocks::MessageBuilder,
    error::ConfigError,
    formatter::FormatStyle,
    handler::{Handler, HandlerError},
    log_record::LogRecord,
    rate_limited_warner::RateLimitedWarner,
};

use super::{
    config::WebhookConfig,
    worker::{Command, enqueue_payload, flush_queue, spawn_worker},
};

/// Handler forwarding log records to a webhook endpoint as Block Kit
/// messages.
///
/// Records are turned into payloads on the caller's thread (pure, no I/O)
/// and queued for a single consumer thread that performs the network work.
/// `handle` therefore never blocks; all sleeps and retries live on the
/// worker.
pub struct SlackHandler {
    tx: Option<crossbeam_channel::Sender<Command>>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
    builder: RwLock<MessageBuilder>,
    warner: RateLimitedWarner,
    /// Timeout for flush and shutdown operations.
    ///
    /// Derived from `write_timeout` in the configuration: a flush or
    /// graceful shutdown should complete within the same time bounds as a
    /// single HTTP request.
    flush_timeout: Duration,
}

impl SlackHandler {
    /// Construct a handler posting to `url` with default configuration.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_config(WebhookConfig::for_url(url))
    }

    /// Construct the handler from a configuration object.
    pub fn with_config(config: WebhookConfig) -> Self {
        let flush_timeout = config.write_timeout;
        let warner = RateLimitedWarner::new(config.warn_interval);
        let (tx, handle) = spawn_worker(config);
        Self {
            tx: Some(tx),
            handle: Mutex::new(Some(handle)),
            builder: RwLock::new(MessageBuilder::default()),
            warner,
            flush_timeout,
        }
    }

    /// Install a tagged format template, replacing the previous one.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidTag`] when the template names a tag outside
    /// the valid set; the previously installed format stays in effect.
    pub fn set_format(
        &self,
        template: &str,
        datefmt: Option<String>,
        style: FormatStyle,
    ) -> Result<(), ConfigError> {
        self.builder.write().install(template, datefmt, style)
    }

    /// Flush pending payloads, waiting up to the flush timeout.
    pub fn flush(&self) -> bool {
        <Self as Handler>::flush(self)
    }

    /// Close the handler and wait for the worker to exit.
    ///
    /// Already-queued payloads are still delivered; the worker drains the
    /// queue before exiting.
    pub fn close(&mut self) {
        self.request_shutdown();
        self.join_worker();
    }

    fn sender(&self) -> Option<crossbeam_channel::Sender<Command>> {
        self.tx.as_ref().cloned()
    }

    fn request_shutdown(&mut self) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        let (ack_tx, ack_rx) = crossbeam_channel::bounded(1);
        if tx.send(Command::Shutdown(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.recv_timeout(self.flush_timeout);
    }

    fn join_worker(&mut self) {
        let Some(handle) = self.handle.lock().take() else {
            return;
        };
        if handle.join().is_err() {
            log::warn!("SlackHandler: worker thread panicked");
        }
    }
}

impl Handler for SlackHandler {
    fn handle(&self, record: LogRecord) -> Result<(), HandlerError> {
        let payload = self.builder.read().build(&record);
        let Some(tx) = self.sender() else {
            self.warner.record_drop();
            self.warner.warn_if_due(|count| {
                log::warn!("SlackHandler dropped {count} payloads after shutdown");
            });
            return Err(HandlerError::Closed);
        };
        enqueue_payload(&tx, payload, &self.warner)
    }

    fn flush(&self) -> bool {
        let Some(tx) = self.sender() else {
            return false;
        };
        self.warner.flush(|count| {
            log::warn!("SlackHandler dropped {count} payloads in the last interval");
        });
        flush_queue(&tx, self.flush_timeout)
    }
}

impl Drop for SlackHandler {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for SlackHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackHandler")
            .field("flush_timeout", &self.flush_timeout)
            .finish()
    }
}
