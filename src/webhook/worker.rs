//! Worker thread driving webhook I/O.
//!
//! The worker blocks on the command channel (the delivery queue), posts
//! each payload through a pooled ureq Agent, and sleeps one pacing tick
//! between payloads. Rate-limit retries happen in place, so the queue
//! stays strictly FIFO.

use std::{
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, SendError, Sender, TryRecvError, bounded, unbounded};
use log::warn;
use ureq::{Agent, AgentBuilder};

use crate::{blocks::Payload, handler::HandlerError, rate_limited_warner::RateLimitedWarner};

use super::config::WebhookConfig;

/// Statuses reported as terminal delivery errors when still present after
/// the retry budget is spent.
const TERMINAL_STATUSES: [u16; 5] = [400, 404, 410, 429, 500];

/// Commands processed by the worker thread.
#[derive(Debug)]
pub enum Command {
    Payload(Payload),
    Flush(Sender<()>),
    Shutdown(Sender<()>),
}

/// Spawns a background worker thread to deliver payloads.
///
/// Returns a sender for submitting [`Command`]s (the producer side of the
/// queue; sends never block) and the join handle for the spawned thread.
pub fn spawn_worker(config: WebhookConfig) -> (Sender<Command>, thread::JoinHandle<()>) {
    let (tx, rx) = unbounded();
    let handle = thread::spawn(move || Worker::new(config).run(rx));
    (tx, handle)
}

struct Worker {
    config: WebhookConfig,
    agent: Agent,
    warner: RateLimitedWarner,
}

impl Worker {
    fn new(config: WebhookConfig) -> Self {
        let agent = AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout(config.write_timeout)
            .build();
        let warner = RateLimitedWarner::new(config.warn_interval);
        Self {
            config,
            agent,
            warner,
        }
    }

    fn run(mut self, rx: Receiver<Command>) {
        loop {
            match rx.recv() {
                Ok(Command::Payload(payload)) => self.handle_payload(payload),
                Ok(Command::Flush(ack)) => {
                    let _ = ack.send(());
                }
                Ok(Command::Shutdown(ack)) => {
                    self.drain_pending(&rx);
                    let _ = ack.send(());
                    break;
                }
                Err(_) => {
                    self.drain_pending(&rx);
                    break;
                }
            }
        }
    }

    /// Deliver already-queued payloads before exiting. Shutdown is
    /// cooperative: in-flight retries run to completion.
    fn drain_pending(&mut self, rx: &Receiver<Command>) {
        loop {
            match rx.try_recv() {
                Ok(Command::Payload(payload)) => self.handle_payload(payload),
                Ok(Command::Flush(ack)) => {
                    let _ = ack.send(());
                }
                Ok(Command::Shutdown(ack)) => {
                    let _ = ack.send(());
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn handle_payload(&mut self, payload: Payload) {
        match serde_json::to_string(&payload) {
            Ok(body) => self.send_with_retries(&body),
            Err(err) => {
                warn!("SlackHandler serialisation error: {err}");
                self.record_drop("serialisation failures");
            }
        }
        // Pacing: throttle outbound request rate regardless of remote
        // backoff headers. Applied per payload, success or failure.
        thread::sleep(self.config.tick);
    }

    fn send_with_retries(&mut self, body: &str) {
        let mut response = match self.post(body) {
            Ok(response) => response,
            Err(err) => {
                warn!("SlackHandler transport error: {err}");
                self.record_drop("transport errors");
                return;
            }
        };

        let mut attempts = 0;
        while response.status() == 429 && attempts < self.config.max_retries {
            attempts += 1;
            thread::sleep(retry_after(&response).unwrap_or(self.config.tick));
            response = match self.post(body) {
                Ok(response) => response,
                Err(err) => {
                    warn!("SlackHandler transport error during retry: {err}");
                    self.record_drop("transport errors");
                    return;
                }
            };
        }

        let status = response.status();
        if TERMINAL_STATUSES.contains(&status) {
            warn!("SlackHandler delivery failed with status {status}, dropping payload");
            self.record_drop("delivery errors");
        }
    }

    /// POST the payload, folding HTTP error statuses into the response so
    /// the caller can inspect status and headers uniformly.
    fn post(&self, body: &str) -> Result<ureq::Response, String> {
        let result = self
            .agent
            .post(&self.config.url)
            .set("Content-Type", "application/json")
            .send_string(body);
        match result {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(_, response)) => Ok(response),
            Err(ureq::Error::Transport(transport_err)) => Err(transport_err.to_string()),
        }
    }

    fn record_drop(&self, reason: &str) {
        self.warner.record_drop();
        self.warner
            .warn_if_due(|count| warn!("SlackHandler dropped {count} payloads due to {reason}"));
    }
}

/// Parse a `Retry-After` header as whole seconds.
fn retry_after(response: &ureq::Response) -> Option<Duration> {
    response
        .header("Retry-After")?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Enqueues a payload for delivery by the worker.
///
/// The queue is unbounded, so this never blocks and only fails once the
/// worker has shut down (the payload is then dropped and the drop is
/// reported through `warner`).
pub fn enqueue_payload(
    tx: &Sender<Command>,
    payload: Payload,
    warner: &RateLimitedWarner,
) -> Result<(), HandlerError> {
    match tx.send(Command::Payload(payload)) {
        Ok(()) => Ok(()),
        Err(SendError(_)) => {
            warner.record_drop();
            warner.warn_if_due(|count| {
                warn!("SlackHandler disconnected; dropped {count} payloads");
            });
            Err(HandlerError::Closed)
        }
    }
}

/// Sends a flush command to the worker and waits for acknowledgment.
///
/// The flush command queues behind every previously enqueued payload, so a
/// `true` return means those payloads have been handed to the transport.
/// Uses a deadline so the total wait never exceeds `timeout`.
pub fn flush_queue(tx: &Sender<Command>, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    let (ack_tx, ack_rx) = bounded(1);
    if tx.send(Command::Flush(ack_tx)).is_err() {
        return false;
    }
    let remaining = deadline.saturating_duration_since(Instant::now());
    ack_rx.recv_timeout(remaining).is_ok()
}
