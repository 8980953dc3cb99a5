//! Webhook delivery handler.
//!
//! This module defines [`SlackHandler`], a handler that renders
//! [`LogRecord`](crate::log_record::LogRecord) values into Block Kit
//! payloads and forwards them to a webhook endpoint. The consumer thread
//! owns the HTTP client, honours `Retry-After` on rate-limit responses,
//! and paces consecutive sends.
//!
//! # Delivery semantics
//!
//! - **2xx**: success.
//! - **429 (Too Many Requests)**: sleep for the `Retry-After` duration
//!   (fallback: one pacing tick) and retry the same payload, up to the
//!   configured retry budget.
//! - **400, 404, 410, 500, or 429 after exhausting retries**: terminal
//!   delivery error; the payload is dropped and reported through a
//!   rate-limited warning.
//! - **Transport errors** (DNS failure, refused connection): terminal for
//!   that payload; the worker moves on to the next one.
//!
//! Payloads are delivered in strict enqueue order; a payload under retry
//! occupies the worker until its budget is spent, so later payloads never
//! jump ahead.

mod builder;
mod config;
mod handler;
mod worker;

#[cfg(test)]
mod tests;

pub use builder::{BuildError, SlackHandlerBuilder};
pub use config::WebhookConfig;
pub use handler::SlackHandler;
