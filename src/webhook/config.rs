//! Configuration consumed by the webhook handler lifecycle.

use std::time::Duration;

use crate::rate_limited_warner::DEFAULT_WARN_INTERVAL;

/// Default retry budget for rate-limited payloads.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default pacing tick between consecutive sends, also the fallback
/// rate-limit sleep when no `Retry-After` header is usable.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);
/// Default connection timeout applied when establishing HTTP connections.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default write/request timeout applied to HTTP requests.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration object describing how to construct a
/// [`SlackHandler`](super::SlackHandler).
#[derive(Clone, Debug)]
pub struct WebhookConfig {
    /// Webhook endpoint URL (required).
    pub url: String,
    /// Maximum number of re-send attempts for a rate-limited payload.
    pub max_retries: u32,
    /// Delay between processing consecutive payloads.
    pub tick: Duration,
    /// Timeout for establishing connections.
    pub connect_timeout: Duration,
    /// Timeout for sending requests.
    pub write_timeout: Duration,
    /// Interval between rate-limited drop warnings.
    pub warn_interval: Duration,
}

impl WebhookConfig {
    /// Configuration for `url` with every other field at its default.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            tick: DEFAULT_TICK,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            warn_interval: DEFAULT_WARN_INTERVAL,
        }
    }
}
