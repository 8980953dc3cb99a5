//! Builder for [`SlackHandler`](super::SlackHandler).
//!
//! Exposes the full configuration surface: endpoint URL, format template
//! with date format and placeholder style, retry budget, pacing tick, and
//! HTTP timeouts.

use std::time::Duration;

use thiserror::Error;

use crate::error::ConfigError;
use crate::formatter::FormatStyle;

use super::{config::WebhookConfig, handler::SlackHandler};

/// Errors that may occur while building a handler.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No webhook URL was configured.
    #[error("webhook URL is required")]
    MissingUrl,
    /// The configured format template is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Builder for constructing [`SlackHandler`] instances.
#[derive(Clone, Debug, Default)]
pub struct SlackHandlerBuilder {
    url: Option<String>,
    template: Option<String>,
    datefmt: Option<String>,
    style: FormatStyle,
    max_retries: Option<u32>,
    tick: Option<Duration>,
    connect_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl SlackHandlerBuilder {
    /// Create a new builder with no URL configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the webhook endpoint URL (required).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the tagged format template. Without one, every record renders
    /// as a single section block holding its message.
    pub fn with_format(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Set the strftime pattern for the `asctime` template attribute.
    pub fn with_datefmt(mut self, datefmt: impl Into<String>) -> Self {
        self.datefmt = Some(datefmt.into());
        self
    }

    /// Set the placeholder style for the template. Defaults to percent.
    pub fn with_style(mut self, style: FormatStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the retry budget for rate-limited payloads.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the pacing tick between consecutive sends.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the write/request timeout.
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = Some(timeout);
        self
    }

    /// Build the handler, validating the URL and the format template.
    ///
    /// # Errors
    ///
    /// [`BuildError::MissingUrl`] when no URL was set;
    /// [`BuildError::Config`] when the template names an invalid tag.
    pub fn build(self) -> Result<SlackHandler, BuildError> {
        let url = self.url.filter(|u| !u.is_empty()).ok_or(BuildError::MissingUrl)?;
        let defaults = WebhookConfig::default();
        let config = WebhookConfig {
            url,
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            tick: self.tick.unwrap_or(defaults.tick),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            write_timeout: self.write_timeout.unwrap_or(defaults.write_timeout),
            warn_interval: defaults.warn_interval,
        };
        let handler = SlackHandler::with_config(config);
        if let Some(template) = &self.template {
            handler.set_format(template, self.datefmt.clone(), self.style)?;
        }
        Ok(handler)
    }
}
