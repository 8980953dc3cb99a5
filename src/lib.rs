//! blockhook: a log handler that posts Block Kit messages to a webhook.
//!
//! Log records are rendered through a tagged format template into ordered
//! layout blocks and delivered asynchronously by a dedicated consumer
//! thread. Producers never block on network I/O; delivery is best effort
//! and does not survive process restart.
//!
//! ```no_run
//! use blockhook::{Handler, Level, LogRecord, SlackHandlerBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let handler = SlackHandlerBuilder::new()
//!     .with_url("https://hooks.slack.com/services/T000/B000/XXXX")
//!     .with_format("<header>%(levelname)s</header><section>%(message)s</section>")
//!     .build()?;
//! handler.handle(LogRecord::new("app", Level::Warn, "disk nearly full"))?;
//! # Ok(())
//! # }
//! ```

pub mod blocks;
mod error;
pub mod formatter;
mod handler;
mod level;
mod log_record;
mod rate_limited_warner;
pub mod webhook;

pub use blocks::{Block, BlockText, MessageBuilder, Payload, TextKind};
pub use error::ConfigError;
pub use formatter::{FormatStyle, Formatter, TemplateFormatter};
pub use handler::{Handler, HandlerError};
pub use level::Level;
pub use log_record::{ExceptionInfo, LogRecord, RecordMetadata};
pub use rate_limited_warner::RateLimitedWarner;
pub use webhook::{BuildError, SlackHandler, SlackHandlerBuilder, WebhookConfig};
