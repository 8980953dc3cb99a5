//! Log record representation consumed by the handler.
//!
//! [`LogRecord`] captures one log event together with the contextual
//! metadata the template formatter can reference: source location and
//! creation time. Failure information travels as preformatted text; this
//! crate never inspects or rebuilds tracebacks itself.

use std::time::SystemTime;

use crate::level::Level;

/// Additional context associated with a log record.
#[derive(Clone, Debug)]
pub struct RecordMetadata {
    /// Module path where the log call originated.
    pub module_path: String,
    /// Source file name for the log call.
    pub filename: String,
    /// Line number in the source file.
    pub line_number: u32,
    /// Time the record was created.
    pub timestamp: SystemTime,
}

impl Default for RecordMetadata {
    fn default() -> Self {
        Self {
            module_path: String::new(),
            filename: String::new(),
            line_number: 0,
            timestamp: SystemTime::now(),
        }
    }
}

/// Preformatted failure information attached to a record.
///
/// `text` is the formatted exception (type, message, traceback); `stack` is
/// the optional formatted stack trace captured at the call site.
#[derive(Clone, Debug)]
pub struct ExceptionInfo {
    pub text: String,
    pub stack: Option<String>,
}

impl ExceptionInfo {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// A single log event flowing through the handler.
#[derive(Clone, Debug)]
pub struct LogRecord {
    /// Name of the logger that created this record.
    pub logger: String,
    /// Severity of the record.
    pub level: Level,
    /// The rendered log message content.
    pub message: String,
    /// Contextual metadata for the record.
    pub metadata: RecordMetadata,
    /// Failure information, when the event carries one.
    pub exception: Option<ExceptionInfo>,
}

impl LogRecord {
    /// Construct a new log record from logger `name`, `level`, and `message`.
    pub fn new(logger: &str, level: Level, message: &str) -> Self {
        Self {
            logger: logger.to_owned(),
            level,
            message: message.to_owned(),
            metadata: RecordMetadata::default(),
            exception: None,
        }
    }

    /// Construct a log record with explicit source location metadata.
    ///
    /// The timestamp is always captured at construction time, overriding
    /// whatever the supplied metadata carries.
    pub fn with_metadata(
        logger: &str,
        level: Level,
        message: &str,
        mut metadata: RecordMetadata,
    ) -> Self {
        metadata.timestamp = SystemTime::now();
        Self {
            logger: logger.to_owned(),
            level,
            message: message.to_owned(),
            metadata,
            exception: None,
        }
    }

    /// Attach failure information to the record.
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }
}
