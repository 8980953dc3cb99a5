//! Configuration errors surfaced synchronously to the caller.

use thiserror::Error;

use crate::blocks::render::VALID_TAGS;

/// Errors raised while installing a message format.
///
/// These indicate a misconfigured template and are never retried; they
/// surface at `set_format` time, before any record reaches the delivery
/// path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The template names a tag outside the valid set.
    #[error("{name} is not a valid tag name; must be one of [{}]", VALID_TAGS.join(", "))]
    InvalidTag { name: String },
    /// The date format contains an unknown strftime directive.
    #[error("{pattern} is not a valid date format")]
    InvalidDateFormat { pattern: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_tag_message_lists_the_valid_set() {
        let err = ConfigError::InvalidTag {
            name: "footer".to_owned(),
        };
        let message = err.to_string();
        assert!(message.contains("footer"));
        assert!(message.contains("header"));
        assert!(message.contains("section"));
        assert!(message.contains("divider"));
        assert!(message.contains("code"));
    }
}
