//! Block Kit message assembly.
//!
//! This module turns a tagged format template into ordered layout blocks.
//! A template such as `<header>%(levelname)s</header><section>%(message)s</section>`
//! is split into named segments, each segment's sub-template is expanded
//! against the record, and the results are wrapped in the JSON shapes the
//! Block Kit API expects:
//!
//! ```json
//! {"blocks": [
//!   {"type": "header", "text": {"type": "plain_text", "text": "WARN"}},
//!   {"type": "section", "text": {"type": "mrkdwn", "text": "disk nearly full"}}
//! ]}
//! ```

use serde::Serialize;

pub mod alias;
mod builder;
pub mod parser;
pub mod render;


pub use builder::MessageBuilder;

/// Text formatting mode of a block's text object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    /// Literal text, used by header blocks.
    PlainText,
    /// Markdown text, used by section blocks.
    Mrkdwn,
}

/// The text object carried by header and section blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockText {
    #[serde(rename = "type")]
    pub kind: TextKind,
    pub text: String,
}

impl BlockText {
    /// Plain text content for header blocks.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::PlainText,
            text: text.into(),
        }
    }

    /// Markdown content for section blocks.
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::Mrkdwn,
            text: text.into(),
        }
    }
}

/// One layout block of an outbound message.
///
/// Divider blocks carry no text; header text is always plain, section text
/// always Markdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header { text: BlockText },
    Section { text: BlockText },
    Divider,
}

impl Block {
    pub fn header(text: BlockText) -> Self {
        Self::Header { text }
    }

    pub fn section(text: BlockText) -> Self {
        Self::Section { text }
    }

    pub fn divider() -> Self {
        Self::Divider
    }
}

/// The full outbound message for one log event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub blocks: Vec<Block>,
}
