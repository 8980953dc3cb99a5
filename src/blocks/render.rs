//! Per-tag rendering rules mapping segments to layout blocks.

use crate::error::ConfigError;

use super::{Block, BlockText};

/// The fixed set of valid tag names, in declaration order.
pub const VALID_TAGS: [&str; 4] = ["header", "section", "divider", "code"];

/// A validated tag name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagKind {
    Header,
    Section,
    Divider,
    Code,
}

impl TagKind {
    /// Validate a tag name against the fixed valid set.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidTag`] naming the offending tag; the error text
    /// lists every valid name.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "header" => Ok(Self::Header),
            "section" => Ok(Self::Section),
            "divider" => Ok(Self::Divider),
            "code" => Ok(Self::Code),
            _ => Err(ConfigError::InvalidTag {
                name: name.to_owned(),
            }),
        }
    }
}

/// Produce the layout block for a rendered segment.
///
/// Header text is plain, section text is Markdown, code text is Markdown
/// wrapped in single backticks, and dividers discard their rendered body.
pub fn block_for_tag(kind: TagKind, text: String) -> Block {
    match kind {
        TagKind::Header => Block::header(BlockText::plain(text)),
        TagKind::Section => Block::section(BlockText::mrkdwn(text)),
        TagKind::Code => Block::section(BlockText::mrkdwn(format!("`{text}`"))),
        TagKind::Divider => Block::divider(),
    }
}
