//! Format installation and per-record message assembly.

use crate::error::ConfigError;
use crate::formatter::{FormatStyle, Formatter, TemplateFormatter, format_exception};
use crate::log_record::LogRecord;

use super::alias::resolve_aliases;
use super::parser::parse_segments;
use super::render::{TagKind, block_for_tag};
use super::{Block, BlockText, Payload};

/// Builds one [`Payload`] per log record from the installed format.
///
/// Holds the ordered segment list produced by the last
/// [`install`](MessageBuilder::install) call. Building is pure and performs
/// no I/O, so it is safe to run on the producer's own thread.
#[derive(Debug)]
pub struct MessageBuilder {
    segments: Vec<(TagKind, TemplateFormatter)>,
}

impl Default for MessageBuilder {
    /// A builder with the implicit single-section default format.
    fn default() -> Self {
        Self {
            segments: vec![(TagKind::Section, TemplateFormatter::default())],
        }
    }
}

impl MessageBuilder {
    /// Install a tagged format template, replacing any previous one.
    ///
    /// Alias resolution and parsing run here, and every segment's tag name
    /// is validated, so a misconfigured template fails at installation
    /// rather than surfacing later in the delivery path. On error the
    /// previously installed format is kept.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidTag`] when the template names a tag outside
    /// the valid set; [`ConfigError::InvalidDateFormat`] when the date
    /// format contains an unknown directive.
    pub fn install(
        &mut self,
        template: &str,
        datefmt: Option<String>,
        style: FormatStyle,
    ) -> Result<(), ConfigError> {
        if let Some(pattern) = &datefmt
            && !crate::formatter::is_valid_date_format(pattern)
        {
            return Err(ConfigError::InvalidDateFormat {
                pattern: pattern.clone(),
            });
        }
        let canonical = resolve_aliases(template);
        let mut segments = Vec::new();
        for raw in parse_segments(&canonical) {
            let kind = TagKind::from_name(&raw.name)?;
            let formatter = TemplateFormatter::new(raw.body, datefmt.clone(), style);
            segments.push((kind, formatter));
        }
        self.segments = segments;
        Ok(())
    }

    /// Build the outbound payload for one record.
    ///
    /// Renders each installed segment in order, then appends the fenced
    /// exception block whenever the record carries failure information,
    /// regardless of the template's content.
    pub fn build(&self, record: &LogRecord) -> Payload {
        let mut blocks: Vec<Block> = self
            .segments
            .iter()
            .map(|(kind, formatter)| block_for_tag(*kind, formatter.format(record)))
            .collect();
        if let Some(exception) = &record.exception {
            blocks.push(Block::section(BlockText::mrkdwn(format_exception(
                exception,
            ))));
        }
        Payload { blocks }
    }

    /// Number of installed segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}
