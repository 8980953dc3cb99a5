//! Template expansion for log records.
//!
//! Provides the [`Formatter`] trait alongside [`TemplateFormatter`], which
//! expands named placeholders against a record's attributes. Three
//! placeholder styles are recognised, selected by [`FormatStyle`]:
//!
//! - **Percent** (default): `%(levelname)s: %(message)s`
//! - **Brace**: `{levelname}: {message}`
//! - **Dollar**: `$levelname: ${message}`
//!
//! Unknown placeholders pass through verbatim rather than erroring; the
//! attribute set is fixed and listed on [`TemplateFormatter`].

use std::str::FromStr;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::log_record::LogRecord;

mod exception;

pub use exception::format_exception;

/// Default template applied when no format is installed.
pub const DEFAULT_TEMPLATE: &str = "%(message)s";
/// Default strftime pattern for the `asctime` attribute.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trait for formatting log records into strings.
///
/// Implementors must be thread-safe (`Send + Sync`) so formatters can be
/// shared with the consumer thread.
pub trait Formatter: Send + Sync {
    /// Format a log record into a string representation.
    fn format(&self, record: &LogRecord) -> String;
}

/// Placeholder syntax used by a template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatStyle {
    /// `%(name)s` placeholders.
    #[default]
    Percent,
    /// `{name}` placeholders.
    Brace,
    /// `$name` / `${name}` placeholders.
    Dollar,
}

impl FromStr for FormatStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "%" => Ok(Self::Percent),
            "{" => Ok(Self::Brace),
            "$" => Ok(Self::Dollar),
            _ => Err(()),
        }
    }
}

/// Formatter expanding a textual template against record attributes.
///
/// Recognised attributes: `name`, `levelname`, `levelno`, `message`,
/// `asctime`, `filename`, `lineno`, `module`.
#[derive(Clone, Debug)]
pub struct TemplateFormatter {
    template: String,
    datefmt: Option<String>,
    style: FormatStyle,
}

impl TemplateFormatter {
    /// Create a formatter from a template, optional date format, and style.
    pub fn new(template: impl Into<String>, datefmt: Option<String>, style: FormatStyle) -> Self {
        Self {
            template: template.into(),
            datefmt,
            style,
        }
    }

    /// Whether the template references the `asctime` attribute.
    pub fn uses_time(&self) -> bool {
        self.template.contains("asctime")
    }

    fn attribute(&self, record: &LogRecord, key: &str) -> Option<String> {
        match key {
            "name" => Some(record.logger.clone()),
            "levelname" => Some(record.level.as_str().to_owned()),
            "levelno" => Some(record.level.number().to_string()),
            "message" => Some(record.message.clone()),
            "asctime" => Some(format_timestamp(
                record.metadata.timestamp,
                self.datefmt.as_deref(),
            )),
            "filename" => Some(record.metadata.filename.clone()),
            "lineno" => Some(record.metadata.line_number.to_string()),
            "module" => Some(record.metadata.module_path.clone()),
            _ => None,
        }
    }
}

impl Default for TemplateFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE, None, FormatStyle::Percent)
    }
}

impl Formatter for TemplateFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let lookup = |key: &str| self.attribute(record, key);
        match self.style {
            FormatStyle::Percent => expand_percent(&self.template, lookup),
            FormatStyle::Brace => expand_brace(&self.template, lookup),
            FormatStyle::Dollar => expand_dollar(&self.template, lookup),
        }
    }
}

/// Check a strftime pattern for unknown directives.
pub(crate) fn is_valid_date_format(pattern: &str) -> bool {
    use chrono::format::{Item, StrftimeItems};
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Render a timestamp with the supplied strftime pattern.
///
/// Formats installed through `MessageBuilder` are validated up front, but
/// `TemplateFormatter` can be constructed directly with any pattern, so an
/// unknown directive falls back to the default pattern instead of
/// panicking in the render path.
fn format_timestamp(timestamp: SystemTime, datefmt: Option<&str>) -> String {
    use std::fmt::Write;

    let local: DateTime<Local> = timestamp.into();
    if let Some(pattern) = datefmt {
        let mut out = String::new();
        if write!(out, "{}", local.format(pattern)).is_ok() {
            return out;
        }
    }
    local.format(DEFAULT_DATE_FORMAT).to_string()
}

/// Expand `%(name)s` placeholders. `%%` escapes a literal percent sign.
fn expand_percent(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if let Some(stripped) = tail.strip_prefix('%') {
            out.push('%');
            rest = stripped;
        } else if let Some(inner) = tail.strip_prefix('(')
            && let Some(end) = inner.find(')')
            && inner[end + 1..].starts_with(['s', 'd'])
        {
            let key = &inner[..end];
            match lookup(key) {
                Some(value) => out.push_str(&value),
                // Unknown attribute: keep the token verbatim.
                None => out.push_str(&rest[pos..pos + key.len() + 4]),
            }
            rest = &inner[end + 2..];
        } else {
            out.push('%');
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}

/// Expand `{name}` placeholders. `{{` and `}}` escape literal braces.
fn expand_brace(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let Some(pos) = rest.find(['{', '}']) else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if rest.as_bytes()[pos] == b'}' {
            // A lone or doubled closing brace stays literal.
            out.push('}');
            rest = tail.strip_prefix('}').unwrap_or(tail);
            continue;
        }
        if let Some(stripped) = tail.strip_prefix('{') {
            out.push('{');
            rest = stripped;
        } else if let Some(end) = tail.find('}') {
            let key = &tail[..end];
            match lookup(key) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[pos..pos + key.len() + 2]),
            }
            rest = &tail[end + 1..];
        } else {
            out.push('{');
            rest = tail;
        }
    }
}

/// Expand `$name` and `${name}` placeholders. `$$` escapes a literal dollar.
fn expand_dollar(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if let Some(stripped) = tail.strip_prefix('$') {
            out.push('$');
            rest = stripped;
        } else if let Some(inner) = tail.strip_prefix('{')
            && let Some(end) = inner.find('}')
        {
            let key = &inner[..end];
            match lookup(key) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[pos..pos + key.len() + 3]),
            }
            rest = &inner[end + 1..];
        } else {
            let end = tail
                .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
                .unwrap_or(tail.len());
            let key = &tail[..end];
            match lookup(key) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[pos..pos + key.len() + 1]),
            }
            rest = &tail[end..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use rstest::rstest;

    fn sample_record() -> LogRecord {
        LogRecord::new("app.worker", Level::Warn, "disk nearly full")
    }

    #[rstest]
    #[case(FormatStyle::Percent, "%(levelname)s: %(message)s")]
    #[case(FormatStyle::Brace, "{levelname}: {message}")]
    #[case(FormatStyle::Dollar, "$levelname: ${message}")]
    fn expands_each_style(#[case] style: FormatStyle, #[case] template: &str) {
        let formatter = TemplateFormatter::new(template, None, style);
        assert_eq!(formatter.format(&sample_record()), "WARN: disk nearly full");
    }

    #[test]
    fn default_template_renders_the_message_alone() {
        let formatter = TemplateFormatter::default();
        assert_eq!(formatter.format(&sample_record()), "disk nearly full");
    }

    #[test]
    fn levelno_expands_numerically() {
        let formatter =
            TemplateFormatter::new("%(levelno)d %(name)s", None, FormatStyle::Percent);
        assert_eq!(formatter.format(&sample_record()), "30 app.worker");
    }

    #[test]
    fn unknown_attributes_pass_through_verbatim() {
        let formatter = TemplateFormatter::new("%(custom)s ok", None, FormatStyle::Percent);
        assert_eq!(formatter.format(&sample_record()), "%(custom)s ok");
        let formatter = TemplateFormatter::new("{custom} ok", None, FormatStyle::Brace);
        assert_eq!(formatter.format(&sample_record()), "{custom} ok");
    }

    #[rstest]
    #[case(FormatStyle::Percent, "100%% done", "100% done")]
    #[case(FormatStyle::Brace, "{{literal}}", "{literal}")]
    #[case(FormatStyle::Dollar, "$$5", "$5")]
    fn escapes_each_style(
        #[case] style: FormatStyle,
        #[case] template: &str,
        #[case] expected: &str,
    ) {
        let formatter = TemplateFormatter::new(template, None, style);
        assert_eq!(formatter.format(&sample_record()), expected);
    }

    #[test]
    fn asctime_uses_the_configured_date_format() {
        let formatter = TemplateFormatter::new(
            "%(asctime)s",
            Some("%Y".to_owned()),
            FormatStyle::Percent,
        );
        let rendered = formatter.format(&sample_record());
        assert_eq!(rendered.len(), 4);
        assert!(rendered.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn unknown_date_directive_falls_back_to_the_default_pattern() {
        let record = sample_record();
        let bad = TemplateFormatter::new("%(asctime)s", Some("%Q".to_owned()), FormatStyle::Percent);
        let default = TemplateFormatter::new("%(asctime)s", None, FormatStyle::Percent);
        assert_eq!(bad.format(&record), default.format(&record));
    }

    #[test]
    fn date_format_validation_rejects_unknown_directives() {
        assert!(is_valid_date_format("%Y-%m-%d %H:%M:%S"));
        assert!(is_valid_date_format(""));
        assert!(!is_valid_date_format("%Q"));
    }

    #[test]
    fn uses_time_detects_asctime() {
        assert!(TemplateFormatter::new("%(asctime)s", None, FormatStyle::Percent).uses_time());
        assert!(!TemplateFormatter::default().uses_time());
    }

    #[test]
    fn style_parses_from_symbol() {
        assert_eq!("%".parse::<FormatStyle>(), Ok(FormatStyle::Percent));
        assert_eq!("{".parse::<FormatStyle>(), Ok(FormatStyle::Brace));
        assert_eq!("$".parse::<FormatStyle>(), Ok(FormatStyle::Dollar));
        assert!("!".parse::<FormatStyle>().is_err());
    }
}
