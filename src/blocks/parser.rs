//! Flat single-pass scan over `<tag>body</tag>` spans.
//!
//! The grammar is deliberately restricted: a span ends at the first
//! matching close tag, nesting is unsupported, and malformed markup
//! (missing close, mismatched name) is treated as plain literal text. Tag
//! names here are any ASCII-alphabetic token; validity against the fixed
//! tag set is checked when the format is installed, never silently here.

/// One named layout segment split out of a format template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawSegment {
    /// The tag name as written in the template.
    pub name: String,
    /// The sub-template between the opening and closing tags.
    pub body: String,
}

/// Split a canonical template into ordered segments.
///
/// A template with no complete tag span becomes a single implicit
/// `section` segment holding the whole string, preserving untagged
/// templates as plain one-block messages. Once at least one span matches,
/// text outside the spans is ignored.
pub fn parse_segments(template: &str) -> Vec<RawSegment> {
    let mut segments = Vec::new();
    let mut rest = template;
    while let Some((segment, remainder)) = next_segment(rest) {
        segments.push(segment);
        rest = remainder;
    }
    if segments.is_empty() {
        segments.push(RawSegment {
            name: "section".to_owned(),
            body: template.to_owned(),
        });
    }
    segments
}

/// Find the next complete `<name>body</name>` span, returning it together
/// with the text that follows.
fn next_segment(input: &str) -> Option<(RawSegment, &str)> {
    let mut search = input;
    while let Some(pos) = search.find('<') {
        if let Some((name, after_open)) = read_tag_name(&search[pos + 1..]) {
            let close = format!("</{name}>");
            // First close tag wins; nested same-named spans are out of scope.
            if let Some(end) = after_open.find(&close) {
                let segment = RawSegment {
                    name: name.to_owned(),
                    body: after_open[..end].to_owned(),
                };
                return Some((segment, &after_open[end + close.len()..]));
            }
        }
        search = &search[pos + 1..];
    }
    None
}

/// Read an ASCII-alphabetic tag name up to the closing `>`.
fn read_tag_name(input: &str) -> Option<(&str, &str)> {
    let end = input.find('>')?;
    let name = &input[..end];
    if !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphabetic()) {
        Some((name, &input[end + 1..]))
    } else {
        None
    }
}
