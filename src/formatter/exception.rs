//! Fenced rendering of failure information.

use crate::log_record::ExceptionInfo;

/// Render failure information as a Markdown fenced code block.
///
/// Produces the exception text followed by the stack trace on its own line
/// when one is present, wrapped in triple-backtick fences.
pub fn format_exception(exception: &ExceptionInfo) -> String {
    let mut out = String::from("```");
    out.push_str(&exception.text);
    if let Some(stack) = &exception.stack {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(stack);
    }
    out.push_str("\n```");
    out
}
