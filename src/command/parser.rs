//! Splitting free-form model output into discrete commands

use super::CommandBatch;

const FENCE: &str = "```";

/// Split generated text into a [`CommandBatch`].
///
/// Each line is trimmed; blank lines and lines starting with `#` are dropped.
/// When nothing survives, the untouched input becomes a one-command batch so
/// the caller never sees an empty batch.
pub fn parse_commands(raw: &str) -> CommandBatch {
    let commands: Vec<String> = raw
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();

    CommandBatch::new(commands).unwrap_or_else(|| CommandBatch::single(raw))
}

/// Remove one leading and one trailing markdown fence, plus surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    let mut stripped = text.trim();

    if let Some(rest) = stripped.strip_prefix(FENCE) {
        stripped = skip_language_tag(rest);
    }

    if let Some(rest) = stripped.strip_suffix(FENCE) {
        stripped = rest;
    }

    stripped.trim().to_string()
}

/// Drop an info string such as `bash` or `shell` that ends the opening fence line.
fn skip_language_tag(after_fence: &str) -> &str {
    let (first_line, body) = after_fence.split_once('\n').unwrap_or((after_fence, ""));
    let is_tag = first_line
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'));

    if is_tag {
        body
    } else {
        after_fence
    }
}
