//! Line grammar: `[Sat Jan 02 20:44:08 2021] payload`.

use std::sync::OnceLock;

use regex::Regex;

/// Bracketed timestamp followed by a single space and the payload.
const LINE_PATTERN: &str =
    r"^\[(\w{3} \w{3} \d{2} \d{2}:\d{2}:\d{2} \d{4})\] (.+)$";

/// A line that matched the grammar, borrowed from the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// Timestamp text without the brackets, e.g. `Sat Jan 02 20:44:08 2021`.
    pub timestamp: &'a str,
    /// Everything after `] `, with a trailing `\r` removed.
    pub payload: &'a str,
}

fn line_regex() -> &'static Regex {
    static LINE_RE: OnceLock<Regex> = OnceLock::new();
    LINE_RE.get_or_init(|| Regex::new(LINE_PATTERN).unwrap())
}

/// Match one complete line against the grammar.
///
/// The trailing `\n` (if the caller left it on) and a single trailing `\r`
/// are stripped before matching. Returns `None` for noise: combat spam,
/// blank lines, or anything whose payload is only whitespace.
pub fn match_line(line: &str) -> Option<RawLine<'_>> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    let caps = line_regex().captures(line)?;
    let timestamp = caps.get(1)?.as_str();
    let payload = caps.get(2)?.as_str();

    if payload.trim().is_empty() {
        return None;
    }

    Some(RawLine { timestamp, payload })
}
