use std::sync::OnceLock;

use regex::Regex;

/// `🏁 value` — flag glyph with a bare directive token.
pub(crate) fn simple_directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"🏁\s+([^\s{]+)").unwrap())
}

/// `🏁 {` — flag glyph opening a JSON payload. The payload end is found by
/// brace-depth scanning, not by the regex.
pub(crate) fn json_directive_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"🏁\s*\{").unwrap())
}

/// `[onCompletion:: value]` — dataview inline field, key case-insensitive.
pub(crate) fn dataview_directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\[onCompletion::\s*([^\]]*)\]").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn checkbox_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*[-*+]\s*)\[[^\]]*\](\s*)").unwrap())
}

/// Scan forward from the `{` at `open` and return the byte index of its
/// matching close brace, counting nested pairs. None if the text ends first.
pub(crate) fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Remove every on-completion directive from a task line.
///
/// Handles all three notations: `🏁 token`, `🏁 {json...}` (nested braces
/// included), and `[onCompletion:: value]`. A JSON payload with no balanced
/// close brace loses only the flag-and-open-brace span; the remainder of the
/// line is left intact. Whitespace opened up by the removals is collapsed to
/// single spaces. Idempotent: a second pass finds nothing left to remove.
pub fn strip_on_completion(text: &str) -> String {
    let mut cleaned = simple_directive_re().replace_all(text, "").into_owned();

    while let Some(m) = json_directive_start_re().find(&cleaned) {
        // The match ends on the `{` (one byte).
        let (start, open) = (m.start(), m.end() - 1);
        match matching_brace(&cleaned, open) {
            Some(close) => cleaned.replace_range(start..=close, ""),
            None => cleaned.replace_range(start..=open, ""),
        }
    }

    let cleaned = dataview_directive_re().replace_all(&cleaned, "");
    whitespace_re()
        .replace_all(&cleaned, " ")
        .trim()
        .to_string()
}

/// Force the line's checkbox marker to the completed form `[x]`.
///
/// Only the leading checkbox is touched (bullet and spacing preserved); a
/// line with no checkbox syntax comes back unchanged.
pub fn force_completed(text: &str) -> String {
    checkbox_re().replace(text, "${1}[x]${2}").into_owned()
}
