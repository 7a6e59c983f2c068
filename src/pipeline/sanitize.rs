//! Text cleanup shared by the archive and plain-text strategies.
//!
//! Legacy documents routinely contain bytes that are legal in a text file
//! but illegal in XML 1.0 (NUL, form feed, vertical tab, …). Writing them
//! into `word/document.xml` produces a file Word refuses to open, so they
//! are dropped before any paragraph is built.
//!
//! ## Rule Order
//!
//! Control characters go first so a stray `\x0b` between `\r` and `\n`
//! cannot prevent the CRLF pair from collapsing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Remove XML-breaking control characters, then normalise line endings.
pub fn sanitize_text(input: &str) -> String {
    let s = remove_control_chars(input);
    normalise_line_endings(&s)
}

/// Split sanitized text into paragraph lines.
///
/// Besides `\n` (and any `\r` left unsanitized), NEL (U+0085), LINE
/// SEPARATOR (U+2028) and PARAGRAPH SEPARATOR (U+2029) break lines; NEL is
/// what byte 0x85 becomes in Latin-1 decoded text. A trailing break does not
/// produce an extra empty paragraph; blank lines in the middle of the text do.
pub fn paragraphs(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = RE_LINE_BREAK.split(text).collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

static RE_LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|[\n\r\x{85}\x{2028}\x{2029}]").unwrap());

// ── Control characters ───────────────────────────────────────────────────────

// C0 controls except TAB (0x09), LF (0x0A) and CR (0x0D).
static RE_CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F]").unwrap());

pub fn remove_control_chars(input: &str) -> String {
    RE_CONTROL_CHARS.replace_all(input, "").into_owned()
}

// ── Line endings ─────────────────────────────────────────────────────────────

pub fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── CDATA wrappers ───────────────────────────────────────────────────────────

static RE_CDATA_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<!\[CDATA\[").unwrap());

static RE_CDATA_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\]\]>\s*$").unwrap());

/// Strip a leading `<![CDATA[` and a trailing `]]>`, each only if present.
pub fn strip_cdata(input: &str) -> &str {
    let start = RE_CDATA_OPEN.find(input).map_or(0, |m| m.end());
    let rest = &input[start..];
    match RE_CDATA_CLOSE.find(rest) {
        Some(m) => &rest[..m.start()],
        None => rest,
    }
}
