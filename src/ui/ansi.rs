//! # ANSI-aware text measurement
//!
//! Rendering mixes plain text with color and cursor control sequences. The
//! box layout needs every line to occupy exactly the same number of terminal
//! columns, so widths must be measured on what the terminal *displays*, not
//! on the bytes the string contains.
//!
//! A control sequence here is `ESC [`, zero or more parameter bytes
//! (`0`-`9`, `;`, `<`, `=`, `>`, `?`) and one final ASCII letter. That covers
//! SGR color/style codes (`\x1b[1;36m`) and cursor movement (`\x1b[2K`).
//! Anything that does not match the full grammar, such as a lone `ESC` or an
//! unterminated `ESC [12`, is treated as ordinary text.
//!
//! Widths count `char`s. Wide glyphs (CJK, most emoji) are counted as one
//! column, so catalogs should stick to narrow characters in labels.

use regex::Regex;
use std::sync::OnceLock;

static CSI_PATTERN: OnceLock<Regex> = OnceLock::new();

fn csi_pattern() -> &'static Regex {
    CSI_PATTERN.get_or_init(|| Regex::new(r"\x1b\[[0-?]*[A-Za-z]").expect("CSI pattern is valid"))
}

/// Remove every well-formed control sequence from `s`.
///
/// Removal repeats until no sequence is left, so a sequence that only
/// becomes well-formed once an inner one is removed (`ESC ESC[0m [1m`) is
/// removed too. This keeps the function idempotent.
pub fn strip_escapes(s: &str) -> String {
    let re = csi_pattern();
    let mut out = re.replace_all(s, "").into_owned();
    while re.is_match(&out) {
        out = re.replace_all(&out, "").into_owned();
    }
    out
}

/// Make `s` safe to place inside one row of the box.
///
/// Well-formed control sequences are kept. Line breaks become `⏎` (a `\r\n`
/// pair counts as one break), tabs become a single space, and every other
/// control character, stray `ESC` included, is dropped. The result occupies
/// exactly [`visual_length`] columns on screen.
pub fn printable(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last = 0;
    for m in csi_pattern().find_iter(s) {
        push_printable(&mut out, &s[last..m.start()]);
        out.push_str(m.as_str());
        last = m.end();
    }
    push_printable(&mut out, &s[last..]);
    out
}

fn push_printable(out: &mut String, text: &str) {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => out.push('⏎'),
            '\t' => out.push(' '),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
}

/// Number of columns `s` occupies once its control sequences are removed.
pub fn visual_length(s: &str) -> usize {
    if !s.contains('\x1b') {
        return s.chars().count();
    }
    strip_escapes(s).chars().count()
}

/// Append spaces until `content` is `width` columns wide.
///
/// Content that is already wider than `width` is returned unchanged: cutting
/// a styled string could split a control sequence, so callers are expected
/// to size content with [`fit_to_width`] first.
pub fn pad_to_width(content: &str, width: usize) -> String {
    let len = visual_length(content);
    let mut out = String::with_capacity(content.len() + width.saturating_sub(len));
    out.push_str(content);
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    out
}

/// Center `content` within `width` columns. Extra space goes to the right.
pub fn center(content: &str, width: usize) -> String {
    let left = width.saturating_sub(visual_length(content)) / 2;
    let mut out = " ".repeat(left);
    out.push_str(content);
    pad_to_width(&out, width)
}

/// Shorten `content` to at most `width` columns.
///
/// Content that fits is returned as-is, styling included. Content that does
/// not fit loses its styling and is cut on a character boundary with a
/// trailing `…`.
pub fn fit_to_width(content: &str, width: usize) -> String {
    if visual_length(content) <= width {
        return content.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let plain = strip_escapes(content);
    let mut out: String = plain.chars().take(width - 1).collect();
    out.push('…');
    out
}
