//! Display-width helpers for character-cell output.
//!
//! Widths are measured after stripping ANSI escape sequences so content that
//! arrives pre-styled still lines up on the screen.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Number of terminal columns `text` occupies.
pub fn display_width(text: &str) -> usize {
    let stripped = strip_ansi_escapes::strip_str(text);
    UnicodeWidthStr::width(stripped.as_str())
}

/// Clamp `text` to at most `max_width` columns, dropping styling escapes.
///
/// Truncation never splits a wide character; a double-width glyph that does
/// not fit is dropped entirely.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let stripped = strip_ansi_escapes::strip_str(text);
    if UnicodeWidthStr::width(stripped.as_str()) <= max_width {
        return stripped;
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in stripped.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}
