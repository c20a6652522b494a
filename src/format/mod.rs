//! Render an [`OutputUnit`] to source text.
//!
//! The output is the banner, then the unit's imports and members pretty-printed by `prettyplease`. Every line ending in
//! the result, banner included, uses the configured convention, whatever the input file used.

use crate::config::LineEnding;
use crate::transform::OutputUnit;

/// Render `unit` as a complete source file.
pub fn render(unit: &OutputUnit, line_ending: LineEnding) -> String {
    let body = prettyplease::unparse(&unit.to_file());
    let mut text = String::new();
    for line in unit.header {
        text.push_str(line);
        text.push('\n');
    }
    if !body.trim().is_empty() {
        text.push('\n');
        text.push_str(&body);
    }
    normalize_line_endings(&text, line_ending)
}

/// Rewrite every line terminator in `text` (`\n`, `\r\n` or a lone `\r`) to `line_ending`.
pub fn normalize_line_endings(text: &str, line_ending: LineEnding) -> String {
    let eol = line_ending.as_str();
    let mut out = String::with_capacity(text.len() + text.len() / 32);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str(eol);
            }
            '\n' => out.push_str(eol),
            other => out.push(other),
        }
    }
    out
}
