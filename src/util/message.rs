//! Client-message text normalization.
//!
//! Messages arrive with newlines and backslashes still escaped (`\n`, `\\`)
//! and with long runs of blank lines. Unescaping happens in a fixed order:
//! newlines first, then backslashes, so an unescaped backslash is never
//! re-read as the start of a newline escape.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

/// Longest run of consecutive newlines kept after normalization.
pub const MAX_NEWLINE_RUN: usize = 2;

/// Unescape `\n` and `\\`, then collapse 3+ consecutive newlines to 2.
#[must_use]
pub fn normalize_message(raw: &str) -> String {
    let unescaped = raw.replace("\\n", "\n").replace("\\\\", "\\");
    collapse_newlines(&unescaped)
}

fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for ch in text.chars() {
        if ch == '\n' {
            run += 1;
            if run > MAX_NEWLINE_RUN {
                continue;
            }
        } else {
            run = 0;
        }
        out.push(ch);
    }
    out
}
