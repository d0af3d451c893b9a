//! Text Primitives
//!
//! Char-safe helpers used by the gateway (prefix bounds on outbound payloads),
//! the session (selection tracking), and the suggestion engine (literal
//! replacement). All offsets here count Unicode scalar values, not bytes, so
//! a range taken from an editor never splits a multi-byte character.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Return the longest prefix of `text` holding at most `max_chars` chars.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Replace the first literal occurrence of `needle` in `haystack`.
///
/// Matching is exact: no regex, no case folding. Returns `None` when the
/// needle is empty or absent, leaving the caller's text untouched.
pub fn replace_first(haystack: &str, needle: &str, replacement: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    let start = haystack.find(needle)?;
    let mut out = String::with_capacity(haystack.len() - needle.len() + replacement.len());
    out.push_str(&haystack[..start]);
    out.push_str(replacement);
    out.push_str(&haystack[start + needle.len()..]);
    Some(out)
}

/// A half-open `[start, end)` range of char offsets into a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Create a range, rejecting `end < start`.
    pub fn new(start: usize, end: usize) -> CoreResult<Self> {
        if end < start {
            return Err(CoreError::validation(format!(
                "range end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Borrow the substring this range covers.
    ///
    /// Fails when the range runs past the end of `text`.
    pub fn slice<'a>(&self, text: &'a str) -> CoreResult<&'a str> {
        let total = text.chars().count();
        if self.end > total {
            return Err(CoreError::validation(format!(
                "range {}..{} exceeds text length {}",
                self.start, self.end, total
            )));
        }
        let byte_at = |char_idx: usize| {
            text.char_indices()
                .nth(char_idx)
                .map(|(i, _)| i)
                .unwrap_or(text.len())
        };
        Ok(&text[byte_at(self.start)..byte_at(self.end)])
    }
}
