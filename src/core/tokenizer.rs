// src/core/tokenizer.rs

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::VecDeque;

lazy_static! {
    // A token is either a double-quoted span or a run of characters that
    // contains neither whitespace nor quotes.
    static ref TOKEN_RE: Regex = Regex::new(r#""[^"]*"|[^\s"]+"#).unwrap();
}

/// Splits an input line into tokens.
///
/// Whitespace separates tokens, except inside a double-quoted span, which is
/// emitted as a single token with the quotes stripped and inner whitespace
/// preserved. There is no escape sequence for an embedded quote; a dangling
/// quote character is simply dropped by the pattern.
pub fn tokenize(input: &str) -> VecDeque<String> {
    TOKEN_RE
        .find_iter(input.trim())
        .map(|m| {
            let token = m.as_str();
            token
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .unwrap_or(token)
                .to_string()
        })
        .collect()
}
