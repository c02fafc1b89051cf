//! Token data model for the CCA token stream
//!
//! A token is one lexeme of the simplified source: its canonical text,
//! its origin (file-table index and 1-based line number) and an optional
//! variable identity linking a declaration to its uses.
use serde::{Deserialize, Serialize};
use std::fmt;

/// One lexeme in the token stream.
///
/// The text is canonical: hexadecimal literals are stored in decimal,
/// string and character literals keep both quotes, multi-character
/// operators are a single token after combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Canonical lexeme text, never empty
    pub(crate) text: String,
    /// Index into the owning tokenizer's file table
    pub(crate) file_index: usize,
    /// 1-based line number within that file
    pub(crate) line: u32,
    /// Variable identity, 0 = none
    pub(crate) var_id: u32,
}

impl Token {
    /// Create a token with no variable identity
    pub fn new(text: impl Into<String>, line: u32, file_index: usize) -> Self {
        Self {
            text: text.into(),
            file_index,
            line,
            var_id: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn file_index(&self) -> usize {
        self.file_index
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn var_id(&self) -> u32 {
        self.var_id
    }

    /// Identifier check: first byte a letter or `_`, rest `[A-Za-z0-9_]`
    pub fn is_name(&self) -> bool {
        is_name_text(&self.text)
    }

    /// Numeric literal check: first byte is a decimal digit
    pub fn is_number(&self) -> bool {
        is_number_text(&self.text)
    }

    /// Boolean literal check
    pub fn is_bool(&self) -> bool {
        is_bool_text(&self.text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Identifier predicate over raw text
pub fn is_name_text(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(&b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Numeric-literal predicate over raw text
pub fn is_number_text(text: &str) -> bool {
    matches!(text.as_bytes().first(), Some(b) if b.is_ascii_digit())
}

/// Boolean-literal predicate over raw text
pub fn is_bool_text(text: &str) -> bool {
    text == "true" || text == "false"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_predicate() {
        assert!(is_name_text("abc"));
        assert!(is_name_text("_x"));
        assert!(is_name_text("a1_b2"));
        assert!(!is_name_text("1abc"));
        assert!(!is_name_text(""));
        assert!(!is_name_text("a-b"));
        assert!(!is_name_text("\"str\""));
    }

    #[test]
    fn test_number_predicate() {
        assert!(is_number_text("0"));
        assert!(is_number_text("42"));
        assert!(is_number_text("5.4"));
        assert!(is_number_text("4.2e10"));
        assert!(!is_number_text("x"));
        assert!(!is_number_text(""));
    }

    #[test]
    fn test_bool_predicate() {
        assert!(is_bool_text("true"));
        assert!(is_bool_text("false"));
        assert!(!is_bool_text("TRUE"));
        assert!(!is_bool_text("0"));
    }

    #[test]
    fn test_token_accessors() {
        let tok = Token::new("x", 3, 1);
        assert_eq!(tok.text(), "x");
        assert_eq!(tok.line(), 3);
        assert_eq!(tok.file_index(), 1);
        assert_eq!(tok.var_id(), 0);
        assert!(tok.is_name());
    }
}
