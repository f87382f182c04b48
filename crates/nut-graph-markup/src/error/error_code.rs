//! Error codes for markup diagnostics.
//!
//! - `E0xx` - Token level errors (comments, attributes, stray characters)
//! - `E1xx` - Element structure errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Unterminated comment.
    ///
    /// A `<!--` was never closed by `-->`.
    E001,

    /// Unexpected character.
    ///
    /// A `<` that does not start a tag, comment or declaration.
    E002,

    /// Malformed attribute.
    ///
    /// An attribute name was expected inside a start tag.
    E003,

    /// Unterminated attribute value.
    ///
    /// A quoted attribute value was never closed.
    E004,

    /// Unclosed element.
    ///
    /// The input ended before the element's closing tag.
    E100,

    /// Mismatched closing tag.
    ///
    /// A closing tag does not match the innermost open element.
    E101,

    /// Unexpected closing tag.
    ///
    /// A closing tag appeared with no open element.
    E102,

    /// Unterminated tag.
    ///
    /// The input ended inside a start or closing tag.
    E103,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated comment",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "malformed attribute",
            ErrorCode::E004 => "unterminated attribute value",
            ErrorCode::E100 => "unclosed element",
            ErrorCode::E101 => "mismatched closing tag",
            ErrorCode::E102 => "unexpected closing tag",
            ErrorCode::E103 => "unterminated tag",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
