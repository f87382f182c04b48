//! Source spans attached to a [`Diagnostic`](super::Diagnostic).

use crate::span::Span;

/// A span of the markup with a short note.
///
/// A diagnostic has one primary label on the text that broke the parse: the
/// closing tag that did not match, or the start of a tag that never ended.
/// Secondary labels point back at context, usually the start tag of the
/// element the closing tag should have matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    primary: bool,
}

impl Label {
    /// Label on the offending text.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self::new(span, message, true)
    }

    /// Label on related context, such as the start tag.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self::new(span, message, false)
    }

    fn new(span: Span, message: impl Into<String>, primary: bool) -> Self {
        Self {
            span,
            message: message.into(),
            primary,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }
}
