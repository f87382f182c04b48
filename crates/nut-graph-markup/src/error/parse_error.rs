use std::fmt;

use crate::error::Diagnostic;

/// Markup that could not be turned into a descriptor tree.
///
/// [`parse`](crate::parse) stops at the first structural problem, so its
/// errors hold a single diagnostic. Tools that check a document in several
/// passes can collect more than one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.diagnostics.first() else {
            return write!(f, "invalid markup");
        };
        write!(f, "{first}")?;
        match self.diagnostics.len() {
            1 => Ok(()),
            n => write!(f, " (+{} more)", n - 1),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}
