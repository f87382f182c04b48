//! Diagnostics for markup parsing.
//!
//! Structural problems in the markup, such as unclosed elements or mismatched
//! closing tags, are reported as [`Diagnostic`]s with error
//! codes and labelled spans, wrapped in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use nut_graph_markup::error::{Diagnostic, ErrorCode};
//! # use nut_graph_markup::Span;
//!
//! let diag = Diagnostic::error("mismatched closing tag `</nut-graph-group>`")
//!     .with_code(ErrorCode::E101)
//!     .with_label(Span::new(40..58), "expected `</nut-graph-node>`")
//!     .with_secondary_label(Span::new(0..20), "element opened here");
//!
//! assert_eq!(diag.labels().len(), 2);
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
