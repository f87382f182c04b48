//! Error types for nut-graph operations.
//!
//! [`GraphError`] is the crate-wide error. [`AttributeError`] describes a
//! rejected configuration write; the widget logs it and keeps its previous
//! state, while one-shot rendering surfaces it to the caller.

use std::io;

use thiserror::Error;

use nut_graph_markup::ParseError;

/// The main error type for nut-graph operations.
///
/// The `Parse` variant keeps the markup source next to the diagnostics so a
/// reporter can render labelled spans.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Invalid attribute: {0}")]
    Attribute(#[from] AttributeError),
}

impl GraphError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

/// A configuration attribute write that was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttributeError {
    #[error("`{name}` expects a finite number, got `{value}`")]
    InvalidNumber { name: String, value: String },

    #[error("unrecognized rank direction `{0}` (expected TB, BT, LR or RL)")]
    InvalidRankDir(String),

    #[error("unrecognized alignment `{0}` (expected UL, UR, DL or DR)")]
    InvalidAlign(String),

    #[error("unknown configuration attribute `{0}`")]
    UnknownKey(String),
}
