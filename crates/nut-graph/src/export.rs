//! Scene export.

pub mod svg;
