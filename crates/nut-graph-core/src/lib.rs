//! nut-graph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the nut-graph
//! diagram widget, its markup parser and its command-line front end:
//!
//! - **Identifiers**: String-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Direction**: Rank direction and alignment enums ([`direction`] module)
//! - **Descriptors**: The declarative descriptor tree ([`descriptor`] module)
//! - **Model**: The extracted graph model ([`model`] module)
//! - **Text**: Content-box measurement for labels ([`text`] module)

pub mod descriptor;
pub mod direction;
pub mod geometry;
pub mod identifier;
pub mod model;
pub mod text;
