//! Layout engine implementations.
//!
//! Only the layered (Sugiyama) engine ships; other engines plug in through
//! [`LayoutEngine`](super::LayoutEngine).

mod sugiyama;

pub use sugiyama::Engine as SugiyamaEngine;
