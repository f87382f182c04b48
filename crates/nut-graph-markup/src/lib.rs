//! # nut-graph Markup
//!
//! Parser for the HTML-like markup form of a nut-graph descriptor tree, the
//! same custom elements a host page feeds the widget:
//!
//! ```
//! # use nut_graph_markup::{parse, ParseError};
//! # use nut_graph_core::descriptor::Descriptor;
//! fn main() -> Result<(), ParseError> {
//!     let doc = parse(r#"
//!         <nut-graph rankdir="LR">
//!           <nut-graph-node id="ups" width="80" height="40">UPS</nut-graph-node>
//!           <nut-graph-node id="load">Load</nut-graph-node>
//!           <nut-graph-link from="ups" to="load">5 A</nut-graph-link>
//!         </nut-graph>
//!     "#)?;
//!
//!     assert_eq!(doc.attribute("rankdir"), Some("LR"));
//!     assert_eq!(doc.descriptors().len(), 3);
//!     assert!(matches!(doc.descriptors()[2], Descriptor::Edge(_)));
//!     Ok(())
//! }
//! ```
//!
//! Structural problems are fatal and reported as a [`ParseError`] with
//! labelled spans. Bad attribute *values* are not: a non-numeric width or
//! offset is logged and left for the default to fill in.

pub mod error;

mod entity;
mod lower;
mod span;
mod syntax;

pub use error::ParseError;
pub use span::{Span, Spanned};

use indexmap::IndexMap;
use log::{debug, info, trace};

use nut_graph_core::descriptor::Descriptor;

/// A parsed markup document.
///
/// `attributes` are the root element's attributes (lower-cased names) and
/// become the widget's initial configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    attributes: IndexMap<String, String>,
    descriptors: Vec<Descriptor>,
}

impl Document {
    pub fn new(attributes: IndexMap<String, String>, descriptors: Vec<Descriptor>) -> Self {
        Self {
            attributes,
            descriptors,
        }
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Looks up a root attribute by its case-insensitive name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Sets a root attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn into_parts(self) -> (IndexMap<String, String>, Vec<Descriptor>) {
        (self.attributes, self.descriptors)
    }
}

/// Parse markup source into a [`Document`].
///
/// # Errors
///
/// Returns a [`ParseError`] for unclosed or mismatched elements, malformed
/// attributes, unterminated comments and stray `<` characters.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    info!(bytes = source.len(); "Parsing markup");
    trace!(source; "Markup source");

    let contents = syntax::document(source)?;
    debug!("Parsed element tree successfully");

    Ok(lower::document(contents))
}
