//! Lowering of parsed elements into descriptors.

use indexmap::IndexMap;
use log::{debug, warn};

use nut_graph_core::descriptor::{Descriptor, EdgeDescriptor, GroupDescriptor, NodeDescriptor};

use crate::{
    Document,
    syntax::{Content, Element},
};

/// What an element means to the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Root,
    Group,
    Node,
    Link,
    Other,
}

impl Tag {
    /// Tag names are case-insensitive and the `nut-` prefix is optional.
    fn classify(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        match lower.strip_prefix("nut-").unwrap_or(&lower) {
            "graph" => Self::Root,
            "graph-group" => Self::Group,
            "graph-node" => Self::Node,
            "graph-link" => Self::Link,
            _ => Self::Other,
        }
    }
}

pub(crate) fn document(contents: Vec<Content>) -> Document {
    let mut attributes = IndexMap::new();
    let descriptors = children(contents, &mut attributes);
    debug!(
        descriptors = descriptors.len(),
        attributes = attributes.len();
        "Lowered markup"
    );
    Document::new(attributes, descriptors)
}

fn children(contents: Vec<Content>, root: &mut IndexMap<String, String>) -> Vec<Descriptor> {
    let mut descriptors = Vec::new();

    for content in contents {
        let Content::Element(element) = content else {
            continue;
        };

        match Tag::classify(element.name.inner()) {
            Tag::Root => {
                for attr in &element.attributes {
                    root.insert(attr.name.inner().clone(), attr.value_str().to_string());
                }
                descriptors.extend(children(element.children, root));
            }
            Tag::Group => {
                let id = string(&element, "id").unwrap_or_default();
                descriptors.push(Descriptor::Group(
                    GroupDescriptor::new(id).with_children(children(element.children, root)),
                ));
            }
            Tag::Node => descriptors.push(Descriptor::Node(node(&element))),
            Tag::Link => descriptors.push(Descriptor::Edge(link(&element))),
            Tag::Other => {
                let tag = element.name.into_inner();
                descriptors.push(Descriptor::Unknown {
                    tag,
                    children: children(element.children, root),
                });
            }
        }
    }

    descriptors
}

fn node(element: &Element) -> NodeDescriptor {
    NodeDescriptor {
        id: string(element, "id").unwrap_or_default(),
        width: number(element, "width"),
        height: number(element, "height"),
        label: element.text().trim().to_string(),
    }
}

fn link(element: &Element) -> EdgeDescriptor {
    let label = element.text().trim().to_string();
    EdgeDescriptor {
        id: string(element, "id"),
        from: string(element, "from").unwrap_or_default(),
        to: string(element, "to").unwrap_or_default(),
        weight: number(element, "weight"),
        from_offset: number(element, "from-offset"),
        to_offset: number(element, "to-offset"),
        label: (!label.is_empty()).then_some(label),
        class: string(element, "class").filter(|class| !class.trim().is_empty()),
    }
}

fn string(element: &Element, name: &str) -> Option<String> {
    element
        .attribute(name)
        .map(|attr| attr.value_str().trim().to_string())
}

/// Parses a numeric attribute. Values that are not finite numbers are
/// ignored so the descriptor falls back to its default.
fn number(element: &Element, name: &str) -> Option<f32> {
    let attr = element.attribute(name)?;
    let raw = attr.value_str();

    match raw.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            warn!(
                element = element.name.inner().as_str(),
                attribute = name,
                value = raw,
                span:% = attr.value_span();
                "Ignoring non-numeric attribute value"
            );
            None
        }
    }
}
