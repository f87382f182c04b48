//! Model extraction.
//!
//! [`ModelExtractor`] walks a descriptor tree depth-first and builds a fresh
//! [`GraphModel`]. Every recoverable problem in the tree (empty ids,
//! duplicates, dangling edge endpoints, unknown elements) is logged and the
//! offending descriptor skipped; extraction itself never fails.
//!
//! Edges are resolved only after the whole tree has been walked, because ids
//! are global and an edge may name a node declared later or in another group.

use log::{debug, trace, warn};

use nut_graph_core::{
    descriptor::{Descriptor, EdgeDescriptor, GroupDescriptor, NodeDescriptor},
    geometry::{Insets, Size},
    identifier::Id,
    model::{EdgeKey, EdgeLabel, EdgeSpec, GraphModel, GroupSpec, NodeSpec},
    text::TextMeasure,
};

/// Builds a [`GraphModel`] from a descriptor tree.
pub struct ModelExtractor<'a> {
    measure: &'a dyn TextMeasure,
    node_padding: f32,
}

impl<'a> ModelExtractor<'a> {
    /// Creates an extractor measuring unsized nodes and edge labels with
    /// `measure`, padding node content by `node_padding` on every side.
    pub fn new(measure: &'a dyn TextMeasure, node_padding: f32) -> Self {
        Self {
            measure,
            node_padding: node_padding.max(0.0),
        }
    }

    /// Extract a model from the top-level descriptors.
    pub fn extract(&self, descriptors: &[Descriptor]) -> GraphModel {
        let mut model = GraphModel::new();
        let mut edges = Vec::new();

        self.walk(descriptors, None, &mut model, &mut edges);

        for edge in edges {
            self.add_edge(edge, &mut model);
        }

        debug!(
            nodes = model.node_count(),
            groups = model.group_count(),
            edges = model.edges().len();
            "Extracted graph model"
        );
        model
    }

    fn walk<'d>(
        &self,
        descriptors: &'d [Descriptor],
        parent: Option<Id>,
        model: &mut GraphModel,
        edges: &mut Vec<&'d EdgeDescriptor>,
    ) {
        for descriptor in descriptors {
            match descriptor {
                Descriptor::Group(group) => {
                    let scope = self.add_group(group, parent, model).or(parent);
                    self.walk(&group.children, scope, model, edges);
                }
                Descriptor::Node(node) => self.add_node(node, parent, model),
                Descriptor::Edge(edge) => edges.push(edge),
                Descriptor::Unknown { tag, children } => {
                    warn!(
                        tag = tag.as_str(),
                        descendants = children.len();
                        "Ignoring unknown descriptor"
                    );
                }
            }
        }
    }

    /// Registers a group and returns its id. Groups that cannot be keyed are
    /// dissolved: their children join the enclosing scope.
    fn add_group(
        &self,
        group: &GroupDescriptor,
        parent: Option<Id>,
        model: &mut GraphModel,
    ) -> Option<Id> {
        let name = group.id.trim();
        if name.is_empty() {
            warn!("Group without id, its members join the enclosing group");
            return None;
        }

        let id = Id::new(name);
        if model.contains_group(id) || model.contains_node(id) {
            warn!(id = name; "Duplicate group id, its members join the enclosing group");
            return None;
        }

        model.insert_group(GroupSpec::new(id, parent));
        Some(id)
    }

    fn add_node(&self, node: &NodeDescriptor, parent: Option<Id>, model: &mut GraphModel) {
        let name = node.id.trim();
        if name.is_empty() {
            warn!(label = node.label.as_str(); "Skipping node without id");
            return;
        }

        let id = Id::new(name);
        if model.contains_group(id) {
            warn!(id = name; "Skipping node whose id names a group");
            return;
        }

        let size = self.node_size(node);
        trace!(id = name, width = size.width(), height = size.height(); "Node");

        if model
            .insert_node(NodeSpec::new(id, size, node.label.clone(), parent))
            .is_some()
        {
            warn!(id = name; "Duplicate node id, the later definition wins");
        }
    }

    /// Explicit dimensions win; a missing or negative one falls back to the
    /// padded content box.
    fn node_size(&self, node: &NodeDescriptor) -> Size {
        let explicit = |value: Option<f32>| value.filter(|v| v.is_finite() && *v >= 0.0);

        match (explicit(node.width), explicit(node.height)) {
            (Some(width), Some(height)) => Size::new(width, height),
            (width, height) => {
                let content = self
                    .measure
                    .measure(&node.label)
                    .add_padding(Insets::uniform(self.node_padding));
                Size::new(
                    width.unwrap_or(content.width()),
                    height.unwrap_or(content.height()),
                )
            }
        }
    }

    fn add_edge(&self, edge: &EdgeDescriptor, model: &mut GraphModel) {
        let (Some(from), Some(to)) = (
            Self::endpoint(&edge.from, model),
            Self::endpoint(&edge.to, model),
        ) else {
            warn!(
                from = edge.from.as_str(),
                to = edge.to.as_str();
                "Dropping edge with an unknown endpoint"
            );
            return;
        };

        let key = match edge.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(name) if !model.contains_edge_key(EdgeKey::Named(Id::new(name))) => {
                EdgeKey::Named(Id::new(name))
            }
            Some(name) => {
                warn!(id = name; "Duplicate edge id, keying the edge by its endpoints");
                model.next_pair_key(from, to)
            }
            None => model.next_pair_key(from, to),
        };

        let weight = match edge.weight {
            Some(weight) if weight.is_finite() && weight >= 0.0 => weight,
            Some(weight) => {
                warn!(edge:% = key, weight; "Ignoring invalid edge weight");
                1.0
            }
            None => 1.0,
        };

        let label = edge
            .label
            .as_deref()
            .map(str::trim)
            .filter(|text| text.chars().count() > 1)
            .map(|text| EdgeLabel::new(text, self.measure.measure(text)));

        let spec = EdgeSpec::new(key, from, to)
            .with_weight(weight)
            .with_offsets(
                finite_or_zero(edge.from_offset),
                finite_or_zero(edge.to_offset),
            )
            .with_label(label)
            .with_style_class(
                edge.class
                    .as_deref()
                    .map(str::trim)
                    .filter(|class| !class.is_empty())
                    .map(str::to_string),
            );

        trace!(edge:% = key; "Edge");
        model.push_edge(spec);
    }

    /// Resolves an endpoint against the extracted nodes. Groups are not
    /// valid endpoints.
    fn endpoint(name: &str, model: &GraphModel) -> Option<Id> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = Id::new(name);
        model.contains_node(id).then_some(id)
    }
}

fn finite_or_zero(value: Option<f32>) -> f32 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use nut_graph_core::text::FixedMeasure;

    use super::*;

    fn extract(descriptors: &[Descriptor]) -> GraphModel {
        let measure = FixedMeasure::new(10.0, 20.0);
        ModelExtractor::new(&measure, 4.0).extract(descriptors)
    }

    #[test]
    fn test_nested_groups_record_direct_parent() {
        let model = extract(&[Descriptor::group(
            "outer",
            vec![
                Descriptor::node("a", 10.0, 10.0),
                Descriptor::group("inner", vec![Descriptor::node("b", 10.0, 10.0)]),
            ],
        )]);

        assert_eq!(model.group(Id::new("outer")).and_then(|g| g.parent()), None);
        assert_eq!(
            model.group(Id::new("inner")).and_then(|g| g.parent()),
            Some(Id::new("outer"))
        );
        assert_eq!(
            model.node(Id::new("a")).and_then(|n| n.parent_group()),
            Some(Id::new("outer"))
        );
        assert_eq!(
            model.node(Id::new("b")).and_then(|n| n.parent_group()),
            Some(Id::new("inner"))
        );
    }

    #[test]
    fn test_unsized_node_uses_padded_content_box() {
        let model = extract(&[
            NodeDescriptor::new("load").with_label("Load").into(),
            Descriptor::Node(NodeDescriptor {
                id: "half".to_string(),
                width: Some(100.0),
                height: Some(-1.0),
                label: "ab".to_string(),
            }),
        ]);

        let load = model.node(Id::new("load")).expect("node");
        assert_eq!(load.size(), Size::new(48.0, 28.0));
        assert_eq!(load.label(), "Load");

        let half = model.node(Id::new("half")).expect("node");
        assert_eq!(half.size(), Size::new(100.0, 28.0));
    }

    #[test]
    fn test_edges_resolve_forward_references() {
        let model = extract(&[
            Descriptor::edge("a", "b"),
            Descriptor::group("g", vec![Descriptor::node("b", 10.0, 10.0)]),
            Descriptor::node("a", 10.0, 10.0),
        ]);

        assert_eq!(model.edges().len(), 1);
        assert_eq!(model.edges()[0].from(), Id::new("a"));
        assert_eq!(model.edges()[0].to(), Id::new("b"));
    }

    #[test]
    fn test_dangling_and_group_endpoints_dropped() {
        let model = extract(&[
            Descriptor::group("g", vec![Descriptor::node("a", 10.0, 10.0)]),
            Descriptor::edge("a", "missing"),
            Descriptor::edge("a", "g"),
            Descriptor::edge("", "a"),
            Descriptor::edge("a", "a"),
        ]);

        assert_eq!(model.edges().len(), 1);
        assert!(model.edges()[0].is_self_loop());
    }

    #[test]
    fn test_parallel_edges_stay_addressable() {
        let model = extract(&[
            Descriptor::node("a", 10.0, 10.0),
            Descriptor::node("b", 10.0, 10.0),
            Descriptor::edge("a", "b"),
            Descriptor::edge("a", "b"),
            EdgeDescriptor::new("a", "b").with_id("main").into(),
            EdgeDescriptor::new("a", "b").with_id("main").into(),
        ]);

        let (a, b) = (Id::new("a"), Id::new("b"));
        let keys: Vec<_> = model.edges().iter().map(EdgeSpec::key).collect();
        assert_eq!(
            keys,
            vec![
                EdgeKey::Pair { from: a, to: b, index: 0 },
                EdgeKey::Pair { from: a, to: b, index: 1 },
                EdgeKey::Named(Id::new("main")),
                EdgeKey::Pair { from: a, to: b, index: 2 },
            ]
        );
    }

    #[test]
    fn test_edge_attributes() {
        let model = extract(&[
            Descriptor::node("a", 10.0, 10.0),
            Descriptor::node("b", 10.0, 10.0),
            EdgeDescriptor::new("a", "b")
                .with_weight(-3.0)
                .with_offsets(4.0, f32::NAN)
                .with_label("5 A")
                .with_class(" hot ")
                .into(),
            EdgeDescriptor::new("b", "a").with_label("x").with_class("  ").into(),
        ]);

        let hot = &model.edges()[0];
        assert_eq!(hot.weight(), 1.0);
        assert_eq!(hot.from_offset(), 4.0);
        assert_eq!(hot.to_offset(), 0.0);
        assert_eq!(hot.style_class(), Some("hot"));
        let label = hot.label().expect("label");
        assert_eq!(label.text(), "5 A");
        assert_eq!(label.size(), Size::new(30.0, 20.0));

        let plain = &model.edges()[1];
        assert!(plain.label().is_none(), "single character labels are dropped");
        assert!(plain.style_class().is_none());
    }

    #[test]
    fn test_malformed_descriptors_skipped() {
        let model = extract(&[
            Descriptor::node("", 10.0, 10.0),
            Descriptor::Unknown {
                tag: "div".to_string(),
                children: vec![Descriptor::node("hidden", 10.0, 10.0)],
            },
            Descriptor::group("", vec![Descriptor::node("orphan", 10.0, 10.0)]),
            Descriptor::node("dup", 10.0, 10.0),
            Descriptor::node("dup", 30.0, 10.0),
        ]);

        assert_eq!(model.node_count(), 2);
        assert_eq!(model.group_count(), 0);
        assert!(!model.contains_node(Id::new("hidden")));
        assert_eq!(
            model.node(Id::new("orphan")).and_then(|n| n.parent_group()),
            None
        );
        assert_eq!(
            model.node(Id::new("dup")).map(|n| n.size().width()),
            Some(30.0)
        );
    }
}
