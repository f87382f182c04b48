//! The rendered scene.
//!
//! A [`Scene`] is the complete, immutable output of one render pass: group
//! frames, node boxes and resolved edge paths, all in diagram coordinates.
//! The widget swaps scenes atomically; the viewport transform is applied on
//! top at export time.

use log::{debug, warn};

use nut_graph_core::{
    direction::RankDir,
    geometry::{Bounds, Size},
    identifier::Id,
    model::{EdgeKey, GraphModel},
};

use crate::{
    layout::LayoutResult,
    route::{self, CurvePath, Rect},
};

/// Frame of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFrame {
    pub id: Id,
    pub bounds: Bounds,
}

/// A placed node with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub id: Id,
    pub bounds: Bounds,
    pub label: String,
}

/// A placed edge label.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabelBox {
    pub text: String,
    pub bounds: Bounds,
}

/// A routed edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub key: EdgeKey,
    pub from: Id,
    pub to: Id,
    pub curve: CurvePath,
    pub style_class: Option<String>,
    pub label: Option<EdgeLabelBox>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    size: Size,
    groups: Vec<GroupFrame>,
    nodes: Vec<NodeBox>,
    edges: Vec<EdgePath>,
}

impl Scene {
    /// Combines a model with its layout. Edges are resolved against the
    /// freshly laid out nodes; an edge whose endpoint has no rectangle is
    /// dropped.
    pub fn build(model: &GraphModel, layout: &LayoutResult, rankdir: RankDir) -> Self {
        let groups = layout
            .groups()
            .map(|(id, bounds)| GroupFrame { id, bounds })
            .collect();

        let nodes = model
            .nodes()
            .filter_map(|node| {
                layout.node(node.id()).map(|rect| NodeBox {
                    id: node.id(),
                    bounds: rect.bounds(),
                    label: node.label().to_string(),
                })
            })
            .collect();

        let mut edges = Vec::with_capacity(model.edges().len());
        for edge in model.edges() {
            let (Some(source), Some(target)) = (layout.node(edge.from()), layout.node(edge.to()))
            else {
                warn!(edge:% = edge.key(); "Edge endpoint missing from layout, skipping");
                continue;
            };

            let resolved = route::resolve_edge(
                Rect {
                    center: source.center(),
                    size: source.size(),
                },
                Rect {
                    center: target.center(),
                    size: target.size(),
                },
                rankdir,
                (edge.from_offset(), edge.to_offset()),
                edge.label().map(|label| label.size()),
            );

            let label = edge
                .label()
                .zip(resolved.label_box)
                .map(|(label, bounds)| EdgeLabelBox {
                    text: label.text().to_string(),
                    bounds,
                });

            edges.push(EdgePath {
                key: edge.key(),
                from: edge.from(),
                to: edge.to(),
                curve: resolved.path,
                style_class: edge.style_class().map(str::to_string),
                label,
            });
        }

        let scene = Self {
            size: layout.size(),
            groups,
            nodes,
            edges,
        };
        debug!(
            groups = scene.groups.len(),
            nodes = scene.nodes.len(),
            edges = scene.edges.len();
            "Built scene"
        );
        scene
    }

    /// View box size: the larger of layout size and scroll size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Grows the view box to at least `size`.
    pub fn grow_to(&mut self, size: Size) {
        self.size = self.size.max(size);
    }

    pub fn groups(&self) -> &[GroupFrame] {
        &self.groups
    }

    pub fn nodes(&self) -> &[NodeBox] {
        &self.nodes
    }

    pub fn node(&self, id: Id) -> Option<&NodeBox> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edges(&self) -> &[EdgePath] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use nut_graph_core::{
        geometry::Point,
        model::{EdgeLabel, EdgeSpec, NodeSpec},
    };

    use super::*;
    use crate::layout::NodeRect;

    #[test]
    fn test_build_resolves_edges_against_layout() {
        let (a, b, ghost) = (Id::new("a"), Id::new("b"), Id::new("ghost"));
        let mut model = GraphModel::new();
        model.insert_node(NodeSpec::new(a, Size::new(80.0, 40.0), "A", None));
        model.insert_node(NodeSpec::new(b, Size::new(80.0, 40.0), "B", None));
        model.push_edge(
            EdgeSpec::new(model.next_pair_key(a, b), a, b)
                .with_offsets(5.0, 0.0)
                .with_label(Some(EdgeLabel::new("5 A", Size::new(30.0, 16.0))))
                .with_style_class(Some("hot".to_string())),
        );
        model.push_edge(EdgeSpec::new(model.next_pair_key(a, ghost), a, ghost));

        let mut rects = IndexMap::new();
        rects.insert(a, NodeRect::new(Point::new(56.0, 36.0), Size::new(80.0, 40.0)));
        rects.insert(b, NodeRect::new(Point::new(56.0, 126.0), Size::new(80.0, 40.0)));
        let layout = LayoutResult::new(rects, IndexMap::new(), Size::new(112.0, 162.0));

        let scene = Scene::build(&model, &layout, RankDir::TB);

        assert_eq!(scene.nodes().len(), 2);
        assert_eq!(scene.edges().len(), 1);
        let edge = &scene.edges()[0];
        assert_eq!(edge.curve.start(), Point::new(61.0, 56.0));
        assert_eq!(edge.curve.end(), Point::new(56.0, 106.0));
        assert_eq!(edge.style_class.as_deref(), Some("hot"));

        let label = edge.label.as_ref().expect("label");
        assert_eq!(label.text, "5 A");
        assert_eq!(label.bounds.center(), Point::new(58.5, 81.0));

        assert_eq!(scene.node(a).map(|n| n.label.as_str()), Some("A"));
        assert_eq!(scene.size(), Size::new(112.0, 162.0));
    }

    #[test]
    fn test_grow_to_never_shrinks() {
        let mut scene = Scene::default();
        scene.grow_to(Size::new(100.0, 20.0));
        scene.grow_to(Size::new(50.0, 40.0));
        assert_eq!(scene.size(), Size::new(100.0, 40.0));
        assert!(scene.is_empty());
    }
}
