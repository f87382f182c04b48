//! The extracted graph model.
//!
//! A [`GraphModel`] is rebuilt from the descriptor tree on every render pass
//! and handed to the layout engine. It is never patched in place.
//!
//! Nodes and groups keep their insertion order ([`IndexMap`]) so that layout
//! input, and therefore layout output, is stable for a given tree.

use std::fmt;

use indexmap::IndexMap;

use crate::{geometry::Size, identifier::Id};

/// A leaf node with its resolved content size.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    id: Id,
    size: Size,
    label: String,
    parent_group: Option<Id>,
}

impl NodeSpec {
    pub fn new(id: Id, size: Size, label: impl Into<String>, parent_group: Option<Id>) -> Self {
        Self {
            id,
            size,
            label: label.into(),
            parent_group,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The group directly containing this node, if any.
    pub fn parent_group(&self) -> Option<Id> {
        self.parent_group
    }
}

/// A group of nodes and nested groups. Groups carry no geometry of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    id: Id,
    parent: Option<Id>,
}

impl GroupSpec {
    pub fn new(id: Id, parent: Option<Id>) -> Self {
        Self { id, parent }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// The enclosing group, if any.
    pub fn parent(&self) -> Option<Id> {
        self.parent
    }
}

/// Stable key of an edge.
///
/// Edges with an explicit id are keyed by it; the rest are keyed by their
/// ordered endpoint pair plus the position among edges sharing that pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKey {
    Named(Id),
    Pair { from: Id, to: Id, index: usize },
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(id) => write!(f, "{id}"),
            Self::Pair { from, to, index } => write!(f, "{from}->{to}#{index}"),
        }
    }
}

/// A measured edge label.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    text: String,
    size: Size,
}

impl EdgeLabel {
    pub fn new(text: impl Into<String>, size: Size) -> Self {
        Self {
            text: text.into(),
            size,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn size(&self) -> Size {
        self.size
    }
}

/// A directed edge between two known nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    key: EdgeKey,
    from: Id,
    to: Id,
    weight: f32,
    from_offset: f32,
    to_offset: f32,
    label: Option<EdgeLabel>,
    style_class: Option<String>,
}

impl EdgeSpec {
    /// Creates an edge with weight 1, no offsets, no label and no class.
    pub fn new(key: EdgeKey, from: Id, to: Id) -> Self {
        Self {
            key,
            from,
            to,
            weight: 1.0,
            from_offset: 0.0,
            to_offset: 0.0,
            label: None,
            style_class: None,
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_offsets(mut self, from_offset: f32, to_offset: f32) -> Self {
        self.from_offset = from_offset;
        self.to_offset = to_offset;
        self
    }

    pub fn with_label(mut self, label: Option<EdgeLabel>) -> Self {
        self.label = label;
        self
    }

    pub fn with_style_class(mut self, class: Option<String>) -> Self {
        self.style_class = class;
        self
    }

    pub fn key(&self) -> EdgeKey {
        self.key
    }

    pub fn from(&self) -> Id {
        self.from
    }

    pub fn to(&self) -> Id {
        self.to
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn from_offset(&self) -> f32 {
        self.from_offset
    }

    pub fn to_offset(&self) -> f32 {
        self.to_offset
    }

    pub fn label(&self) -> Option<&EdgeLabel> {
        self.label.as_ref()
    }

    pub fn style_class(&self) -> Option<&str> {
        self.style_class.as_deref()
    }

    /// Returns `true` if both endpoints are the same node.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Nodes, groups and edges of one render pass.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: IndexMap<Id, NodeSpec>,
    groups: IndexMap<Id, GroupSpec>,
    edges: Vec<EdgeSpec>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node, returning the definition it replaced, if any.
    pub fn insert_node(&mut self, node: NodeSpec) -> Option<NodeSpec> {
        self.nodes.insert(node.id(), node)
    }

    /// Inserts a group, returning the definition it replaced, if any.
    pub fn insert_group(&mut self, group: GroupSpec) -> Option<GroupSpec> {
        self.groups.insert(group.id(), group)
    }

    pub fn push_edge(&mut self, edge: EdgeSpec) {
        self.edges.push(edge);
    }

    pub fn node(&self, id: Id) -> Option<&NodeSpec> {
        self.nodes.get(&id)
    }

    pub fn group(&self, id: Id) -> Option<&GroupSpec> {
        self.groups.get(&id)
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn contains_group(&self, id: Id) -> bool {
        self.groups.contains_key(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeSpec> {
        self.nodes.values()
    }

    pub fn groups(&self) -> impl Iterator<Item = &GroupSpec> {
        self.groups.values()
    }

    pub fn edges(&self) -> &[EdgeSpec] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Index of a node in insertion order.
    pub fn node_index(&self, id: Id) -> Option<usize> {
        self.nodes.get_index_of(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.groups.is_empty() && self.edges.is_empty()
    }

    /// Nodes whose parent group is `group`.
    pub fn group_nodes(&self, group: Id) -> impl Iterator<Item = &NodeSpec> {
        self.nodes
            .values()
            .filter(move |node| node.parent_group() == Some(group))
    }

    /// Groups directly nested inside `group`.
    pub fn child_groups(&self, group: Id) -> impl Iterator<Item = &GroupSpec> {
        self.groups
            .values()
            .filter(move |child| child.parent() == Some(group))
    }

    /// Returns `true` if an edge already uses `key`.
    pub fn contains_edge_key(&self, key: EdgeKey) -> bool {
        self.edges.iter().any(|edge| edge.key() == key)
    }

    /// The next free pair key for an unnamed edge from `from` to `to`.
    pub fn next_pair_key(&self, from: Id, to: Id) -> EdgeKey {
        let index = self
            .edges
            .iter()
            .filter(|edge| matches!(edge.key(), EdgeKey::Pair { from: f, to: t, .. } if f == from && t == to))
            .count();
        EdgeKey::Pair { from, to, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>) -> NodeSpec {
        NodeSpec::new(Id::new(id), Size::new(10.0, 10.0), id, parent.map(Id::new))
    }

    #[test]
    fn test_insert_node_replaces() {
        let mut model = GraphModel::new();
        assert!(model.insert_node(node("a", None)).is_none());

        let replaced = model.insert_node(NodeSpec::new(
            Id::new("a"),
            Size::new(20.0, 20.0),
            "again",
            None,
        ));
        assert_eq!(replaced.map(|n| n.label().to_string()), Some("a".to_string()));
        assert_eq!(model.node_count(), 1);
        assert_eq!(model.node(Id::new("a")).map(|n| n.size().width()), Some(20.0));
    }

    #[test]
    fn test_pair_keys_count_multiplicity() {
        let mut model = GraphModel::new();
        let (a, b) = (Id::new("a"), Id::new("b"));

        let first = model.next_pair_key(a, b);
        model.push_edge(EdgeSpec::new(first, a, b));
        let named = EdgeKey::Named(Id::new("primary"));
        model.push_edge(EdgeSpec::new(named, a, b));
        let second = model.next_pair_key(a, b);
        model.push_edge(EdgeSpec::new(second, a, b));

        assert_eq!(first, EdgeKey::Pair { from: a, to: b, index: 0 });
        assert_eq!(second, EdgeKey::Pair { from: a, to: b, index: 1 });
        assert_eq!(model.next_pair_key(b, a), EdgeKey::Pair { from: b, to: a, index: 0 });
        assert!(model.contains_edge_key(named));
        assert_eq!(second.to_string(), "a->b#1");
    }

    #[test]
    fn test_group_membership() {
        let mut model = GraphModel::new();
        model.insert_group(GroupSpec::new(Id::new("outer"), None));
        model.insert_group(GroupSpec::new(Id::new("inner"), Some(Id::new("outer"))));
        model.insert_node(node("a", Some("outer")));
        model.insert_node(node("b", Some("inner")));
        model.insert_node(node("c", None));

        let outer: Vec<_> = model.group_nodes(Id::new("outer")).map(|n| n.id()).collect();
        assert_eq!(outer, vec![Id::new("a")]);

        let nested: Vec<_> = model.child_groups(Id::new("outer")).map(|g| g.id()).collect();
        assert_eq!(nested, vec![Id::new("inner")]);
        assert_eq!(model.node_index(Id::new("c")), Some(2));
    }

    #[test]
    fn test_edge_defaults() {
        let edge = EdgeSpec::new(
            EdgeKey::Named(Id::new("e")),
            Id::new("x"),
            Id::new("x"),
        );
        assert_eq!(edge.weight(), 1.0);
        assert_eq!(edge.from_offset(), 0.0);
        assert_eq!(edge.to_offset(), 0.0);
        assert!(edge.label().is_none());
        assert!(edge.style_class().is_none());
        assert!(edge.is_self_loop());
    }
}
