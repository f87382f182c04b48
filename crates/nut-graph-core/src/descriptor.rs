//! The declarative descriptor tree.
//!
//! A host describes a diagram as a tree of [`Descriptor`]s: groups that
//! contain other descriptors, leaf nodes, and edges between node ids. The
//! tree is plain data; the model extractor turns it into a graph model on
//! every render pass.
//!
//! # Examples
//!
//! ```
//! # use nut_graph_core::descriptor::{Descriptor, DescriptorKind, EdgeDescriptor, NodeDescriptor};
//! let tree = vec![
//!     Descriptor::group(
//!         "rack",
//!         vec![NodeDescriptor::new("ups").with_size(80.0, 40.0).into()],
//!     ),
//!     NodeDescriptor::new("load").with_label("Load").into(),
//!     EdgeDescriptor::new("ups", "load").with_weight(2.0).into(),
//! ];
//!
//! assert_eq!(tree[0].kind(), DescriptorKind::Group);
//! assert_eq!(tree[2].kind(), DescriptorKind::Edge);
//! ```

use std::fmt;

/// Discriminant of a [`Descriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Group,
    Node,
    Edge,
    Unknown,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Group => "group",
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A group descriptor. Its children are scoped to the group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupDescriptor {
    pub id: String,
    pub children: Vec<Descriptor>,
}

impl GroupDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Descriptor>) -> Self {
        self.children = children;
        self
    }
}

/// A leaf node descriptor.
///
/// `width` and `height` default to the measured label box when absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDescriptor {
    pub id: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub label: String,
}

impl NodeDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// An edge descriptor connecting two node ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeDescriptor {
    /// Optional explicit key, distinguishing parallel edges.
    pub id: Option<String>,
    pub from: String,
    pub to: String,
    pub weight: Option<f32>,
    pub from_offset: Option<f32>,
    pub to_offset: Option<f32>,
    pub label: Option<String>,
    pub class: Option<String>,
}

impl EdgeDescriptor {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_offsets(mut self, from_offset: f32, to_offset: f32) -> Self {
        self.from_offset = Some(from_offset);
        self.to_offset = Some(to_offset);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

/// One element of the descriptor tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    Group(GroupDescriptor),
    Node(NodeDescriptor),
    Edge(EdgeDescriptor),
    /// An element the widget does not understand. The whole subtree is ignored.
    Unknown {
        tag: String,
        children: Vec<Descriptor>,
    },
}

impl Descriptor {
    /// Shorthand for a group descriptor with children.
    pub fn group(id: impl Into<String>, children: Vec<Descriptor>) -> Self {
        Self::Group(GroupDescriptor::new(id).with_children(children))
    }

    /// Shorthand for an unlabelled node of a fixed size.
    pub fn node(id: impl Into<String>, width: f32, height: f32) -> Self {
        Self::Node(NodeDescriptor::new(id).with_size(width, height))
    }

    /// Shorthand for a plain edge.
    pub fn edge(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Edge(EdgeDescriptor::new(from, to))
    }

    pub fn kind(&self) -> DescriptorKind {
        match self {
            Self::Group(_) => DescriptorKind::Group,
            Self::Node(_) => DescriptorKind::Node,
            Self::Edge(_) => DescriptorKind::Edge,
            Self::Unknown { .. } => DescriptorKind::Unknown,
        }
    }

    /// Children of a group or unknown element; empty for leaves.
    pub fn children(&self) -> &[Descriptor] {
        match self {
            Self::Group(group) => &group.children,
            Self::Unknown { children, .. } => children,
            Self::Node(_) | Self::Edge(_) => &[],
        }
    }

    /// Mutable children of a container element, `None` for leaves.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Descriptor>> {
        match self {
            Self::Group(group) => Some(&mut group.children),
            Self::Unknown { children, .. } => Some(children),
            Self::Node(_) | Self::Edge(_) => None,
        }
    }

    /// Total number of descriptors in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Descriptor::count).sum::<usize>()
    }
}

impl From<GroupDescriptor> for Descriptor {
    fn from(group: GroupDescriptor) -> Self {
        Self::Group(group)
    }
}

impl From<NodeDescriptor> for Descriptor {
    fn from(node: NodeDescriptor) -> Self {
        Self::Node(node)
    }
}

impl From<EdgeDescriptor> for Descriptor {
    fn from(edge: EdgeDescriptor) -> Self {
        Self::Edge(edge)
    }
}
