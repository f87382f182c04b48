//! Layout orchestration.
//!
//! The [`LayoutOrchestrator`] translates a [`GraphModel`] plus the current
//! orientation into a request for a [`LayoutEngine`], then checks and
//! normalizes what comes back: every node must be placed at a finite
//! position, and the reported size never shrinks below the host's scroll
//! size.
//!
//! Node positions in a [`LayoutResult`] are centers.

mod engines;

pub use engines::SugiyamaEngine;

use indexmap::IndexMap;
use log::{debug, info};

use nut_graph_core::{
    direction::{Align, RankDir},
    geometry::{Bounds, Point, Size},
    identifier::Id,
    model::GraphModel,
};

use crate::{config::LayoutConfig, error::GraphError};

/// Parameters of one layout request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    rankdir: RankDir,
    align: Option<Align>,
    margin: f32,
    node_spacing: f32,
    rank_spacing: f32,
    group_padding: f32,
}

impl LayoutOptions {
    /// Options with the default spacing for the given orientation.
    pub fn new(rankdir: RankDir, align: Option<Align>) -> Self {
        Self::from_config(&LayoutConfig::default(), rankdir, align)
    }

    pub fn from_config(config: &LayoutConfig, rankdir: RankDir, align: Option<Align>) -> Self {
        Self {
            rankdir,
            align,
            margin: config.margin(),
            node_spacing: config.node_spacing(),
            rank_spacing: config.rank_spacing(),
            group_padding: config.group_padding(),
        }
    }

    pub fn rankdir(&self) -> RankDir {
        self.rankdir
    }

    pub fn align(&self) -> Option<Align> {
        self.align
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    pub fn rank_spacing(&self) -> f32 {
        self.rank_spacing
    }

    pub fn group_padding(&self) -> f32 {
        self.group_padding
    }
}

/// A placed node: center and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRect {
    center: Point,
    size: Size,
}

impl NodeRect {
    pub fn new(center: Point, size: Size) -> Self {
        Self { center, size }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        self.center.to_bounds(self.size)
    }
}

/// Output of a layout engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    nodes: IndexMap<Id, NodeRect>,
    groups: IndexMap<Id, Bounds>,
    size: Size,
}

impl LayoutResult {
    pub fn new(nodes: IndexMap<Id, NodeRect>, groups: IndexMap<Id, Bounds>, size: Size) -> Self {
        Self {
            nodes,
            groups,
            size,
        }
    }

    pub fn node(&self, id: Id) -> Option<&NodeRect> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (Id, &NodeRect)> {
        self.nodes.iter().map(|(id, rect)| (*id, rect))
    }

    /// Frame of a group, `None` for unknown or empty groups.
    pub fn group(&self, id: Id) -> Option<Bounds> {
        self.groups.get(&id).copied()
    }

    pub fn groups(&self) -> impl Iterator<Item = (Id, Bounds)> {
        self.groups.iter().map(|(id, bounds)| (*id, *bounds))
    }

    /// Total diagram size, margins included.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Grows the reported size to at least `min` on each axis.
    pub fn with_min_size(mut self, min: Size) -> Self {
        self.size = self.size.max(min);
        self
    }
}

/// An external hierarchical layout capability.
///
/// Implementations receive the full compound model (group membership and
/// every parallel edge) and decide themselves how much of it they honour.
pub trait LayoutEngine {
    /// Places every node of `model`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Layout`] when the backend fails.
    fn layout(&self, model: &GraphModel, options: &LayoutOptions)
    -> Result<LayoutResult, GraphError>;
}

/// Runs a [`LayoutEngine`] and validates its output.
pub struct LayoutOrchestrator {
    engine: Box<dyn LayoutEngine>,
}

impl LayoutOrchestrator {
    pub fn new(engine: Box<dyn LayoutEngine>) -> Self {
        Self { engine }
    }

    /// Lays out `model`. The resulting size is the larger of the computed
    /// layout size and `scroll_size`.
    ///
    /// # Errors
    ///
    /// Fails if the engine fails, leaves a node unplaced, or produces a
    /// non-finite coordinate.
    pub fn compute(
        &self,
        model: &GraphModel,
        options: &LayoutOptions,
        scroll_size: Size,
    ) -> Result<LayoutResult, GraphError> {
        info!(
            nodes = model.node_count(),
            edges = model.edges().len(),
            rankdir:% = options.rankdir();
            "Computing layout"
        );

        let result = self.engine.layout(model, options)?;

        for node in model.nodes() {
            let Some(rect) = result.node(node.id()) else {
                return Err(GraphError::Layout(format!(
                    "layout did not place node `{}`",
                    node.id()
                )));
            };
            let size = rect.size();
            if !rect.center().is_finite() || !size.width().is_finite() || !size.height().is_finite()
            {
                return Err(GraphError::Layout(format!(
                    "layout placed node `{}` at a non-finite position",
                    node.id()
                )));
            }
        }

        let result = result.with_min_size(scroll_size);
        debug!(
            width = result.size().width(),
            height = result.size().height();
            "Layout complete"
        );
        Ok(result)
    }
}

impl Default for LayoutOrchestrator {
    fn default() -> Self {
        Self::new(Box::new(SugiyamaEngine::new()))
    }
}
