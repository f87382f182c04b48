//! Layered compound layout on top of `rust-sugiyama`.
//!
//! Groups are laid out as containment scopes, innermost first. Each scope
//! holds the nodes directly inside a group plus its non-empty child groups.
//! A child group has already been laid out by then, so it enters its
//! parent's scope as a single vertex sized by its padded content. Edges are
//! lifted to the member of the scope that contains their endpoint; an edge
//! whose endpoints share that member belongs to a deeper scope.
//!
//! Inside a scope the backend assigns ranks and in-rank order to every
//! connected component. This engine turns that abstract grid into
//! coordinates:
//!
//! 1. members without a usable edge become single-member components;
//! 2. heavier edges pull their endpoints into line (weighted barycenter,
//!    kept only when it lowers the weighted crossing count);
//! 3. components are packed side by side along the cross axis;
//! 4. each rank is as deep as its deepest member, and members of a rank are
//!    swept along the cross axis so they never overlap;
//! 5. the grid is rotated or mirrored for the rank direction.
//!
//! The top-level scope is finally shifted to the margin and every group's
//! content is placed inside its frame.

use std::{
    any::Any,
    collections::{HashMap, HashSet},
    panic,
};

use indexmap::IndexMap;
use log::{debug, trace, warn};
use rust_sugiyama::configure::Config;

use nut_graph_core::{
    direction::{Align, RankDir},
    geometry::{Bounds, Insets, Point, Size},
    identifier::Id,
    model::{GraphModel, NodeSpec},
};

use crate::{
    error::GraphError,
    layout::{LayoutEngine, LayoutOptions, LayoutResult, NodeRect},
};

/// Horizontal distance the backend puts between neighbouring vertices.
const VERTEX_SPACING: f32 = 3.0;

/// Tolerance when grouping backend y coordinates into ranks.
const RANK_EPSILON: f32 = 1e-3;

/// A vertex of one containment scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Member {
    /// A node, by model index.
    Node(usize),
    /// A nested group, laid out beforehand and placed as one box.
    Group(Id),
}

/// A member placed on the abstract grid: rank index and cross-axis slot.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slot {
    member: usize,
    rank: usize,
    cross: f32,
}

/// One connected component on the grid. Slots are kept sorted by rank, then
/// cross position, and the smallest cross position is zero.
#[derive(Debug, Clone, Default)]
struct Block {
    slots: Vec<Slot>,
}

impl Block {
    fn single(member: usize) -> Self {
        Self {
            slots: vec![Slot {
                member,
                rank: 0,
                cross: 0.0,
            }],
        }
    }

    fn from_slots(slots: Vec<Slot>) -> Self {
        let mut block = Self { slots };
        block.sort();

        // Keep at least one slot between neighbours of a rank.
        let slots = &mut block.slots;
        for i in 1..slots.len() {
            if slots[i].rank == slots[i - 1].rank && slots[i].cross < slots[i - 1].cross + 1.0 {
                slots[i].cross = slots[i - 1].cross + 1.0;
            }
        }

        let min = slots.iter().map(|s| s.cross).fold(f32::INFINITY, f32::min);
        if min.is_finite() {
            for slot in slots.iter_mut() {
                slot.cross -= min;
            }
        }
        block
    }

    fn sort(&mut self) {
        self.slots
            .sort_by(|a, b| a.rank.cmp(&b.rank).then(a.cross.total_cmp(&b.cross)));
    }

    /// Number of cross-axis slots the block spans.
    fn span(&self) -> f32 {
        self.slots.iter().map(|s| s.cross).fold(0.0, f32::max) + 1.0
    }

    fn rank_count(&self) -> usize {
        self.slots.iter().map(|s| s.rank + 1).max().unwrap_or(0)
    }

    /// Declaration order of the earliest member, used to order components.
    fn first_key(&self, keys: &[usize]) -> usize {
        self.slots
            .iter()
            .filter_map(|s| keys.get(s.member).copied())
            .min()
            .unwrap_or(usize::MAX)
    }

    /// Index range of the slots in `rank`.
    fn rank_range(&self, rank: usize) -> std::ops::Range<usize> {
        let start = self.slots.partition_point(|s| s.rank < rank);
        let end = self.slots.partition_point(|s| s.rank <= rank);
        start..end
    }

    /// Sweeps the ranks top-down and reorders each one by the weighted
    /// barycenter of its neighbours in the rank above.
    ///
    /// The reordering reuses the rank's existing cross positions and is only
    /// kept when it lowers the weighted crossing count, so uniform weights
    /// leave the backend's order alone.
    fn order_by_weight(&mut self, edges: &[(usize, usize, f32)]) {
        for rank in 1..self.rank_count() {
            let placed: HashMap<usize, (usize, f32)> = self
                .slots
                .iter()
                .map(|s| (s.member, (s.rank, s.cross)))
                .collect();

            // (upper cross, lower member, weight) of every edge between the ranks
            let links: Vec<(f32, usize, f32)> = edges
                .iter()
                .filter_map(|&(from, to, weight)| {
                    let (from_rank, from_cross) = *placed.get(&from)?;
                    let (to_rank, to_cross) = *placed.get(&to)?;
                    if from_rank + 1 == rank && to_rank == rank {
                        Some((from_cross, to, weight))
                    } else if to_rank + 1 == rank && from_rank == rank {
                        Some((to_cross, from, weight))
                    } else {
                        None
                    }
                })
                .collect();
            if links.is_empty() {
                continue;
            }

            let range = self.rank_range(rank);
            let current: Vec<Slot> = self.slots[range.clone()].to_vec();
            let mut candidate: Vec<(f32, Slot)> = current
                .iter()
                .map(|slot| (barycenter(&links, *slot), *slot))
                .collect();
            candidate.sort_by(|a, b| a.0.total_cmp(&b.0));
            let candidate: Vec<Slot> = candidate.into_iter().map(|(_, slot)| slot).collect();

            if weighted_crossings(&links, &candidate) < weighted_crossings(&links, &current) {
                trace!(rank; "Reordering rank by edge weight");
                for (i, slot) in candidate.into_iter().enumerate() {
                    self.slots[range.start + i] = Slot {
                        cross: current[i].cross,
                        ..slot
                    };
                }
            }
        }
    }

    /// Pushes every rank against the start (left) or end (right) of the
    /// block, keeping in-rank order.
    fn justify(&mut self, align: Align) {
        let span = self.span();
        for rank in 0..self.rank_count() {
            let range = self.rank_range(rank);
            let count = range.len();
            for (i, slot) in self.slots[range].iter_mut().enumerate() {
                slot.cross = if align.is_left() {
                    i as f32
                } else {
                    span - (count - i) as f32
                };
            }
        }
    }
}

/// Weighted mean cross position of a slot's upper neighbours. A slot with no
/// weighted neighbour keeps its own position.
fn barycenter(links: &[(f32, usize, f32)], slot: Slot) -> f32 {
    let (sum, total) = links
        .iter()
        .filter(|link| link.1 == slot.member)
        .fold((0.0, 0.0), |(sum, total), &(cross, _, weight)| {
            (sum + cross * weight, total + weight)
        });
    if total > 0.0 { sum / total } else { slot.cross }
}

/// Sum of `w1 * w2` over every pair of links that cross when the lower rank
/// is laid out in `order`.
fn weighted_crossings(links: &[(f32, usize, f32)], order: &[Slot]) -> f32 {
    let position: HashMap<usize, usize> = order
        .iter()
        .enumerate()
        .map(|(i, slot)| (slot.member, i))
        .collect();
    let ends: Vec<(f32, f32, f32)> = links
        .iter()
        .filter_map(|&(upper, lower, weight)| {
            position
                .get(&lower)
                .map(|&i| (upper, i as f32, weight))
        })
        .collect();

    let mut total = 0.0;
    for (i, a) in ends.iter().enumerate() {
        for b in &ends[i + 1..] {
            if (a.0 - b.0) * (a.1 - b.1) < 0.0 {
                total += a.2 * b.2;
            }
        }
    }
    total
}

/// The members of one group, or of the top level when `container` is `None`.
#[derive(Debug)]
struct Scope {
    container: Option<Id>,
    members: Vec<Member>,
}

/// A scope laid out in its own coordinates.
#[derive(Debug, Default)]
struct ScopeLayout {
    boxes: Vec<(Member, Bounds)>,
    /// Declaration order of the earliest node inside the scope.
    first_key: usize,
}

impl ScopeLayout {
    fn bounds(&self) -> Option<Bounds> {
        self.boxes.iter().map(|(_, b)| *b).reduce(|a, b| a.merge(&b))
    }
}

/// Group membership lookups over one model.
struct Containment<'a> {
    model: &'a GraphModel,
    nodes: Vec<&'a NodeSpec>,
}

impl<'a> Containment<'a> {
    fn new(model: &'a GraphModel) -> Self {
        Self {
            model,
            nodes: model.nodes().collect(),
        }
    }

    fn node_parent(&self, node: &NodeSpec) -> Option<Id> {
        node.parent_group()
            .filter(|group| self.model.contains_group(*group))
    }

    fn group_parent(&self, group: Id) -> Option<Id> {
        self.model
            .group(group)
            .and_then(|spec| spec.parent())
            .filter(|parent| *parent != group && self.model.contains_group(*parent))
    }

    fn depth(&self, group: Id) -> usize {
        let mut depth = 0;
        let mut current = self.group_parent(group);
        while let Some(parent) = current {
            depth += 1;
            if depth > self.model.group_count() {
                break;
            }
            current = self.group_parent(parent);
        }
        depth
    }

    /// Scopes ordered innermost first, the top level last.
    fn scopes(&self) -> Vec<Scope> {
        let mut groups: Vec<(usize, Id)> = self
            .model
            .groups()
            .map(|group| (self.depth(group.id()), group.id()))
            .collect();
        groups.sort_by(|a, b| b.0.cmp(&a.0));

        groups
            .into_iter()
            .map(|(_, id)| Some(id))
            .chain(std::iter::once(None))
            .map(|container| Scope {
                container,
                members: self.members(container),
            })
            .collect()
    }

    fn members(&self, container: Option<Id>) -> Vec<Member> {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| self.node_parent(node) == container)
            .map(|(i, _)| Member::Node(i));
        let groups = self
            .model
            .groups()
            .filter(|group| {
                Some(group.id()) != container && self.group_parent(group.id()) == container
            })
            .map(|group| Member::Group(group.id()));
        nodes.chain(groups).collect()
    }

    /// The member of `scope` containing node `index`, or `None` if the node
    /// lies outside `scope`.
    fn representative(&self, index: usize, scope: Option<Id>) -> Option<Member> {
        let node = self.nodes.get(index)?;
        let mut member = Member::Node(index);
        let mut container = self.node_parent(node);
        for _ in 0..=self.model.group_count() {
            if container == scope {
                return Some(member);
            }
            let group = container?;
            member = Member::Group(group);
            container = self.group_parent(group);
        }
        None
    }

    /// Edges of the model lifted onto the members of `scope`, merged per
    /// ordered pair with their weights summed.
    fn lifted_edges(
        &self,
        scope: Option<Id>,
        index: &HashMap<Member, usize>,
    ) -> IndexMap<(usize, usize), f32> {
        let mut lifted = IndexMap::new();
        for edge in self.model.edges() {
            if edge.is_self_loop() {
                continue;
            }
            let (Some(from), Some(to)) = (
                self.model.node_index(edge.from()),
                self.model.node_index(edge.to()),
            ) else {
                continue;
            };
            let (Some(from), Some(to)) = (
                self.representative(from, scope).and_then(|m| index.get(&m)),
                self.representative(to, scope).and_then(|m| index.get(&m)),
            ) else {
                continue;
            };
            if from != to {
                *lifted.entry((*from, *to)).or_insert(0.0) += edge.weight();
            }
        }
        lifted
    }
}

/// Layered layout engine backed by `rust-sugiyama`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Runs the backend over one scope and returns its components.
    fn blocks(
        &self,
        members: usize,
        edges: &IndexMap<(usize, usize), f32>,
        keys: &[usize],
    ) -> Result<Vec<Block>, GraphError> {
        // Backend vertex ids are dense: connected members only, in first-seen order.
        let mut vertices: IndexMap<usize, u32> = IndexMap::new();
        let mut backend_edges = Vec::with_capacity(edges.len());
        for &(from, to) in edges.keys() {
            let next = vertices.len() as u32;
            let from = *vertices.entry(from).or_insert(next);
            let next = vertices.len() as u32;
            let to = *vertices.entry(to).or_insert(next);
            backend_edges.push((from, to));
        }
        let weighted: Vec<(usize, usize, f32)> = edges
            .iter()
            .map(|(&(from, to), &weight)| (from, to, weight))
            .collect();

        let mut blocks = if backend_edges.is_empty() {
            Vec::new()
        } else {
            debug!(vertices = vertices.len(), edges = backend_edges.len(); "Running sugiyama backend");
            let components = run_backend(backend_edges.clone())?;
            let mut blocks = components
                .into_iter()
                .map(|coords| component_block(coords, &vertices, &backend_edges))
                .collect::<Result<Vec<_>, _>>()?;
            for block in &mut blocks {
                block.order_by_weight(&weighted);
            }
            blocks
        };

        let placed: HashSet<usize> = blocks
            .iter()
            .flat_map(|block| block.slots.iter().map(|s| s.member))
            .collect();
        if let Some(missing) = vertices.keys().find(|member| !placed.contains(member)) {
            return Err(GraphError::Layout(format!(
                "sugiyama backend did not place connected vertex #{missing}"
            )));
        }

        blocks.extend(
            (0..members)
                .filter(|member| !vertices.contains_key(member))
                .map(Block::single),
        );
        blocks.sort_by_key(|block| block.first_key(keys));

        Ok(blocks)
    }

    /// Lays out one scope in local coordinates.
    fn layout_scope(
        &self,
        containment: &Containment<'_>,
        scope: &Scope,
        inner: &HashMap<Id, ScopeLayout>,
        options: &LayoutOptions,
    ) -> Result<ScopeLayout, GraphError> {
        let padding = Insets::uniform(options.group_padding());

        // Empty groups have no content and take no room.
        let members: Vec<Member> = scope
            .members
            .iter()
            .copied()
            .filter(|member| match member {
                Member::Node(_) => true,
                Member::Group(id) => inner.contains_key(id),
            })
            .collect();
        if members.is_empty() {
            return Ok(ScopeLayout::default());
        }

        let mut sizes = Vec::with_capacity(members.len());
        let mut keys = Vec::with_capacity(members.len());
        for member in &members {
            match member {
                Member::Node(i) => {
                    let size = containment.nodes.get(*i).map_or_else(Size::default, |n| n.size());
                    sizes.push(size);
                    keys.push(*i);
                }
                Member::Group(id) => {
                    let content = inner.get(id);
                    let size = content
                        .and_then(ScopeLayout::bounds)
                        .map_or_else(Size::default, |b| b.to_size())
                        .add_padding(padding);
                    sizes.push(size);
                    keys.push(content.map_or(usize::MAX, |c| c.first_key));
                }
            }
        }

        let index: HashMap<Member, usize> =
            members.iter().enumerate().map(|(i, m)| (*m, i)).collect();
        let edges = containment.lifted_edges(scope.container, &index);
        debug!(
            scope:? = scope.container.map(|id| id.to_string()),
            members = members.len(),
            edges = edges.len();
            "Laying out containment scope"
        );

        let mut blocks = self.blocks(members.len(), &edges, &keys)?;
        if let Some(align) = options.align() {
            for block in &mut blocks {
                block.justify(align);
            }
        }

        let rankdir = options.rankdir();
        // (rank extent, cross extent) of a box
        let extent = |size: Size| {
            if rankdir.is_horizontal() {
                (size.width(), size.height())
            } else {
                (size.height(), size.width())
            }
        };

        let ranks = blocks.iter().map(Block::rank_count).max().unwrap_or(0);
        let mut depth = vec![0.0f32; ranks];
        for slot in blocks.iter().flat_map(|block| &block.slots) {
            depth[slot.rank] = depth[slot.rank].max(extent(sizes[slot.member]).0);
        }
        let mut rank_centers = Vec::with_capacity(ranks);
        let mut start = 0.0;
        for d in depth {
            rank_centers.push(start + d / 2.0);
            start += d + options.rank_spacing();
        }

        // One grid unit fits the widest node; nested groups may need more and
        // push their neighbours along instead.
        let node_cross = members
            .iter()
            .zip(&sizes)
            .filter(|(member, _)| matches!(member, Member::Node(_)))
            .map(|(_, size)| extent(*size).1)
            .fold(0.0f32, f32::max);
        let node_cross = if node_cross > 0.0 {
            node_cross
        } else {
            sizes.iter().map(|s| extent(*s).1).fold(0.0f32, f32::max)
        };
        let unit = node_cross + options.node_spacing();

        let mut boxes = vec![Bounds::default(); members.len()];
        let mut offset = 0.0f32;
        for block in &blocks {
            let mut block_end = offset;
            let mut previous: Option<(usize, f32)> = None;
            for slot in &block.slots {
                let (_, cross) = extent(sizes[slot.member]);
                let wanted = offset + slot.cross * unit + (node_cross - cross) / 2.0;
                let floor = match previous {
                    Some((rank, end)) if rank == slot.rank => end + options.node_spacing(),
                    _ => offset,
                };
                let begin = wanted.max(floor);
                previous = Some((slot.rank, begin + cross));
                block_end = block_end.max(begin + cross);

                let center = orient(rankdir, begin + cross / 2.0, rank_centers[slot.rank]);
                boxes[slot.member] = center.to_bounds(sizes[slot.member]);
            }
            offset = block_end + options.node_spacing();
        }

        trace!(blocks = blocks.len(), ranks; "Placed scope");
        Ok(ScopeLayout {
            first_key: keys.iter().copied().min().unwrap_or(usize::MAX),
            boxes: members.into_iter().zip(boxes).collect(),
        })
    }
}

impl LayoutEngine for Engine {
    fn layout(
        &self,
        model: &GraphModel,
        options: &LayoutOptions,
    ) -> Result<LayoutResult, GraphError> {
        let margin = options.margin();
        if model.node_count() == 0 {
            return Ok(LayoutResult::new(
                IndexMap::new(),
                IndexMap::new(),
                Size::new(margin * 2.0, margin * 2.0),
            ));
        }

        let containment = Containment::new(model);
        let mut inner: HashMap<Id, ScopeLayout> = HashMap::new();
        let mut top = ScopeLayout::default();

        for scope in containment.scopes() {
            let laid_out = self.layout_scope(&containment, &scope, &inner, options)?;
            match scope.container {
                Some(group) if laid_out.boxes.is_empty() => {
                    debug!(group:% = group; "Group has no members, no frame");
                }
                Some(group) => {
                    inner.insert(group, laid_out);
                }
                None => top = laid_out,
            }
        }

        let Some(total) = top.bounds() else {
            return Err(GraphError::Layout("layout produced no bounds".to_string()));
        };

        // Place the top level at the margin, then every group's content
        // inside its frame.
        let padding = options.group_padding();
        let shift = Point::new(margin - total.min_x(), margin - total.min_y());
        let mut pending: Vec<(Member, Bounds)> = top
            .boxes
            .iter()
            .map(|(member, bounds)| (*member, bounds.translate(shift)))
            .collect();
        let mut placed_nodes: HashMap<usize, Bounds> = HashMap::new();
        let mut frames: HashMap<Id, Bounds> = HashMap::new();

        while let Some((member, bounds)) = pending.pop() {
            match member {
                Member::Node(i) => {
                    placed_nodes.insert(i, bounds);
                }
                Member::Group(id) => {
                    frames.insert(id, bounds);
                    let Some(content) = inner.get(&id) else {
                        continue;
                    };
                    let Some(content_bounds) = content.bounds() else {
                        continue;
                    };
                    let offset = bounds
                        .min_point()
                        .add_point(Point::new(padding, padding))
                        .sub_point(content_bounds.min_point());
                    pending.extend(
                        content
                            .boxes
                            .iter()
                            .map(|(member, b)| (*member, b.translate(offset))),
                    );
                }
            }
        }

        let mut nodes = IndexMap::with_capacity(model.node_count());
        for (i, node) in containment.nodes.iter().enumerate() {
            let bounds = placed_nodes.get(&i).ok_or_else(|| {
                GraphError::Layout(format!("node {} was not placed", node.id()))
            })?;
            nodes.insert(node.id(), NodeRect::new(bounds.center(), node.size()));
        }
        let groups: IndexMap<Id, Bounds> = model
            .groups()
            .filter_map(|group| frames.get(&group.id()).map(|frame| (group.id(), *frame)))
            .collect();

        let size = Size::new(total.width() + margin * 2.0, total.height() + margin * 2.0);
        trace!(groups = groups.len(), width = size.width(), height = size.height(); "Placed diagram");
        Ok(LayoutResult::new(nodes, groups, size))
    }
}

/// Maps grid coordinates (cross, rank) to diagram coordinates.
fn orient(rankdir: RankDir, cross: f32, rank: f32) -> Point {
    match rankdir {
        RankDir::TB => Point::new(cross, rank),
        RankDir::BT => Point::new(cross, -rank),
        RankDir::LR => Point::new(rank, cross),
        RankDir::RL => Point::new(-rank, cross),
    }
}

type Coords = Vec<(usize, f32, f32)>;

/// Invokes the backend, turning a panic into a layout error.
fn run_backend(edges: Vec<(u32, u32)>) -> Result<Vec<Coords>, GraphError> {
    let layouts = panic::catch_unwind(move || {
        let config = Config {
            minimum_length: 1,
            vertex_spacing: 3.0,
            ..Default::default()
        };
        rust_sugiyama::from_edges(&edges, &config)
    })
    .map_err(|payload| {
        let message = panic_message(payload.as_ref());
        warn!(message = message.as_str(); "Sugiyama backend panicked");
        GraphError::Layout(format!("sugiyama backend panicked: {message}"))
    })?;

    Ok(layouts
        .into_iter()
        .map(|(coords, _, _)| {
            coords
                .into_iter()
                .map(|(id, (x, y))| (id as usize, x as f32, y as f32))
                .collect()
        })
        .collect())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    }
}

/// Turns one backend component into a [`Block`].
///
/// Ranks come from the distinct y values. The backend's y axis may point
/// either way, so ranks are flipped if most edges would otherwise point
/// against the flow.
fn component_block(
    coords: Coords,
    vertices: &IndexMap<usize, u32>,
    edges: &[(u32, u32)],
) -> Result<Block, GraphError> {
    let mut levels: Vec<f32> = coords.iter().map(|&(_, _, y)| y).collect();
    levels.sort_by(f32::total_cmp);
    levels.dedup_by(|a, b| (*a - *b).abs() <= RANK_EPSILON);

    let mut ranks: HashMap<u32, usize> = HashMap::new();
    let mut slots = Vec::with_capacity(coords.len());
    for (vertex, x, y) in coords {
        let Some((&member, &id)) = vertices.get_index(vertex) else {
            return Err(GraphError::Layout(format!(
                "sugiyama backend returned unknown vertex {vertex}"
            )));
        };
        let rank = levels
            .iter()
            .position(|level| (level - y).abs() <= RANK_EPSILON)
            .unwrap_or_default();
        ranks.insert(id, rank);
        slots.push(Slot {
            member,
            rank,
            cross: x / VERTEX_SPACING,
        });
    }

    let (forward, backward) = edges.iter().fold((0, 0), |(f, b), (from, to)| {
        match (ranks.get(from), ranks.get(to)) {
            (Some(a), Some(b2)) if a < b2 => (f + 1, b),
            (Some(a), Some(b2)) if a > b2 => (f, b + 1),
            _ => (f, b),
        }
    });
    if backward > forward {
        let deepest = levels.len().saturating_sub(1);
        for slot in &mut slots {
            slot.rank = deepest - slot.rank;
        }
    }

    Ok(Block::from_slots(slots))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use nut_graph_core::model::{EdgeKey, EdgeSpec, GroupSpec};

    use super::*;

    fn model(nodes: &[(&str, Option<&str>)], edges: &[(&str, &str)]) -> GraphModel {
        weighted_model(
            nodes,
            &edges.iter().map(|&(f, t)| (f, t, 1.0)).collect::<Vec<_>>(),
        )
    }

    fn weighted_model(nodes: &[(&str, Option<&str>)], edges: &[(&str, &str, f32)]) -> GraphModel {
        let mut model = GraphModel::new();
        for &(id, group) in nodes {
            if let Some(group) = group {
                let group = Id::new(group);
                if !model.contains_group(group) {
                    model.insert_group(GroupSpec::new(group, None));
                }
            }
            model.insert_node(NodeSpec::new(
                Id::new(id),
                Size::new(80.0, 40.0),
                id,
                group.map(Id::new),
            ));
        }
        for &(from, to, weight) in edges {
            let (from, to) = (Id::new(from), Id::new(to));
            let key = model.next_pair_key(from, to);
            model.push_edge(EdgeSpec::new(key, from, to).with_weight(weight));
        }
        model
    }

    fn center(result: &LayoutResult, id: &str) -> Point {
        result.node(Id::new(id)).expect("placed").center()
    }

    fn bounds(result: &LayoutResult, id: &str) -> Bounds {
        result.node(Id::new(id)).expect("placed").bounds()
    }

    fn layout(model: &GraphModel, rankdir: RankDir, align: Option<Align>) -> LayoutResult {
        Engine::new()
            .layout(model, &LayoutOptions::new(rankdir, align))
            .expect("layout")
    }

    /// Every group frame holds exactly its own descendants: members inside,
    /// everything else outside, and no two node boxes overlap.
    fn assert_compound(model: &GraphModel, result: &LayoutResult) {
        let containment = Containment::new(model);
        for (group, frame) in result.groups() {
            for (i, node) in containment.nodes.iter().enumerate() {
                let node_bounds = result.node(node.id()).expect("placed").bounds();
                let inside = containment.representative(i, Some(group)).is_some();
                if inside {
                    assert!(
                        frame.contains(node_bounds.min_point()) && frame.contains(node_bounds.center()),
                        "member {} outside frame of {group}",
                        node.id()
                    );
                } else {
                    assert!(
                        !frame.intersects(&node_bounds),
                        "non-member {} overlaps frame of {group}",
                        node.id()
                    );
                }
            }
        }

        let boxes: Vec<(Id, Bounds)> = result.nodes().map(|(id, r)| (id, r.bounds())).collect();
        for (i, (a, ab)) in boxes.iter().enumerate() {
            for (b, bb) in &boxes[i + 1..] {
                assert!(!ab.intersects(bb), "{a} overlaps {b}");
            }
        }
    }

    #[test]
    fn test_rank_direction_orders_nodes() {
        let chain = model(&[("a", None), ("b", None), ("c", None)], &[("a", "b"), ("b", "c")]);

        let tb = layout(&chain, RankDir::TB, None);
        assert!(center(&tb, "a").y() < center(&tb, "b").y());
        assert!(center(&tb, "b").y() < center(&tb, "c").y());
        assert_approx_eq!(f32, center(&tb, "b").y() - center(&tb, "a").y(), 90.0);

        let bt = layout(&chain, RankDir::BT, None);
        assert!(center(&bt, "a").y() > center(&bt, "b").y());

        let lr = layout(&chain, RankDir::LR, None);
        assert!(center(&lr, "a").x() < center(&lr, "b").x());
        assert_approx_eq!(f32, center(&lr, "b").x() - center(&lr, "a").x(), 130.0);

        let rl = layout(&chain, RankDir::RL, None);
        assert!(center(&rl, "a").x() > center(&rl, "b").x());
    }

    #[test]
    fn test_margin_and_size() {
        let result = layout(&model(&[("a", None), ("b", None)], &[("a", "b")]), RankDir::TB, None);

        let total = result
            .nodes()
            .map(|(_, rect)| rect.bounds())
            .reduce(|a, b| a.merge(&b))
            .expect("nodes");
        assert_approx_eq!(f32, total.min_x(), 16.0);
        assert_approx_eq!(f32, total.min_y(), 16.0);
        assert_approx_eq!(f32, result.size().width(), total.max_x() + 16.0);
        assert_approx_eq!(f32, result.size().height(), total.max_y() + 16.0);
    }

    #[test]
    fn test_isolated_nodes_and_loops_are_placed() {
        let graph = model(
            &[("a", None), ("b", None), ("lonely", None), ("loop", None)],
            &[("a", "b"), ("a", "b"), ("loop", "loop")],
        );
        let result = layout(&graph, RankDir::TB, None);

        assert_eq!(result.nodes().count(), 4);
        let lonely = bounds(&result, "lonely");
        let looped = bounds(&result, "loop");
        let a = bounds(&result, "a");
        assert!(lonely.min_x() >= a.max_x());
        assert!(looped.min_x() >= lonely.max_x());
        assert_approx_eq!(f32, lonely.center().y(), a.center().y());
    }

    #[test]
    fn test_left_alignment_packs_ranks() {
        let fork = model(&[("a", None), ("b", None), ("c", None)], &[("a", "b"), ("a", "c")]);

        let left = layout(&fork, RankDir::TB, Some(Align::UL));
        let leftmost = center(&left, "b").x().min(center(&left, "c").x());
        assert_approx_eq!(f32, center(&left, "a").x(), leftmost);

        let right = layout(&fork, RankDir::TB, Some(Align::DR));
        let rightmost = center(&right, "b").x().max(center(&right, "c").x());
        assert_approx_eq!(f32, center(&right, "a").x(), rightmost);
    }

    #[test]
    fn test_group_frames_enclose_members() {
        let graph = model(
            &[("a", Some("g")), ("b", Some("g")), ("c", None)],
            &[("a", "c"), ("b", "c")],
        );
        let result = layout(&graph, RankDir::TB, None);

        let frame = result.group(Id::new("g")).expect("frame");
        for id in ["a", "b"] {
            let node = bounds(&result, id);
            assert!(frame.min_x() <= node.min_x() - 8.0 + 1e-3);
            assert!(frame.max_y() >= node.max_y() + 8.0 - 1e-3);
        }
        assert_compound(&graph, &result);
    }

    #[test]
    fn test_outsiders_stay_out_of_group_frames() {
        // outsiders wired into the middle of the group
        let interleaved = model(
            &[("a", Some("g")), ("b", Some("g")), ("c", None), ("d", None)],
            &[("c", "a"), ("d", "b"), ("c", "d")],
        );
        // a node declared before the group, pointing at its second member
        let leading = model(
            &[("a0", None), ("a", Some("g")), ("b", Some("g"))],
            &[("a0", "b")],
        );

        for graph in [&interleaved, &leading] {
            for rankdir in RankDir::ALL {
                let result = layout(graph, rankdir, None);
                assert!(result.group(Id::new("g")).is_some());
                assert_compound(graph, &result);
            }
        }
    }

    #[test]
    fn test_group_is_ranked_as_one_vertex() {
        let graph = model(
            &[("src", None), ("a", Some("g")), ("b", Some("g")), ("sink", None)],
            &[("src", "a"), ("b", "sink")],
        );
        let result = layout(&graph, RankDir::TB, None);
        let frame = result.group(Id::new("g")).expect("frame");

        assert!(bounds(&result, "src").max_y() <= frame.min_y());
        assert!(bounds(&result, "sink").min_y() >= frame.max_y());
        assert_compound(&graph, &result);
    }

    #[test]
    fn test_nested_and_empty_groups() {
        let mut graph = model(&[("a", None)], &[]);
        graph.insert_group(GroupSpec::new(Id::new("outer"), None));
        graph.insert_group(GroupSpec::new(Id::new("inner"), Some(Id::new("outer"))));
        graph.insert_group(GroupSpec::new(Id::new("empty"), None));
        graph.insert_node(NodeSpec::new(
            Id::new("x"),
            Size::new(80.0, 40.0),
            "x",
            Some(Id::new("inner")),
        ));
        graph.insert_node(NodeSpec::new(
            Id::new("y"),
            Size::new(80.0, 40.0),
            "y",
            Some(Id::new("outer")),
        ));
        let (a, x) = (Id::new("a"), Id::new("x"));
        graph.push_edge(EdgeSpec::new(graph.next_pair_key(a, x), a, x));

        let result = layout(&graph, RankDir::TB, None);
        let inner = result.group(Id::new("inner")).expect("inner frame");
        let outer = result.group(Id::new("outer")).expect("outer frame");
        assert!(result.group(Id::new("empty")).is_none());
        assert!(outer.contains(inner.min_point()));
        assert!(outer.contains(Point::new(inner.max_x(), inner.max_y())));
        assert_approx_eq!(f32, inner.width(), 96.0);
        assert_compound(&graph, &result);
    }

    #[test]
    fn test_empty_model() {
        let result = layout(&GraphModel::new(), RankDir::TB, None);
        assert_eq!(result.size(), Size::new(32.0, 32.0));
        assert_eq!(result.nodes().count(), 0);
    }

    #[test]
    fn test_edge_keys_do_not_matter_to_layout() {
        let mut graph = model(&[("a", None), ("b", None)], &[]);
        let (a, b) = (Id::new("a"), Id::new("b"));
        graph.push_edge(EdgeSpec::new(EdgeKey::Named(Id::new("e")), a, b));

        let result = layout(&graph, RankDir::TB, None);
        assert!(center(&result, "a").y() < center(&result, "b").y());
    }

    #[test]
    fn test_heavy_edges_do_not_cross() {
        let nodes = [("a", None), ("b", None), ("c", None), ("d", None)];
        let straight = |heavy: [(&'static str, &'static str); 2]| {
            let edges: Vec<(&str, &str, f32)> = [("a", "c"), ("a", "d"), ("b", "c"), ("b", "d")]
                .into_iter()
                .map(|(f, t)| (f, t, if heavy.contains(&(f, t)) { 100.0 } else { 1.0 }))
                .collect();
            layout(&weighted_model(&nodes, &edges), RankDir::TB, None)
        };

        let crossed = straight([("a", "d"), ("b", "c")]);
        let parallel = straight([("a", "c"), ("b", "d")]);
        let left = |r: &LayoutResult, x: &str, y: &str| center(r, x).x() < center(r, y).x();

        assert_eq!(left(&crossed, "a", "b"), left(&crossed, "d", "c"));
        assert_eq!(left(&parallel, "a", "b"), left(&parallel, "c", "d"));
        assert_ne!(crossed, parallel);
    }

    #[test]
    fn test_order_by_weight() {
        let slots = vec![
            Slot { member: 0, rank: 0, cross: 0.0 },
            Slot { member: 1, rank: 0, cross: 1.0 },
            Slot { member: 2, rank: 1, cross: 0.0 },
            Slot { member: 3, rank: 1, cross: 1.0 },
        ];
        let order = |block: &Block| -> Vec<usize> {
            let mut lower: Vec<&Slot> = block.slots.iter().filter(|s| s.rank == 1).collect();
            lower.sort_by(|a, b| a.cross.total_cmp(&b.cross));
            lower.into_iter().map(|s| s.member).collect()
        };

        let mut uniform = Block::from_slots(slots.clone());
        uniform.order_by_weight(&[(0, 2, 1.0), (0, 3, 1.0), (1, 2, 1.0), (1, 3, 1.0)]);
        assert_eq!(order(&uniform), vec![2, 3]);

        let mut weighted = Block::from_slots(slots);
        weighted.order_by_weight(&[(0, 2, 1.0), (0, 3, 100.0), (1, 2, 100.0), (1, 3, 1.0)]);
        assert_eq!(order(&weighted), vec![3, 2]);
        assert_eq!(weighted.span(), 2.0);
    }

    #[test]
    fn test_block_slots_keep_gap() {
        let block = Block::from_slots(vec![
            Slot { member: 0, rank: 0, cross: 4.0 },
            Slot { member: 1, rank: 0, cross: 4.2 },
            Slot { member: 2, rank: 1, cross: 5.0 },
        ]);
        let crosses: Vec<f32> = block.slots.iter().map(|s| s.cross).collect();
        assert_eq!(crosses, vec![0.0, 1.0, 1.0]);
        assert_eq!(block.span(), 2.0);
    }
}
