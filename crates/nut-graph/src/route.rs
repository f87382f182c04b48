//! Edge geometry.
//!
//! Resolves where an edge attaches to its two node rectangles and the cubic
//! curve between those anchors. Both depend on the rank direction only:
//!
//! | rankdir | source side | target side | curve  |
//! |---------|-------------|-------------|--------|
//! | TB      | bottom      | top         | bump-y |
//! | BT      | top         | bottom      | bump-y |
//! | LR      | right       | left        | bump-x |
//! | RL      | left        | right       | bump-x |
//!
//! An offset slides the anchor along the node side: along x for top/bottom
//! anchors, along y for left/right anchors. Offsets are not clamped to the
//! side's length.

use std::fmt::Write as _;

use nut_graph_core::{
    direction::RankDir,
    geometry::{Bounds, Point, Size},
};

/// A side of a node rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Tangent bias of an edge curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveFamily {
    /// Control points share the endpoints' y; the curve leaves and enters
    /// horizontally.
    BumpX,
    /// Control points share the endpoints' x; the curve leaves and enters
    /// vertically.
    BumpY,
}

/// Which sides an edge attaches to, and how it bends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeOrientation {
    pub source: Side,
    pub target: Side,
    pub curve: CurveFamily,
}

/// Anchor sides and curve family for a rank direction.
pub fn edge_orientation(rankdir: RankDir) -> EdgeOrientation {
    let (source, target, curve) = match rankdir {
        RankDir::TB => (Side::Bottom, Side::Top, CurveFamily::BumpY),
        RankDir::BT => (Side::Top, Side::Bottom, CurveFamily::BumpY),
        RankDir::LR => (Side::Right, Side::Left, CurveFamily::BumpX),
        RankDir::RL => (Side::Left, Side::Right, CurveFamily::BumpX),
    };
    EdgeOrientation {
        source,
        target,
        curve,
    }
}

/// Point on `side` of the rectangle centered at `center`, slid by `offset`.
///
/// # Examples
///
/// ```
/// # use nut_graph::route::{anchor_point, Side};
/// # use nut_graph_core::geometry::{Point, Size};
/// let center = Point::new(100.0, 50.0);
/// let size = Size::new(80.0, 40.0);
///
/// assert_eq!(anchor_point(center, size, Side::Bottom, 0.0), Point::new(100.0, 70.0));
/// assert_eq!(anchor_point(center, size, Side::Left, 5.0), Point::new(60.0, 55.0));
/// ```
pub fn anchor_point(center: Point, size: Size, side: Side, offset: f32) -> Point {
    let half_w = size.width() / 2.0;
    let half_h = size.height() / 2.0;
    match side {
        Side::Top => Point::new(center.x() + offset, center.y() - half_h),
        Side::Bottom => Point::new(center.x() + offset, center.y() + half_h),
        Side::Left => Point::new(center.x() - half_w, center.y() + offset),
        Side::Right => Point::new(center.x() + half_w, center.y() + offset),
    }
}

/// A cubic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePath {
    start: Point,
    c1: Point,
    c2: Point,
    end: Point,
}

impl CurvePath {
    /// Builds the curve between two anchors. The control points sit halfway
    /// along the dominant axis.
    pub fn new(start: Point, end: Point, family: CurveFamily) -> Self {
        let (c1, c2) = match family {
            CurveFamily::BumpX => {
                let mx = (start.x() + end.x()) / 2.0;
                (Point::new(mx, start.y()), Point::new(mx, end.y()))
            }
            CurveFamily::BumpY => {
                let my = (start.y() + end.y()) / 2.0;
                (Point::new(start.x(), my), Point::new(end.x(), my))
            }
        };
        Self { start, c1, c2, end }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn control_points(&self) -> (Point, Point) {
        (self.c1, self.c2)
    }

    /// Straight-line midpoint between the endpoints.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// SVG path data, `M x y C x1 y1, x2 y2, x y`.
    pub fn to_path_data(&self) -> String {
        let mut data = String::new();
        let _ = write!(
            data,
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x(),
            self.start.y(),
            self.c1.x(),
            self.c1.y(),
            self.c2.x(),
            self.c2.y(),
            self.end.x(),
            self.end.y()
        );
        data
    }
}

/// A placed rectangle: center and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center: Point,
    pub size: Size,
}

/// Geometry of one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEdge {
    pub path: CurvePath,
    /// Box of the edge label, centered on the straight midpoint.
    pub label_box: Option<Bounds>,
}

/// Resolves anchors, curve and label box of an edge.
pub fn resolve_edge(
    source: Rect,
    target: Rect,
    rankdir: RankDir,
    offsets: (f32, f32),
    label_size: Option<Size>,
) -> ResolvedEdge {
    let orientation = edge_orientation(rankdir);
    let start = anchor_point(source.center, source.size, orientation.source, offsets.0);
    let end = anchor_point(target.center, target.size, orientation.target, offsets.1);
    let path = CurvePath::new(start, end, orientation.curve);

    ResolvedEdge {
        label_box: label_size.map(|size| path.midpoint().to_bounds(size)),
        path,
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Both anchors lie on the boundary of their rectangle, on the side the
    /// orientation table names, whenever the offset fits the side.
    fn check_anchors_on_boundary(
        rankdir: RankDir,
        source: Rect,
        target: Rect,
        offsets: (f32, f32),
    ) -> Result<(), TestCaseError> {
        let edge = resolve_edge(source, target, rankdir, offsets, None);
        let orientation = edge_orientation(rankdir);

        for (rect, anchor, side) in [
            (source, edge.path.start(), orientation.source),
            (target, edge.path.end(), orientation.target),
        ] {
            let bounds = rect.center.to_bounds(rect.size);
            let eps = 1e-3 * (1.0 + rect.center.x().abs().max(rect.center.y().abs()));
            prop_assert!(bounds.is_on_boundary(anchor, eps));

            let on_side = match side {
                Side::Top => (anchor.y() - bounds.min_y()).abs() <= eps,
                Side::Bottom => (anchor.y() - bounds.max_y()).abs() <= eps,
                Side::Left => (anchor.x() - bounds.min_x()).abs() <= eps,
                Side::Right => (anchor.x() - bounds.max_x()).abs() <= eps,
            };
            prop_assert!(on_side, "{:?} anchor {:?} not on {:?}", rankdir, anchor, side);
        }
        Ok(())
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 10.0f32..200.0, 10.0f32..200.0).prop_map(
            |(x, y, w, h)| Rect {
                center: Point::new(x, y),
                size: Size::new(w, h),
            },
        )
    }

    proptest! {
        #[test]
        fn anchors_on_boundary(
            rankdir in prop::sample::select(RankDir::ALL.to_vec()),
            source in rect_strategy(),
            target in rect_strategy(),
            offsets in (-4.0f32..4.0, -4.0f32..4.0),
        ) {
            check_anchors_on_boundary(rankdir, source, target, offsets)?;
        }
    }
}
