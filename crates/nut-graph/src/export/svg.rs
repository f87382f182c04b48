//! SVG export.
//!
//! Document structure:
//!
//! ```text
//! <svg width height min-width min-height viewBox style="object-fit: none;">
//!   <rect/>                           optional background
//!   <g transform="translate(-x -y) scale(s)">
//!     <rect class="nut-graph-group"/>  one per group frame
//!     <path d=.. class|style/>         one per edge
//!     <foreignObject>                  one per edge label
//!     <foreignObject>                  one per node
//!   </g>
//! </svg>
//! ```
//!
//! Labels are carried as text inside an XHTML `div`, so the host's CSS
//! applies to them.

use log::{debug, info};
use svg::{
    Document, Node,
    node::{
        Text as SvgText,
        element::{self as svg_element, Element},
    },
};

use nut_graph_core::geometry::{Bounds, Size};

use crate::{config::StyleConfig, scene::Scene, viewport::ViewportState};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Class of group frame rectangles.
pub const GROUP_CLASS: &str = "nut-graph-group";

/// Renders a [`Scene`] under a viewport transform.
#[derive(Debug, Clone, Default)]
pub struct SvgExporter {
    style: StyleConfig,
}

impl SvgExporter {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Renders the scene to an SVG string.
    pub fn render(&self, scene: &Scene, viewport: &ViewportState) -> String {
        let doc = self.document(scene, viewport);
        info!(
            nodes = scene.nodes().len(),
            edges = scene.edges().len();
            "SVG rendered"
        );
        doc.to_string()
    }

    /// Builds the SVG document for the scene.
    pub fn document(&self, scene: &Scene, viewport: &ViewportState) -> Document {
        let size = scene.size();
        let mut doc = Document::new()
            .set("xmlns", SVG_NS)
            .set("width", size.width())
            .set("height", size.height())
            .set("min-width", size.width())
            .set("min-height", size.height())
            .set("style", "object-fit: none;")
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()));

        if let Some(color) = self.style.background_color() {
            doc = doc.add(self.background(size, color));
        }

        let mut group = svg_element::Group::new().set("transform", viewport.transform());

        for frame in scene.groups() {
            group = group.add(
                svg_element::Rectangle::new()
                    .set("class", GROUP_CLASS)
                    .set("data-id", frame.id.to_string())
                    .set("x", frame.bounds.min_x())
                    .set("y", frame.bounds.min_y())
                    .set("width", frame.bounds.width())
                    .set("height", frame.bounds.height())
                    .set("fill", "none")
                    .set("stroke", "currentColor")
                    .set("stroke-dasharray", "4 2"),
            );
        }

        for edge in scene.edges() {
            let path = svg_element::Path::new()
                .set("d", edge.curve.to_path_data())
                .set("data-id", edge.key.to_string());
            let path = match &edge.style_class {
                Some(class) => path.set("class", class.as_str()),
                None => path.set("style", self.style.edge_style()),
            };
            group = group.add(path);

            if let Some(label) = &edge.label {
                group = group.add(label_object(label.bounds, &label.text));
            }
        }

        for node in scene.nodes() {
            let mut object = label_object(node.bounds, &node.label);
            object.assign("data-id", node.id.to_string());
            group = group.add(object);
        }

        debug!(transform = viewport.transform().as_str(); "SVG document built");
        doc.add(group)
    }

    fn background(&self, size: Size, color: &str) -> svg_element::Rectangle {
        svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", color)
    }
}

/// A `foreignObject` covering `bounds` with `text` in an XHTML `div`.
fn label_object(bounds: Bounds, text: &str) -> Element {
    let mut div = Element::new("div");
    div.assign("xmlns", XHTML_NS);
    div.append(SvgText::new(text));

    let mut object = Element::new("foreignObject");
    object.assign("x", bounds.min_x());
    object.assign("y", bounds.min_y());
    object.assign("width", bounds.width());
    object.assign("height", bounds.height());
    object.append(div);
    object
}
