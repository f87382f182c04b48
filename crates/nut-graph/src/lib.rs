//! nut-graph - an interactive hierarchical diagram widget.
//!
//! A declarative tree of group, node and edge descriptors is turned into an
//! automatically laid out, pannable and zoomable diagram. Two entry points
//! are provided:
//!
//! - [`GraphWidget`] is the live runtime: it observes edits to the
//!   descriptor tree, coalesces them into debounced render passes and keeps
//!   its viewport state across passes.
//! - [`GraphBuilder`] renders a markup document to SVG once.

pub mod attributes;
pub mod config;
pub mod export;
pub mod extract;
pub mod layout;
pub mod route;
pub mod scene;
pub mod scheduler;
pub mod viewport;
pub mod widget;

mod error;

pub use nut_graph_core::{descriptor, direction, geometry, identifier, model, text};
pub use nut_graph_markup::Document;

pub use error::{AttributeError, GraphError};
pub use widget::{GraphWidget, HostMetrics, TickOutcome};

use log::{debug, info, trace};

use nut_graph_core::{
    geometry::Size,
    text::{FontMeasure, TextMeasure},
};

use attributes::{AttributeKey, AttributeSynchronizer};
use config::AppConfig;
use export::svg::SvgExporter;
use extract::ModelExtractor;
use layout::{LayoutOptions, LayoutOrchestrator};
use scene::Scene;

/// Builder for parsing and rendering nut-graph markup in one shot.
///
/// # Examples
///
/// ```rust,no_run
/// use nut_graph::{GraphBuilder, config::AppConfig};
///
/// let source = r#"
///     <nut-graph rankdir="LR">
///       <nut-graph-node id="ups">UPS</nut-graph-node>
///       <nut-graph-node id="load">Load</nut-graph-node>
///       <nut-graph-link from="ups" to="load">5 A</nut-graph-link>
///     </nut-graph>
/// "#;
///
/// let builder = GraphBuilder::new(AppConfig::default());
/// let document = builder.parse(source).expect("Failed to parse");
/// let svg = builder.render_svg(&document).expect("Failed to render");
/// ```
pub struct GraphBuilder {
    config: AppConfig,
    measure: Box<dyn TextMeasure>,
}

impl GraphBuilder {
    /// Create a new builder. Labels are measured with real font metrics in
    /// the configured label style.
    pub fn new(config: AppConfig) -> Self {
        let measure = FontMeasure::new(config.style().text_style());
        Self {
            config,
            measure: Box::new(measure),
        }
    }

    /// Replaces the label measure.
    pub fn with_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    /// Parse markup source into a [`Document`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Parse`] carrying the source for diagnostics.
    pub fn parse(&self, source: &str) -> Result<Document, GraphError> {
        info!("Parsing markup document");

        let document = nut_graph_markup::parse(source)
            .map_err(|err| GraphError::new_parse_error(err, source))?;

        debug!(
            attributes = document.attributes().len(),
            descriptors = document.descriptors().len();
            "Document parsed successfully"
        );
        trace!(document:?; "Parsed document");

        Ok(document)
    }

    /// Render a document to an SVG string.
    ///
    /// The root attributes of the document provide the viewport: pan
    /// offset, scale, rank direction and alignment.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Attribute`] for an invalid root configuration
    /// value and [`GraphError::Layout`] when the layout fails.
    pub fn render_svg(&self, document: &Document) -> Result<String, GraphError> {
        for (name, value) in document.attributes() {
            if let Ok(key) = name.parse::<AttributeKey>() {
                attributes::validate(key, value)?;
            }
        }

        let state = AttributeSynchronizer::new().initial_state(
            document
                .attributes()
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
        info!(rankdir:% = state.rankdir(), scale = state.scale(); "Rendering document");

        let extractor =
            ModelExtractor::new(self.measure.as_ref(), self.config.style().node_padding());
        let model = extractor.extract(document.descriptors());

        let options =
            LayoutOptions::from_config(self.config.layout(), state.rankdir(), state.align());
        let layout = LayoutOrchestrator::default().compute(&model, &options, Size::default())?;

        let scene = Scene::build(&model, &layout, state.rankdir());
        let state = state.with_size(scene.size());

        Ok(SvgExporter::new(self.config.style().clone()).render(&scene, &state))
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
