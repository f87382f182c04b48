//! The interactive widget runtime.
//!
//! [`GraphWidget`] ties the pieces together for a long-lived, host-embedded
//! diagram. The host owns the event loop and the clock: it feeds change
//! records, attribute writes and pointer events in, and calls
//! [`GraphWidget::tick`] whenever [`GraphWidget::next_deadline`] is reached.
//!
//! A render pass runs extraction, layout and edge resolution back to back
//! and swaps the resulting [`Scene`] in as a whole. A failed pass leaves the
//! previous scene in place. The viewport state survives every pass.

use std::time::Instant;

use log::{debug, info, warn};

use nut_graph_core::{
    descriptor::Descriptor,
    geometry::Size,
    text::{FontMeasure, TextMeasure},
};

use crate::{
    attributes::{AttributeEffect, AttributeKey, AttributeSynchronizer},
    config::AppConfig,
    error::{AttributeError, GraphError},
    export::svg::SvgExporter,
    extract::ModelExtractor,
    layout::{LayoutEngine, LayoutOptions, LayoutOrchestrator},
    scene::Scene,
    scheduler::{ChangeRecord, ChangeTarget, RenderScheduler, SchedulerEvent, Subscription},
    viewport::{ViewportController, ViewportEvent, ViewportState},
};

/// Size of the host container at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HostMetrics {
    /// Visible area.
    pub client: Size,
    /// Full scrollable content area.
    pub scroll: Size,
}

impl HostMetrics {
    pub fn new(client: Size, scroll: Size) -> Self {
        Self { client, scroll }
    }
}

/// What a [`GraphWidget::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// A new scene was committed.
    Rendered { nodes: usize, edges: usize },
    /// The pass failed; the previous scene is still shown.
    RenderFailed,
    /// The stored diagram size was refreshed.
    Resized { size: Size },
}

/// A live diagram bound to a descriptor tree.
pub struct GraphWidget {
    config: AppConfig,
    tree: Vec<Descriptor>,
    attributes: AttributeSynchronizer,
    viewport: ViewportController,
    scheduler: RenderScheduler,
    layout: LayoutOrchestrator,
    measure: Box<dyn TextMeasure>,
    exporter: SvgExporter,
    scene: Option<Scene>,
    scroll_size: Size,
    render_passes: usize,
}

impl GraphWidget {
    /// Creates a detached widget measuring labels with real font metrics.
    pub fn new(config: AppConfig) -> Self {
        let measure = FontMeasure::new(config.style().text_style());
        Self::with_parts(
            config,
            Box::new(measure),
            LayoutOrchestrator::default(),
        )
    }

    /// Replaces the label measure.
    pub fn with_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    /// Replaces the layout engine.
    pub fn with_engine(mut self, engine: Box<dyn LayoutEngine>) -> Self {
        self.layout = LayoutOrchestrator::new(engine);
        self
    }

    fn with_parts(
        config: AppConfig,
        measure: Box<dyn TextMeasure>,
        layout: LayoutOrchestrator,
    ) -> Self {
        Self {
            attributes: AttributeSynchronizer::new(),
            viewport: ViewportController::new(
                ViewportState::default(),
                config.viewport().zoom_step(),
            ),
            scheduler: RenderScheduler::new(config.scheduler()),
            exporter: SvgExporter::new(config.style().clone()),
            config,
            tree: Vec::new(),
            layout,
            measure,
            scene: None,
            scroll_size: Size::default(),
            render_passes: 0,
        }
    }

    /// Binds the widget to a descriptor tree and its root attributes, and
    /// schedules the first render pass for the next tick.
    ///
    /// Dropping or revoking the returned handle detaches the widget.
    pub fn attach<'a>(
        &mut self,
        tree: Vec<Descriptor>,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
        metrics: HostMetrics,
        now: Instant,
    ) -> Subscription {
        let state = self.attributes.initial_state(attributes);
        self.viewport.set_state(state);
        self.viewport.set_client_size(metrics.client);
        self.scroll_size = metrics.scroll;
        self.tree = tree;

        info!(
            descriptors = self.tree.len(),
            rankdir:% = state.rankdir(),
            scale = state.scale();
            "Widget attached"
        );
        self.scheduler.attach(now)
    }

    /// Stops observing. Pending passes are dropped.
    pub fn detach(&mut self) {
        self.scheduler.detach();
        info!("Widget detached");
    }

    pub fn is_attached(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn tree(&self) -> &[Descriptor] {
        &self.tree
    }

    /// Edits the descriptor tree and records the change.
    pub fn edit<F>(&mut self, now: Instant, edit: F)
    where
        F: FnOnce(&mut Vec<Descriptor>),
    {
        edit(&mut self.tree);
        self.notify(
            &ChangeRecord::ChildList {
                target: ChangeTarget::Descendant,
            },
            now,
        );
    }

    /// Feeds a host change record. Returns `true` if it scheduled work.
    pub fn notify(&mut self, record: &ChangeRecord, now: Instant) -> bool {
        self.scheduler.observe(record, now)
    }

    /// Writes a configuration attribute (`None` removes it).
    ///
    /// # Errors
    ///
    /// Returns the rejection when the name or value is invalid; the widget
    /// keeps its previous state.
    pub fn set_attribute(
        &mut self,
        name: &str,
        value: Option<&str>,
        now: Instant,
    ) -> Result<AttributeEffect, AttributeError> {
        let effect = self.attributes.apply(&mut self.viewport, name, value)?;
        if effect == AttributeEffect::Relayout {
            self.scheduler.request_render(now);
        }
        Ok(effect)
    }

    /// Applies pointer or wheel input. Returns `true` if the transform
    /// changed.
    pub fn handle_event(&mut self, event: ViewportEvent) -> bool {
        let changed = self.viewport.handle(event);
        if changed {
            self.attributes.reflect(self.viewport.state());
        }
        changed
    }

    /// Runs every timer that is due at `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        for event in self.scheduler.poll(now) {
            match event {
                SchedulerEvent::Render => outcomes.push(self.render_pass()),
                SchedulerEvent::Resize { client, scroll } => {
                    outcomes.push(self.resize(client, scroll));
                }
            }
        }
        outcomes
    }

    /// Earliest moment the host should call [`tick`](Self::tick).
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    fn render_pass(&mut self) -> TickOutcome {
        self.render_passes += 1;
        let state = *self.viewport.state();
        info!(pass = self.render_passes, rankdir:% = state.rankdir(); "Render pass");

        match self.build_scene(&state) {
            Ok(scene) => {
                if !self.scheduler.is_active() {
                    debug!("Widget detached during pass, discarding scene");
                    return TickOutcome::RenderFailed;
                }
                let outcome = TickOutcome::Rendered {
                    nodes: scene.nodes().len(),
                    edges: scene.edges().len(),
                };
                self.viewport.set_size(scene.size());
                self.scene = Some(scene);
                outcome
            }
            Err(err) => {
                warn!(err:% = err; "Render pass failed, keeping previous scene");
                TickOutcome::RenderFailed
            }
        }
    }

    fn build_scene(&self, state: &ViewportState) -> Result<Scene, GraphError> {
        let extractor =
            ModelExtractor::new(self.measure.as_ref(), self.config.style().node_padding());
        let model = extractor.extract(&self.tree);

        let options =
            LayoutOptions::from_config(self.config.layout(), state.rankdir(), state.align());
        let layout = self.layout.compute(&model, &options, self.scroll_size)?;

        Ok(Scene::build(&model, &layout, state.rankdir()))
    }

    fn resize(&mut self, client: Size, scroll: Size) -> TickOutcome {
        self.viewport.set_client_size(client);
        self.scroll_size = scroll;

        let size = scroll.max(self.viewport.state().size());
        self.viewport.set_size(size);
        if let Some(scene) = &mut self.scene {
            scene.grow_to(size);
        }
        debug!(width = size.width(), height = size.height(); "Resized");
        TickOutcome::Resized { size }
    }

    /// The last committed scene.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// The last committed scene as SVG under the current transform.
    pub fn render_svg(&self) -> Option<String> {
        self.scene
            .as_ref()
            .map(|scene| self.exporter.render(scene, self.viewport.state()))
    }

    pub fn viewport(&self) -> &ViewportState {
        self.viewport.state()
    }

    pub fn is_panning(&self) -> bool {
        self.viewport.is_panning()
    }

    /// Mirrored value of a configuration attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let key: AttributeKey = name.parse().ok()?;
        self.attributes.get(key)
    }

    /// Number of render passes started so far.
    pub fn render_passes(&self) -> usize {
        self.render_passes
    }
}
