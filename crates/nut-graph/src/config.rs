//! Configuration types for nut-graph rendering.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a partial TOML file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`LayoutConfig`] - Margin and spacing handed to the layout engine.
//! - [`SchedulerConfig`] - Debounce windows of the render scheduler.
//! - [`ViewportConfig`] - Interactive pan/zoom settings.
//! - [`StyleConfig`] - Visual styling of the exported scene.
//!
//! # Example
//!
//! ```
//! # use nut_graph::config::AppConfig;
//! # use std::time::Duration;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().margin(), 16.0);
//! assert_eq!(config.scheduler().structural_debounce(), Duration::from_millis(33));
//! ```

use std::time::Duration;

use serde::Deserialize;

use nut_graph_core::text::TextStyle;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    scheduler: SchedulerConfig,

    #[serde(default)]
    viewport: ViewportConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(
        layout: LayoutConfig,
        scheduler: SchedulerConfig,
        viewport: ViewportConfig,
        style: StyleConfig,
    ) -> Self {
        Self {
            layout,
            scheduler,
            viewport,
            style,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn scheduler(&self) -> &SchedulerConfig {
        &self.scheduler
    }

    pub fn viewport(&self) -> &ViewportConfig {
        &self.viewport
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Margin and spacing used by the layout engine, in diagram units.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Space kept free around the whole diagram on every side.
    margin: f32,
    /// Minimum gap between neighbouring nodes of one rank.
    node_spacing: f32,
    /// Gap between consecutive ranks.
    rank_spacing: f32,
    /// Padding between a group frame and its members.
    group_padding: f32,
}

impl LayoutConfig {
    pub fn new(margin: f32, node_spacing: f32, rank_spacing: f32, group_padding: f32) -> Self {
        Self {
            margin,
            node_spacing,
            rank_spacing,
            group_padding,
        }
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

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 16.0,
            node_spacing: 50.0,
            rank_spacing: 50.0,
            group_padding: 8.0,
        }
    }
}

/// Debounce windows of the render scheduler.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    structural_debounce_ms: u64,
    resize_debounce_ms: u64,
}

impl SchedulerConfig {
    pub fn new(structural_debounce_ms: u64, resize_debounce_ms: u64) -> Self {
        Self {
            structural_debounce_ms,
            resize_debounce_ms,
        }
    }

    /// Quiet period after the last structural change before a render pass runs.
    pub fn structural_debounce(&self) -> Duration {
        Duration::from_millis(self.structural_debounce_ms)
    }

    /// Quiet period after the last container resize before the stored
    /// bounding box is refreshed.
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            structural_debounce_ms: 33,
            resize_debounce_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Scale change per wheel notch.
    zoom_step: f32,
}

impl ViewportConfig {
    pub fn new(zoom_step: f32) -> Self {
        Self { zoom_step }
    }

    pub fn zoom_step(&self) -> f32 {
        self.zoom_step
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { zoom_step: 0.1 }
    }
}

/// Visual styling of exported diagrams.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Inline style of edges that carry no style class.
    edge_style: String,
    /// Fill of a background rectangle behind the diagram, if any.
    background_color: Option<String>,
    label_font_family: String,
    label_font_size: u16,
    /// Padding added around measured node content.
    node_padding: f32,
}

impl StyleConfig {
    pub fn edge_style(&self) -> &str {
        &self.edge_style
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background_color
            .as_deref()
            .filter(|color| !color.trim().is_empty())
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn label_font_family(&self) -> &str {
        &self.label_font_family
    }

    pub fn label_font_size(&self) -> u16 {
        self.label_font_size
    }

    pub fn node_padding(&self) -> f32 {
        self.node_padding
    }

    /// The [`TextStyle`] labels are measured with.
    pub fn text_style(&self) -> TextStyle {
        TextStyle::new(self.label_font_family.clone(), self.label_font_size)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            edge_style: "fill:none;stroke:green;stroke-width:3".to_string(),
            background_color: None,
            label_font_family: "sans-serif".to_string(),
            label_font_size: 12,
            node_padding: 4.0,
        }
    }
}
