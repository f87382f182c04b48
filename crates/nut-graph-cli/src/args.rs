//! Command-line argument definitions for the nut-graph CLI.
//!
//! Besides input/output paths, configuration file selection and logging
//! verbosity, the viewport flags override the attributes found on the
//! markup's root element.

use clap::Parser;

/// Render nut-graph markup to SVG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input markup file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Rank direction (TB, BT, LR, RL)
    #[arg(long)]
    pub rankdir: Option<String>,

    /// Rank alignment (UL, UR, DL, DR)
    #[arg(long)]
    pub align: Option<String>,

    /// Horizontal pan offset
    #[arg(short = 'x', long = "x", allow_negative_numbers = true)]
    pub x: Option<f32>,

    /// Vertical pan offset
    #[arg(short = 'y', long = "y", allow_negative_numbers = true)]
    pub y: Option<f32>,

    /// Zoom factor, at least 0.1
    #[arg(long)]
    pub scale: Option<f32>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Root attribute overrides given on the command line, in a stable
    /// order.
    pub fn attribute_overrides(&self) -> Vec<(&'static str, String)> {
        let numbers = [("x", self.x), ("y", self.y), ("scale", self.scale)]
            .into_iter()
            .filter_map(|(name, value)| value.map(|value| (name, value.to_string())));
        let enums = [("rankdir", &self.rankdir), ("align", &self.align)]
            .into_iter()
            .filter_map(|(name, value)| value.clone().map(|value| (name, value)));

        numbers.chain(enums).collect()
    }
}
