//! CLI logic for the nut-graph renderer.
//!
//! Reads a markup file, applies command-line viewport overrides to its root
//! attributes and writes the rendered SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{debug, info};

use nut_graph::{GraphBuilder, GraphError};

/// Run the nut-graph CLI application.
///
/// # Errors
///
/// Returns `GraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Invalid viewport attributes
/// - Layout errors
pub fn run(args: &Args) -> Result<(), GraphError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = GraphBuilder::new(app_config);
    let mut document = builder.parse(&source)?;
    for (name, value) in args.attribute_overrides() {
        debug!(attribute = name, value = value.as_str(); "Overriding root attribute");
        document.set_attribute(name, value);
    }
    let svg = builder.render_svg(&document)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
