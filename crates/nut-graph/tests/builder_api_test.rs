//! Integration tests for the GraphBuilder API.

use nut_graph::{AttributeError, GraphBuilder, GraphError, config::AppConfig, text::FixedMeasure};

const RACK: &str = r#"
<nut-graph rankdir="LR" x="10" scale="2">
  <nut-graph-group id="rack">
    <nut-graph-node id="ups" width="80" height="40">UPS</nut-graph-node>
    <nut-graph-node id="pdu">PDU</nut-graph-node>
  </nut-graph-group>
  <nut-graph-node id="load">Load</nut-graph-node>
  <nut-graph-link from="ups" to="pdu"></nut-graph-link>
  <nut-graph-link from="pdu" to="load" class="hot">5 A</nut-graph-link>
  <nut-graph-link from="pdu" to="nowhere"></nut-graph-link>
</nut-graph>
"#;

fn builder() -> GraphBuilder {
    GraphBuilder::new(AppConfig::default()).with_measure(Box::new(FixedMeasure::new(8.0, 16.0)))
}

#[test]
fn test_render_document() {
    let builder = builder();
    let document = builder.parse(RACK).expect("Failed to parse");
    let svg = builder.render_svg(&document).expect("Failed to render");

    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert_eq!(svg.matches("<path").count(), 2, "dangling edge is dropped");
    // three nodes plus one edge label
    assert_eq!(svg.matches("<foreignObject").count(), 4);
    assert!(svg.contains(r#"class="hot""#));
    assert!(svg.contains(r#"class="nut-graph-group""#));
    assert!(svg.contains(r#"transform="translate(-10 0) scale(2)""#));
}

#[test]
fn test_parse_error_keeps_source() {
    let source = "<nut-graph-node id=\"a\">";
    let err = builder().parse(source).expect_err("unclosed element");

    match err {
        GraphError::Parse { src, .. } => assert_eq!(src, source),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_invalid_root_attribute_is_rejected() {
    let builder = builder();
    let document = builder
        .parse(r#"<nut-graph rankdir="XX"><nut-graph-node id="a"/></nut-graph>"#)
        .expect("Failed to parse");

    let err = builder.render_svg(&document).expect_err("invalid rankdir");
    assert!(matches!(
        err,
        GraphError::Attribute(AttributeError::InvalidRankDir(_))
    ));
}

#[test]
fn test_empty_document() {
    let builder = builder();
    let document = builder.parse("").expect("Failed to parse");
    let svg = builder.render_svg(&document).expect("Failed to render");

    assert!(svg.contains(r#"viewBox="0 0 32 32""#));
}
