use nut_graph_core::descriptor::Descriptor;
use nut_graph_markup::{ParseError, error::ErrorCode, parse};

const RACK: &str = r#"
<!DOCTYPE html>
<nut-graph rankdir="LR" align="UL" x="0" y="0" scale="1">
  <!-- power path -->
  <nut-graph-group id="rack">
    <nut-graph-node id="ups" width="80" height="40">UPS</nut-graph-node>
    <nut-graph-group id="pdu">
      <nut-graph-node id="outlet-1">Outlet &#49;</nut-graph-node>
    </nut-graph-group>
  </nut-graph-group>
  <nut-graph-node id="load">Load</nut-graph-node>
  <nut-graph-link from="ups" to="load" weight="2" from-offset="4"
                  class="hot">5 A</nut-graph-link>
  <nut-graph-link from="ups" to="outlet-1"></nut-graph-link>
</nut-graph>
"#;

#[test]
fn parses_full_document() {
    let doc = parse(RACK).expect("valid markup");

    assert_eq!(doc.attribute("rankdir"), Some("LR"));
    assert_eq!(doc.attribute("ALIGN"), Some("UL"));
    assert_eq!(doc.attribute("scale"), Some("1"));

    let kinds: Vec<_> = doc.descriptors().iter().map(Descriptor::kind).collect();
    assert_eq!(kinds.len(), 4);

    let Descriptor::Group(rack) = &doc.descriptors()[0] else {
        panic!("first descriptor should be the rack group");
    };
    assert_eq!(rack.id, "rack");
    assert_eq!(rack.children.len(), 2);

    let Descriptor::Group(pdu) = &rack.children[1] else {
        panic!("nested group expected");
    };
    let Descriptor::Node(outlet) = &pdu.children[0] else {
        panic!("nested node expected");
    };
    assert_eq!(outlet.label, "Outlet 1");

    let Descriptor::Edge(hot) = &doc.descriptors()[2] else {
        panic!("edge expected");
    };
    assert_eq!(hot.weight, Some(2.0));
    assert_eq!(hot.from_offset, Some(4.0));
    assert_eq!(hot.label.as_deref(), Some("5 A"));
    assert_eq!(hot.class.as_deref(), Some("hot"));

    let Descriptor::Edge(plain) = &doc.descriptors()[3] else {
        panic!("edge expected");
    };
    assert!(plain.label.is_none());
}

#[test]
fn parses_without_root_element() {
    let doc = parse(r#"<graph-node id="a"/><graph-node id="b"/><graph-link from="a" to="b"/>"#)
        .expect("valid markup");

    assert!(doc.attributes().is_empty());
    assert_eq!(doc.descriptors().len(), 3);
}

#[test]
fn reports_mismatched_closing_tag_with_both_locations() {
    let source = "<nut-graph-group id=g>\n  <nut-graph-node id=a>A</nut-graph-group>";
    let err: ParseError = parse(source).expect_err("mismatched tags");

    let diag = &err.diagnostics()[0];
    assert_eq!(diag.code(), Some(ErrorCode::E101));
    assert_eq!(
        &source[diag.labels()[0].span().range()],
        "</nut-graph-group>"
    );
    assert_eq!(
        &source[diag.labels()[1].span().range()],
        "<nut-graph-node id=a>"
    );
    assert!(err.to_string().starts_with("error[E101]"));
}

#[test]
fn reports_unclosed_root() {
    let err = parse("<nut-graph><nut-graph-node id=a/>").expect_err("unclosed");
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E100));
    assert_eq!(err.diagnostics()[0].help(), Some("add `</nut-graph>`"));
}

mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Parsing arbitrary input must never panic.
    fn check_parse_is_total(source: &str) -> Result<(), TestCaseError> {
        let _ = parse(source);
        Ok(())
    }

    /// Plain label text survives parsing, trimmed.
    fn check_label_preserved(id: &str, label: &str) -> Result<(), TestCaseError> {
        let source = format!("<nut-graph-node id=\"{id}\">{label}</nut-graph-node>");
        let doc = parse(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;

        match doc.descriptors() {
            [Descriptor::Node(node)] => {
                prop_assert_eq!(&node.id, id);
                prop_assert_eq!(node.label.as_str(), label.trim());
            }
            other => prop_assert!(false, "expected one node, got {:?}", other),
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn parse_is_total(source in "[<>/=\"'a-z !&;#-]{0,64}") {
            check_parse_is_total(&source)?;
        }

        #[test]
        fn label_preserved(id in "[a-z][a-z0-9-]{0,12}", label in "[A-Za-z0-9 .:()]{0,32}") {
            check_label_preserved(&id, &label)?;
        }
    }
}
