//! Fixture loading and output inspection shared by the integration tests.

use std::collections::HashMap;
use std::path::PathBuf;

use bpmn_babel::{convert, SerializeOptions};

pub const BPMN_NS: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
pub const BPMNDI_NS: &str = "http://www.omg.org/spec/BPMN/20100524/DI";
pub const DC_NS: &str = "http://www.omg.org/spec/DD/20100524/DC";

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

/// Converts a fixture with the default options.
pub fn convert_fixture(name: &str) -> String {
    convert(&fixture(name), name, &SerializeOptions::default())
        .unwrap_or_else(|failure| panic!("conversion failed: {failure}"))
}

/// All `bpmn:<tag>` elements of a converted document.
pub fn bpmn_nodes<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
    tag: &str,
) -> Vec<roxmltree::Node<'a, 'input>> {
    doc.descendants()
        .filter(|node| node.has_tag_name((BPMN_NS, tag)))
        .collect()
}

/// Element id to emitted `(x, y, width, height)`, read from the diagram layer.
pub fn bounds(doc: &roxmltree::Document<'_>) -> HashMap<String, (i64, i64, i64, i64)> {
    doc.descendants()
        .filter(|node| node.has_tag_name((BPMNDI_NS, "BPMNShape")))
        .map(|shape| {
            let element = shape.attribute("bpmnElement").unwrap().to_string();
            let bounds = shape
                .children()
                .find(|child| child.has_tag_name((DC_NS, "Bounds")))
                .unwrap();
            let number = |name: &str| bounds.attribute(name).unwrap().parse::<i64>().unwrap();
            (
                element,
                (number("x"), number("y"), number("width"), number("height")),
            )
        })
        .collect()
}

/// Condition text of the flow with `id`, if it carries one.
pub fn condition_of(doc: &roxmltree::Document<'_>, id: &str) -> Option<String> {
    let flow = bpmn_nodes(doc, "sequenceFlow")
        .into_iter()
        .find(|flow| flow.attribute("id") == Some(id))
        .unwrap_or_else(|| panic!("no flow {id}"));
    flow.children()
        .find(|child| child.has_tag_name((BPMN_NS, "conditionExpression")))
        .and_then(|condition| condition.text())
        .map(str::to_string)
}
