//! Conversion tests (loose or canonical BPMN → canonical BPMN)

use std::collections::{BTreeSet, HashMap};

use bpmn_babel::formats::bpmn::parser::parse_document;
use bpmn_babel::{convert, FailureKind, FormatRegistry, SerializeOptions};

use crate::common::{bounds, bpmn_nodes, condition_of, convert_fixture, fixture};

fn element_kinds(doc: &bpmn_babel::Document) -> BTreeSet<(String, String)> {
    doc.elements()
        .map(|element| (element.id.clone(), element.kind.tag_name().to_string()))
        .collect()
}

fn flow_pairs(doc: &bpmn_babel::Document) -> BTreeSet<(String, String)> {
    doc.processes
        .iter()
        .flat_map(|process| process.flows.iter())
        .map(|flow| (flow.source_ref.clone(), flow.target_ref.clone()))
        .collect()
}

#[test]
fn test_canonical_round_trip_keeps_structure() {
    let source = fixture("canonical.bpmn");
    let before = parse_document(&source).unwrap();
    let output = convert_fixture("canonical.bpmn");
    let after = parse_document(&output).unwrap();

    assert_eq!(after.definitions_id, "Definitions_Order");
    assert_eq!(after.processes.len(), 1);
    assert_eq!(after.processes[0].id, "Process_Order");
    assert_eq!(after.processes[0].name, "Order handling");
    assert_eq!(element_kinds(&after), element_kinds(&before));
    assert_eq!(flow_pairs(&after), flow_pairs(&before));

    // every coordinate is already past the margin, so nothing moves
    let positions = |doc: &bpmn_babel::Document| -> HashMap<String, (Option<i64>, Option<i64>)> {
        doc.shapes
            .iter()
            .map(|shape| (shape.element_ref.clone(), (shape.x, shape.y)))
            .collect()
    };
    assert_eq!(positions(&after), positions(&before));
}

#[test]
fn test_canonical_output_is_a_fixed_point() {
    let once = convert_fixture("canonical.bpmn");
    let twice = convert(&once, "once", &SerializeOptions::default()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_canonical_conditions_and_edges() {
    let output = convert_fixture("canonical.bpmn");
    let xml = roxmltree::Document::parse(&output).expect("output should be well-formed");

    assert_eq!(
        condition_of(&xml, "Flow_Big").as_deref(),
        Some("=amount > 1000")
    );
    assert_eq!(
        condition_of(&xml, "Flow_Small").as_deref(),
        Some("=amount <= 1000")
    );
    assert_eq!(condition_of(&xml, "Flow_1"), None);

    // one edge per flow, all endpoints have shapes
    let edges = xml
        .descendants()
        .filter(|node| node.has_tag_name((crate::common::BPMNDI_NS, "BPMNEdge")))
        .count();
    assert_eq!(edges, 5);
}

#[test]
fn test_loose_input_is_canonicalized() {
    let output = convert_fixture("loose.bpmn");
    let xml = roxmltree::Document::parse(&output).expect("output should be well-formed");

    let root = xml.root_element();
    assert!(root.has_tag_name((crate::common::BPMN_NS, "definitions")));
    assert_eq!(root.attribute("id"), Some("Definitions_1"));

    let processes = bpmn_nodes(&xml, "process");
    assert_eq!(processes.len(), 1);
    assert_eq!(processes[0].attribute("id"), Some("Loan"));
    assert_eq!(processes[0].attribute("name"), Some("Process_Name"));
    assert_eq!(processes[0].attribute("isExecutable"), Some("true"));

    // standard tags in document order, then the custom ones
    let order: Vec<_> = processes[0]
        .children()
        .filter(|node| node.is_element())
        .filter(|node| node.tag_name().name() != "sequenceFlow")
        .map(|node| node.attribute("id").unwrap())
        .collect();
    assert_eq!(order, vec!["start", "check", "decide", "done", "sign"]);

    let sign = bpmn_nodes(&xml, "userTask");
    assert_eq!(sign.len(), 1);
    assert_eq!(sign[0].attribute("name"), Some("Countersign"));

    let check = bpmn_nodes(&xml, "task");
    assert_eq!(check[0].attribute("name"), Some("Check & score"));
}

#[test]
fn test_condition_placement() {
    let output = convert_fixture("loose.bpmn");
    let xml = roxmltree::Document::parse(&output).unwrap();

    // sign is a task, so its condition is dropped
    assert_eq!(condition_of(&xml, "f2"), None);
    assert_eq!(condition_of(&xml, "f4").as_deref(), Some("=score > 7"));
    assert_eq!(condition_of(&xml, "f1"), None);
    assert_eq!(condition_of(&xml, "f3"), None);
}

#[test]
fn test_default_dimensions_and_offset() {
    let output = convert_fixture("loose.bpmn");
    let xml = roxmltree::Document::parse(&output).unwrap();
    let bounds = bounds(&xml);

    // x shifted by 140 (min -40), y by 100 (min 0)
    assert_eq!(bounds["start"], (100, 120, 36, 36));
    assert_eq!(bounds["sign"], (200, 100, 120, 90));
    assert_eq!(bounds["check"], (360, 105, 100, 80));
    assert_eq!(bounds["decide"], (520, 120, 50, 50));
    // unparsable x counts as 0 before the shift
    assert_eq!(bounds["done"], (140, 127, 36, 36));

    for (x, y, _, _) in bounds.values() {
        assert!(*x >= 100 && *y >= 100);
    }
}

#[test]
fn test_deterministic_output() {
    assert_eq!(convert_fixture("loose.bpmn"), convert_fixture("loose.bpmn"));
    assert_eq!(
        convert_fixture("canonical.bpmn"),
        convert_fixture("canonical.bpmn")
    );
}

#[test]
fn test_custom_tags_match_native_user_task() {
    let wrap = |tag: &str| {
        format!(
            r#"<definitions id="D"><process id="P">
<{tag} id="a" name="Approve"><incoming>in</incoming><outgoing>out</outgoing></{tag}>
</process>
<BPMNShape id="a_di" bpmnElement="a"><Bounds x="10" y="10"/></BPMNShape></definitions>"#
        )
    };
    let options = SerializeOptions::default();
    let native = convert(&wrap("userTask"), "native", &options).unwrap();

    for custom in ["countersignTask", "multiInstanceTask"] {
        let converted = convert(&wrap(custom), custom, &options).unwrap();
        assert_eq!(converted, native, "{custom} should render as userTask");
    }
}

#[test]
fn test_missing_process_is_structural() {
    let failure = convert(
        &fixture("no_process.bpmn"),
        "no_process.bpmn",
        &SerializeOptions::default(),
    )
    .unwrap_err();
    assert_eq!(failure.kind, FailureKind::Structural);
    assert_eq!(failure.label, "no_process.bpmn");
}

#[test]
fn test_duplicate_ids_keep_the_first() {
    let output = convert_fixture("duplicates.bpmn");
    let xml = roxmltree::Document::parse(&output).unwrap();

    let processes = bpmn_nodes(&xml, "process");
    assert_eq!(processes.len(), 1);
    assert_eq!(processes[0].attribute("name"), Some("Duplicates"));

    let with_id_t: Vec<_> = xml
        .descendants()
        .filter(|node| node.attribute("id") == Some("t"))
        .collect();
    assert_eq!(with_id_t.len(), 1);
    assert_eq!(with_id_t[0].tag_name().name(), "task");
    assert_eq!(with_id_t[0].attribute("name"), Some("first"));

    let flows = bpmn_nodes(&xml, "sequenceFlow");
    assert_eq!(flows.len(), 1);
    assert_eq!(flows[0].attribute("sourceRef"), Some("t"));
}

#[test]
fn test_diagram_covers_first_process_only_in_its_plane() {
    let source = r#"<process id="A"><task id="a"/></process>
<process id="B"><task id="b"/></process>
<BPMNShape bpmnElement="a"><Bounds x="0" y="0"/></BPMNShape>
<BPMNShape bpmnElement="b"><Bounds x="200" y="0"/></BPMNShape>"#;
    let output = convert(source, "two", &SerializeOptions::default()).unwrap();
    let xml = roxmltree::Document::parse(&output).unwrap();

    let plane = xml
        .descendants()
        .find(|node| node.has_tag_name((crate::common::BPMNDI_NS, "BPMNPlane")))
        .unwrap();
    assert_eq!(plane.attribute("bpmnElement"), Some("A"));
    assert_eq!(bpmn_nodes(&xml, "process").len(), 2);
    assert_eq!(bounds(&xml).len(), 2);
}

#[test]
fn test_registry_matches_pipeline() {
    let source = fixture("loose.bpmn");
    let registry = FormatRegistry::default();
    let doc = registry.parse(&source, "bpmn").unwrap();
    let via_registry = registry.serialize(&doc, "bpmn").unwrap();

    assert_eq!(via_registry, convert_fixture("loose.bpmn"));
}

#[test]
fn test_json_inspection_of_loose_input() {
    let registry = FormatRegistry::default();
    let doc = registry.parse(&fixture("loose.bpmn"), "bpmn").unwrap();
    let json = registry.serialize(&doc, "json").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let elements = value["document"]["processes"][0]["elements"]
        .as_array()
        .unwrap();
    let sign = elements
        .iter()
        .find(|element| element["id"] == "sign")
        .unwrap();
    assert_eq!(sign["kind"], "userTask");
    assert_eq!(value["layout"]["offset"]["x"], 140);
    assert_eq!(value["layout"]["offset"]["y"], 100);
}

#[test]
fn test_margin_option_moves_the_origin() {
    let options = SerializeOptions {
        margin: 20,
        ..SerializeOptions::default()
    };
    let output = convert(&fixture("loose.bpmn"), "loose.bpmn", &options).unwrap();
    let xml = roxmltree::Document::parse(&output).unwrap();
    let bounds = bounds(&xml);

    assert_eq!(bounds["start"].0, 20);
    assert_eq!(bounds["sign"].1, 20);
}

#[test]
fn test_out_of_range_coordinates_count_as_missing() {
    let source = r#"<definitions id="D"><process id="P">
        <task id="huge"/><task id="zero"/><task id="tiny"/>
      </process>
      <BPMNShape bpmnElement="huge"><Bounds x="9223372036854775807" y="50"/></BPMNShape>
      <BPMNShape bpmnElement="zero"><Bounds x="0" y="50"/></BPMNShape>
      <BPMNShape bpmnElement="tiny"><Bounds x="-1e300" y="1e300"/></BPMNShape>
    </definitions>"#;
    let output = convert(source, "huge", &SerializeOptions::default())
        .expect("numeric overflow must not fail the conversion");
    let xml = roxmltree::Document::parse(&output).unwrap();
    let bounds = bounds(&xml);

    assert_eq!(bounds["zero"], (100, 100, 100, 80));
    assert_eq!(bounds["huge"], (100, 100, 100, 80));
    assert_eq!(bounds["tiny"], (100, 50, 100, 80));
}

#[test]
fn test_forbidden_character_references_stay_escaped() {
    let source = r#"<definitions id="D"><process id="P">
        <task id="a" name="x&#0;y&#x1F;z &#x263A;"/>
      </process></definitions>"#;
    let output = convert(source, "refs", &SerializeOptions::default()).unwrap();
    let xml = roxmltree::Document::parse(&output).expect("output should be well-formed");

    let task = bpmn_nodes(&xml, "task")
        .into_iter()
        .find(|task| task.attribute("id") == Some("a"))
        .unwrap();
    assert_eq!(task.attribute("name"), Some("x&#0;y&#x1F;z ☺"));
}
