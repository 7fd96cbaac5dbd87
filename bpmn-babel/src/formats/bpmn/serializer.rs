//! Canonical (Camunda 8 flavoured) BPMN serialization.
//!
//! Output is deterministic: elements and flows are written in model order,
//! shapes in element order, edges in process then flow order. Lines are
//! indented by two spaces and joined with `\n`.

use std::borrow::Cow;

use super::SerializeOptions;
use crate::layout::Layout;
use crate::model::{Document, Element, Flow, Process};

const NAMESPACES: &[(&str, &str)] = &[
    ("bpmn", "http://www.omg.org/spec/BPMN/20100524/MODEL"),
    ("bpmndi", "http://www.omg.org/spec/BPMN/20100524/DI"),
    ("dc", "http://www.omg.org/spec/DD/20100524/DC"),
    ("xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("zeebe", "http://camunda.org/schema/zeebe/1.0"),
    ("di", "http://www.omg.org/spec/DD/20100524/DI"),
    ("modeler", "http://camunda.org/schema/modeler/1.0"),
];

pub const TARGET_NAMESPACE: &str = "http://bpmn.io/schema/bpmn";

/// Renders `doc` with the geometry reconciled in `layout`.
pub fn serialize_document(doc: &Document, layout: &Layout, options: &SerializeOptions) -> String {
    let mut lines = vec![r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string()];

    let namespaces: String = NAMESPACES
        .iter()
        .map(|(prefix, uri)| format!(" xmlns:{prefix}=\"{uri}\""))
        .collect();
    lines.push(format!(
        "<bpmn:definitions{namespaces} id=\"{}\" targetNamespace=\"{TARGET_NAMESPACE}\" exporter=\"{}\" exporterVersion=\"{}\" modeler:executionPlatform=\"{}\" modeler:executionPlatformVersion=\"{}\">",
        escape_xml(&doc.definitions_id),
        escape_xml(&options.exporter),
        escape_xml(&options.exporter_version),
        escape_xml(&options.execution_platform),
        escape_xml(&options.execution_platform_version),
    ));

    for process in &doc.processes {
        write_process(&mut lines, process, layout);
    }

    if let Some(first) = doc.processes.first() {
        write_diagram(&mut lines, doc, first, layout);
    }

    lines.push("</bpmn:definitions>".to_string());
    lines.join("\n")
}

fn write_process(lines: &mut Vec<String>, process: &Process, layout: &Layout) {
    lines.push(format!(
        "  <bpmn:process id=\"{}\" name=\"{}\" isExecutable=\"true\">",
        escape_xml(&process.id),
        escape_xml(&process.name)
    ));
    for element in &process.elements {
        write_element(lines, element);
    }
    for flow in &process.flows {
        write_flow(lines, flow, layout);
    }
    lines.push("  </bpmn:process>".to_string());
}

fn write_element(lines: &mut Vec<String>, element: &Element) {
    let tag = format!("bpmn:{}", element.kind.tag_name());
    lines.push(format!(
        "    <{tag} id=\"{}\"{}>",
        escape_xml(&element.id),
        name_attribute(element.name.as_deref())
    ));
    for incoming in &element.incoming {
        lines.push(format!(
            "      <bpmn:incoming>{}</bpmn:incoming>",
            escape_xml(incoming)
        ));
    }
    for outgoing in &element.outgoing {
        lines.push(format!(
            "      <bpmn:outgoing>{}</bpmn:outgoing>",
            escape_xml(outgoing)
        ));
    }
    lines.push(format!("    </{tag}>"));
}

fn write_flow(lines: &mut Vec<String>, flow: &Flow, layout: &Layout) {
    lines.push(format!(
        "    <bpmn:sequenceFlow id=\"{}\" sourceRef=\"{}\" targetRef=\"{}\"{}>",
        escape_xml(&flow.id),
        escape_xml(&flow.source_ref),
        escape_xml(&flow.target_ref),
        name_attribute(flow.name.as_deref())
    ));
    if let Some(condition) = gateway_condition(flow, layout) {
        lines.push(format!(
            "      <bpmn:conditionExpression xsi:type=\"bpmn:tFormalExpression\">{}</bpmn:conditionExpression>",
            escape_xml(&condition)
        ));
    }
    lines.push("    </bpmn:sequenceFlow>".to_string());
}

/// The condition to emit, in FEEL form (`=` prefixed).
///
/// Only flows leaving a gateway carry a condition in the target dialect.
fn gateway_condition(flow: &Flow, layout: &Layout) -> Option<String> {
    let condition = flow.condition.as_deref().filter(|c| !c.is_empty())?;
    if !layout.is_gateway(&flow.source_ref) {
        tracing::debug!(flow = %flow.id, "dropping condition on non-gateway flow");
        return None;
    }
    Some(if condition.starts_with('=') {
        condition.to_string()
    } else {
        format!("={condition}")
    })
}

fn write_diagram(lines: &mut Vec<String>, doc: &Document, first: &Process, layout: &Layout) {
    lines.push("  <bpmndi:BPMNDiagram id=\"BPMNDiagram_1\">".to_string());
    lines.push(format!(
        "    <bpmndi:BPMNPlane id=\"BPMNPlane_1\" bpmnElement=\"{}\">",
        escape_xml(&first.id)
    ));

    for (element_id, record) in layout.records() {
        lines.push(format!(
            "      <bpmndi:BPMNShape id=\"{}\" bpmnElement=\"{}\">",
            escape_xml(&record.diagram_id),
            escape_xml(element_id)
        ));
        lines.push(format!(
            "        <dc:Bounds x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" />",
            record.x, record.y, record.width, record.height
        ));
        lines.push("      </bpmndi:BPMNShape>".to_string());
    }

    for flow in doc.processes.iter().flat_map(|p| p.flows.iter()) {
        let Some((start, end)) = layout.waypoints(flow) else {
            continue;
        };
        let id = escape_xml(&flow.id);
        lines.push(format!(
            "      <bpmndi:BPMNEdge id=\"{id}_di\" bpmnElement=\"{id}\">"
        ));
        lines.push(format!(
            "        <di:waypoint x=\"{}\" y=\"{}\" />",
            start.x, start.y
        ));
        lines.push(format!("        <di:waypoint x=\"{}\" y=\"{}\" />", end.x, end.y));
        lines.push("      </bpmndi:BPMNEdge>".to_string());
    }

    lines.push("    </bpmndi:BPMNPlane>".to_string());
    lines.push("  </bpmndi:BPMNDiagram>".to_string());
}

fn name_attribute(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => format!(" name=\"{}\"", escape_xml(name)),
        _ => String::new(),
    }
}

/// Escapes the five reserved XML characters.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
