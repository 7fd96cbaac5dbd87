//! Tolerant extraction of processes, flow nodes, flows and diagram shapes.
//!
//! Every field is extracted independently and falls back to a default when
//! absent or malformed. The only failure is a document without any process
//! block.

use std::collections::HashSet;

use uuid::Uuid;

use super::scanner::{self, Occurrence};
use crate::error::FormatError;
use crate::model::{
    Document, Element, Flow, Process, Shape, DEFAULT_DEFINITIONS_ID, DEFAULT_PROCESS_NAME,
};
use crate::vocabulary::{canonicalize, ElementKind, CUSTOM_TAGS};

/// Extracts a [`Document`] from raw BPMN-like text.
pub fn parse_document(source: &str) -> Result<Document, FormatError> {
    let definitions_id = scanner::open_tag_attrs(source, "definitions")
        .and_then(|attrs| scanner::non_empty_attribute(attrs, "id"))
        .unwrap_or_else(|| {
            tracing::debug!("no definitions id, using {DEFAULT_DEFINITIONS_ID}");
            DEFAULT_DEFINITIONS_ID.to_string()
        });

    let mut processes: Vec<Process> = Vec::new();
    for block in scanner::paired(source, "process") {
        let process = extract_process(&block);
        if processes.iter().any(|existing| existing.id == process.id) {
            tracing::warn!(id = %process.id, "dropping duplicate process");
            continue;
        }
        processes.push(process);
    }

    if processes.is_empty() {
        return Err(FormatError::NoProcess);
    }

    let shapes = extract_shapes(source);

    Ok(Document {
        definitions_id,
        processes,
        shapes,
    })
}

/// Random identifier of the form `<prefix>_<7 hex digits>`.
pub fn synthesize_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &suffix[..7])
}

fn extract_process(block: &Occurrence<'_>) -> Process {
    let body = block.body.unwrap_or_default();
    let id = block
        .attribute("id")
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| {
            let id = synthesize_id("Process");
            tracing::debug!(%id, "synthesized process id");
            id
        });
    let name = block
        .attribute("name")
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_PROCESS_NAME.to_string());

    Process {
        elements: extract_elements(body),
        flows: extract_flows(body),
        id,
        name,
    }
}

/// Standard elements first, in document order, then custom ones. The first
/// element to claim an id keeps it.
fn extract_elements(body: &str) -> Vec<Element> {
    let standard = collect_elements(
        body,
        ElementKind::ALL.iter().map(|kind| kind.tag_name()),
        false,
    );
    let custom = collect_elements(body, CUSTOM_TAGS.iter().map(|(tag, _)| *tag), true);

    let mut seen = HashSet::new();
    let mut elements = Vec::new();
    for element in standard {
        if seen.insert(element.id.clone()) {
            elements.push(element);
        } else {
            tracing::warn!(id = %element.id, "dropping duplicate element");
        }
    }
    for element in custom {
        if seen.insert(element.id.clone()) {
            elements.push(element);
        } else {
            tracing::debug!(id = %element.id, "custom element shadowed by existing id");
        }
    }
    elements
}

/// Every occurrence of `tags`, canonicalized and sorted by position.
fn collect_elements(
    body: &str,
    tags: impl IntoIterator<Item = &'static str>,
    paired_only: bool,
) -> Vec<Element> {
    let mut found: Vec<(usize, Element)> = tags
        .into_iter()
        .filter_map(|tag| canonicalize(tag).map(|kind| (tag, kind)))
        .flat_map(|(tag, kind)| {
            let occurrences = if paired_only {
                scanner::paired(body, tag)
            } else {
                scanner::occurrences(body, tag)
            };
            occurrences.into_iter().filter_map(move |occurrence| {
                element_from(kind, &occurrence).map(|element| (occurrence.offset, element))
            })
        })
        .collect();
    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, element)| element).collect()
}

fn element_from(kind: ElementKind, occurrence: &Occurrence<'_>) -> Option<Element> {
    let Some(id) = occurrence.attribute("id").filter(|id| !id.is_empty()) else {
        tracing::debug!(%kind, "discarding element without id");
        return None;
    };

    let mut element = Element::new(kind, id);
    element.name = occurrence.attribute("name").filter(|name| !name.is_empty());
    if let Some(body) = occurrence.body {
        let own = own_markup(kind, body);
        element.incoming = scanner::inner_texts(own, "incoming");
        element.outgoing = scanner::inner_texts(own, "outgoing");
    }
    Some(element)
}

/// The part of an element body that belongs to the element itself.
///
/// Sub-processes contain further flow nodes whose references must not be
/// attributed to the container, so their body is cut at the first nested
/// node or flow.
fn own_markup(kind: ElementKind, body: &str) -> &str {
    if kind != ElementKind::SubProcess {
        return body;
    }
    let nested = ElementKind::ALL
        .iter()
        .map(|kind| kind.tag_name())
        .chain(std::iter::once("sequenceFlow"))
        .filter_map(|tag| scanner::occurrences(body, tag).first().map(|o| o.offset))
        .min();
    match nested {
        Some(end) => &body[..end],
        None => body,
    }
}

fn extract_flows(body: &str) -> Vec<Flow> {
    let mut seen = HashSet::new();
    let mut flows = Vec::new();
    for occurrence in scanner::occurrences(body, "sequenceFlow") {
        let id = match occurrence.attribute("id").filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                let id = synthesize_id("Flow");
                tracing::debug!(%id, "synthesized flow id");
                id
            }
        };
        if !seen.insert(id.clone()) {
            tracing::warn!(%id, "dropping duplicate sequence flow");
            continue;
        }

        let condition = occurrence
            .body
            .and_then(|body| scanner::first_inner_text(body, "conditionExpression"))
            .filter(|condition| !condition.is_empty());

        flows.push(Flow {
            source_ref: occurrence.attribute("sourceRef").unwrap_or_default(),
            target_ref: occurrence.attribute("targetRef").unwrap_or_default(),
            name: occurrence.attribute("name").filter(|name| !name.is_empty()),
            condition,
            id,
        });
    }
    flows
}

fn extract_shapes(source: &str) -> Vec<Shape> {
    scanner::paired(source, "BPMNShape")
        .into_iter()
        .filter_map(|occurrence| {
            let Some(element_ref) = occurrence
                .attribute("bpmnElement")
                .filter(|r| !r.is_empty())
            else {
                tracing::debug!("discarding shape without bpmnElement");
                return None;
            };
            let bounds = scanner::occurrences(occurrence.body?, "Bounds")
                .into_iter()
                .next()?;
            let id = occurrence
                .attribute("id")
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| synthesize_id("Shape"));

            Some(Shape {
                x: scanner::int_attribute(bounds.attrs, "x"),
                y: scanner::int_attribute(bounds.attrs, "y"),
                width: scanner::int_attribute(bounds.attrs, "width"),
                height: scanner::int_attribute(bounds.attrs, "height"),
                element_ref,
                id,
            })
        })
        .collect()
}
