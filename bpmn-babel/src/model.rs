//! Structural model of a process document.
//!
//! This is what the extractor produces and what every later stage reads. The
//! model carries only what the canonical output needs: processes with their
//! flow nodes and sequence flows, plus the diagram shapes found in the input.

use crate::vocabulary::ElementKind;
use serde::Serialize;

/// Fallback definitions id when the input carries none.
pub const DEFAULT_DEFINITIONS_ID: &str = "Definitions_1";

/// Fallback process name when the input carries none.
pub const DEFAULT_PROCESS_NAME: &str = "Process_Name";

/// Represents the root of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub definitions_id: String,
    pub processes: Vec<Process>,
    pub shapes: Vec<Shape>,
}

impl Document {
    /// Iterates over every element of every process, in declaration order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.processes.iter().flat_map(|p| p.elements.iter())
    }

    /// Finds the first element with the given id (test helper).
    #[cfg(test)]
    pub(crate) fn element(&self, id: &str) -> Option<&Element> {
        self.elements().find(|e| e.id == id)
    }
}

/// An executable process and its contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Process {
    pub id: String,
    pub name: String,
    pub elements: Vec<Element>,
    pub flows: Vec<Flow>,
}

/// A flow node (event, task, gateway, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub kind: ElementKind,
    pub id: String,
    pub name: Option<String>,
    pub incoming: Vec<String>,
    pub outgoing: Vec<String>,
}

impl Element {
    pub fn new(kind: ElementKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            name: None,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}

/// A directed sequence flow between two flow nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flow {
    pub id: String,
    pub source_ref: String,
    pub target_ref: String,
    pub name: Option<String>,
    /// Raw expression text; only emitted when the source is a gateway.
    pub condition: Option<String>,
}

/// A diagram shape annotating one element.
///
/// Coordinates and sizes are kept as found: `None` means absent or
/// unparsable in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub element_ref: String,
    pub id: String,
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}
