//! Canonical flow-node vocabulary and the tables hanging off it.
//!
//! Everything here is static configuration: the tags the extractor looks for,
//! how tool-specific tags fold into canonical ones, and the size each kind is
//! drawn with when the diagram layer does not say.

use serde::Serialize;
use std::fmt;

/// Canonical flow-node types understood by the target dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    StartEvent,
    EndEvent,
    UserTask,
    ServiceTask,
    ScriptTask,
    SendTask,
    ReceiveTask,
    ManualTask,
    BusinessRuleTask,
    Task,
    ExclusiveGateway,
    ParallelGateway,
    InclusiveGateway,
    EventBasedGateway,
    ComplexGateway,
    SubProcess,
    CallActivity,
    IntermediateCatchEvent,
    IntermediateThrowEvent,
    BoundaryEvent,
}

/// Width and height of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: i64,
    pub height: i64,
}

impl Size {
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}

pub const EVENT_SIZE: Size = Size::new(36, 36);
pub const GATEWAY_SIZE: Size = Size::new(50, 50);
pub const ACTIVITY_SIZE: Size = Size::new(100, 80);

/// Tool-specific tags and the canonical kind they fold into.
pub const CUSTOM_TAGS: &[(&str, ElementKind)] = &[
    ("countersignTask", ElementKind::UserTask),
    ("multiInstanceTask", ElementKind::UserTask),
];

impl ElementKind {
    /// The full vocabulary, in the order the extractor scans it.
    pub const ALL: [ElementKind; 20] = [
        ElementKind::StartEvent,
        ElementKind::EndEvent,
        ElementKind::UserTask,
        ElementKind::ServiceTask,
        ElementKind::ScriptTask,
        ElementKind::SendTask,
        ElementKind::ReceiveTask,
        ElementKind::ManualTask,
        ElementKind::BusinessRuleTask,
        ElementKind::Task,
        ElementKind::ExclusiveGateway,
        ElementKind::ParallelGateway,
        ElementKind::InclusiveGateway,
        ElementKind::EventBasedGateway,
        ElementKind::ComplexGateway,
        ElementKind::SubProcess,
        ElementKind::CallActivity,
        ElementKind::IntermediateCatchEvent,
        ElementKind::IntermediateThrowEvent,
        ElementKind::BoundaryEvent,
    ];

    /// Local tag name in the BPMN model namespace.
    pub fn tag_name(self) -> &'static str {
        match self {
            ElementKind::StartEvent => "startEvent",
            ElementKind::EndEvent => "endEvent",
            ElementKind::UserTask => "userTask",
            ElementKind::ServiceTask => "serviceTask",
            ElementKind::ScriptTask => "scriptTask",
            ElementKind::SendTask => "sendTask",
            ElementKind::ReceiveTask => "receiveTask",
            ElementKind::ManualTask => "manualTask",
            ElementKind::BusinessRuleTask => "businessRuleTask",
            ElementKind::Task => "task",
            ElementKind::ExclusiveGateway => "exclusiveGateway",
            ElementKind::ParallelGateway => "parallelGateway",
            ElementKind::InclusiveGateway => "inclusiveGateway",
            ElementKind::EventBasedGateway => "eventBasedGateway",
            ElementKind::ComplexGateway => "complexGateway",
            ElementKind::SubProcess => "subProcess",
            ElementKind::CallActivity => "callActivity",
            ElementKind::IntermediateCatchEvent => "intermediateCatchEvent",
            ElementKind::IntermediateThrowEvent => "intermediateThrowEvent",
            ElementKind::BoundaryEvent => "boundaryEvent",
        }
    }

    /// Resolves a standard tag name. Custom tags are not accepted here.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag_name() == tag)
    }

    pub fn is_gateway(self) -> bool {
        matches!(
            self,
            ElementKind::ExclusiveGateway
                | ElementKind::ParallelGateway
                | ElementKind::InclusiveGateway
                | ElementKind::EventBasedGateway
                | ElementKind::ComplexGateway
        )
    }

    pub fn is_event(self) -> bool {
        matches!(
            self,
            ElementKind::StartEvent
                | ElementKind::EndEvent
                | ElementKind::IntermediateCatchEvent
                | ElementKind::IntermediateThrowEvent
                | ElementKind::BoundaryEvent
        )
    }

    /// Size used when the diagram layer gives none.
    pub fn default_size(self) -> Size {
        if self.is_event() {
            EVENT_SIZE
        } else if self.is_gateway() {
            GATEWAY_SIZE
        } else {
            ACTIVITY_SIZE
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// Maps any recognised tag, standard or custom, to its canonical kind.
///
/// Tags outside both tables yield `None` and are never extracted.
pub fn canonicalize(tag: &str) -> Option<ElementKind> {
    ElementKind::from_tag(tag).or_else(|| {
        CUSTOM_TAGS
            .iter()
            .find(|(custom, _)| *custom == tag)
            .map(|(_, kind)| *kind)
    })
}
