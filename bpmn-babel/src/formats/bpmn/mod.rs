//! BPMN format implementation
//!
//! Parsing is tolerant: any BPMN-like markup is accepted, whatever its
//! namespace prefixes, attribute order or tag style, and missing pieces are
//! filled with defaults (see [`parser`]). Serialization always produces the
//! canonical dialect expected by Camunda 8 tooling, including the diagram
//! interchange layer (see [`serializer`]).
//!
//! # Element Mapping
//!
//! | Input                                   | Output                          |
//! |-----------------------------------------|---------------------------------|
//! | `<x:process>` (paired)                  | `<bpmn:process isExecutable="true">` |
//! | standard flow node tags                 | same tag under `bpmn:`          |
//! | `countersignTask`, `multiInstanceTask`  | `bpmn:userTask`                 |
//! | `sequenceFlow` + `conditionExpression`  | condition kept on gateway flows only, `=` prefixed |
//! | `BPMNShape` + `Bounds`                  | `BPMNShape` with offset bounds  |
//! | (derived)                               | `BPMNEdge` between shaped nodes |
//!
//! # Options
//!
//! `serialize_with_options` understands `margin`, `exporter`,
//! `exporter-version`, `platform` and `platform-version`.

pub mod parser;
pub mod scanner;
pub mod serializer;

use std::collections::HashMap;

use crate::error::FormatError;
use crate::format::{unsupported, Format};
use crate::layout::{Layout, DEFAULT_MARGIN};
use crate::model::Document;

/// Knobs for the canonical serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Smallest coordinate any shape is drawn at.
    pub margin: i64,
    pub exporter: String,
    pub exporter_version: String,
    pub execution_platform: String,
    pub execution_platform_version: String,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            exporter: "Camunda Modeler".to_string(),
            exporter_version: "5.42.0".to_string(),
            execution_platform: "Camunda Cloud".to_string(),
            execution_platform_version: "8.8.0".to_string(),
        }
    }
}

impl SerializeOptions {
    /// Builds options from string parameters, starting from the defaults.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, FormatError> {
        Self::default().with_params(params)
    }

    /// Overrides the fields named in `params`; other fields are kept.
    pub fn with_params(mut self, params: &HashMap<String, String>) -> Result<Self, FormatError> {
        for (key, value) in params {
            match key.as_str() {
                "margin" => {
                    self.margin = value.trim().parse().map_err(|_| {
                        FormatError::SerializationError(format!("invalid margin '{value}'"))
                    })?;
                }
                "exporter" => self.exporter = value.clone(),
                "exporter-version" => self.exporter_version = value.clone(),
                "platform" => self.execution_platform = value.clone(),
                "platform-version" => self.execution_platform_version = value.clone(),
                other => return Err(unsupported("bpmn", &format!("parameter '{other}'"))),
            }
        }
        Ok(self)
    }
}

/// Format implementation for BPMN
#[derive(Debug, Clone, Default)]
pub struct BpmnFormat {
    options: SerializeOptions,
}

impl BpmnFormat {
    pub fn new(options: SerializeOptions) -> Self {
        Self { options }
    }
}

/// Reconciles the layout and renders the canonical document.
pub fn render(doc: &Document, options: &SerializeOptions) -> String {
    let layout = Layout::reconcile(doc, options.margin);
    serializer::serialize_document(doc, &layout, options)
}

impl Format for BpmnFormat {
    fn name(&self) -> &str {
        "bpmn"
    }

    fn description(&self) -> &str {
        "BPMN 2.0 (tolerant import, canonical Camunda export)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["bpmn", "xml"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parser::parse_document(source)
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Ok(render(doc, &self.options))
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let merged = self.options.clone().with_params(options)?;
        Ok(render(doc, &merged))
    }
}
