//! JSON inspection format
//!
//! Dumps the extracted model together with the reconciled layout, which is
//! what the canonical serializer would draw. Useful to see how a loose input
//! was understood before looking at the converted XML.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::FormatError;
use crate::format::{unsupported, Format};
use crate::layout::{Layout, DEFAULT_MARGIN};
use crate::model::Document;

#[derive(Serialize)]
struct Inspection<'a> {
    document: &'a Document,
    layout: Layout,
}

/// Serialize-only JSON view of a document
pub struct JsonFormat;

impl JsonFormat {
    /// Pretty JSON of `doc` and its layout reconciled against `margin`.
    pub fn inspect(doc: &Document, margin: i64) -> Result<String, FormatError> {
        let inspection = Inspection {
            document: doc,
            layout: Layout::reconcile(doc, margin),
        };
        serde_json::to_string_pretty(&inspection)
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Extracted model and layout as JSON (inspection only)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        Self::inspect(doc, DEFAULT_MARGIN)
    }

    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut margin = DEFAULT_MARGIN;
        for (key, value) in options {
            match key.as_str() {
                "margin" => {
                    margin = value.trim().parse().map_err(|_| {
                        FormatError::SerializationError(format!("invalid margin '{value}'"))
                    })?;
                }
                other => return Err(unsupported("json", &format!("parameter '{other}'"))),
            }
        }
        Self::inspect(doc, margin)
    }
}
