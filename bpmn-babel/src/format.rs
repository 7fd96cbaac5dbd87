//! The seam between process documents and their textual encodings.
//!
//! A [`Format`] reads text into a [`Document`], writes a [`Document`] back
//! out as text, or both. Canonical BPMN does both; the JSON inspection dump
//! only writes. Capabilities are advertised up front so the registry can
//! refuse an operation before any work happens.

use crate::error::FormatError;
use crate::model::Document;
use std::collections::HashMap;

pub trait Format: Send + Sync {
    /// Registry key, also used on the command line.
    fn name(&self) -> &str;

    /// One line shown by `--list-formats`.
    fn description(&self) -> &str {
        ""
    }

    /// Extensions (without the dot) this format claims for input detection.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn supports_parsing(&self) -> bool {
        false
    }

    fn supports_serialization(&self) -> bool {
        false
    }

    fn parse(&self, _source: &str) -> Result<Document, FormatError> {
        Err(unsupported(self.name(), "parsing"))
    }

    fn serialize(&self, _doc: &Document) -> Result<String, FormatError> {
        Err(unsupported(self.name(), "serialization"))
    }

    /// Serializes with `--extra-*` style parameters.
    ///
    /// Formats that take no parameters keep this default: an empty map falls
    /// through to [`Format::serialize`], anything else is refused.
    fn serialize_with_options(
        &self,
        doc: &Document,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        match options.keys().next() {
            None => self.serialize(doc),
            Some(key) => Err(unsupported(self.name(), &format!("parameter '{key}'"))),
        }
    }
}

pub(crate) fn unsupported(format: &str, what: &str) -> FormatError {
    FormatError::NotSupported(format!("Format '{format}' does not support {what}"))
}
