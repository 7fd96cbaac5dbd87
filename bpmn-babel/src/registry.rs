//! Name-keyed lookup of the formats a conversion can read from or write to.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::FormatError;
use crate::format::{unsupported, Format};
use crate::formats::{BpmnFormat, JsonFormat};
use crate::model::Document;

/// Formats by name. Iteration is name-ordered, so listings and extension
/// detection never depend on registration order.
pub struct FormatRegistry {
    formats: BTreeMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: BTreeMap::new(),
        }
    }

    /// Canonical BPMN plus the JSON inspection dump.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(BpmnFormat::default());
        registry.register(JsonFormat);
        registry
    }

    /// Adds `format`, replacing any format registered under the same name.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|format| format.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    pub fn list_formats(&self) -> Vec<String> {
        self.formats.keys().cloned().collect()
    }

    /// First readable format (by name) claiming the extension of `filename`.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename).extension()?.to_str()?;
        self.formats
            .values()
            .find(|format| {
                format.supports_parsing() && format.file_extensions().contains(&extension)
            })
            .map(|format| format.name().to_string())
    }

    pub fn parse(&self, source: &str, format: &str) -> Result<Document, FormatError> {
        let reader = self.get(format)?;
        if !reader.supports_parsing() {
            return Err(unsupported(format, "parsing"));
        }
        reader.parse(source)
    }

    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, FormatError> {
        self.serialize_with_options(doc, format, &HashMap::new())
    }

    pub fn serialize_with_options(
        &self,
        doc: &Document,
        format: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let writer = self.get(format)?;
        if !writer.supports_serialization() {
            return Err(unsupported(format, "serialization"));
        }
        writer.serialize_with_options(doc, options)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
