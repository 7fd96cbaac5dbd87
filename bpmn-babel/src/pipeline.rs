//! Single-document conversion pipeline.
//!
//! Chains extraction, normalization, layout reconciliation and serialization
//! for one labelled source text. Every failure, including a panic raised by
//! any stage, comes back as a [`ConversionFailure`] so callers processing a
//! batch can report it and move on.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::info;

use crate::error::{ConversionFailure, FailureKind};
use crate::formats::bpmn::{self, parser, SerializeOptions};
use crate::model::Document;

/// Converts loose BPMN `source` into the canonical dialect.
///
/// `label` only identifies the document in failures and log lines.
pub fn convert(
    source: &str,
    label: &str,
    options: &SerializeOptions,
) -> Result<String, ConversionFailure> {
    let document = guarded(label, || parser::parse_document(source))?
        .map_err(|err| ConversionFailure::from_format_error(label, err))?;
    convert_document(&document, label, options)
}

/// Runs the stages that follow extraction on an already built document.
pub fn convert_document(
    document: &Document,
    label: &str,
    options: &SerializeOptions,
) -> Result<String, ConversionFailure> {
    let output = guarded(label, || bpmn::render(document, options))?;
    info!(
        label,
        processes = document.processes.len(),
        elements = document.elements().count(),
        shapes = document.shapes.len(),
        "converted document"
    );
    Ok(output)
}

fn guarded<T>(label: &str, stage: impl FnOnce() -> T) -> Result<T, ConversionFailure> {
    panic::catch_unwind(AssertUnwindSafe(stage)).map_err(|payload| {
        ConversionFailure::new(label, FailureKind::Unexpected, panic_message(payload.as_ref()))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "conversion panicked".to_string()
    }
}
