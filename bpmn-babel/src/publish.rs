//! File publishing pipeline.
//!
//! Bridges the single-document [`pipeline`](crate::pipeline) and the file
//! system: finds the inputs to convert, derives where each converted file
//! goes and writes it there. The input file itself is never touched.
//!
//! ```ignore
//! let spec = PublishSpec::default().with_suffix("_c8");
//! for input in collect_inputs(&paths, "bpmn", "_camunda")? {
//!     let written = publish_file(&input, &spec)?;
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::error::ConversionFailure;
use crate::formats::bpmn::SerializeOptions;
use crate::pipeline;

/// Appended to the input stem to name the converted file.
pub const DEFAULT_SUFFIX: &str = "_camunda";
/// Extension of converted files, and of the inputs picked up from directories.
pub const DEFAULT_EXTENSION: &str = "bpmn";

/// Errors raised while publishing one input.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Conversion(#[from] ConversionFailure),
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("refusing to overwrite input {}", path.display())]
    WouldOverwriteInput { path: PathBuf },
}

/// How converted files are rendered and named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSpec {
    pub options: SerializeOptions,
    pub suffix: String,
    pub extension: String,
}

impl Default for PublishSpec {
    fn default() -> Self {
        Self {
            options: SerializeOptions::default(),
            suffix: DEFAULT_SUFFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl PublishSpec {
    pub fn new(options: SerializeOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Where the converted form of `input` is written.
    pub fn output_for(&self, input: &Path) -> PathBuf {
        output_path_with_extension(input, &self.suffix, &self.extension)
    }
}

/// `<stem><suffix>.bpmn`, next to `input`.
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    output_path_with_extension(input, suffix, DEFAULT_EXTENSION)
}

pub fn output_path_with_extension(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}.{extension}"))
}

/// Files directly inside `dir` with `extension`, skipping names that
/// contain `marker` (previous outputs). Sorted by path.
pub fn discover_inputs(dir: &Path, extension: &str, marker: &str) -> io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == extension);
        let already_converted = !marker.is_empty()
            && path
                .file_name()
                .map(|name| name.to_string_lossy().contains(marker))
                .unwrap_or(false);
        if matches_extension && !already_converted {
            inputs.push(path);
        } else {
            debug!(path = %path.display(), "skipping directory entry");
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Expands directories through [`discover_inputs`]; any other path is kept
/// as given, so an explicitly named file is converted even if it carries
/// the marker or does not exist (the latter fails later as a read error).
pub fn collect_inputs(
    paths: &[PathBuf],
    extension: &str,
    marker: &str,
) -> Result<Vec<PathBuf>, PublishError> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = discover_inputs(path, extension, marker).map_err(|source| {
                PublishError::Read {
                    path: path.clone(),
                    source,
                }
            })?;
            inputs.extend(found);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}

/// Reads `input`, converts it and writes the result beside it.
///
/// Returns the path that was written.
pub fn publish_file(input: &Path, spec: &PublishSpec) -> Result<PathBuf, PublishError> {
    let output = spec.output_for(input);
    if output == input {
        return Err(PublishError::WouldOverwriteInput {
            path: input.to_path_buf(),
        });
    }

    let source = fs::read_to_string(input).map_err(|source| PublishError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let label = input.display().to_string();
    let converted = pipeline::convert(&source, &label, &spec.options)?;

    fs::write(&output, converted).map_err(|source| PublishError::Write {
        path: output.clone(),
        source,
    })?;
    Ok(output)
}
