//! Conversion of loose BPMN XML into the canonical Camunda dialect
//!
//!     BPMN files exported by ad-hoc tools, generators or hand edits rarely match what Camunda 8
//!     tooling expects: namespace prefixes vary, custom task tags appear, shapes sit at negative
//!     coordinates, conditions hang off flows that cannot carry them. This crate reads such
//!     documents tolerantly and writes them back in one strict, predictable form.
//!
//!     This is a pure lib, that is, it powers bpmn-cli but is shell agnostic: no code here should
//!     suppose a shell environment, be it std printing, env vars etc.
//!
//! Architecture
//!
//!     A conversion runs four stages:
//!
//!     - Extractor (./formats/bpmn/parser.rs over ./formats/bpmn/scanner.rs): pattern scanning
//!       over raw text, never a full XML parse. Each field is a total function over a text
//!       window, so a broken attribute costs that attribute only.
//!     - Normalizer (./vocabulary.rs): maps custom task tags onto standard element kinds and
//!       knows the default size of each kind.
//!     - Layout reconciler (./layout.rs): attaches shapes to elements and shifts every
//!       coordinate so that nothing is drawn before the margin.
//!     - Serializer (./formats/bpmn/serializer.rs): emits the canonical document, including
//!       the diagram interchange layer.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── model.rs                # Extracted document model
//!     ├── vocabulary.rs           # Element kinds, custom tags, default sizes
//!     ├── layout.rs               # Layout reconciliation
//!     ├── pipeline.rs             # Single document conversion
//!     ├── publish.rs              # Input discovery and file output
//!     ├── formats
//!     │   ├── bpmn
//!     │   │   ├── scanner.rs      # Tolerant tag and attribute scanning
//!     │   │   ├── parser.rs
//!     │   │   ├── serializer.rs
//!     │   │   └── mod.rs
//!     │   └── json                # Inspection dump
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     └── bpmn
//!         ├── <testname>.rs
//!         └── fixtures
//!             └── <docname>.bpmn
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Failure Model
//!
//!     Only one thing is fatal for a document: having no process block at all. Everything else
//!     falls back to a default or is omitted. Failures are per document ([`ConversionFailure`]),
//!     so a batch keeps going past a bad file.
pub mod error;
pub mod format;
pub mod formats;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod publish;
pub mod registry;
pub mod vocabulary;

pub use error::{ConversionFailure, FailureKind, FormatError};
pub use format::Format;
pub use formats::{BpmnFormat, JsonFormat, SerializeOptions};
pub use layout::Layout;
pub use model::Document;
pub use pipeline::{convert, convert_document};
pub use registry::FormatRegistry;
