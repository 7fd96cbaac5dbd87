//! Format implementations
//!
//! This module contains implementations of various process document formats.

pub mod bpmn;
pub mod json;

pub use bpmn::{BpmnFormat, SerializeOptions};
pub use json::JsonFormat;
