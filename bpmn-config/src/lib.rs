//! Shared configuration loader for the bpmn toolchain.
//!
//! `defaults/bpmn.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`BpmnConfig`].

use bpmn_babel::formats::bpmn::SerializeOptions;
use bpmn_babel::publish::PublishSpec;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/bpmn.default.toml");

/// Top-level configuration consumed by bpmn applications.
#[derive(Debug, Clone, Deserialize)]
pub struct BpmnConfig {
    pub convert: ConvertConfig,
    pub output: OutputConfig,
    pub discover: DiscoverConfig,
    pub logging: LoggingConfig,
}

/// Knobs of the canonical serializer.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub margin: i64,
    pub exporter: String,
    pub exporter_version: String,
    pub platform: String,
    pub platform_version: String,
}

impl From<&ConvertConfig> for SerializeOptions {
    fn from(config: &ConvertConfig) -> Self {
        SerializeOptions {
            margin: config.margin,
            exporter: config.exporter.clone(),
            exporter_version: config.exporter_version.clone(),
            execution_platform: config.platform.clone(),
            execution_platform_version: config.platform_version.clone(),
        }
    }
}

/// Naming of converted files.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub suffix: String,
    pub extension: String,
}

/// Which files a directory argument expands to.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverConfig {
    pub extension: String,
    pub converted_marker: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl BpmnConfig {
    /// Serializer options and output naming, ready for publishing.
    pub fn publish_spec(&self) -> PublishSpec {
        PublishSpec::new(SerializeOptions::from(&self.convert))
            .with_suffix(self.output.suffix.clone())
            .with_extension(self.output.extension.clone())
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<BpmnConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
