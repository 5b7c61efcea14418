//! Shared configuration loader for the proofflow toolchain.
//!
//! `defaults/proofflow.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`ProofFlowConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use proofflow_parser::flow::output::FileType;
use proofflow_parser::flow::parsing::Dialect;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/proofflow.default.toml");

/// Top-level configuration consumed by proofflow applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ProofFlowConfig {
    pub sync: SyncConfig,
    pub server: ServerConfig,
    pub output: OutputSettings,
    pub logging: LoggingConfig,
}

/// Debounce thresholds of the incremental sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SyncConfig {
    pub typing_pause_ms: u64,
    pub max_latency_ms: u64,
}

impl SyncConfig {
    pub fn typing_pause(&self) -> Duration {
        Duration::from_millis(self.typing_pause_ms)
    }

    pub fn max_latency(&self) -> Duration {
        Duration::from_millis(self.max_latency_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub request_timeout_ms: u64,
    pub language_ids: LanguageIds,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Language ids announced in `didOpen`, per file type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageIds {
    pub coq: String,
    pub coqmd: String,
    pub lean: String,
}

impl LanguageIds {
    pub fn for_file_type(&self, file_type: FileType) -> Option<&str> {
        match file_type {
            FileType::Coq => Some(&self.coq),
            FileType::CoqMD => Some(&self.coqmd),
            FileType::Lean => Some(&self.lean),
            FileType::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub default_format: Dialect,
    pub pure_lean: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
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
    pub fn build(self) -> Result<ProofFlowConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ProofFlowConfig, ConfigError> {
    Loader::new().build()
}
