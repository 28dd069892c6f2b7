//! Configuration structures for the Galley provisioner.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Environment applied when the client configuration names none.
const DEFAULT_ENVIRONMENT: &str = "_default";

/// Configuration for node descriptor preparation.
///
/// Supplied by the surrounding harness; the provisioner owns no CLI
/// flags or environment variables of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionerConfig {
    /// Base path for per-suite test files. Descriptors land under
    /// `nodes/` inside it.
    pub test_base_path: PathBuf,
    /// Convergence policies to apply to the node, in order.
    #[serde(default)]
    pub run_list: Vec<String>,
    /// Normal attributes passed through to the descriptor unchanged.
    #[serde(default = "default_attributes")]
    pub attributes: Value,
    /// Client-side convergence settings mirrored into the descriptor.
    #[serde(default)]
    pub client_rb: ClientRbConfig,
}

fn default_attributes() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Subset of the client convergence configuration the descriptor
/// consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientRbConfig {
    /// Environment the node converges in.
    pub environment: Option<String>,
}

impl ProvisionerConfig {
    /// Create a configuration rooted at the given test base path.
    pub fn new(test_base_path: impl Into<PathBuf>) -> Self {
        Self {
            test_base_path: test_base_path.into(),
            run_list: Vec::new(),
            attributes: default_attributes(),
            client_rb: ClientRbConfig::default(),
        }
    }

    /// Set the run list.
    pub fn with_run_list(mut self, run_list: Vec<String>) -> Self {
        self.run_list = run_list;
        self
    }

    /// Set the normal attributes.
    pub fn with_attributes(mut self, attributes: Value) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the convergence environment.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.client_rb.environment = Some(environment.into());
        self
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?
            .try_deserialize()
    }

    /// Effective convergence environment, falling back to `_default`.
    pub fn environment(&self) -> String {
        self.client_rb
            .environment
            .clone()
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
    }
}
