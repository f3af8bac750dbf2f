//! # Configuration
//!
//! Connection parameters for both channels, the fallback policy and the
//! export directory. Loaded from TOML; every field has a default so an
//! empty file (or no file at all) is a valid configuration.
//!
//! ## Example
//!
//! ```rust
//! use props_core::config::{DispatchConfig, FallbackPolicy};
//!
//! let config = DispatchConfig::from_toml_str(r#"
//!     fallback = "any-embedded-failure"
//!
//!     [remote]
//!     base_url = "https://props.example.org/api"
//! "#).unwrap();
//!
//! assert_eq!(config.fallback, FallbackPolicy::AnyEmbeddedFailure);
//! assert!(config.bridge.program.is_none());
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{DispatchError, DispatchResult};

/// Default remote endpoint
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default directory for exported spreadsheets
pub const DEFAULT_EXPORT_DIR: &str = "exports";

/// When the dispatcher may move from the embedded channel to the remote one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Use remote only when the embedded bridge is absent. An error from a
    /// present bridge is reported, not masked.
    #[default]
    UnavailableOnly,
    /// Use remote after any embedded failure.
    AnyEmbeddedFailure,
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub fallback: FallbackPolicy,
    pub remote: RemoteSettings,
    pub bridge: BridgeSettings,
    pub export: ExportSettings,
}

/// Remote endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub base_url: String,

    /// HTTP client timeout. Omitted means the transport default.
    pub timeout_secs: Option<u64>,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        RemoteSettings {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl RemoteSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Native host settings. No program means the bridge is absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    pub program: Option<PathBuf>,

    /// Arguments passed before the command identifier
    pub args: Vec<String>,
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            output_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

impl DispatchConfig {
    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> DispatchResult<Self> {
        parse_config(source, "<inline>")
    }
}

/// Parse a TOML document, naming `origin` in any error.
fn parse_config(source: &str, origin: &str) -> DispatchResult<DispatchConfig> {
    toml::from_str(source).map_err(|e| DispatchError::config_error(origin, e.to_string()))
}

/// Read and parse a configuration file.
pub fn load_config(path: &Path) -> DispatchResult<DispatchConfig> {
    let origin = path.display().to_string();
    let source = fs::read_to_string(path).map_err(|e| DispatchError::config_error(origin.as_str(), e.to_string()))?;
    parse_config(&source, &origin)
}
