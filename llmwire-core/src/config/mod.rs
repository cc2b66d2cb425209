//! Configuration loading
//!
//! A YAML or JSON file lists the vendors to talk to, plus shared retry and
//! connection settings. `${VAR}` references are replaced from the
//! environment before parsing. Nothing in the core requires a config file;
//! it is a convenience for building ready-to-use providers.

mod env;
mod error;
mod schema;
mod secrets;
mod validator;

pub use env::interpolate_env_vars;
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrorKind};
pub use schema::{ConnectionConfig, LlmwireConfig, ProviderEntry, SUPPORTED_VERSION};
pub use secrets::{SafeLogging, SecretString};
pub use validator::ConfigValidator;

use crate::http::{HttpClient, HttpTransport};
use crate::providers::{Provider, ProviderResult, ReliableProvider, RetryConfig};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

fn read_file(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

fn finish(config: LlmwireConfig) -> ConfigResult<LlmwireConfig> {
    ConfigValidator::new().validate(&config)?;
    debug!(providers = config.providers.len(), "configuration loaded");
    Ok(config)
}

/// Parse and validate YAML configuration text
pub fn from_yaml_str(content: &str) -> ConfigResult<LlmwireConfig> {
    parse_yaml(content, "<string>")
}

fn parse_yaml(content: &str, origin: &str) -> ConfigResult<LlmwireConfig> {
    let interpolated = interpolate_env_vars(content)?;
    let config: LlmwireConfig =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::Syntax {
            path: origin.to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;
    finish(config)
}

/// Load a configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<LlmwireConfig> {
    let path = path.as_ref();
    let content = read_file(path)?;
    parse_yaml(&content, &path.to_string_lossy())
}

/// Load a configuration from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> ConfigResult<LlmwireConfig> {
    let path = path.as_ref();
    let content = read_file(path)?;
    let interpolated = interpolate_env_vars(&content)?;

    let config: LlmwireConfig =
        serde_json::from_str(&interpolated).map_err(|e| ConfigError::Syntax {
            path: path.to_string_lossy().to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })?;
    finish(config)
}

/// Build the reqwest transport described by `connection`
pub fn build_transport(connection: &ConnectionConfig) -> ProviderResult<HttpClient> {
    HttpClient::with_config(
        connection.connect_timeout(),
        connection.request_timeout(),
        connection.max_idle_per_host,
    )
}

/// Build a retrying client for `entry` over `transport`
pub fn build_provider(
    entry: &ProviderEntry,
    transport: Arc<dyn HttpTransport>,
    retry: &RetryConfig,
) -> ProviderResult<ReliableProvider<Box<dyn Provider>>> {
    debug!(provider = %entry.safe_for_logging(), "building provider");
    let client = entry.api.create_client(transport, entry.compat_config())?;
    Ok(ReliableProvider::new(client, retry.clone()))
}

impl LlmwireConfig {
    /// Build the named provider with this file's retry and connection
    /// settings
    pub fn build_provider(&self, name: &str) -> ConfigResult<ReliableProvider<Box<dyn Provider>>> {
        let entry = self
            .provider(name)
            .ok_or_else(|| ConfigError::UnknownProvider {
                name: name.to_string(),
            })?;
        let build_error = |source| ConfigError::Build {
            name: name.to_string(),
            source,
        };
        let transport = build_transport(&self.connection).map_err(build_error)?;
        build_provider(entry, Arc::new(transport), &self.retry).map_err(build_error)
    }
}
