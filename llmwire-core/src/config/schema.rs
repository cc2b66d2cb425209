//! Configuration schema structures with serde support

use super::error::{ValidationError, ValidationErrorKind};
use super::secrets::{SafeLogging, SecretString};
use crate::protocol::{ApiType, RequestConfig, DEFAULT_MAX_TOKENS};
use crate::providers::{CompatConfig, RetryConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

pub const SUPPORTED_VERSION: &str = "0.1";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmwireConfig {
    /// Schema version (required, no default)
    pub version: String,

    #[serde(default)]
    pub providers: Vec<ProviderEntry>,

    /// Retry policy applied to every provider
    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// One configured vendor endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderEntry {
    /// Unique name used to select this entry
    pub name: String,

    #[serde(rename = "type")]
    pub api: ApiType,

    /// API key (supports `${VAR}` interpolation). May be empty for local
    /// OpenAI-compatible servers.
    #[serde(default)]
    pub api_key: SecretString,

    /// Override for the vendor's default base URL
    #[serde(default)]
    pub base_url: Option<String>,

    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub system_prompt: Option<String>,

    #[serde(default = "default_true")]
    pub stream: bool,

    /// Built-in OpenAI-compatible vendor name (`groq`, `ollama`, ...)
    #[serde(default)]
    pub vendor: Option<String>,

    /// Full OpenAI-compatible descriptor; wins over `vendor`
    #[serde(default)]
    pub compat: Option<CompatConfig>,
}

/// Settings for the reqwest transport
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Whole-request timeout; streamed responses are read to the end inside it
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_idle")]
    pub max_idle_per_host: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout(),
            request_timeout_ms: default_request_timeout(),
            max_idle_per_host: default_max_idle(),
        }
    }
}

impl ConnectionConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_connect_timeout() -> u64 {
    10_000
}

fn default_request_timeout() -> u64 {
    300_000
}

fn default_max_idle() -> usize {
    10
}

impl LlmwireConfig {
    /// Structural validation: version, required fields, duplicates, ranges
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version.is_empty() {
            return Err(ValidationError::missing("version"));
        }

        if self.version != SUPPORTED_VERSION {
            return Err(ValidationError::new(
                "version",
                ValidationErrorKind::UnsupportedVersion {
                    found: self.version.clone(),
                    expected: SUPPORTED_VERSION,
                },
            ));
        }

        if self.providers.is_empty() {
            return Err(ValidationError::missing("providers"));
        }

        let mut seen_names = HashSet::new();
        for (i, provider) in self.providers.iter().enumerate() {
            if !seen_names.insert(provider.name.as_str()) {
                return Err(ValidationError::new(
                    format!("providers[{}].name", i),
                    ValidationErrorKind::DuplicateName {
                        name: provider.name.clone(),
                    },
                ));
            }
            provider.validate(&format!("providers[{}]", i))?;
        }

        Ok(())
    }

    /// Look up a provider entry by name
    pub fn provider(&self, name: &str) -> Option<&ProviderEntry> {
        self.providers.iter().find(|p| p.name == name)
    }
}

impl ProviderEntry {
    pub fn validate(&self, path: &str) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::missing(format!("{}.name", path)));
        }

        if self.model.is_empty() {
            return Err(ValidationError::missing(format!("{}.model", path)));
        }

        // Local compatible servers (Ollama) run without a key
        if self.api_key.is_empty() && self.api != ApiType::OpenAICompatible {
            return Err(ValidationError::missing(format!("{}.api_key", path)));
        }

        if let Some(base_url) = &self.base_url {
            validate_url(&format!("{}.base_url", path), base_url)?;
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ValidationError::new(
                    format!("{}.temperature", path),
                    ValidationErrorKind::TemperatureOutOfRange { value: temperature },
                ));
            }
        }

        match (self.api, &self.compat, &self.vendor) {
            (ApiType::OpenAICompatible, Some(compat), _) => {
                if compat.provider_name.is_empty() {
                    return Err(ValidationError::missing(format!(
                        "{}.compat.provider_name",
                        path
                    )));
                }
                validate_url(&format!("{}.compat.base_url", path), &compat.base_url)?;
            }
            (ApiType::OpenAICompatible, None, Some(vendor)) => {
                if CompatConfig::builtin(vendor).is_none() {
                    return Err(ValidationError::new(
                        format!("{}.vendor", path),
                        ValidationErrorKind::UnknownVendor {
                            vendor: vendor.clone(),
                        },
                    ));
                }
            }
            (ApiType::OpenAICompatible, None, None) => {
                return Err(ValidationError::new(
                    format!("{}.vendor", path),
                    ValidationErrorKind::CompatDescriptorMissing,
                ));
            }
            (api, compat, vendor) if compat.is_some() || vendor.is_some() => {
                return Err(ValidationError::new(
                    format!("{}.vendor", path),
                    ValidationErrorKind::CompatOnNativeApi { api },
                ));
            }
            _ => {}
        }

        Ok(())
    }

    /// The compatible-vendor descriptor, from `compat` or the built-in table
    pub fn compat_config(&self) -> Option<CompatConfig> {
        self.compat
            .clone()
            .or_else(|| self.vendor.as_deref().and_then(CompatConfig::builtin))
    }

    /// Per-call settings for this entry
    pub fn request_config(&self) -> RequestConfig {
        RequestConfig {
            model: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: self.stream,
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl ProviderEntry {
    /// [`request_config`](Self::request_config) with the compatible vendor's
    /// feature limits applied; `stream` is false when the vendor cannot
    /// stream
    pub fn effective_request_config(&self) -> RequestConfig {
        let config = self.request_config();
        match self.compat_config() {
            Some(compat) if self.api == ApiType::OpenAICompatible => {
                compat.effective_config(&config).into_owned()
            }
            _ => config,
        }
    }
}

impl SafeLogging for ProviderEntry {
    fn safe_for_logging(&self) -> String {
        format!(
            "{} ({}, model={}, api_key={})",
            self.name,
            self.api,
            self.model,
            self.api_key.partial_redact()
        )
    }
}

fn validate_url(path: &str, value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => Err(ValidationError::new(
            path,
            ValidationErrorKind::NotHttpUrl {
                value: value.to_string(),
            },
        )),
    }
}
