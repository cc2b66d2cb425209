//! Errors raised while loading a configuration file or building providers
//! from it

use crate::protocol::ApiType;
use crate::providers::ProviderError;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config '{path}' at line {}: {message}", .line.unwrap_or(0))]
    Syntax {
        path: String,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("environment variable '{var}' is not set")]
    MissingEnvVar { var: String },

    #[error("no provider named '{name}'")]
    UnknownProvider { name: String },

    #[error("provider '{name}' could not be built: {source}")]
    Build {
        name: String,
        #[source]
        source: ProviderError,
    },

    #[error("bad interpolation pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A rejected field, addressed like `providers[1].temperature`
#[derive(Debug, Error)]
#[error("invalid config at '{path}': {kind}")]
pub struct ValidationError {
    pub path: String,
    pub kind: ValidationErrorKind,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationErrorKind {
    #[error("required field is missing")]
    Missing,

    #[error("unsupported version '{found}', expected '{expected}'")]
    UnsupportedVersion {
        found: String,
        expected: &'static str,
    },

    #[error("provider name '{name}' is used more than once")]
    DuplicateName { name: String },

    #[error("'{value}' is not an http(s) URL")]
    NotHttpUrl { value: String },

    #[error("temperature {value} is outside [0, 2]")]
    TemperatureOutOfRange { value: f32 },

    #[error("'{vendor}' is not a built-in OpenAI-compatible vendor")]
    UnknownVendor { vendor: String },

    #[error("openai_compatible needs `vendor` or `compat`")]
    CompatDescriptorMissing,

    #[error("`vendor` and `compat` do not apply to {api}")]
    CompatOnNativeApi { api: ApiType },

    #[error("`${{...}}` placeholder survived interpolation; variable names must be upper case")]
    UnresolvedPlaceholder,

    #[error("backoff multiplier {value} is below 1.0")]
    BackoffBelowOne { value: f64 },

    #[error("max delay {max_ms}ms is below the initial delay {initial_ms}ms")]
    MaxDelayBelowInitial { initial_ms: u64, max_ms: u64 },

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, kind: ValidationErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(path, ValidationErrorKind::Missing)
    }
}
