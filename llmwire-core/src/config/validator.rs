//! Configuration validation beyond the schema's structural checks

use super::error::{ValidationError, ValidationErrorKind};
use super::schema::LlmwireConfig;
use regex::Regex;

/// Runs [`LlmwireConfig::validate`] plus policy checks on retry and
/// connection settings
pub struct ConfigValidator {
    /// Any `${...}` left over after interpolation
    placeholder_pattern: Option<Regex>,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self {
            placeholder_pattern: Regex::new(r"\$\{[^}]*\}").ok(),
        }
    }

    pub fn validate(&self, config: &LlmwireConfig) -> Result<(), ValidationError> {
        config.validate()?;

        self.validate_placeholders(config)?;
        self.validate_retry(config)?;
        self.validate_connection(config)?;

        Ok(())
    }

    /// A placeholder that survived interpolation would be sent to the vendor
    /// verbatim
    fn validate_placeholders(&self, config: &LlmwireConfig) -> Result<(), ValidationError> {
        let Some(pattern) = &self.placeholder_pattern else {
            return Ok(());
        };
        for (i, provider) in config.providers.iter().enumerate() {
            if pattern.is_match(provider.api_key.expose_secret()) {
                return Err(ValidationError::new(
                    format!("providers[{}].api_key", i),
                    ValidationErrorKind::UnresolvedPlaceholder,
                ));
            }
            if let Some(base_url) = &provider.base_url {
                if pattern.is_match(base_url) {
                    return Err(ValidationError::new(
                        format!("providers[{}].base_url", i),
                        ValidationErrorKind::UnresolvedPlaceholder,
                    ));
                }
            }
        }
        Ok(())
    }

    fn validate_retry(&self, config: &LlmwireConfig) -> Result<(), ValidationError> {
        let retry = &config.retry;
        if retry.backoff_multiplier < 1.0 {
            return Err(ValidationError::new(
                "retry.backoff_multiplier",
                ValidationErrorKind::BackoffBelowOne {
                    value: retry.backoff_multiplier,
                },
            ));
        }
        if retry.max_delay_ms < retry.initial_delay_ms {
            return Err(ValidationError::new(
                "retry.max_delay_ms",
                ValidationErrorKind::MaxDelayBelowInitial {
                    initial_ms: retry.initial_delay_ms,
                    max_ms: retry.max_delay_ms,
                },
            ));
        }
        Ok(())
    }

    fn validate_connection(&self, config: &LlmwireConfig) -> Result<(), ValidationError> {
        let connection = &config.connection;
        if connection.connect_timeout_ms == 0 {
            return Err(ValidationError::new(
                "connection.connect_timeout_ms",
                ValidationErrorKind::ZeroTimeout,
            ));
        }
        if connection.request_timeout_ms == 0 {
            return Err(ValidationError::new(
                "connection.request_timeout_ms",
                ValidationErrorKind::ZeroTimeout,
            ));
        }
        Ok(())
    }
}
