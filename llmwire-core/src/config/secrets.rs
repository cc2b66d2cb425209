//! API key handling and redaction
//!
//! Keys are wrapped in [`SecretString`] so that `Debug`, `Display` and
//! tracing output never show them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A sensitive string such as an API key
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The actual key, for building auth headers and URLs only
    pub fn expose_secret(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Enough of the key to tell two keys apart in a log line
    pub fn partial_redact(&self) -> String {
        if self.value.is_empty() {
            return "[EMPTY]".to_string();
        }

        let len = self.value.len();
        if len <= 8 || !self.value.is_ascii() {
            "[REDACTED]".to_string()
        } else if self.value.starts_with("sk-") {
            format!("sk-...{}", &self.value[len - 4..])
        } else {
            format!("{}...{}", &self.value[..2], &self.value[len - 2..])
        }
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Types that can describe themselves without leaking secrets
pub trait SafeLogging {
    fn safe_for_logging(&self) -> String;
}
