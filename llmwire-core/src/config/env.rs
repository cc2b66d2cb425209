//! `${VAR}` interpolation for configuration text

use super::error::{ConfigError, ConfigResult};
use regex::{Captures, Regex};
use std::env;

const ENV_VAR_PATTERN: &str = r"\$\{([A-Z_][A-Z0-9_]*)\}";

fn env_var_regex() -> ConfigResult<Regex> {
    Ok(Regex::new(ENV_VAR_PATTERN)?)
}

/// Replace every `${VAR}` in `content` with the variable's value.
///
/// Fails on the first variable that is not set.
pub fn interpolate_env_vars(content: &str) -> ConfigResult<String> {
    let pattern = env_var_regex()?;

    if let Some(missing) = pattern
        .captures_iter(content)
        .map(|cap| cap[1].to_string())
        .find(|var| env::var(var).is_err())
    {
        return Err(ConfigError::MissingEnvVar { var: missing });
    }

    let result = pattern.replace_all(content, |cap: &Captures<'_>| {
        env::var(&cap[1]).unwrap_or_default()
    });
    Ok(result.into_owned())
}
