//! Environment variable expansion for configuration strings.
//!
//! Supports `${VAR}` (error when unset) and `${VAR:-default}`.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// `field` names the configuration key and is reported in errors.
///
/// # Errors
///
/// Returns [`ConfigError::EnvVar`] if a referenced variable is unset and no
/// default is given.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains('$') {
        return Ok(value.to_owned());
    }

    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}
