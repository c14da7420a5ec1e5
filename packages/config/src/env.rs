// ABOUTME: Environment variable parsing utilities
// ABOUTME: Helpers for optional values, parsed values and fallbacks between variables

use std::str::FromStr;

/// Read a variable, treating empty or whitespace-only values as unset
pub fn env_non_empty(var_name: &str) -> Option<String> {
    std::env::var(var_name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an environment variable with a fallback default value
/// Logs a warning when the variable is set but cannot be parsed
pub fn parse_env_or_default<T>(var_name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env_non_empty(var_name) {
        Some(raw_value) => match raw_value.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!(
                    "Environment variable {} has unparseable value '{}', using default: {}",
                    var_name,
                    raw_value,
                    default
                );
                default
            }
        },
        None => default,
    }
}

/// Read the primary variable, then the fallback, then the default
pub fn env_with_fallback(primary_var: &str, fallback_var: &str, default: &str) -> String {
    env_non_empty(primary_var)
        .or_else(|| env_non_empty(fallback_var))
        .unwrap_or_else(|| default.to_string())
}
