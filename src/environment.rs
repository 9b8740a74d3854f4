use std::env;
use std::str::FromStr;

use crate::error::ConfigError;

/// Retrieves an environment variable, treating unset and blank values alike.
///
/// # Arguments
/// - `var`: The name of the environment variable.
///
/// # Returns
/// - `Option<String>` with surrounding whitespace removed
pub fn get_env_var(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Looks up `var` through `lookup` and parses it.
///
/// # Arguments
/// - `lookup`: Source of raw values, usually [`get_env_var`].
/// - `var`: The name of the variable.
///
/// # Returns
/// - `Ok(None)` when the variable is unset, `Err` when it does not parse
pub fn parse_env_var<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                var: var.to_string(),
                value,
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_present_values_only() {
        let lookup = |var: &str| match var {
            "NUM" => Some("0.5".to_string()),
            "BAD" => Some("half".to_string()),
            _ => None,
        };
        assert_eq!(parse_env_var::<f64, _>(&lookup, "NUM").unwrap(), Some(0.5));
        assert_eq!(parse_env_var::<f64, _>(&lookup, "MISSING").unwrap(), None);
        assert!(matches!(
            parse_env_var::<f64, _>(&lookup, "BAD"),
            Err(ConfigError::InvalidEnv { .. })
        ));
    }

    #[test]
    fn unset_variable_is_none() {
        assert_eq!(get_env_var("MEDWIRE_TEST_SURELY_UNSET_VARIABLE"), None);
    }
}
