use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Crate-wide mutex for tests that mutate process environment variables.
///
/// The process environment is global state shared across all threads.
/// Per-module mutexes do NOT prevent races between modules running in
/// parallel.  Every `unsafe { set_var / remove_var }` call in tests
/// MUST hold this single lock.
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

pub(crate) fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(val) if val.trim().is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::ParseError(format!(
            "failed to read {key}: {e}"
        ))),
    }
}

pub(crate) fn parse_optional_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_env(key)?
        .map(|s| {
            s.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{e}"),
            })
        })
        .transpose()
        .map(|opt| opt.unwrap_or(default))
}

/// Parse a boolean from an env var with a default.
///
/// Accepts "true"/"1" as true, "false"/"0" as false.
pub(crate) fn parse_bool_env(key: &str, default: bool) -> Result<bool, ConfigError> {
    match optional_env(key)? {
        Some(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("must be 'true' or 'false', got '{s}'"),
            }),
        },
        None => Ok(default),
    }
}

/// Parse a string from an env var with a default.
pub(crate) fn parse_string_env(
    key: &str,
    default: impl Into<String>,
) -> Result<String, ConfigError> {
    Ok(optional_env(key)?.unwrap_or_else(|| default.into()))
}

/// Parse a comma-separated list, falling back to `default` when unset.
///
/// Entries are trimmed and empty entries dropped.
pub(crate) fn parse_list_env(key: &str, default: &[&str]) -> Result<Vec<String>, ConfigError> {
    Ok(match optional_env(key)? {
        Some(raw) => split_list(&raw),
        None => default.iter().map(|s| s.to_string()).collect(),
    })
}

/// Parse `name=a,b;other=c` into an ordered map of name to list.
pub(crate) fn parse_map_env(
    key: &str,
    default: &str,
) -> Result<BTreeMap<String, Vec<String>>, ConfigError> {
    let raw = optional_env(key)?.unwrap_or_else(|| default.to_string());
    parse_map(&raw).map_err(|message| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_map(raw: &str) -> Result<BTreeMap<String, Vec<String>>, String> {
    let mut map = BTreeMap::new();
    for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((name, values)) = entry.split_once('=') else {
            return Err(format!("expected 'name=a,b', got '{entry}'"));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("empty name in '{entry}'"));
        }
        map.insert(name.to_string(), split_list(values));
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_map_preserves_order_of_values() {
        let map = parse_map("isla=elena, talia; dominic=miles").unwrap();
        assert_eq!(map["isla"], vec!["elena", "talia"]);
        assert_eq!(map["dominic"], vec!["miles"]);
    }

    #[test]
    fn test_parse_map_allows_empty_targets() {
        let map = parse_map("zara=").unwrap();
        assert!(map["zara"].is_empty());
    }

    #[test]
    fn test_parse_map_rejects_missing_separator() {
        assert!(parse_map("isla").is_err());
        assert!(parse_map("=elena").is_err());
    }

    #[test]
    fn test_parse_list_env_uses_default_when_unset() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        // SAFETY: Under ENV_MUTEX, no concurrent env access.
        unsafe { std::env::remove_var("CROSSTALK_TEST_LIST") };
        let list = parse_list_env("CROSSTALK_TEST_LIST", &["a", "b"]).unwrap();
        assert_eq!(list, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_optional_env_invalid_value() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
        // SAFETY: Under ENV_MUTEX.
        unsafe { std::env::set_var("CROSSTALK_TEST_NUM", "abc") };
        let err = parse_optional_env::<u64>("CROSSTALK_TEST_NUM", 3).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        // SAFETY: Under ENV_MUTEX.
        unsafe { std::env::remove_var("CROSSTALK_TEST_NUM") };
    }
}
