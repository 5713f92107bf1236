// ABOUTME: Configuration constants and environment helpers for Storyloom
// ABOUTME: Shared by the client library and the CLI so variable names live in one place

pub mod constants;

use std::env;
use std::str::FromStr;

use tracing::warn;

/// Read an environment variable, treating empty values as unset.
pub fn env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read and parse an environment variable.
///
/// Returns `Ok(None)` when the variable is unset and `Err(raw)` with the raw
/// value when it is set but does not parse.
pub fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>, String> {
    match env_string(name) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| raw),
    }
}

/// Read and parse an environment variable, falling back to `default` when it
/// is unset or malformed. Malformed values are logged.
pub fn env_parse_or<T: FromStr>(name: &str, default: T) -> T {
    match env_parse(name) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(raw) => {
            warn!("Ignoring invalid value for {}: {:?}", name, raw);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_env_string_treats_blank_as_unset() {
        env::set_var("STORYLOOM_TEST_BLANK", "   ");
        assert_eq!(env_string("STORYLOOM_TEST_BLANK"), None);
        env::remove_var("STORYLOOM_TEST_BLANK");
    }

    #[rstest]
    #[case("42", Ok(Some(42)))]
    #[case("abc", Err("abc".to_string()))]
    fn test_env_parse(#[case] raw: &str, #[case] expected: Result<Option<u32>, String>) {
        let name = format!("STORYLOOM_TEST_PARSE_{}", raw);
        env::set_var(&name, raw);
        assert_eq!(env_parse::<u32>(&name), expected);
        env::remove_var(&name);
    }

    #[test]
    fn test_env_parse_or_falls_back() {
        env::set_var("STORYLOOM_TEST_FALLBACK", "not-a-number");
        assert_eq!(env_parse_or("STORYLOOM_TEST_FALLBACK", 7u64), 7);
        env::remove_var("STORYLOOM_TEST_FALLBACK");
        assert_eq!(env_parse_or("STORYLOOM_TEST_FALLBACK", 9u64), 9);
    }
}
