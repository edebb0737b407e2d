//! Environment variable parsing helpers with defaults instead of unwraps.

use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when missing or invalid.
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, returning None if missing or invalid.
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Interpret common truthy spellings (`1`, `true`, `yes`, `on`).
pub fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_parse_env_with_default() {
        let result: u32 = parse_env_with_default("NONEXISTENT_VAR_XYZ", 42);
        assert_eq!(result, 42);

        std::env::set_var("DB_POOL_TEST_PORT", "8080");
        let result: u16 = parse_env_with_default("DB_POOL_TEST_PORT", 3000);
        assert_eq!(result, 8080);

        std::env::set_var("DB_POOL_TEST_PORT", "not-a-port");
        let result: u16 = parse_env_with_default("DB_POOL_TEST_PORT", 3000);
        assert_eq!(result, 3000);
        std::env::remove_var("DB_POOL_TEST_PORT");
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_env_optional() {
        assert_eq!(parse_env_optional::<u32>("NONEXISTENT_VAR_XYZ"), None);

        std::env::set_var("DB_POOL_TEST_OPT", " 123 ");
        assert_eq!(parse_env_optional::<u32>("DB_POOL_TEST_OPT"), Some(123));
        std::env::remove_var("DB_POOL_TEST_OPT");
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_env_bool() {
        std::env::remove_var("DB_POOL_TEST_FLAG");
        assert!(parse_env_bool("DB_POOL_TEST_FLAG", true));

        std::env::set_var("DB_POOL_TEST_FLAG", "Yes");
        assert!(parse_env_bool("DB_POOL_TEST_FLAG", false));

        std::env::set_var("DB_POOL_TEST_FLAG", "0");
        assert!(!parse_env_bool("DB_POOL_TEST_FLAG", true));
        std::env::remove_var("DB_POOL_TEST_FLAG");
    }
}
