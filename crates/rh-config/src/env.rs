// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Environment variable helpers

use rh_logging::redact;

/// Read an environment variable, logging the access without its value
pub fn read_var(name: &str) -> Option<String> {
    let value = std::env::var(name).ok();
    match &value {
        Some(v) => tracing::info!(name, value = redact(v), "read environment variable"),
        None => tracing::info!(name, "environment variable not set"),
    }
    value
}

/// Environment name encoded in an API URL
///
/// The scheme is dropped and everything from the first `-` on is discarded:
/// `https://qa-api.example.com` gives `qa`. A URL without a `-` yields its
/// whole host part.
pub fn current_env(api_url: &str) -> String {
    let rest = match api_url.split_once("://") {
        Some((_, rest)) => rest,
        None => api_url,
    };
    rest.split('-').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_env_with_scheme() {
        assert_eq!(current_env("https://qa-api.example.com"), "qa");
        assert_eq!(current_env("http://staging-2-api.internal/v1"), "staging");
    }

    #[test]
    fn test_current_env_without_scheme() {
        assert_eq!(current_env("dev-api.example.com"), "dev");
    }

    #[test]
    fn test_current_env_without_dash() {
        assert_eq!(current_env("https://localhost:8080"), "localhost:8080");
        assert_eq!(current_env(""), "");
    }

    #[test]
    fn test_read_var_missing() {
        assert_eq!(read_var("RH_TEST_VARIABLE_THAT_IS_NEVER_SET"), None);
    }

    #[test]
    fn test_read_var_present() {
        // PATH is set in every environment the tests run in
        assert_eq!(read_var("PATH"), std::env::var("PATH").ok());
    }
}
