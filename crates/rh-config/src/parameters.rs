// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Named parameters fetched from a backing store and cached per run
//!
//! A [`ParameterCache`] is created by the caller and passed around by
//! reference. Each name is fetched at most once; batch reads only ask the
//! source for names that are not cached yet.

use crate::error::{ConfigError, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Values returned by one fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    pub found: HashMap<String, String>,
    /// Requested names the source does not know
    pub invalid: Vec<String>,
}

/// A store parameters can be read from
pub trait ParameterSource {
    fn fetch(&self, names: &[&str]) -> Result<FetchOutcome>;
}

/// Reads parameters from environment variables
///
/// `api/secret-key` with prefix `RH_PARAM` is read from `RH_PARAM_API_SECRET_KEY`.
#[derive(Debug, Clone, Default)]
pub struct EnvParameterSource {
    prefix: Option<String>,
}

impl EnvParameterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Environment variable holding the parameter `name`
    pub fn variable_name(&self, name: &str) -> String {
        let body: String = name
            .trim_start_matches('/')
            .chars()
            .map(|c| match c {
                '/' | '-' | '.' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();
        match &self.prefix {
            Some(prefix) => format!("{prefix}_{body}"),
            None => body,
        }
    }
}

impl ParameterSource for EnvParameterSource {
    fn fetch(&self, names: &[&str]) -> Result<FetchOutcome> {
        let mut outcome = FetchOutcome::default();
        for name in names {
            match std::env::var(self.variable_name(name)) {
                Ok(value) => {
                    outcome.found.insert(name.to_string(), value);
                }
                Err(_) => outcome.invalid.push(name.to_string()),
            }
        }
        Ok(outcome)
    }
}

/// Fetch-once cache in front of a [`ParameterSource`]
#[derive(Debug)]
pub struct ParameterCache<S> {
    source: S,
    values: Mutex<HashMap<String, String>>,
}

impl<S: ParameterSource> ParameterCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            values: Mutex::new(HashMap::new()),
        }
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds valid entries
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Value of `name`, fetched from the source on first use
    pub fn get(&self, name: &str) -> Result<String> {
        if let Some(value) = self.values().get(name) {
            return Ok(value.clone());
        }

        tracing::debug!(name, "parameter cache miss");
        let mut outcome = self.source.fetch(&[name])?;
        let value = outcome
            .found
            .remove(name)
            .ok_or_else(|| ConfigError::ParameterNotFound(name.to_string()))?;
        self.values().insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Values of every known name in `names`
    ///
    /// Names the source reports as invalid are logged and left out of the
    /// result.
    pub fn get_many(&self, names: &[&str]) -> Result<HashMap<String, String>> {
        let missing: Vec<&str> = {
            let values = self.values();
            names
                .iter()
                .copied()
                .filter(|name| !values.contains_key(*name))
                .collect()
        };

        if !missing.is_empty() {
            tracing::debug!(count = missing.len(), "fetching uncached parameters");
            let outcome = self.source.fetch(&missing)?;
            if !outcome.invalid.is_empty() {
                tracing::warn!(invalid = ?outcome.invalid, "some parameters were not found");
            }
            self.values().extend(outcome.found);
        }

        let values = self.values();
        Ok(names
            .iter()
            .filter_map(|name| values.get(*name).map(|v| (name.to_string(), v.clone())))
            .collect())
    }

    /// Seed the cache without going to the source
    pub fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values().insert(name.into(), value.into());
    }

    pub fn clear(&self) {
        self.values().clear();
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// In-memory source recording every request
    struct RecordingSource {
        known: HashMap<String, String>,
        requests: RefCell<Vec<Vec<String>>>,
    }

    impl RecordingSource {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self {
                known: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl ParameterSource for RecordingSource {
        fn fetch(&self, names: &[&str]) -> Result<FetchOutcome> {
            self.requests
                .borrow_mut()
                .push(names.iter().map(|n| n.to_string()).collect());
            let mut outcome = FetchOutcome::default();
            for name in names {
                match self.known.get(*name) {
                    Some(v) => {
                        outcome.found.insert(name.to_string(), v.clone());
                    }
                    None => outcome.invalid.push(name.to_string()),
                }
            }
            Ok(outcome)
        }
    }

    struct FailingSource;

    impl ParameterSource for FailingSource {
        fn fetch(&self, _names: &[&str]) -> Result<FetchOutcome> {
            Err(ConfigError::Source("store unavailable".into()))
        }
    }

    // === ParameterCache ===

    #[test]
    fn test_get_fetches_once() {
        let cache = ParameterCache::new(RecordingSource::new(&[("/db/user", "admin")]));
        assert_eq!(cache.get("/db/user").unwrap(), "admin");
        assert_eq!(cache.get("/db/user").unwrap(), "admin");
        assert_eq!(cache.source().requests.borrow().len(), 1);
    }

    #[test]
    fn test_get_missing_parameter() {
        let cache = ParameterCache::new(RecordingSource::new(&[]));
        assert!(matches!(
            cache.get("/nope"),
            Err(ConfigError::ParameterNotFound(name)) if name == "/nope"
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_many_only_fetches_uncached() {
        let cache = ParameterCache::new(RecordingSource::new(&[("a", "1"), ("b", "2")]));
        cache.insert("a", "cached");

        let values = cache.get_many(&["a", "b", "c"]).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values["a"], "cached");
        assert_eq!(values["b"], "2");
        assert_eq!(
            *cache.source().requests.borrow(),
            vec![vec!["b".to_string(), "c".to_string()]]
        );
    }

    #[test]
    fn test_get_many_fully_cached_skips_source() {
        let cache = ParameterCache::new(RecordingSource::new(&[("a", "1")]));
        cache.get_many(&["a"]).unwrap();
        cache.get_many(&["a"]).unwrap();
        assert_eq!(cache.source().requests.borrow().len(), 1);
    }

    #[test]
    fn test_clear_forces_refetch() {
        let cache = ParameterCache::new(RecordingSource::new(&[("a", "1")]));
        cache.get("a").unwrap();
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert_eq!(cache.len(), 0);
        cache.get("a").unwrap();
        assert_eq!(cache.source().requests.borrow().len(), 2);
    }

    #[test]
    fn test_source_failure_propagates() {
        let cache = ParameterCache::new(FailingSource);
        assert!(matches!(cache.get("a"), Err(ConfigError::Source(_))));
        assert!(matches!(cache.get_many(&["a"]), Err(ConfigError::Source(_))));
    }

    // === EnvParameterSource ===

    #[test]
    fn test_variable_name_mapping() {
        let source = EnvParameterSource::with_prefix("RH_PARAM");
        assert_eq!(source.variable_name("/api/secret-key"), "RH_PARAM_API_SECRET_KEY");
        assert_eq!(EnvParameterSource::new().variable_name("db.host"), "DB_HOST");
    }

    #[test]
    fn test_env_source_reports_unknown_names() {
        let source = EnvParameterSource::with_prefix("RH_TEST_NEVER_SET");
        let outcome = source.fetch(&["x", "y"]).unwrap();
        assert!(outcome.found.is_empty());
        assert_eq!(outcome.invalid, vec!["x", "y"]);
    }
}
