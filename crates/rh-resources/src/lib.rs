// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! JSON resources for test suites
//!
//! Request bodies and expected payloads live as JSON files under a resource
//! directory and are addressed with classpath-style paths such as
//! `/jsons/user.json`. A missing resource is an error; callers are expected to
//! fail the test rather than retry.

pub mod error;

pub use error::{ResourceError, Result};

use rh_config::Settings;
use rh_json_overlay::{update_document_with, PrefixMode, UpdateSet};
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};

/// Loads JSON resources relative to a root directory
#[derive(Debug, Clone)]
pub struct ResourceLoader {
    root: PathBuf,
    prefix_mode: PrefixMode,
}

impl ResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prefix_mode: PrefixMode::default(),
        }
    }

    /// Loader rooted at the configured resources directory
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.resources_dir).with_prefix_mode(settings.prefix_mode())
    }

    /// Prefix mode used by [`ResourceLoader::load_with_overrides`]
    pub fn with_prefix_mode(mut self, mode: PrefixMode) -> Self {
        self.prefix_mode = mode;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of the resource `path`
    ///
    /// Parent-directory steps and absolute locations outside the root are
    /// rejected; the leading `/` of a classpath-style path is not.
    pub fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            return Err(ResourceError::InvalidPath {
                path: path.to_string(),
                reason: "empty path",
            });
        }
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => {
                    return Err(ResourceError::InvalidPath {
                        path: path.to_string(),
                        reason: "parent directory steps are not allowed",
                    })
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(ResourceError::InvalidPath {
                        path: path.to_string(),
                        reason: "path escapes the resource root",
                    })
                }
            }
        }
        Ok(self.root.join(relative))
    }

    /// Raw text of a resource
    pub fn read_string(&self, path: &str) -> Result<String> {
        let location = self.resolve(path)?;
        tracing::debug!(resource = path, location = %location.display(), "reading resource");
        match std::fs::read_to_string(&location) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ResourceError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse a resource as any JSON value
    pub fn load(&self, path: &str) -> Result<Value> {
        let text = self.read_string(path)?;
        serde_json::from_str(&text).map_err(|source| ResourceError::Json {
            path: self.root.join(path.trim_start_matches('/')),
            source,
        })
    }

    /// Parse a resource that must hold a JSON object
    pub fn load_object(&self, path: &str) -> Result<Map<String, Value>> {
        match self.load(path)? {
            Value::Object(map) => Ok(map),
            other => Err(wrong_shape(path, "an object", &other)),
        }
    }

    /// Parse a resource that must hold a JSON array
    pub fn load_array(&self, path: &str) -> Result<Vec<Value>> {
        match self.load(path)? {
            Value::Array(items) => Ok(items),
            other => Err(wrong_shape(path, "an array", &other)),
        }
    }

    /// Load a resource and apply `updates` to it
    ///
    /// Fields that the resource does not contain are ignored.
    pub fn load_with_overrides(&self, path: &str, updates: &UpdateSet) -> Result<Value> {
        let doc = self.load(path)?;
        let patched = update_document_with(&doc, updates, self.prefix_mode)?;
        tracing::debug!(resource = path, fields = updates.len(), "applied overrides");
        Ok(patched)
    }
}

fn wrong_shape(path: &str, expected: &'static str, found: &Value) -> ResourceError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    ResourceError::WrongShape {
        path: path.to_string(),
        expected,
        found,
    }
}
