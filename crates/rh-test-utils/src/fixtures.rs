// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Temporary resource trees for tests

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

use crate::logging::TestLogError;

/// A temporary directory laid out like a resource root
///
/// Removed when dropped.
pub struct JsonFixtures {
    dir: TempDir,
}

impl JsonFixtures {
    pub fn new() -> Result<Self, TestLogError> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write `value` as pretty JSON at the resource path `path`
    ///
    /// A leading `/` is accepted, as in `/jsons/user.json`.
    pub fn write_json(&self, path: &str, value: &Value) -> Result<PathBuf, TestLogError> {
        self.write_raw(path, &serde_json::to_string_pretty(value)?)
    }

    /// Write `content` unchanged, for malformed-input cases
    pub fn write_raw(&self, path: &str, content: &str) -> Result<PathBuf, TestLogError> {
        let target = self.dir.path().join(path.trim_start_matches('/'));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;
        Ok(target)
    }
}
