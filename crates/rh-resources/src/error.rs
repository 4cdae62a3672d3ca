// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use rh_json_overlay::OverlayError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for resource loading
pub type Result<T> = std::result::Result<T, ResourceError>;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Can't find a file: {0}")]
    NotFound(String),

    #[error("Invalid resource path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Resource {path} holds {found}, expected {expected}")]
    WrongShape {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Failed to apply overrides: {0}")]
    Overlay(#[from] OverlayError),
}
