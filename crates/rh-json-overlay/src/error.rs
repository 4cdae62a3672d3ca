// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for address parsing and document reconstruction

use thiserror::Error;

/// Result type alias for overlay operations
pub type Result<T> = std::result::Result<T, OverlayError>;

/// Errors raised while parsing addresses or rebuilding a flattened document
///
/// A field designator that matches nothing is not an error; only malformed
/// addresses and structurally inconsistent flat maps are reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Conflicting structure at '{address}': expected {expected}, found {found}")]
    Conflict {
        address: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Address '{address}' is assigned more than once")]
    DuplicateAddress { address: String },
}

impl OverlayError {
    pub(crate) fn invalid(address: &str, reason: impl Into<String>) -> Self {
        OverlayError::InvalidAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}
