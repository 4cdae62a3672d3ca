// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Path-addressed partial updates for JSON documents
//!
//! A document is flattened into leaf addresses (`c.bb.q`, `c[0].bb`, `[1].c`),
//! the fields named by the caller are replaced, either one leaf at a time or
//! by collapsing a whole subtree into a single value, and the result is
//! rebuilt into a nested document.
//!
//! ```
//! use rh_json_overlay::{update_document, UpdateSet};
//! use serde_json::json;
//!
//! let doc = json!({"a": 1, "c": {"bb": {"q": 1, "w": 2}}});
//! let updates = UpdateSet::new().set("c.bb.q", "updated").set("missing", 0);
//! let patched = update_document(&doc, &updates).unwrap();
//! assert_eq!(patched, json!({"a": 1, "c": {"bb": {"q": "updated", "w": 2}}}));
//! ```
//!
//! Fields that designate nothing are skipped silently, so an overlay can be
//! applied without checking each field first.

pub mod address;
pub mod error;
pub mod flatten;
pub mod legacy;
pub mod matcher;
pub mod search;
pub mod update;

pub use address::{Address, Step};
pub use error::{OverlayError, Result};
pub use flatten::{flatten, unflatten, FlatMap};
pub use legacy::{overlay_by_key_name, update_top_level};
pub use matcher::{matches, PrefixMode};
pub use search::find_by_field;
pub use update::{apply_update, update_document, update_document_with, update_field, UpdateSet};
