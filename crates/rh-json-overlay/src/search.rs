// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use serde_json::{Map, Value};

/// Find the element of `items` whose `name` member equals `value`
///
/// Every matching element replaces the previous one, so the last match wins.
/// Returns an empty object when nothing matches. Non-object elements are
/// skipped.
pub fn find_by_field(items: &[Value], name: &str, value: &Value) -> Map<String, Value> {
    let mut found = Map::new();
    for item in items {
        if let Value::Object(object) = item {
            if object.get(name) == Some(value) {
                found = object.clone();
            }
        }
    }
    if found.is_empty() {
        tracing::trace!(name, "no element matched");
    }
    found
}
