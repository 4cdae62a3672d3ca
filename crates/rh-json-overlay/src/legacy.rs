// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Older overlay styles kept for callers that depend on them
//!
//! [`update_top_level`] only touches keys already present at the top level of
//! an object. [`overlay_by_key_name`] addresses by bare key name instead of
//! by path: every leaf under a member called `key`, at any depth, collapses
//! into that member.

use crate::address::Address;
use crate::error::Result;
use crate::flatten::{flatten, unflatten};
use crate::update::UpdateSet;
use serde_json::{Map, Value};

/// Replace existing top-level members of `object`
///
/// Fields that are not top-level keys of `object` are ignored, including
/// nested addresses such as `a.b`.
pub fn update_top_level(object: &Map<String, Value>, updates: &UpdateSet) -> Map<String, Value> {
    let mut result = object.clone();
    for (field, value) in updates {
        match result.get_mut(field) {
            Some(slot) => *slot = value.clone(),
            None => tracing::trace!(field, "not a top-level key, skipping"),
        }
    }
    result
}

/// Replace every member named after an update key, wherever it occurs
///
/// Each leaf address is cut after its first member step with the update's
/// name; array positions below that member are discarded. The collapsed entry
/// takes the position of the first leaf it replaces.
pub fn overlay_by_key_name(doc: &Value, updates: &UpdateSet) -> Result<Value> {
    let mut flat = flatten(doc);

    for (key, value) in updates {
        let snapshot: Vec<String> = flat.keys().cloned().collect();
        let mut hits = 0usize;
        for raw in snapshot {
            let address: Address = raw.parse()?;
            let Some(target) = address.truncate_at_key(key) else {
                continue;
            };
            let Some(index) = flat.get_index_of(&raw) else {
                continue;
            };
            hits += 1;

            flat.shift_remove(&raw);
            let target = target.to_string();
            match flat.get_mut(&target) {
                Some(slot) => *slot = value.clone(),
                None => {
                    flat.shift_insert(index, target, value.clone());
                }
            }
        }
        tracing::debug!(key, hits, "overlaid by key name");
    }

    unflatten(&flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(doc: Value) -> Map<String, Value> {
        match doc {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_update_top_level_existing_keys_only() {
        let doc = object(json!({"a": 1, "b": {"c": 2}}));
        let updates = UpdateSet::new().set("a", 10).set("b.c", 20).set("z", 30);
        let result = update_top_level(&doc, &updates);
        assert_eq!(Value::Object(result), json!({"a": 10, "b": {"c": 2}}));
    }

    #[test]
    fn test_update_top_level_replaces_whole_member() {
        let doc = object(json!({"b": {"c": 2}, "a": 1}));
        let updates = UpdateSet::new().set("b", "flat");
        let result = update_top_level(&doc, &updates);
        let keys: Vec<&String> = result.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(result["b"], json!("flat"));
    }

    #[test]
    fn test_overlay_by_key_name_nested_member() {
        let doc = json!({"a": 1, "outer": {"field1": {"x": 1, "y": 2}, "keep": true}});
        let updates = UpdateSet::new().set("field1", 111);
        assert_eq!(
            overlay_by_key_name(&doc, &updates).unwrap(),
            json!({"a": 1, "outer": {"field1": 111, "keep": true}})
        );
    }

    #[test]
    fn test_overlay_by_key_name_every_occurrence() {
        let doc = json!({"id": 1, "items": [{"id": 2}, {"id": 3}]});
        let updates = UpdateSet::new().set("id", 0);
        assert_eq!(
            overlay_by_key_name(&doc, &updates).unwrap(),
            json!({"id": 0, "items": [{"id": 0}, {"id": 0}]})
        );
    }

    #[test]
    fn test_overlay_by_key_name_drops_array_positions() {
        let doc = json!({"tags": ["a", "b"], "n": 1});
        let updates = UpdateSet::new().set("tags", json!(["z"]));
        assert_eq!(
            overlay_by_key_name(&doc, &updates).unwrap(),
            json!({"tags": ["z"], "n": 1})
        );
    }

    #[test]
    fn test_overlay_by_key_name_missing_key_is_noop() {
        let doc = json!({"a": {"b": 1}});
        let updates = UpdateSet::new().set("field4", "new-value");
        assert_eq!(overlay_by_key_name(&doc, &updates).unwrap(), doc);
    }
}
