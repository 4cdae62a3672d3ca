// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Applying field updates to flat maps and whole documents

use crate::address::Address;
use crate::error::Result;
use crate::flatten::{flatten, flatten_at, unflatten, FlatMap};
use crate::matcher::{children, matches, PrefixMode};
use serde_json::{Map, Value};

/// Ordered list of field updates
///
/// Entries are applied in sequence, so a later entry sees the document as
/// left by the earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSet {
    entries: Vec<(String, Value)>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`UpdateSet::push`]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(field, value);
        self
    }

    pub fn push(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((field.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Map<String, Value>> for UpdateSet {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for UpdateSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = UpdateSet::new();
        for (field, value) in iter {
            set.push(field, value);
        }
        set
    }
}

impl<'a> IntoIterator for &'a UpdateSet {
    type Item = (&'a str, &'a Value);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Replace the leaf or subtree designated by `field` with `value`
///
/// Returns false and leaves `flat` untouched when `field` designates nothing
/// or is not a well-formed address. A compound `value` is stored as its own
/// leaf entries under `field`, so later updates can reach inside it. An
/// existing leaf keeps its position; a collapsed subtree is re-inserted at
/// the end of the map.
pub fn apply_update(flat: &mut FlatMap, field: &str, value: Value, mode: PrefixMode) -> bool {
    let Some(address) = field_address(field) else {
        return false;
    };
    if !matches(field, flat.keys().map(String::as_str)) {
        tracing::trace!(field, "field not present, skipping");
        return false;
    }

    let removed: Vec<String> = children(field, flat.keys().map(String::as_str), mode)
        .into_iter()
        .filter(|address| *address != field)
        .map(str::to_owned)
        .collect();
    for address in &removed {
        flat.shift_remove(address);
    }

    let entries = flatten_at(address, &value);
    match flat.shift_remove_full(field) {
        Some((index, _, _)) => splice(flat, index, entries),
        None => flat.extend(entries),
    }
    tracing::debug!(field, removed = removed.len(), "applied update");
    true
}

/// Parsed form of an update field, if it can name anything below the root
fn field_address(field: &str) -> Option<Address> {
    match field.parse::<Address>() {
        // The root is never patched through a field
        Ok(address) if address.is_root() => None,
        Ok(address) => Some(address),
        Err(err) => {
            tracing::trace!(field, %err, "field is not an address, skipping");
            None
        }
    }
}

/// Insert `entries` starting at position `index`
fn splice(flat: &mut FlatMap, index: usize, entries: FlatMap) {
    for (offset, (address, value)) in entries.into_iter().enumerate() {
        flat.shift_insert(index + offset, address, value);
    }
}

/// Replace the existing leaf at exactly `field`
fn replace_leaf(flat: &mut FlatMap, field: &str, value: &Value) -> bool {
    let Some(address) = field_address(field) else {
        return false;
    };
    match flat.shift_remove_full(field) {
        Some((index, _, _)) => {
            splice(flat, index, flatten_at(address, value));
            true
        }
        None => {
            tracing::trace!(field, "no leaf at address in array document");
            false
        }
    }
}

/// Apply every update in `updates` to `doc` with the default prefix mode
pub fn update_document(doc: &Value, updates: &UpdateSet) -> Result<Value> {
    update_document_with(doc, updates, PrefixMode::default())
}

/// Apply every update in `updates` to `doc`
///
/// Object roots support both leaf and subtree replacement. Array roots only
/// accept fields naming an existing leaf exactly; designators such as `[1]`
/// are ignored. A scalar root has no addressable fields and is returned as is.
pub fn update_document_with(doc: &Value, updates: &UpdateSet, mode: PrefixMode) -> Result<Value> {
    match doc {
        Value::Object(_) => {
            let mut flat = flatten(doc);
            for (field, value) in updates {
                apply_update(&mut flat, field, value.clone(), mode);
            }
            unflatten(&flat)
        }
        Value::Array(_) => {
            let mut flat = flatten(doc);
            for (field, value) in updates {
                replace_leaf(&mut flat, field, value);
            }
            unflatten(&flat)
        }
        scalar => {
            if !updates.is_empty() {
                tracing::debug!("scalar document has no fields, updates ignored");
            }
            Ok(scalar.clone())
        }
    }
}

/// Single-field form of [`update_document`]
pub fn update_field(doc: &Value, field: &str, value: impl Into<Value>) -> Result<Value> {
    update_document(doc, &UpdateSet::new().set(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    // === UpdateSet ===

    #[test]
    fn test_update_set_keeps_order() {
        let set = UpdateSet::new().set("b", 1).set("a", "x");
        let fields: Vec<&str> = set.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["b", "a"]);
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_update_set_from_map() {
        let map = json!({"z": 1, "a": 2}).as_object().cloned().unwrap();
        let set = UpdateSet::from(map);
        assert_eq!(set, UpdateSet::new().set("z", 1).set("a", 2));
    }

    // === apply_update ===

    #[test]
    fn test_apply_update_missing_field_is_noop() {
        let mut flat = flatten(&json!({"a": 1, "b": 2}));
        let before = flat.clone();
        assert!(!apply_update(&mut flat, "aa", json!(3), PrefixMode::Literal));
        assert_eq!(flat, before);
    }

    #[test]
    fn test_apply_update_empty_field_is_noop() {
        let mut flat = flatten(&json!({"a.b": 1}));
        assert!(!apply_update(&mut flat, "", json!(3), PrefixMode::Literal));
        assert_eq!(unflatten(&flat).unwrap(), json!({"a.b": 1}));
    }

    #[test]
    fn test_apply_update_leaf_keeps_position() {
        let mut flat = flatten(&json!({"a": 1, "b": 2, "c": 3}));
        assert!(apply_update(&mut flat, "b", json!("x"), PrefixMode::Literal));
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(flat["b"], json!("x"));
    }

    #[test]
    fn test_apply_update_collapse_appends() {
        let mut flat = flatten(&json!({"c": {"x": 1, "y": 2}, "d": 3}));
        assert!(apply_update(&mut flat, "c", json!("x"), PrefixMode::Literal));
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["d", "c"]);
        assert_eq!(flat["c"], json!("x"));
    }

    #[test]
    fn test_apply_update_compound_value_becomes_leaves() {
        let mut flat = flatten(&json!({"a": 1, "b": 2}));
        assert!(apply_update(&mut flat, "a", json!({"k": [true], "e": {}}), PrefixMode::Literal));
        let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a.k[0]", "a.e", "b"]);
        assert_eq!(flat["a.e"], json!({}));
    }

    #[test]
    fn test_apply_update_malformed_field_is_noop() {
        let doc = json!({"x": {"a.b": {"c": 1}}});
        let mut flat = flatten(&doc);
        assert!(!apply_update(&mut flat, r#"x["a"#, json!(5), PrefixMode::Literal));
        assert!(!apply_update(&mut flat, r#"x["a"#, json!(5), PrefixMode::Boundary));
        assert_eq!(unflatten(&flat).unwrap(), doc);
    }

    #[test]
    fn test_apply_update_literal_prefix_takes_sibling() {
        let mut flat = flatten(&json!({"a": 1, "ab": 2}));
        assert!(apply_update(&mut flat, "a", json!(9), PrefixMode::Literal));
        assert_eq!(unflatten(&flat).unwrap(), json!({"a": 9}));
    }

    #[test]
    fn test_apply_update_boundary_prefix_keeps_sibling() {
        let mut flat = flatten(&json!({"a": 1, "ab": 2}));
        assert!(apply_update(&mut flat, "a", json!(9), PrefixMode::Boundary));
        assert_eq!(unflatten(&flat).unwrap(), json!({"a": 9, "ab": 2}));
    }

    #[test]
    fn test_apply_update_other_case_inserts_new_key() {
        let mut flat = flatten(&json!({"Name": "old"}));
        assert!(apply_update(&mut flat, "name", json!("new"), PrefixMode::Literal));
        assert_eq!(unflatten(&flat).unwrap(), json!({"Name": "old", "name": "new"}));
    }

    // === update_document ===

    #[test]
    fn test_update_document_scalar_root_unchanged() {
        let updates = UpdateSet::new().set("", 1).set("a", 2);
        assert_eq!(update_document(&json!("text"), &updates).unwrap(), json!("text"));
    }

    #[test]
    fn test_update_document_array_root_exact_only() {
        let doc = json!([{"c": 1}, {"c": 2}]);
        assert_eq!(
            update_field(&doc, "[1].c", 3).unwrap(),
            json!([{"c": 1}, {"c": 3}])
        );
        assert_eq!(update_field(&doc, "[1]", json!({"c": 9})).unwrap(), doc);
        assert_eq!(update_field(&doc, "[1].a", 3).unwrap(), doc);
    }

    #[test]
    fn test_update_document_empty_array_root_ignores_root_address() {
        assert_eq!(update_field(&json!([]), "", 1).unwrap(), json!([]));
    }

    #[test]
    fn test_update_document_sequential_updates() {
        let doc = json!({"c": {"x": 1}});
        let updates = UpdateSet::new().set("c", json!({"y": 2})).set("c.x", 5);
        // "c.x" went away with the old subtree
        assert_eq!(update_document(&doc, &updates).unwrap(), json!({"c": {"y": 2}}));
    }

    #[test]
    fn test_update_document_reaches_inside_inserted_value() {
        let doc = json!({"c": {"x": 1}});
        let updates = UpdateSet::new().set("c", json!({"y": 2})).set("c.y", 5);
        let batched = update_document(&doc, &updates).unwrap();

        let stepwise = update_field(&doc, "c", json!({"y": 2})).unwrap();
        let stepwise = update_field(&stepwise, "c.y", 5).unwrap();
        assert_eq!(batched, stepwise);
        assert_eq!(batched, json!({"c": {"y": 5}}));
    }

    #[test]
    fn test_update_document_array_root_reaches_inside_inserted_value() {
        let doc = json!([{"c": 1}]);
        let updates = UpdateSet::new().set("[0].c", json!({"k": 1})).set("[0].c.k", 2);
        assert_eq!(update_document(&doc, &updates).unwrap(), json!([{"c": {"k": 2}}]));
    }

    #[test]
    fn test_update_field_malformed_field_keeps_document() {
        let doc = json!({"x": {"a.b": {"c": 1}}});
        assert_eq!(update_field(&doc, r#"x["a"#, 5).unwrap(), doc);
        assert_eq!(update_field(&json!([{"a.b": 1}]), r#"[0]["a"#, 5).unwrap(), json!([{"a.b": 1}]));
    }

    #[test]
    fn test_update_document_with_boundary() {
        let doc = json!({"id": 1, "identity": {"x": 1}});
        let updates = UpdateSet::new().set("id", 2);
        assert_eq!(
            update_document_with(&doc, &updates, PrefixMode::Boundary).unwrap(),
            json!({"id": 2, "identity": {"x": 1}})
        );
        assert_eq!(update_document(&doc, &updates).unwrap(), json!({"id": 2}));
    }
}
