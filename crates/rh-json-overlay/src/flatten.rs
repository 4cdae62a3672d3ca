// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Conversion between nested JSON documents and flat address maps
//!
//! `flatten` produces one entry per leaf. Scalars are leaves, and so are empty
//! objects and empty arrays: keeping them as explicit entries is what lets
//! `unflatten` rebuild them, so `unflatten(&flatten(&doc)) == doc` for every
//! document.
//!
//! `unflatten` accepts any map whose keys are well-formed addresses. Values are
//! taken as opaque leaves, even compound ones, and are never re-expanded.

use crate::address::{Address, Step};
use crate::error::{OverlayError, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Ordered mapping from rendered leaf address to leaf value
pub type FlatMap = IndexMap<String, Value>;

/// Flatten a document into its leaf addresses
pub fn flatten(doc: &Value) -> FlatMap {
    flatten_at(Address::root(), doc)
}

/// Leaf entries of `value` as if it were stored at `address`
pub(crate) fn flatten_at(address: Address, value: &Value) -> FlatMap {
    let mut flat = FlatMap::new();
    let mut path = address;
    flatten_into(value, &mut path, &mut flat);
    flat
}

fn flatten_into(value: &Value, path: &mut Address, out: &mut FlatMap) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                path.push(Step::Key(key.clone()));
                flatten_into(child, path, out);
                path.pop();
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                path.push(Step::Index(index));
                flatten_into(child, path, out);
                path.pop();
            }
        }
        leaf => {
            out.insert(path.to_string(), leaf.clone());
        }
    }
}

/// Rebuild a nested document from a flat address map
///
/// An empty map yields an empty object. Array indices are only used for
/// ordering: elements are renumbered contiguously.
pub fn unflatten(flat: &FlatMap) -> Result<Value> {
    let mut root: Option<Node> = None;

    for (raw, value) in flat {
        let address: Address = raw.parse()?;
        let steps = address.steps();
        match root.as_mut() {
            None => {
                let mut node = Node::for_steps(steps, value);
                if !steps.is_empty() {
                    node.place(steps, 0, value.clone())?;
                }
                root = Some(node);
            }
            Some(node) => node.place(steps, 0, value.clone())?,
        }
    }

    Ok(root.map(Node::into_value).unwrap_or_else(|| Value::Object(Map::new())))
}

/// Intermediate tree used while rebuilding
#[derive(Debug)]
enum Node {
    Leaf(Value),
    Object(IndexMap<String, Node>),
    Array(BTreeMap<usize, Node>),
}

impl Node {
    fn for_steps(steps: &[Step], value: &Value) -> Node {
        match steps.first() {
            None => Node::Leaf(value.clone()),
            Some(first) => Node::container_for(first),
        }
    }

    fn container_for(step: &Step) -> Node {
        match step {
            Step::Key(_) => Node::Object(IndexMap::new()),
            Step::Index(_) => Node::Array(BTreeMap::new()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Node::Leaf(_) => "value",
            Node::Object(_) => "object",
            Node::Array(_) => "array",
        }
    }

    /// Store `value` at `steps[depth..]` below this node
    fn place(&mut self, steps: &[Step], depth: usize, value: Value) -> Result<()> {
        let Some(step) = steps.get(depth) else {
            // Root address while a container root already exists
            return Err(OverlayError::Conflict {
                address: String::new(),
                expected: "value",
                found: self.kind(),
            });
        };
        let last = depth + 1 == steps.len();

        let slot = match (&mut *self, step) {
            (Node::Object(members), Step::Key(key)) => members.get_mut(key.as_str()),
            (Node::Array(items), Step::Index(index)) => items.get_mut(index),
            (node, step) => {
                return Err(OverlayError::Conflict {
                    address: Address::from_steps(steps[..depth].to_vec()).to_string(),
                    expected: Node::container_for(step).kind(),
                    found: node.kind(),
                });
            }
        };

        match slot {
            Some(existing) if last => {
                let address = Address::from_steps(steps.to_vec()).to_string();
                Err(match existing {
                    Node::Leaf(_) => OverlayError::DuplicateAddress { address },
                    container => OverlayError::Conflict {
                        address,
                        expected: "value",
                        found: container.kind(),
                    },
                })
            }
            Some(existing) => existing.place(steps, depth + 1, value),
            None => {
                let child = match steps.get(depth + 1) {
                    None => Node::Leaf(value),
                    Some(next) => {
                        let mut child = Node::container_for(next);
                        child.place(steps, depth + 1, value)?;
                        child
                    }
                };
                self.insert_child(step, child);
                Ok(())
            }
        }
    }

    fn insert_child(&mut self, step: &Step, child: Node) {
        match (self, step) {
            (Node::Object(members), Step::Key(key)) => {
                members.insert(key.clone(), child);
            }
            (Node::Array(items), Step::Index(index)) => {
                items.insert(*index, child);
            }
            // place() has already checked the container kind
            _ => {}
        }
    }

    fn into_value(self) -> Value {
        match self {
            Node::Leaf(value) => value,
            Node::Object(members) => Value::Object(
                members
                    .into_iter()
                    .map(|(key, child)| (key, child.into_value()))
                    .collect::<Map<String, Value>>(),
            ),
            Node::Array(items) => {
                Value::Array(items.into_values().map(Node::into_value).collect())
            }
        }
    }
}
