// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Deciding which flattened addresses a field designator refers to

use serde::{Deserialize, Serialize};

/// How the subtree under a designator is selected for replacement
///
/// `Literal` selects every address whose text starts with the designator, so
/// `a` also takes the unrelated sibling `ab`. Existing callers may rely on it,
/// which is why it stays the default. `Boundary` only takes the designator
/// itself and addresses continuing it with `.` or `[`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixMode {
    #[default]
    Literal,
    Boundary,
}

impl PrefixMode {
    /// Whether `address` falls in the subtree named by `field`
    pub fn covers(self, field: &str, address: &str) -> bool {
        match self {
            PrefixMode::Literal => address.starts_with(field),
            PrefixMode::Boundary => address == field || continues(field, address),
        }
    }
}

/// `address` continues `field` with a member or index step
fn continues(field: &str, address: &str) -> bool {
    address
        .strip_prefix(field)
        .is_some_and(|rest| rest.starts_with('.') || rest.starts_with('['))
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Whether `field` designates `address`, either exactly or as an ancestor
///
/// The exact comparison ignores case; the ancestor comparisons do not.
pub fn designates(field: &str, address: &str) -> bool {
    eq_ignore_case(address, field) || continues(field, address)
}

/// Whether `field` designates at least one of `addresses`
pub fn matches<'a, I>(field: &str, addresses: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    addresses.into_iter().any(|address| designates(field, address))
}

/// The addresses removed when `field` is replaced
pub fn children<'a, I>(field: &str, addresses: I, mode: PrefixMode) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    addresses
        .into_iter()
        .filter(|address| mode.covers(field, address))
        .collect()
}
