// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Reading documents and `FIELD=VALUE` assignments from the command line

use anyhow::{bail, Context, Result};
use rh_json_overlay::UpdateSet;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Read a JSON document from a file, or from stdin when `input` is `-`
pub fn read_document(input: &str) -> Result<Value> {
    let text = if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading document from stdin")?;
        text
    } else {
        std::fs::read_to_string(Path::new(input))
            .with_context(|| format!("reading document {:?}", input))?
    };
    serde_json::from_str(&text).with_context(|| format!("parsing JSON from {}", display_name(input)))
}

fn display_name(input: &str) -> &str {
    if input == "-" {
        "stdin"
    } else {
        input
    }
}

/// Parse a value given on the command line
///
/// Valid JSON is taken as JSON (`3`, `true`, `{"a":1}`); anything else
/// becomes a JSON string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Split `FIELD=VALUE` at the first `=`
pub fn parse_assignment(raw: &str) -> Result<(String, Value)> {
    let Some((field, value)) = raw.split_once('=') else {
        bail!("expected FIELD=VALUE, got {:?}", raw);
    };
    if field.is_empty() {
        bail!("empty field name in {:?}", raw);
    }
    Ok((field.to_string(), parse_value(value)))
}

/// Build an update set from repeated `--set` arguments, keeping their order
pub fn update_set(assignments: &[String]) -> Result<UpdateSet> {
    let mut updates = UpdateSet::new();
    for raw in assignments {
        let (field, value) = parse_assignment(raw)?;
        updates.push(field, value);
    }
    Ok(updates)
}
