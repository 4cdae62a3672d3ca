// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Subcommand arguments and their execution
//!
//! Every command produces one JSON value; printing is left to the binary.

use crate::input::{parse_value, read_document, update_set};
use anyhow::{bail, Context, Result};
use clap::Args;
use rh_config::Settings;
use rh_json_overlay::{
    find_by_field, flatten, overlay_by_key_name, unflatten, update_document_with,
    update_top_level, FlatMap, PrefixMode,
};
use rh_resources::ResourceLoader;
use serde_json::Value;

#[derive(Args, Debug, Clone)]
pub struct FlattenArgs {
    /// JSON file to read, or `-` for stdin
    pub input: String,
}

impl FlattenArgs {
    pub fn run(self) -> Result<Value> {
        let doc = read_document(&self.input)?;
        let flat = flatten(&doc);
        tracing::debug!(leaves = flat.len(), "flattened document");
        Ok(Value::Object(flat.into_iter().collect()))
    }
}

#[derive(Args, Debug, Clone)]
pub struct UnflattenArgs {
    /// JSON object of address/value pairs, or `-` for stdin
    pub input: String,
}

impl UnflattenArgs {
    pub fn run(self) -> Result<Value> {
        let flat: FlatMap = match read_document(&self.input)? {
            Value::Object(map) => map.into_iter().collect(),
            _ => bail!("unflatten expects a JSON object of address/value pairs"),
        };
        unflatten(&flat).context("rebuilding document")
    }
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// JSON file to patch, or `-` for stdin
    pub input: String,

    /// Field to replace, as FIELD=VALUE (repeatable, applied in order)
    #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
    pub set: Vec<String>,

    /// Only replace the subtree on `.`/`[` boundaries
    #[arg(long)]
    pub boundary: bool,

    /// Treat each FIELD as a bare key name matched at any depth
    #[arg(long, conflicts_with_all = ["top_level", "boundary"])]
    pub key_name: bool,

    /// Only replace existing top-level keys
    #[arg(long, conflicts_with = "boundary")]
    pub top_level: bool,
}

impl UpdateArgs {
    pub fn run(self, settings: &Settings) -> Result<Value> {
        let doc = read_document(&self.input)?;
        let updates = update_set(&self.set)?;

        if self.key_name {
            return overlay_by_key_name(&doc, &updates).context("overlaying by key name");
        }
        if self.top_level {
            let Value::Object(object) = &doc else {
                bail!("--top-level needs a JSON object document");
            };
            return Ok(Value::Object(update_top_level(object, &updates)));
        }

        let mode = if self.boundary {
            PrefixMode::Boundary
        } else {
            settings.prefix_mode()
        };
        update_document_with(&doc, &updates, mode).context("applying updates")
    }
}

#[derive(Args, Debug, Clone)]
pub struct FindArgs {
    /// JSON file holding an array, or `-` for stdin
    pub input: String,

    /// Member name to compare
    #[arg(long)]
    pub field: String,

    /// Value the member must equal (JSON, or a plain string)
    #[arg(long)]
    pub value: String,
}

impl FindArgs {
    pub fn run(self) -> Result<Value> {
        let doc = read_document(&self.input)?;
        let Value::Array(items) = doc else {
            bail!("find expects a JSON array document");
        };
        let probe = parse_value(&self.value);
        Ok(Value::Object(find_by_field(&items, &self.field, &probe)))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ResourceArgs {
    /// Resource path such as /jsons/user.json
    pub path: String,

    /// Field to replace, as FIELD=VALUE (repeatable, applied in order)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Resource directory, overriding the configured one
    #[arg(long)]
    pub resources_dir: Option<String>,
}

impl ResourceArgs {
    pub fn run(self, settings: &Settings) -> Result<Value> {
        let mut loader = ResourceLoader::from_settings(settings);
        if let Some(dir) = &self.resources_dir {
            loader = ResourceLoader::new(dir).with_prefix_mode(settings.prefix_mode());
        }

        let value = if self.set.is_empty() {
            loader.load(&self.path)
        } else {
            loader.load_with_overrides(&self.path, &update_set(&self.set)?)
        };
        value.with_context(|| format!("loading resource {}", self.path))
    }
}
