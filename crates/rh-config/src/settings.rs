// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Harness settings layered from an optional TOML file and `RH_*` variables

use crate::env::current_env;
use crate::error::Result;
use rh_json_overlay::PrefixMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Prefix of the environment variables read by [`Settings::load`]
pub const ENV_PREFIX: &str = "RH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    /// Directory JSON resources are resolved against
    #[serde(alias = "resources_dir")]
    pub resources_dir: PathBuf,

    /// Base URL of the API under test
    #[serde(alias = "api_url")]
    pub api_url: Option<String>,

    /// Default level for the log filter
    #[serde(alias = "log_level")]
    pub log_level: String,

    /// Select subtrees on address boundaries instead of raw text prefixes
    #[serde(alias = "boundary_prefix")]
    pub boundary_prefix: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resources_dir: PathBuf::from("resources"),
            api_url: None,
            log_level: "info".to_string(),
            boundary_prefix: false,
        }
    }
}

impl Settings {
    /// Load settings from `file` (when given) and then the process environment
    ///
    /// Environment variables win over the file: `RH_RESOURCES_DIR`,
    /// `RH_API_URL`, `RH_LOG_LEVEL`, `RH_BOUNDARY_PREFIX`.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_from(file, None)
    }

    /// Same as [`Settings::load`] with an explicit variable set in place of
    /// the process environment
    pub fn load_from(file: Option<&Path>, vars: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "reading settings file");
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let built = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .convert_case(config::Case::Kebab)
                    .try_parsing(true)
                    .source(vars),
            )
            .build()?;

        let settings: Settings = built.try_deserialize()?;
        tracing::debug!(
            resources_dir = %settings.resources_dir.display(),
            boundary_prefix = settings.boundary_prefix,
            "settings loaded"
        );
        Ok(settings)
    }

    pub fn prefix_mode(&self) -> PrefixMode {
        if self.boundary_prefix {
            PrefixMode::Boundary
        } else {
            PrefixMode::Literal
        }
    }

    /// Environment name derived from the API URL, if one is configured
    pub fn current_env(&self) -> Option<String> {
        self.api_url.as_deref().map(current_env)
    }
}
