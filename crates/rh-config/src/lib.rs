// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Configuration for REST test suites
//!
//! - [`Settings`]: harness settings from an optional TOML file overlaid with
//!   `RH_*` environment variables
//! - [`read_var`] and [`current_env`]: small environment helpers
//! - [`ParameterCache`]: fetch-once cache over a [`ParameterSource`]

pub mod env;
pub mod error;
pub mod parameters;
pub mod settings;

pub use env::{current_env, read_var};
pub use error::{ConfigError, Result};
pub use parameters::{EnvParameterSource, FetchOutcome, ParameterCache, ParameterSource};
pub use settings::{Settings, ENV_PREFIX};
