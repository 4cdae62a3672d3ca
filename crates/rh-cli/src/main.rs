// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use rh_cli::{Cli, Parser};
use rh_config::Settings;
use rh_logging::CliLogLevel;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref().map(Path::new))
        .context("loading rest-harness settings")?;
    let default_level = settings.log_level.parse().unwrap_or(CliLogLevel::Warn);
    cli.logging.init_with_default_level("rh-cli", default_level)?;
    tracing::debug!(?settings, "starting");

    let output = cli.command.run(&settings)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
