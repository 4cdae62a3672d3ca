// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use clap::Subcommand;
use rh_config::Settings;
use rh_logging::CliLoggingArgs;
use serde_json::Value;

pub mod commands;
pub mod input;

pub use clap::Parser;

#[derive(clap::Parser, Debug)]
#[command(
    name = "rh",
    about = "rest-harness: flatten, patch and query JSON payloads",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Settings file (TOML); RH_* environment variables override it
    #[arg(long, global = true)]
    pub config: Option<String>,
    #[command(flatten)]
    pub logging: CliLoggingArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the leaf addresses of a document with their values
    Flatten(commands::FlattenArgs),
    /// Rebuild a document from address/value pairs
    Unflatten(commands::UnflattenArgs),
    /// Replace fields or whole subtrees of a document
    Update(commands::UpdateArgs),
    /// Find the element of an array whose member equals a value
    Find(commands::FindArgs),
    /// Load a JSON resource, optionally with overrides
    Resource(commands::ResourceArgs),
}

impl Commands {
    pub fn run(self, settings: &Settings) -> Result<Value> {
        match self {
            Commands::Flatten(args) => args.run(),
            Commands::Unflatten(args) => args.run(),
            Commands::Update(args) => args.run(settings),
            Commands::Find(args) => args.run(),
            Commands::Resource(args) => args.run(settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update_flags() {
        let cli = Cli::try_parse_from([
            "rh", "update", "doc.json", "--set", "a=1", "--set", "c.bb=x", "--boundary",
        ])
        .unwrap();
        match cli.command {
            Commands::Update(args) => {
                assert_eq!(args.set, vec!["a=1", "c.bb=x"]);
                assert!(args.boundary);
                assert!(!args.key_name);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_update_modes_conflict() {
        assert!(Cli::try_parse_from([
            "rh", "update", "doc.json", "--set", "a=1", "--key-name", "--top-level",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["rh", "update", "doc.json"]).is_err());
    }

    #[test]
    fn test_global_logging_flags() {
        let cli =
            Cli::try_parse_from(["rh", "flatten", "-", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.logging.log_level, Some(rh_logging::CliLogLevel::Debug));
    }
}
