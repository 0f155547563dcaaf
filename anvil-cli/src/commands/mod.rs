//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod pipeline;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Construct a pipeline from a seed file
    Create {
        /// Path to a seed file (.json or .lua)
        #[arg(short, long)]
        seeds: PathBuf,

        /// Git ref the pipeline runs for
        #[arg(short, long = "ref")]
        ref_name: String,

        /// Commit sha
        #[arg(long)]
        sha: String,

        /// Pipeline source (push, web, api, schedule, trigger)
        #[arg(long, default_value = "push")]
        source: String,

        /// Variables as key=value pairs
        #[arg(long = "var", value_parser = pipeline::parse_key_val)]
        variables: Vec<(String, String)>,

        /// Skip structural validation
        #[arg(long)]
        no_validate: bool,

        /// Print the pipeline as JSON
        #[arg(long)]
        json: bool,
    },
    /// Materialize a seed file and show its stages without building a pipeline
    Check {
        /// Path to a seed file (.json or .lua)
        #[arg(short, long)]
        seeds: PathBuf,
    },
}

/// Handle a CLI command
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Create {
            seeds,
            ref_name,
            sha,
            source,
            variables,
            no_validate,
            json,
        } => {
            let request = pipeline::CreateRequest {
                seeds,
                ref_name,
                sha,
                source,
                variables,
                validate: !no_validate,
                json,
            };
            pipeline::create_pipeline(request, config).await
        }
        Commands::Check { seeds } => pipeline::check_seeds(&seeds),
    }
}
