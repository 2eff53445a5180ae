//! CLI argument definitions for dfgen.

use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Debug, Parser)]
#[command(name = "dfgen")]
#[command(about = "Generate Dockerfiles from JSON image configs and mustache templates")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a Dockerfile from a config
    ///
    /// CONFIG is a path, or a name looked up in DOCKER_IMAGER_PATH,
    /// ./conf and the current directory (with or without the
    /// .conf.json suffix).
    #[command(name = "gen")]
    Generate(commands::generate::GenerateArgs),

    /// List the configs found on the search path
    List,

    /// Print a config with its package list embedded
    Dump(commands::dump::DumpArgs),

    /// Print the docker command that would run the image
    Run(commands::run::RunArgs),
}
