use clap::Parser;
use tracing_subscriber::EnvFilter;

use dfgen::commands;
use dfgen::output::Output;
use dfgen::{Cli, Commands};

fn main() {
    // Logs go to stderr so stdout stays a clean Dockerfile.
    // e.g., RUST_LOG=dfgen=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::List => commands::list::run(),
        Commands::Dump(args) => commands::dump::run(args),
        Commands::Run(args) => commands::run::run(args),
    };

    if let Err(err) = result {
        Output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
