//! `dfgen list`: show the configs on the search path.

use anyhow::Result;

use crate::discovery::{self, CONFIG_SUFFIX};
use crate::output::Output;

pub fn run() -> Result<()> {
    let paths = discovery::search_paths();
    let listing = discovery::list_configs(&paths);

    for dir in &listing.unreadable {
        Output::warning(format!("Path {} does not exist or is not readable", dir.display()));
    }

    println!("Available config files (by suffix {}):", CONFIG_SUFFIX);
    for config in &listing.configs {
        println!("- {}", config.display());
    }
    println!();
    println!("Pass one of these to: dfgen gen ...");
    Ok(())
}
