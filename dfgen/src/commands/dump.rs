//! `dfgen dump`: print the initialized config as JSON.

use anyhow::{Context, Result};
use clap::Args;

#[derive(Debug, Args)]
pub struct DumpArgs {
    /// Config name or path
    pub config: String,
}

pub fn run(args: DumpArgs) -> Result<()> {
    let mut imager = super::load_imager(&args.config)?;
    imager.init()?;
    let config = imager.embedded_config()?;
    let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    println!("{}", json);
    Ok(())
}
