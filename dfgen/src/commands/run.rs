//! `dfgen run`: show how the image would be started.
//!
//! Nothing is executed. A config does not know about volumes or ports, so
//! the printed command is a starting point only.

use anyhow::Result;
use clap::Args;

use crate::output::Output;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Config name or path
    pub config: String,
}

pub fn run(args: RunArgs) -> Result<()> {
    let imager = super::load_imager(&args.config)?;
    let words = imager.run_command()?;
    let command = shlex::try_join(words.iter().map(String::as_str))
        .map_err(|e| anyhow::anyhow!("Failed to quote run command: {}", e))?;

    Output::info("Not starting a container; run this yourself:");
    println!("{}", command);
    Ok(())
}
