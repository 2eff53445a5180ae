//! `dfgen gen`: render the Dockerfile.

use anyhow::{Context, Result};
use clap::Args;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use crate::discovery::SAVE_DIR_ENV;
use crate::output::Output;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Config name or path
    pub config: String,

    /// Write to the config's dockerFileName instead of stdout
    #[arg(long)]
    pub save: bool,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let mut imager = super::load_imager(&args.config)?;
    imager.init()?;
    let content = imager.generate()?;
    let name = imager.docker_file_name();

    if !args.save {
        print!("{}", content);
        Output::hint(format!("# To save append: ... > {}", name));
        Output::hint("# ... or use --save");
        return Ok(());
    }

    let target = save_target(&name, std::env::var_os(SAVE_DIR_ENV));
    if target.exists() {
        Output::warning(format!("Overwriting {}", target.display()));
    }
    fs::write(&target, &content)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    Output::success(format!("Wrote {}", target.display()));
    Ok(())
}

/// Where `--save` writes: `name`, inside the save directory when one is set.
fn save_target(name: &str, save_dir: Option<OsString>) -> PathBuf {
    match save_dir.filter(|d| !d.is_empty()) {
        Some(dir) => PathBuf::from(dir).join(name),
        None => PathBuf::from(name),
    }
}
