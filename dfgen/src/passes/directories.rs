//! Directory creation.
//!
//! Produces `directoryCreateBlock`, a single `RUN mkdir -p` covering every
//! configured directory. Templates expand it early so later steps can
//! place files into those directories.

use super::{Pass, PassContext};
use crate::config::ImageConfig;
use crate::error::DfgenError;

pub fn apply(config: &mut ImageConfig, ctx: &mut PassContext<'_>) -> Result<(), DfgenError> {
    let directories = config.directories.as_deref().unwrap_or_default();
    if directories.is_empty() {
        ctx.warn(Pass::Directories, "No directories to create");
        config.derived.directory_create_block = String::new();
        return Ok(());
    }

    config.derived.directory_create_block = mkdir_directive(directories);
    Ok(())
}

/// `RUN mkdir -p d1 d2 ...` with a trailing newline.
pub fn mkdir_directive(directories: &[String]) -> String {
    format!("RUN mkdir -p {}\n", directories.join(" "))
}
