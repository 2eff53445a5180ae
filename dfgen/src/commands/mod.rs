//! CLI command implementations.

pub mod dump;
pub mod generate;
pub mod list;
pub mod run;

use anyhow::Result;

use crate::discovery;
use crate::imager::DockerImager;

/// Resolve a config name on the search path and load it.
pub(crate) fn load_imager(name: &str) -> Result<DockerImager> {
    let paths = discovery::search_paths();
    let path = discovery::resolve(name, &paths)?;
    tracing::debug!(config = %path.display(), "Loading config");
    Ok(DockerImager::load(&path)?)
}
