//! Config discovery.
//!
//! Configs are looked up by name across a search path:
//!
//! 1. every existing directory in `DOCKER_IMAGER_PATH` (colon-separated)
//! 2. `./conf`
//! 3. `.`
//! 4. the user config directory (`~/.config/docker-imager` on Linux), if it exists

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DfgenError;

/// Colon-separated directories searched before the defaults.
pub const SEARCH_PATH_ENV: &str = "DOCKER_IMAGER_PATH";

/// Directory prefixed to the output file name by `gen --save`.
pub const SAVE_DIR_ENV: &str = "DOCKER_IMAGER_SAVE_DIR";

/// Suffix identifying config files.
pub const CONFIG_SUFFIX: &str = ".conf.json";

pub const DEFAULT_SEARCH_PATHS: [&str; 2] = ["./conf", "."];

/// Name of the per-user config directory.
const USER_DIR_NAME: &str = "docker-imager";

/// The search path for this process.
pub fn search_paths() -> Vec<PathBuf> {
    let env_value = std::env::var(SEARCH_PATH_ENV).ok();
    let user_dir = directories::BaseDirs::new().map(|d| d.config_dir().join(USER_DIR_NAME));
    search_paths_from(env_value.as_deref(), user_dir)
}

/// Build a search path from an explicit `DOCKER_IMAGER_PATH` value and
/// user directory. Entries that do not exist are dropped, except the
/// two defaults.
pub fn search_paths_from(env_value: Option<&str>, user_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = env_value
        .unwrap_or_default()
        .split(':')
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .filter(|path| path.is_dir())
        .collect();

    paths.extend(DEFAULT_SEARCH_PATHS.iter().map(PathBuf::from));

    if let Some(dir) = user_dir.filter(|d| d.is_dir()) {
        paths.push(dir);
    }
    paths
}

/// Find a config by name.
///
/// A name containing `/` is a path and is returned unchanged. Otherwise
/// each search directory is tried with the name as given, then with
/// `.conf.json` appended.
pub fn resolve(name: &str, search_paths: &[PathBuf]) -> Result<PathBuf, DfgenError> {
    if name.contains('/') {
        return Ok(PathBuf::from(name));
    }

    let mut searched = Vec::new();
    for dir in search_paths {
        for candidate in [dir.join(name), dir.join(format!("{}{}", name, CONFIG_SUFFIX))] {
            if candidate.is_file() {
                tracing::debug!(config = %candidate.display(), "Resolved config");
                return Ok(candidate);
            }
            searched.push(candidate.display().to_string());
        }
    }

    Err(DfgenError::ConfigNotFound {
        name: name.to_string(),
        searched,
    })
}

/// Configs found on a search path.
#[derive(Debug, Default)]
pub struct Listing {
    pub configs: Vec<PathBuf>,
    /// Search directories that could not be read
    pub unreadable: Vec<PathBuf>,
}

/// List every `*.conf.json` file in the search path, sorted per directory.
pub fn list_configs(search_paths: &[PathBuf]) -> Listing {
    let mut listing = Listing::default();
    for dir in search_paths {
        match configs_in(dir) {
            Ok(mut found) => {
                found.sort();
                listing.configs.extend(found);
            }
            Err(e) => {
                tracing::debug!(path = %dir.display(), error = %e, "Cannot read config directory");
                listing.unreadable.push(dir.clone());
            }
        }
    }
    listing
}

fn configs_in(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_config = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(CONFIG_SUFFIX));
        if is_config && entry.path().is_file() {
            found.push(dir.join(entry.file_name()));
        }
    }
    Ok(found)
}
