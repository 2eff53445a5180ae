//! Package list rendering.
//!
//! Produces `packageListBlock`: the distribution packages, a fixed number
//! per line, joined with Dockerfile line continuations so a template can
//! drop it straight after `apt-get install -y` or `dnf install -y`.

use std::fs;
use std::path::{Path, PathBuf};

use super::{Pass, PassContext};
use crate::config::{resolve_input_path, ImageConfig, DEFAULT_PACKAGES_PER_LINE};
use crate::error::DfgenError;

/// Separator between two lines of the rendered list.
const CONTINUATION: &str = " \\\n";

/// Where the package names come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource<'a> {
    /// Flat JSON array of names
    JsonFile(PathBuf),
    /// One package per line, first token wins
    TextFile(PathBuf),
    /// `packageListInline`
    Inline(&'a [String]),
}

impl<'a> PackageSource<'a> {
    /// Pick the source by precedence: `.json` file, `.txt` file, inline list.
    pub fn select(config: &'a ImageConfig, base_dir: Option<&Path>) -> Option<Self> {
        if let Some(file) = config.package_list_file.as_deref() {
            if file.ends_with(".json") {
                return Some(PackageSource::JsonFile(resolve_input_path(file, base_dir)));
            }
            if file.ends_with(".txt") {
                return Some(PackageSource::TextFile(resolve_input_path(file, base_dir)));
            }
        }
        config
            .package_list_inline
            .as_deref()
            .map(PackageSource::Inline)
    }

    /// Read the package names.
    pub fn load(&self) -> Result<Vec<String>, DfgenError> {
        match self {
            PackageSource::JsonFile(path) => parse_json_list(&read_list_file(path)?, path),
            PackageSource::TextFile(path) => Ok(parse_text_list(&read_list_file(path)?)),
            PackageSource::Inline(packages) => Ok(packages.to_vec()),
        }
    }
}

pub fn apply(config: &mut ImageConfig, ctx: &mut PassContext<'_>) -> Result<(), DfgenError> {
    let per_line = packages_per_line(config.packages_per_line)?;

    if let Some(file) = config.package_list_file.as_deref() {
        if !file.ends_with(".json") && !file.ends_with(".txt") {
            ctx.warn(
                Pass::PackageList,
                format!("Package list file {} is neither .json nor .txt, ignoring it", file),
            );
        }
    }

    let packages = match PackageSource::select(config, ctx.base_dir) {
        Some(source) => source.load()?,
        None => {
            ctx.warn(
                Pass::PackageList,
                "Neither a package list file nor an inline package list was given",
            );
            Vec::new()
        }
    };

    tracing::debug!(count = packages.len(), per_line, "Rendering package list");
    config.derived.package_list_block = render_package_list(&packages, per_line);
    Ok(())
}

/// Validate `packagesPerLine`, defaulting to 10.
pub fn packages_per_line(raw: Option<i64>) -> Result<usize, DfgenError> {
    let value = raw.unwrap_or(DEFAULT_PACKAGES_PER_LINE);
    if value < 1 {
        return Err(DfgenError::InvalidPackagesPerLine { value });
    }
    usize::try_from(value).map_err(|_| DfgenError::InvalidPackagesPerLine { value })
}

/// Join names `per_line` at a time; lines are joined by ` \` + newline.
pub fn render_package_list(packages: &[String], per_line: usize) -> String {
    packages
        .chunks(per_line.max(1))
        .map(|group| group.join(" "))
        .collect::<Vec<_>>()
        .join(CONTINUATION)
}

/// Parse a line-oriented package list.
///
/// Blank lines and `#` comments are dropped; of every other line only the
/// first whitespace-separated token is kept.
pub fn parse_text_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Parse a JSON package list, which must be a flat array of strings.
pub fn parse_json_list(content: &str, path: &Path) -> Result<Vec<String>, DfgenError> {
    serde_json::from_str::<Vec<String>>(content).map_err(|e| DfgenError::PackageList {
        path: path.display().to_string(),
        message: format!("expected a JSON array of package names ({})", e),
    })
}

fn read_list_file(path: &Path) -> Result<String, DfgenError> {
    fs::read_to_string(path).map_err(|e| DfgenError::PackageList {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
