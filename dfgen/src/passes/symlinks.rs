//! Symlink creation.
//!
//! `symlinks` is a list of `[target, linkName]` pairs. All of them are
//! chained into one `RUN` so they cost a single image layer.

use serde_json::Value;

use super::{Pass, PassContext};
use crate::config::ImageConfig;
use crate::error::DfgenError;

/// One `ln -s target link_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symlink {
    pub target: String,
    pub link_name: String,
}

pub fn apply(config: &mut ImageConfig, ctx: &mut PassContext<'_>) -> Result<(), DfgenError> {
    let links = match config.symlinks.as_ref() {
        Some(value) => parse_links(value)?,
        None => Vec::new(),
    };

    if links.is_empty() {
        ctx.warn(Pass::Symlinks, "No symlinks to create");
        config.derived.symlink_block = String::new();
        return Ok(());
    }

    config.derived.symlink_block = render_symlinks(&links);
    Ok(())
}

/// Validate the raw `symlinks` value. `null` counts as an empty list.
pub fn parse_links(value: &Value) -> Result<Vec<Symlink>, DfgenError> {
    let entries = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(entries) => entries,
        other => {
            return Err(DfgenError::InvalidSymlinkSpec {
                message: format!("expected a list of [target, linkName] pairs, got {}", other),
            })
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry.as_array().map(Vec::as_slice) {
            Some([Value::String(target), Value::String(link_name)]) => Ok(Symlink {
                target: target.clone(),
                link_name: link_name.clone(),
            }),
            _ => Err(DfgenError::InvalidSymlinkSpec {
                message: format!(
                    "entry #{} must be a [target, linkName] pair of strings, got {}",
                    index + 1,
                    entry
                ),
            }),
        })
        .collect()
}

/// `RUN ln -s t1 l1 && ln -s t2 l2`, without a trailing newline.
pub fn render_symlinks(links: &[Symlink]) -> String {
    let chain = links
        .iter()
        .map(|link| format!("ln -s {} {}", link.target, link.link_name))
        .collect::<Vec<_>>()
        .join(" && ");
    format!("RUN {}", chain)
}
