//! Enrichment passes.
//!
//! Each pass reads declarative fields of an [`ImageConfig`] and writes one
//! derived field. The passes never read each other's output, but templates
//! expect them to have all run, so [`run_all`] always applies them in the
//! order of [`PIPELINE`] and stops at the first fatal error.

pub mod directories;
pub mod environment;
pub mod external;
pub mod packages;
pub mod symlinks;

use std::fmt;
use std::path::Path;

use crate::config::ImageConfig;
use crate::error::DfgenError;

/// The enrichment passes, by the derived field they own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// `packageListBlock`
    PackageList,
    /// `directoryCreateBlock`
    Directories,
    /// `cont` of every external package entry
    ExternalPackages,
    /// `symlinkBlock`
    Symlinks,
    /// `environmentBlock`
    Environment,
}

/// Fixed execution order of the passes.
pub const PIPELINE: [Pass; 5] = [
    Pass::PackageList,
    Pass::Directories,
    Pass::ExternalPackages,
    Pass::Symlinks,
    Pass::Environment,
];

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Pass::PackageList => "package-list",
            Pass::Directories => "directories",
            Pass::ExternalPackages => "external-packages",
            Pass::Symlinks => "symlinks",
            Pass::Environment => "environment",
        }
    }

    /// Run this pass against the config.
    pub fn apply(self, config: &mut ImageConfig, ctx: &mut PassContext<'_>) -> Result<(), DfgenError> {
        match self {
            Pass::PackageList => packages::apply(config, ctx),
            Pass::Directories => directories::apply(config, ctx),
            Pass::ExternalPackages => external::apply(config, ctx),
            Pass::Symlinks => symlinks::apply(config, ctx),
            Pass::Environment => environment::apply(config, ctx),
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A non-fatal condition met while running a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassWarning {
    pub pass: Pass,
    pub message: String,
}

impl fmt::Display for PassWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pass, self.message)
    }
}

/// Inputs shared by all passes that are not part of the config itself.
pub struct PassContext<'a> {
    /// Directory holding the config file, for relative paths inside it
    pub base_dir: Option<&'a Path>,
    /// In-image staging directory for fetched artifacts
    pub temp_area: &'a str,
    /// Collected warnings
    pub warnings: &'a mut Vec<PassWarning>,
}

impl PassContext<'_> {
    /// Record a warning and log it.
    pub fn warn(&mut self, pass: Pass, message: impl Into<String>) {
        let warning = PassWarning {
            pass,
            message: message.into(),
        };
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Apply every pass in [`PIPELINE`] order.
pub fn run_all(config: &mut ImageConfig, ctx: &mut PassContext<'_>) -> Result<(), DfgenError> {
    for pass in PIPELINE {
        tracing::debug!(pass = %pass, "Running enrichment pass");
        pass.apply(config, ctx)?;
    }
    Ok(())
}
