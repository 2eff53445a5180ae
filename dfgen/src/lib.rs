//! dfgen - Dockerfile generator.
//!
//! Reads a JSON image config, expands its declarative sections into
//! Dockerfile directives, and renders them through a mustache template.
//!
//! ```rust,ignore
//! use dfgen::DockerImager;
//!
//! let mut imager = DockerImager::load(Path::new("conf/ubu18.conf.json"))?;
//! imager.init()?;
//! let dockerfile = imager.generate()?;
//! std::fs::write(imager.docker_file_name(), dockerfile)?;
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod error;
pub mod imager;
pub mod output;
pub mod passes;
pub mod template;

pub use cli::{Cli, Commands};
pub use config::{ExtPkg, ImageConfig};
pub use error::DfgenError;
pub use imager::DockerImager;
