//! The generation orchestrator.
//!
//! A [`DockerImager`] owns one [`ImageConfig`] for the length of an
//! invocation and walks it through load, [`init`](DockerImager::init),
//! [`generate`](DockerImager::generate).

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{resolve_input_path, ImageConfig};
use crate::error::DfgenError;
use crate::passes::{self, external::DEFAULT_TEMP_AREA, PassContext, PassWarning};
use crate::passes::packages::PackageSource;
use crate::template;

pub struct DockerImager {
    config: ImageConfig,
    base_dir: Option<PathBuf>,
    template: Option<String>,
    temp_area: String,
    warnings: Vec<PassWarning>,
}

impl DockerImager {
    /// Wrap an already parsed config. Relative paths in it resolve against
    /// the working directory only.
    pub fn new(config: ImageConfig) -> Self {
        Self {
            config,
            base_dir: None,
            template: None,
            temp_area: DEFAULT_TEMP_AREA.to_string(),
            warnings: Vec::new(),
        }
    }

    /// Load a config file. Its directory becomes the fallback for relative
    /// template and package list paths.
    pub fn load(path: &Path) -> Result<Self, DfgenError> {
        let config = ImageConfig::load(path)?;
        let mut imager = Self::new(config);
        imager.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);
        Ok(imager)
    }

    pub fn with_temp_area(mut self, temp_area: impl Into<String>) -> Self {
        self.temp_area = temp_area.into();
        self
    }

    /// Fill defaults and read the template.
    pub fn init(&mut self) -> Result<(), DfgenError> {
        self.config.apply_defaults();

        let raw = self
            .config
            .template_file
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DfgenError::MissingTemplate {
                reason: "no templateFile given in config".to_string(),
            })?;
        let path = resolve_input_path(raw, self.base_dir.as_deref());
        let source = fs::read_to_string(&path).map_err(|e| DfgenError::MissingTemplate {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;

        tracing::debug!(template = %path.display(), "Loaded template");
        self.template = Some(source);
        Ok(())
    }

    /// Run the enrichment passes and render the template.
    pub fn generate(&mut self) -> Result<String, DfgenError> {
        if self.template.is_none() {
            self.init()?;
        }

        let mut ctx = PassContext {
            base_dir: self.base_dir.as_deref(),
            temp_area: &self.temp_area,
            warnings: &mut self.warnings,
        };
        passes::run_all(&mut self.config, &mut ctx)?;

        let source = self.template.as_deref().unwrap_or_default();
        template::render(source, &self.config)
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// Warnings collected by the passes run so far.
    pub fn warnings(&self) -> &[PassWarning] {
        &self.warnings
    }

    pub fn docker_file_name(&self) -> String {
        self.config.docker_file_name()
    }

    /// The config with its package list file read and embedded inline.
    pub fn embedded_config(&self) -> Result<ImageConfig, DfgenError> {
        let mut config = self.config.clone();
        let source = PackageSource::select(&self.config, self.base_dir.as_deref());
        if let Some(source) = source {
            config.package_list_inline = Some(source.load()?);
        }
        config.package_list_file = None;
        for pkg in config.external_packages.iter_mut().flatten() {
            pkg.clear_derived();
        }
        Ok(config)
    }

    /// `docker run -i -t <image>[:<tag>]` for this config.
    pub fn run_command(&self) -> Result<Vec<String>, DfgenError> {
        let reference = self
            .config
            .image_reference()
            .ok_or(DfgenError::MissingField { field: "image" })?;
        Ok(["docker", "run", "-i", "-t"]
            .into_iter()
            .map(str::to_string)
            .chain(std::iter::once(reference))
            .collect())
    }
}
