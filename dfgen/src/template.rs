//! Mustache rendering.
//!
//! The record handed to a template is the config with its derived blocks
//! flattened in, so `{{{ packageListBlock }}}` sits next to `{{ image }}`
//! and any passthrough key.

use serde::Serialize;

use crate::config::{DerivedBlocks, ImageConfig};
use crate::error::DfgenError;

/// A compiled template.
pub struct Template {
    inner: mustache::Template,
}

impl Template {
    pub fn compile(source: &str) -> Result<Self, DfgenError> {
        let inner = mustache::compile_str(source).map_err(|e| DfgenError::Template {
            message: format!("failed to compile template: {}", e),
        })?;
        Ok(Self { inner })
    }

    pub fn render<T: Serialize>(&self, data: &T) -> Result<String, DfgenError> {
        let mut out = Vec::new();
        self.inner
            .render(&mut out, data)
            .map_err(|e| DfgenError::Template {
                message: format!("failed to render template: {}", e),
            })?;
        String::from_utf8(out).map_err(|e| DfgenError::Template {
            message: format!("rendered output is not UTF-8: {}", e),
        })
    }
}

/// The view of an enriched config that templates see.
#[derive(Serialize)]
pub struct TemplateContext<'a> {
    #[serde(flatten)]
    config: &'a ImageConfig,
    #[serde(flatten)]
    derived: &'a DerivedBlocks,
}

impl<'a> TemplateContext<'a> {
    pub fn new(config: &'a ImageConfig) -> Self {
        Self {
            config,
            derived: &config.derived,
        }
    }
}

/// Compile and render in one step.
pub fn render(source: &str, config: &ImageConfig) -> Result<String, DfgenError> {
    Template::compile(source)?.render(&TemplateContext::new(config))
}
