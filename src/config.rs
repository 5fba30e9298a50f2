//! Configuration for [`crate::render::MarkdownPipeline`].
//!
//! Every knob lives in [`PipelineConfig`], built through
//! [`PipelineConfigBuilder`]. The two optional stages are switched on by
//! their inputs: an `asset_dir` enables formula rendering, a `static_prefix`
//! enables asset URL rewriting. The collaborators (formula renderer, table
//! extension, diagnostic sink) are trait objects so tests and embedders can
//! swap them out.

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::WikimarkError;
use crate::latex::{FormulaRenderer, LatexRenderer};
use crate::pipeline::table::{PipeTables, TableExtension};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for rendering wiki documents.
///
/// # Example
/// ```rust
/// use wikimark::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .asset_dir("/srv/wiki/static/files")
///     .static_prefix("/static/files/")
///     .build()
///     .unwrap();
/// assert!(config.asset_dir.is_some());
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Directory generated formula images are written to. `None` disables
    /// formula rendering; formula blocks then render as plain code.
    pub asset_dir: Option<PathBuf>,

    /// Base URL prepended to relative image URLs. `None` disables rewriting.
    pub static_prefix: Option<String>,

    /// Renders formula blocks. Default: [`LatexRenderer`].
    pub formula_renderer: Arc<dyn FormulaRenderer>,

    /// Table pass run before code-block conversion. Default: [`PipeTables`].
    pub table_extension: Arc<dyn TableExtension>,

    /// Receives diagnostics as they are raised. Default: [`TracingSink`].
    pub diagnostic_sink: Arc<dyn DiagnosticSink>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            asset_dir: None,
            static_prefix: None,
            formula_renderer: Arc::new(LatexRenderer::default()),
            table_extension: Arc::new(PipeTables),
            diagnostic_sink: Arc::new(TracingSink),
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("asset_dir", &self.asset_dir)
            .field("static_prefix", &self.static_prefix)
            .field("formula_renderer", &"<dyn FormulaRenderer>")
            .field("table_extension", &"<dyn TableExtension>")
            .field("diagnostic_sink", &"<dyn DiagnosticSink>")
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.asset_dir = Some(dir.into());
        self
    }

    pub fn static_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.static_prefix = Some(prefix.into());
        self
    }

    pub fn formula_renderer(mut self, renderer: Arc<dyn FormulaRenderer>) -> Self {
        self.config.formula_renderer = renderer;
        self
    }

    pub fn table_extension(mut self, extension: Arc<dyn TableExtension>) -> Self {
        self.config.table_extension = extension;
        self
    }

    pub fn diagnostic_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.config.diagnostic_sink = sink;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, WikimarkError> {
        let c = &self.config;
        if let Some(prefix) = &c.static_prefix {
            if prefix.trim().is_empty() {
                return Err(WikimarkError::InvalidConfig(
                    "static prefix must not be blank".into(),
                ));
            }
        }
        if let Some(dir) = &c.asset_dir {
            if dir.is_file() {
                return Err(WikimarkError::InvalidConfig(format!(
                    "asset dir '{}' is a file, not a directory",
                    dir.display()
                )));
            }
        }
        Ok(self.config)
    }
}
