//! Document rendering entry points.
//!
//! [`MarkdownPipeline`] runs the stages of [`crate::pipeline`] in their fixed
//! order over one document at a time. It holds no per-document state, so a
//! single pipeline can be shared (behind an `Arc` or by reference) across
//! threads.

use crate::config::PipelineConfig;
use crate::diagnostics::Diagnostic;
use crate::error::WikimarkError;
use crate::pipeline::{assets, code_block, formula, html};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// HTML produced for one document, with whatever went wrong along the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub html: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderedDocument {
    /// `true` when formula rendering failed and was skipped.
    pub fn is_degraded(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::FormulaRendererFailed { .. }))
    }
}

/// Wiki source → HTML.
///
/// ```rust
/// use wikimark::{MarkdownPipeline, PipelineConfig};
///
/// let pipeline = MarkdownPipeline::new(
///     PipelineConfig::builder().static_prefix("/static/files/").build().unwrap(),
/// );
/// let doc = pipeline.render("![logo](logo.png)");
/// assert!(doc.html.contains("src=\"/static/files/logo.png\""));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkdownPipeline {
    config: PipelineConfig,
}

impl MarkdownPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Render one document.
    ///
    /// Never fails: a formula renderer error is reported as a
    /// [`Diagnostic::FormulaRendererFailed`] and the document is rendered
    /// without formula images.
    pub fn render(&self, text: &str) -> RenderedDocument {
        let start = Instant::now();
        let mut diagnostics = Vec::new();
        let mut buf = text.to_string();

        // ── Step 1: Formula blocks → images ──────────────────────────────
        if let Some(dir) = &self.config.asset_dir {
            match formula::convert_formula_blocks(&buf, dir, self.config.formula_renderer.as_ref())
            {
                Ok(out) => buf = out,
                Err(e) => {
                    debug!("Formula conversion skipped: {}", e);
                    self.raise(
                        &mut diagnostics,
                        Diagnostic::FormulaRendererFailed {
                            detail: e.to_string(),
                        },
                    );
                }
            }
        }

        // ── Step 2: Static asset URLs ────────────────────────────────────
        if let Some(prefix) = self.config.static_prefix.as_deref() {
            buf = assets::rewrite_asset_urls(&buf, Some(prefix));
        }

        // ── Step 3: Table extension ──────────────────────────────────────
        buf = self.config.table_extension.apply(&buf);

        // ── Step 4: Legacy code blocks ───────────────────────────────────
        let (buf, stats) = code_block::convert_code_blocks_with_stats(&buf);
        if stats.formula > 0 {
            self.raise(
                &mut diagnostics,
                Diagnostic::FormulaRenderedAsCode {
                    blocks: stats.formula,
                },
            );
        }

        // ── Step 5: HTML ─────────────────────────────────────────────────
        let html = html::render_html(&buf);
        debug!(
            "Rendered {} bytes → {} bytes HTML in {}µs",
            text.len(),
            html.len(),
            start.elapsed().as_micros()
        );

        RenderedDocument { html, diagnostics }
    }

    /// Render `text` and write the HTML to `output_path`.
    ///
    /// Parent directories are created if missing.
    pub fn render_to_file(
        &self,
        text: &str,
        output_path: impl AsRef<Path>,
    ) -> Result<RenderedDocument, WikimarkError> {
        let output_path = output_path.as_ref();
        let doc = self.render(text);

        let write_err = |source| WikimarkError::OutputWriteFailed {
            path: output_path.to_path_buf(),
            source,
        };
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(output_path, &doc.html).map_err(write_err)?;

        info!("Wrote {} bytes to {}", doc.html.len(), output_path.display());
        Ok(doc)
    }

    fn raise(&self, diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
        self.config.diagnostic_sink.report(&diagnostic);
        diagnostics.push(diagnostic);
    }
}

/// Render a wiki document to HTML in one call.
///
/// `destination_dir` enables formula rendering with the default
/// [`crate::latex::LatexRenderer`]; `static_prefix` enables asset URL
/// rewriting. Renderer failures are logged and the document is still
/// rendered.
///
/// ```rust
/// use wikimark::render_document;
///
/// let html = render_document("{{{\n#!python\nprint 1\n}}}", None, None);
/// assert!(html.starts_with("<pre><code>"));
/// assert!(html.contains("print 1"));
/// assert!(!html.contains("python"));
/// ```
pub fn render_document(
    text: &str,
    destination_dir: Option<&Path>,
    static_prefix: Option<&str>,
) -> String {
    let config = PipelineConfig {
        asset_dir: destination_dir.map(Path::to_path_buf),
        static_prefix: static_prefix
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string),
        ..PipelineConfig::default()
    };
    MarkdownPipeline::new(config).render(text).html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::error::RendererError;
    use crate::latex::FormulaRenderer;
    use std::sync::Arc;

    struct Named;

    impl FormulaRenderer for Named {
        fn file_name(&self, _code: &str) -> String {
            String::from("f.png")
        }

        fn render(&self, code: &str, _dest_dir: &Path) -> Result<String, RendererError> {
            Ok(self.file_name(code))
        }
    }

    struct Missing;

    impl FormulaRenderer for Missing {
        fn file_name(&self, _code: &str) -> String {
            String::from("f.png")
        }

        fn render(&self, _code: &str, _dest_dir: &Path) -> Result<String, RendererError> {
            Err(RendererError::Unavailable {
                program: "latex".into(),
                detail: "program not found on PATH".into(),
            })
        }
    }

    fn pipeline(renderer: Arc<dyn FormulaRenderer>, sink: Arc<CollectingSink>) -> MarkdownPipeline {
        MarkdownPipeline::new(
            PipelineConfig::builder()
                .asset_dir("/tmp/wikimark-render-tests")
                .static_prefix("/static/files/")
                .formula_renderer(renderer)
                .diagnostic_sink(sink)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn formula_image_is_prefixed() {
        let sink = Arc::new(CollectingSink::default());
        let doc = pipeline(Arc::new(Named), sink.clone()).render("{{{\n#!latex\nx\n}}}");
        assert_eq!(
            doc.html,
            "<p><img src=\"/static/files/f.png\" alt=\"f.png\" /></p>\n"
        );
        assert!(doc.diagnostics.is_empty());
        assert!(sink.take().is_empty());
    }

    #[test]
    fn renderer_failure_degrades_to_code() {
        let sink = Arc::new(CollectingSink::default());
        let doc = pipeline(Arc::new(Missing), sink.clone()).render("{{{\n#!latex\nx^2\n}}}");

        assert!(doc.is_degraded());
        assert!(doc.html.contains("<pre><code>"), "got: {}", doc.html);
        assert!(doc.html.contains("x^2"));
        assert!(!doc.html.contains("latex"));
        assert_eq!(doc.diagnostics.len(), 2);
        assert_eq!(sink.take(), doc.diagnostics);
    }

    #[test]
    fn failed_formula_on_the_tag_line_is_shown_as_code() {
        for input in ["{{{ #!latex a+b }}}", "{{{\n#!latex a+b\n}}}"] {
            let sink = Arc::new(CollectingSink::default());
            let doc = pipeline(Arc::new(Missing), sink.clone()).render(input);

            assert_eq!(doc.html, "<pre><code>a+b</code></pre>\n", "input: {input:?}");
            assert!(matches!(
                doc.diagnostics.as_slice(),
                [
                    Diagnostic::FormulaRendererFailed { .. },
                    Diagnostic::FormulaRenderedAsCode { blocks: 1 },
                ]
            ));
            assert_eq!(sink.take(), doc.diagnostics);
        }
    }

    #[test]
    fn code_block_after_paragraph_line() {
        assert_eq!(
            render_document("Intro text\n{{{\nx = 1\n}}}", None, None),
            "<p>Intro text</p>\n<pre><code>x = 1</code></pre>\n"
        );
    }

    #[test]
    fn relative_prefix_is_always_prepended() {
        assert_eq!(
            render_document("![x](files/a.png)", None, Some("files")),
            "<p><img src=\"files/files/a.png\" alt=\"x\" /></p>\n"
        );
    }

    #[test]
    fn formula_blocks_without_asset_dir_render_as_code() {
        let doc = MarkdownPipeline::default().render("{{{\n#!latex\ny\n}}}");
        assert!(!doc.is_degraded());
        assert_eq!(
            doc.diagnostics,
            vec![Diagnostic::FormulaRenderedAsCode { blocks: 1 }]
        );
    }

    #[test]
    fn render_document_without_options() {
        assert_eq!(
            render_document("![x](a.png)", None, None),
            "<p><img src=\"a.png\" alt=\"x\" /></p>\n"
        );
    }

    #[test]
    fn render_document_blank_prefix_is_ignored() {
        assert_eq!(
            render_document("![x](a.png)", None, Some("")),
            "<p><img src=\"a.png\" alt=\"x\" /></p>\n"
        );
    }

    #[test]
    fn render_to_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/page.html");
        let doc = MarkdownPipeline::default()
            .render_to_file("# Title", &out)
            .unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), doc.html);
        assert_eq!(doc.html, "<h1>Title</h1>\n");
    }
}
