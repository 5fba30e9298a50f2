//! # wikimark
//!
//! Render wiki-style source documents to HTML.
//!
//! The wiki markup is Markdown plus a few legacy constructs that no Markdown
//! renderer understands: `{{{ ... }}}` code blocks with an optional `#!lang`
//! shebang, `{{{ #!latex ... }}}` formula blocks, and image references to
//! bare attachment names. This crate rewrites those into plain Markdown and
//! hands the result to pulldown-cmark.
//!
//! ## Pipeline Overview
//!
//! ```text
//! wiki text
//!  │
//!  ├─ 1. Formula  {{{ #!latex }}} → PNG via latex + dvipng → ![f.png](f.png)
//!  ├─ 2. Assets   ![x](a.png) → ![x](/static/files/a.png)
//!  ├─ 3. Tables   Trac rows / missing separators → GFM pipe tables
//!  ├─ 4. Code     {{{ #!python }}} → 4-space indented code block
//!  └─ 5. HTML     pulldown-cmark
//! ```
//!
//! If the formula renderer is missing or fails, step 1 is skipped for the
//! whole document and reported as a [`Diagnostic`]; the formulas then come
//! out of step 4 as plain code.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wikimark::{breadcrumb, MarkdownPipeline, PipelineConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::builder()
//!         .asset_dir("/srv/wiki/static/files")
//!         .static_prefix("/static/files/")
//!         .build()?;
//!     let pipeline = MarkdownPipeline::new(config);
//!
//!     let source = std::fs::read_to_string("pages/notes/rust.md")?;
//!     let doc = pipeline.render(&source);
//!     println!("{}", breadcrumb("notes/rust")?);
//!     println!("{}", doc.html);
//!     for d in &doc.diagnostics {
//!         eprintln!("warning: {d}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `wikimark` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod hierarchy;
pub mod latex;
pub mod pipeline;
pub mod render;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, NoopSink, TracingSink};
pub use error::{RendererError, WikimarkError};
pub use hierarchy::{breadcrumb, format_breadcrumb, path_hierarchy, HierarchyEntry};
pub use latex::{FormulaRenderer, LatexRenderer};
pub use pipeline::formula::remove_formula_images;
pub use pipeline::table::{PipeTables, TableExtension};
pub use render::{render_document, MarkdownPipeline, RenderedDocument};
