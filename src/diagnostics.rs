//! Diagnostics: non-fatal events raised while rendering a document.
//!
//! A broken formula renderer must not take the page down with it, so the
//! pipeline records what went wrong as a [`Diagnostic`] and keeps going.
//! Every diagnostic is returned in [`crate::render::RenderedDocument`] and is
//! also pushed to the [`DiagnosticSink`] configured on the pipeline, which is
//! the hook for forwarding them to a log, a metrics counter or a page banner.
//!
//! # Example
//!
//! ```rust
//! use wikimark::{CollectingSink, DiagnosticSink, PipelineConfig};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(CollectingSink::default());
//! let config = PipelineConfig::builder()
//!     .diagnostic_sink(sink.clone() as Arc<dyn DiagnosticSink>)
//!     .build()
//!     .unwrap();
//! # let _ = config;
//! assert!(sink.take().is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use tracing::warn;

/// A non-fatal event observed during one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The formula renderer failed; formula conversion was skipped for the
    /// whole document.
    FormulaRendererFailed { detail: String },

    /// Formula blocks reached the code-block stage and were rendered as
    /// plain code instead of images.
    FormulaRenderedAsCode { blocks: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FormulaRendererFailed { detail } => {
                write!(f, "formula conversion skipped: {detail}")
            }
            Diagnostic::FormulaRenderedAsCode { blocks } => {
                write!(f, "{blocks} formula block(s) rendered as plain code")
            }
        }
    }
}

/// Receives diagnostics as the pipeline raises them.
///
/// Implementations must be `Send + Sync`: one pipeline may render many
/// documents from different threads. The default method is a no-op.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic) {
        let _ = diagnostic;
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {}

/// Logs each diagnostic at WARN level. This is the pipeline default.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        warn!("{}", diagnostic);
    }
}

/// Keeps every diagnostic in memory until [`CollectingSink::take`] is called.
#[derive(Debug, Default)]
pub struct CollectingSink {
    seen: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Drain the recorded diagnostics, oldest first.
    pub fn take(&self) -> Vec<Diagnostic> {
        match self.seen.lock() {
            Ok(mut seen) => std::mem::take(&mut *seen),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match self.seen.lock() {
            Ok(mut seen) => seen.push(diagnostic.clone()),
            Err(poisoned) => poisoned.into_inner().push(diagnostic.clone()),
        }
    }
}
