//! Error types for the wikimark library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`WikimarkError`]: **Fatal** to the call that produced it (a degenerate
//!   path handed to the breadcrumb builder, an invalid configuration, an
//!   output file that cannot be written).
//!
//! * [`RendererError`]: **Recovered**. The external formula renderer is
//!   missing or failed. [`crate::render::MarkdownPipeline`] catches it, skips
//!   formula conversion for that document and reports a
//!   [`crate::diagnostics::Diagnostic`] instead of failing the page.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the wikimark library.
#[derive(Debug, Error)]
pub enum WikimarkError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The path has no segments (empty, or made only of `/`).
    #[error("Invalid document path '{path}': it contains no segments")]
    InvalidPath { path: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of the external formula renderer.
///
/// Never escapes [`crate::render::MarkdownPipeline::render`]; the pipeline
/// degrades to leaving formula blocks as plain code.
#[derive(Debug, Error)]
pub enum RendererError {
    /// A required program could not be spawned (not installed, not on `PATH`).
    #[error("Formula renderer unavailable: could not run '{program}': {detail}")]
    Unavailable { program: String, detail: String },

    /// The program ran but exited unsuccessfully.
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// The program reported success but the expected file is not there.
    #[error("'{program}' did not produce '{path}'")]
    MissingOutput { program: String, path: PathBuf },

    #[error("I/O error while rendering formula: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_display() {
        let e = WikimarkError::InvalidPath { path: "//".into() };
        let msg = e.to_string();
        assert!(msg.contains("'//'"), "got: {msg}");
        assert!(msg.contains("no segments"));
    }

    #[test]
    fn unavailable_display_names_program() {
        let e = RendererError::Unavailable {
            program: "dvipng".into(),
            detail: "No such file or directory".into(),
        };
        assert!(e.to_string().contains("dvipng"));
    }

    #[test]
    fn failed_display_includes_stderr() {
        let e = RendererError::Failed {
            program: "latex".into(),
            status: "exit status: 1".into(),
            stderr: "Undefined control sequence".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("latex"));
        assert!(msg.contains("Undefined control sequence"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let e: WikimarkError = io.into();
        assert!(matches!(e, WikimarkError::Io(_)));
    }
}
