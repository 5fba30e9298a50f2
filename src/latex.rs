//! Formula rendering: LaTeX source → PNG file.
//!
//! [`FormulaRenderer`] is the seam between the pipeline and whatever turns a
//! formula into an image. The default [`LatexRenderer`] shells out to the
//! TeX toolchain: `latex` compiles a minimal document into DVI inside a
//! scratch directory, then `dvipng` crops and rasterises it straight into the
//! destination directory.
//!
//! Output files are content-addressed (`sha256("{dpi}:{source}")` in hex plus
//! `.png`), so rendering the same formula twice reuses the existing image and
//! [`crate::pipeline::formula::remove_formula_images`] can find it again from
//! the source alone.

use crate::error::RendererError;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Turns formula source into an image file.
///
/// Implementations must be `Send + Sync` so one pipeline can be shared across
/// threads.
pub trait FormulaRenderer: Send + Sync {
    /// Name of the file `code` renders to. Must be deterministic.
    fn file_name(&self, code: &str) -> String;

    /// Render `code` into `dest_dir` and return the file name written there.
    fn render(&self, code: &str, dest_dir: &Path) -> Result<String, RendererError>;
}

/// Default DPI passed to `dvipng -D`.
pub const DEFAULT_DPI: u32 = 120;

const TEX_STEM: &str = "formula";

/// [`FormulaRenderer`] backed by the `latex` and `dvipng` programs.
#[derive(Debug, Clone)]
pub struct LatexRenderer {
    latex_program: String,
    dvipng_program: String,
    dpi: u32,
}

impl Default for LatexRenderer {
    fn default() -> Self {
        Self {
            latex_program: "latex".into(),
            dvipng_program: "dvipng".into(),
            dpi: DEFAULT_DPI,
        }
    }
}

impl LatexRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterisation density. Clamped to 50–600.
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi.clamp(50, 600);
        self
    }

    pub fn latex_program(mut self, program: impl Into<String>) -> Self {
        self.latex_program = program.into();
        self
    }

    pub fn dvipng_program(mut self, program: impl Into<String>) -> Self {
        self.dvipng_program = program.into();
        self
    }

    fn tex_document(code: &str) -> String {
        format!(
            "\\documentclass{{article}}\n\
             \\usepackage{{amsmath}}\n\
             \\usepackage{{amssymb}}\n\
             \\pagestyle{{empty}}\n\
             \\begin{{document}}\n\
             {}\n\
             \\end{{document}}\n",
            code.trim()
        )
    }
}

impl FormulaRenderer for LatexRenderer {
    fn file_name(&self, code: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}:{}", self.dpi, code.trim()).as_bytes());
        format!("{}.png", hex::encode(hasher.finalize()))
    }

    fn render(&self, code: &str, dest_dir: &Path) -> Result<String, RendererError> {
        let file_name = self.file_name(code);
        // dvipng runs inside the scratch dir, so the target must be absolute.
        let dest_dir = std::path::absolute(dest_dir)?;
        let target = dest_dir.join(&file_name);
        if target.is_file() {
            debug!("Formula image {} already present", file_name);
            return Ok(file_name);
        }

        std::fs::create_dir_all(&dest_dir)?;
        let scratch = tempfile::tempdir()?;
        let tex_file = format!("{TEX_STEM}.tex");
        let dvi_file = format!("{TEX_STEM}.dvi");
        std::fs::write(scratch.path().join(&tex_file), Self::tex_document(code))?;

        run(
            &self.latex_program,
            &["-interaction=nonstopmode", "-halt-on-error", tex_file.as_str()],
            scratch.path(),
        )?;

        let dpi = self.dpi.to_string();
        let target_str = target.to_string_lossy().into_owned();
        run(
            &self.dvipng_program,
            &[
                "-q",
                "-T",
                "tight",
                "-bg",
                "Transparent",
                "-D",
                dpi.as_str(),
                "-o",
                target_str.as_str(),
                dvi_file.as_str(),
            ],
            scratch.path(),
        )?;

        if !target.is_file() {
            return Err(RendererError::MissingOutput {
                program: self.dvipng_program.clone(),
                path: target,
            });
        }
        debug!("Rendered formula → {}", target.display());
        Ok(file_name)
    }
}

/// Run `program` in `cwd`, mapping spawn failures and non-zero exits.
fn run(program: &str, args: &[&str], cwd: &Path) -> Result<(), RendererError> {
    debug!("Running {} {:?}", program, args);
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| RendererError::Unavailable {
            program: program.to_string(),
            detail: match e.kind() {
                ErrorKind::NotFound => String::from("program not found on PATH"),
                _ => e.to_string(),
            },
        })?;

    if output.status.success() {
        return Ok(());
    }

    // latex reports errors on stdout; dvipng on stderr.
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let source = if stderr.trim().is_empty() { stdout } else { stderr };
    Err(RendererError::Failed {
        program: program.to_string(),
        status: output.status.to_string(),
        stderr: tail(&source, 5),
    })
}

/// Last `n` non-blank lines of `text`.
fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_deterministic_and_trimmed() {
        let r = LatexRenderer::new();
        let a = r.file_name("$x^2$");
        assert_eq!(a, r.file_name("\n$x^2$\n"));
        assert!(a.ends_with(".png"));
        assert_eq!(a.len(), 64 + 4);
    }

    #[test]
    fn file_name_depends_on_dpi() {
        let low = LatexRenderer::new().dpi(100);
        let high = LatexRenderer::new().dpi(300);
        assert_ne!(low.file_name("x"), high.file_name("x"));
    }

    #[test]
    fn dpi_is_clamped() {
        assert_eq!(LatexRenderer::new().dpi(1).dpi, 50);
        assert_eq!(LatexRenderer::new().dpi(10_000).dpi, 600);
    }

    #[test]
    fn tex_document_wraps_source() {
        let doc = LatexRenderer::tex_document("\n$a+b$\n");
        assert!(doc.starts_with("\\documentclass{article}\n"));
        assert!(doc.contains("\\begin{document}\n$a+b$\n\\end{document}"));
    }

    #[test]
    fn missing_program_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let r = LatexRenderer::new().latex_program("wikimark-no-such-latex-binary");
        let err = r.render("$x$", dir.path()).unwrap_err();
        match err {
            RendererError::Unavailable { program, .. } => {
                assert_eq!(program, "wikimark-no-such-latex-binary");
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn existing_image_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let r = LatexRenderer::new().latex_program("wikimark-no-such-latex-binary");
        let name = r.file_name("$y$");
        std::fs::write(dir.path().join(&name), b"cached").unwrap();
        assert_eq!(r.render("$y$", dir.path()).unwrap(), name);
    }

    #[test]
    fn tail_keeps_last_lines() {
        assert_eq!(tail("a\n\nb\nc\n", 2), "b\nc");
        assert_eq!(tail("", 3), "");
    }

    #[test]
    fn renders_with_real_toolchain() {
        if std::env::var("WIKIMARK_LATEX_ENABLED").is_err() {
            println!("SKIP — set WIKIMARK_LATEX_ENABLED=1 to run latex/dvipng tests");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let r = LatexRenderer::new();
        let name = r.render("$e^{i\\pi} + 1 = 0$", dir.path()).unwrap();
        assert!(dir.path().join(name).is_file());
    }
}
