//! `{{{ #!latex ... }}}` blocks → rendered formula images.
//!
//! Formula blocks share the legacy code-block delimiters, so this stage must
//! run before [`super::code_block`] and claim only blocks whose annotation is
//! exactly `latex` (any case). Everything else is left for the code-block
//! stage.
//!
//! Conversion is all-or-nothing per document: the first renderer failure
//! aborts the pass and the caller keeps the original text.

use crate::error::RendererError;
use crate::latex::FormulaRenderer;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

static RE_FORMULA_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\{\{\{\s*#!(?i:latex)\b(?P<code>[^\f\v]+?)\s*\}\}\}").unwrap()
});

/// Replace every formula block with `![file](file)`, rendering each one into
/// `dest_dir` through `renderer`.
///
/// # Errors
/// The first [`RendererError`] raised by `renderer`. Images rendered before
/// the failure stay on disk; the returned error means none of the
/// replacements should be used.
pub fn convert_formula_blocks(
    text: &str,
    dest_dir: &Path,
    renderer: &dyn FormulaRenderer,
) -> Result<String, RendererError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut rendered = 0usize;

    for caps in RE_FORMULA_BLOCK.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let file_name = renderer.render(&caps["code"], dest_dir)?;
        debug!("Rendered formula block at byte {} → {}", whole.start(), file_name);

        out.push_str(&text[last..whole.start()]);
        out.push_str(&format!("![{file_name}]({file_name})"));
        last = whole.end();
        rendered += 1;
    }
    out.push_str(&text[last..]);

    if rendered > 0 {
        info!(
            "Rendered {} formula block(s) into {}",
            rendered,
            dest_dir.display()
        );
    }
    Ok(out)
}

/// Delete the images that the formula blocks of `text` render to.
///
/// Meant to be called by the owner of `dest_dir` before a page is removed.
/// Relies on [`FormulaRenderer::file_name`] being deterministic. Files that
/// no longer exist are skipped.
///
/// # Returns
/// The paths that were actually removed.
pub fn remove_formula_images(
    text: &str,
    dest_dir: &Path,
    renderer: &dyn FormulaRenderer,
) -> Result<Vec<PathBuf>, RendererError> {
    let mut removed = Vec::new();

    for caps in RE_FORMULA_BLOCK.captures_iter(text) {
        let path = dest_dir.join(renderer.file_name(&caps["code"]));
        if path.is_file() {
            std::fs::remove_file(&path)?;
            debug!("Removed formula image {}", path.display());
            removed.push(path);
        }
    }
    Ok(removed)
}
