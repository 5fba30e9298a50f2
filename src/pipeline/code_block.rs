//! Legacy `{{{ ... }}}` code blocks → indented Markdown code blocks.
//!
//! The wiki syntax this crate ingests marks code with triple braces, with an
//! optional shebang line naming the language:
//!
//! ```text
//! {{{
//! #!python
//! print 1
//! }}}
//! ```
//!
//! Markdown has no such construct, so the markers and the shebang are dropped
//! and the body is re-indented by four spaces. The output never contains the
//! markers again, which makes the conversion idempotent.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// Characters allowed in a shebang annotation after `#!`.
const ANNOTATION_CLASS: &str = r"[a-zA-Z0-9#\-+ .]";

/// Vertical tab and form feed never appear inside a block body.
const BODY: &str = r"(?P<code>[^\f\v]+?)";

/// `#!latex` keeps whatever follows it on its line as formula source. Any
/// other annotation must end its line, otherwise it is part of the body.
static RE_CODE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    let formula = r"(?P<formula>(?i:latex)\b)[ \t]*(?:\r?\n)?";
    let annotated = format!(r"(?P<annotation>{ANNOTATION_CLASS}{{1,21}}?)[ \t]*(?:\r?\n|$)");
    let shebang = format!(r"(?P<shebang>#!(?:{formula}|{annotated}))");
    Regex::new(&format!(r"(?m)^\{{\{{\{{\s*{shebang}?{BODY}\s*\}}\}}\}}")).unwrap()
});

const INDENT: &str = "    ";

/// What a legacy block is meant to be, decided by its annotation alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    PlainCode,
    Formula,
}

impl BlockKind {
    /// Classify by the text after `#!`, if the block had one.
    pub fn from_annotation(annotation: Option<&str>) -> Self {
        match annotation {
            Some(a) if a.trim().eq_ignore_ascii_case("latex") => BlockKind::Formula,
            _ => BlockKind::PlainCode,
        }
    }
}

/// Number of blocks of each kind rewritten by one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeBlockStats {
    pub plain: usize,
    pub formula: usize,
}

/// Rewrite every legacy block in `text` as an indented code block.
pub fn convert_code_blocks(text: &str) -> String {
    convert_code_blocks_with_stats(text).0
}

/// Same as [`convert_code_blocks`], also counting the blocks by kind.
///
/// The pipeline uses the formula count to notice formula blocks that were
/// not turned into images and are about to be shown as plain code.
pub fn convert_code_blocks_with_stats(text: &str) -> (String, CodeBlockStats) {
    let mut stats = CodeBlockStats::default();

    let out = RE_CODE_BLOCK.replace_all(text, |caps: &Captures<'_>| {
        let kind = if caps.name("formula").is_some() {
            BlockKind::Formula
        } else {
            BlockKind::from_annotation(caps.name("annotation").map(|m| m.as_str()))
        };
        match kind {
            BlockKind::PlainCode => stats.plain += 1,
            BlockKind::Formula => stats.formula += 1,
        }
        let start = caps.get(0).map_or(0, |m| m.start());
        let block = indent_block(&caps["code"]);
        // Without a blank line above, the block would continue a paragraph.
        if follows_blank_line(text, start) {
            block
        } else {
            format!("\n{block}")
        }
    });

    if stats.plain + stats.formula > 0 {
        debug!(
            "Converted {} legacy code block(s) ({} formula)",
            stats.plain + stats.formula,
            stats.formula
        );
    }
    (out.into_owned(), stats)
}

fn indent_block(code: &str) -> String {
    let body = code.split('\n').collect::<Vec<_>>().join("\n    ");
    format!("{INDENT}{body}")
}

/// True when the line starting at `start` is the first line of `text` or the
/// line above it is blank.
fn follows_blank_line(text: &str, start: usize) -> bool {
    let before = &text[..start];
    let before = before.strip_suffix('\n').unwrap_or(before);
    let previous = before.rfind('\n').map_or(before, |i| &before[i + 1..]);
    previous.trim().is_empty()
}
