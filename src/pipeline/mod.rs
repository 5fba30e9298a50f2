//! Pipeline stages for wiki-to-HTML rendering.
//!
//! Each submodule implements exactly one transformation step as a pure
//! `&str → String` function (the formula stage also writes image files).
//!
//! ## Data Flow
//!
//! ```text
//! formula ──▶ assets ──▶ table ──▶ code_block ──▶ html
//! (LaTeX→PNG) (URL prefix) (GFM rows) (indent code) (pulldown-cmark)
//! ```
//!
//! 1. [`formula`]    — claim `{{{ #!latex }}}` blocks before anything else
//!    sees them, since they share the code-block delimiters
//! 2. [`assets`]     — prefix relative image URLs, including the references
//!    the formula stage just generated
//! 3. [`table`]      — normalise table rows for the renderer
//! 4. [`code_block`] — turn the remaining `{{{ }}}` blocks into indented code;
//!    runs last so nothing after it rewrites code contents
//! 5. [`html`]       — Markdown → HTML

pub mod assets;
pub mod code_block;
pub mod formula;
pub mod html;
pub mod table;
