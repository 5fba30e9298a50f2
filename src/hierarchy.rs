//! Logical document paths → hierarchy entries → breadcrumb strings.
//!
//! A wiki page lives at a slash-delimited path such as `zbox-wiki/notes/rust`.
//! [`path_hierarchy`] splits it into one [`HierarchyEntry`] per segment, each
//! carrying the cumulative path up to and including that segment, and
//! [`breadcrumb`] renders those entries as a `A / B / C` navigation line in
//! which every ancestor is a link.

use crate::error::WikimarkError;
use serde::{Deserialize, Serialize};

/// One segment of a document path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    /// Display name: the segment itself.
    pub name: String,
    /// `/`-join of this segment and every segment before it.
    pub path: String,
}

/// Split `path` into its ordered hierarchy, root first.
///
/// Empty segments (leading, trailing or doubled `/`) are ignored.
///
/// # Errors
/// [`WikimarkError::InvalidPath`] when `path` has no non-empty segment.
///
/// # Example
/// ```rust
/// use wikimark::path_hierarchy;
///
/// let entries = path_hierarchy("/zbox-wiki/notes/").unwrap();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[1].name, "notes");
/// assert_eq!(entries[1].path, "zbox-wiki/notes");
/// ```
pub fn path_hierarchy(path: &str) -> Result<Vec<HierarchyEntry>, WikimarkError> {
    let mut entries: Vec<HierarchyEntry> = Vec::new();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let cumulative = match entries.last() {
            Some(parent) => format!("{}/{}", parent.path, segment),
            None => segment.to_string(),
        };
        entries.push(HierarchyEntry {
            name: segment.to_string(),
            path: cumulative,
        });
    }

    if entries.is_empty() {
        return Err(WikimarkError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(entries)
}

/// Render a breadcrumb for `path`.
///
/// ```rust
/// use wikimark::breadcrumb;
///
/// assert_eq!(breadcrumb("zbox-wiki").unwrap(), "zbox-wiki");
/// assert_eq!(
///     breadcrumb("zbox-wiki/notes").unwrap(),
///     "[zbox-wiki](zbox-wiki/) / notes"
/// );
/// ```
pub fn breadcrumb(path: &str) -> Result<String, WikimarkError> {
    let entries = path_hierarchy(path)?;
    Ok(format_breadcrumb(&entries))
}

/// Render already-split entries. An empty slice renders as an empty string.
pub fn format_breadcrumb(entries: &[HierarchyEntry]) -> String {
    let Some((last, ancestors)) = entries.split_last() else {
        return String::new();
    };
    if ancestors.is_empty() {
        return last.name.clone();
    }

    let links = ancestors
        .iter()
        .map(|e| format!("[{}]({}/)", e.name, e.path))
        .collect::<Vec<_>>()
        .join(" / ");
    format!("{} / {}", links, last.name)
}
