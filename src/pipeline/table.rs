//! Table syntax extension: wiki tables → GFM pipe tables.
//!
//! The HTML renderer understands GFM pipe tables but is strict about them: a
//! table needs a separator row right after its header and nowhere else. Wiki
//! sources are looser. They use Trac-style `|| a || b ||` rows, forget the
//! separator, or repeat it inside the body. [`PipeTables`] fixes those up and
//! leaves the actual table grammar to the renderer.
//!
//! Lines inside legacy `{{{ ... }}}` blocks and ``` fences are never touched:
//! this stage runs before code-block conversion, and code containing `|` must
//! survive it verbatim.

/// A text → text pass run between asset rewriting and code-block
/// conversion. Must be total.
pub trait TableExtension: Send + Sync {
    fn apply(&self, text: &str) -> String;
}

/// Default [`TableExtension`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PipeTables;

impl TableExtension for PipeTables {
    fn apply(&self, text: &str) -> String {
        normalise_tables(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fence {
    None,
    Legacy,
    Backticks,
}

fn normalise_tables(input: &str) -> String {
    let mut out: Vec<String> = Vec::with_capacity(input.lines().count() + 4);
    let mut fence = Fence::None;
    // Rows emitted so far in the current table; 0 when outside a table.
    let mut table_rows = 0usize;

    let lines: Vec<&str> = input.split('\n').collect();
    for (i, raw) in lines.iter().enumerate() {
        let line = *raw;
        let trimmed = line.trim();

        match fence {
            Fence::Legacy => {
                if trimmed.ends_with("}}}") {
                    fence = Fence::None;
                }
                out.push(line.to_string());
                continue;
            }
            Fence::Backticks => {
                if trimmed.starts_with("```") {
                    fence = Fence::None;
                }
                out.push(line.to_string());
                continue;
            }
            Fence::None => {}
        }

        if line.starts_with("{{{") {
            if !trimmed[3..].trim_end().ends_with("}}}") {
                fence = Fence::Legacy;
            }
            table_rows = 0;
            out.push(line.to_string());
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Fence::Backticks;
            table_rows = 0;
            out.push(line.to_string());
            continue;
        }

        let row = if is_trac_row(line) {
            trac_row_to_pipe(line)
        } else {
            line.to_string()
        };

        if !is_table_row(&row) {
            table_rows = 0;
            out.push(row);
            continue;
        }

        table_rows += 1;
        if is_separator_row(&row) && table_rows != 2 {
            // Only the row after the header may be a separator.
            table_rows -= 1;
            continue;
        }
        out.push(row.clone());

        if table_rows == 1 && !is_separator_row(&row) {
            let next = lines.get(i + 1).copied().unwrap_or("");
            let next = if is_trac_row(next) {
                trac_row_to_pipe(next)
            } else {
                next.to_string()
            };
            if is_table_row(&next) && !is_separator_row(&next) {
                out.push(separator_for(&row));
                table_rows += 1;
            }
        }
    }

    out.join("\n")
}

/// `|| a || b ||`
fn is_trac_row(line: &str) -> bool {
    let t = line.trim();
    t.len() > 4 && t.starts_with("||") && t.ends_with("||")
}

/// `|| a ||= b =||` → `| a | b |`. `=` around a cell marks a Trac header.
fn trac_row_to_pipe(line: &str) -> String {
    let t = line.trim();
    let inner = &t[2..t.len() - 2];
    let cells: Vec<&str> = inner
        .split("||")
        .map(|c| c.trim().trim_start_matches('=').trim_end_matches('=').trim())
        .collect();
    format!("| {} |", cells.join(" | "))
}

fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|') && trimmed.ends_with('|') && trimmed.len() > 2
}

fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    if !trimmed.starts_with('|') || !trimmed.contains('-') {
        return false;
    }
    // A separator row contains only |, -, :, and whitespace
    trimmed
        .chars()
        .all(|c| c == '|' || c == '-' || c == ':' || c == ' ')
}

fn separator_for(header: &str) -> String {
    let cols = header.trim().matches('|').count().saturating_sub(1).max(1);
    std::iter::once("|")
        .chain(std::iter::repeat_n(" --- |", cols))
        .collect()
}
