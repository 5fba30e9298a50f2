//! Markdown → HTML, the last stage of the pipeline.
//!
//! Thin wrapper over pulldown-cmark with the GFM extensions the wiki relies
//! on. Tables produced by [`super::table`] need `ENABLE_TABLES`.

use pulldown_cmark::{html, Options, Parser};

/// Parser options used for every document.
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Render Markdown to an HTML fragment. Total: any input yields HTML.
pub fn render_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph() {
        assert_eq!(render_html("hello"), "<p>hello</p>\n");
    }

    #[test]
    fn indented_code_is_escaped() {
        let out = render_html("    if a < b { }");
        assert_eq!(out, "<pre><code>if a &lt; b { }</code></pre>\n");
    }

    #[test]
    fn indented_code_keeps_final_newline() {
        let out = render_html("    x = 1\n");
        assert_eq!(out, "<pre><code>x = 1\n</code></pre>\n");
    }

    #[test]
    fn tables_enabled() {
        let out = render_html("| A | B |\n| --- | --- |\n| 1 | 2 |");
        assert!(out.contains("<table>"), "got: {out}");
        assert!(out.contains("<td>2</td>"));
    }

    #[test]
    fn image_reference() {
        let out = render_html("![x](/static/files/a.png \"t\")");
        assert_eq!(
            out,
            "<p><img src=\"/static/files/a.png\" alt=\"x\" title=\"t\" /></p>\n"
        );
    }

    #[test]
    fn strikethrough_enabled() {
        assert!(render_html("~~gone~~").contains("<del>gone</del>"));
    }
}
