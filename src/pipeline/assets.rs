//! Static-asset URL rewriting for Markdown image references.
//!
//! Wiki pages refer to attachments by bare file name (`![chart](chart.png)`),
//! but the site serves them from a static root such as `/static/files/`. This
//! stage prefixes every relative image URL with that root.
//!
//! Titled (`![alt](url "title")`) and untitled references are recognised by a
//! single pattern, so a titled reference is never half-matched as an untitled
//! one with the title swallowed into its URL. Only the URL span is rewritten;
//! alt text, title and spacing are copied through verbatim.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RE_IMAGE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"!\[(?P<alt>[^\]]*)\]\((?P<url>[^\s)]+)(?:\s+"(?P<title>.*?)")?\)"#).unwrap()
});

/// `scheme:` at the start of a URL (`https:`, `data:`, `mailto:` ...).
static RE_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());

/// Prefix relative image URLs in `text` with `prefix`.
///
/// `None` or a blank prefix returns `text` unchanged.
///
/// ```rust
/// use wikimark::pipeline::assets::rewrite_asset_urls;
///
/// assert_eq!(
///     rewrite_asset_urls("![x](a.png \"t\")", Some("/static/files/")),
///     "![x](/static/files/a.png \"t\")"
/// );
/// ```
pub fn rewrite_asset_urls(text: &str, prefix: Option<&str>) -> String {
    let Some(prefix) = prefix.filter(|p| !p.trim().is_empty()) else {
        return text.to_string();
    };

    RE_IMAGE_REF
        .replace_all(text, |caps: &Captures<'_>| {
            let whole = &caps[0];
            let Some(url) = caps.name("url") else {
                return whole.to_string();
            };
            let start = caps.get(0).map_or(0, |m| m.start());
            let (before, after) = (
                &whole[..url.start() - start],
                &whole[url.end() - start..],
            );
            format!("{}{}{}", before, join_asset_url(prefix, url.as_str()), after)
        })
        .into_owned()
}

/// Join `url` onto `prefix` with exactly one `/` between them.
///
/// URLs with a scheme and protocol-relative URLs are returned as they are.
/// Every other URL is relative to `prefix`, even one that already begins
/// with the same path, so rewriting is not idempotent.
pub fn join_asset_url(prefix: &str, url: &str) -> String {
    let base = prefix.trim_end_matches('/');
    if RE_SCHEME.is_match(url) || url.starts_with("//") {
        return url.to_string();
    }
    let relative = url.trim_start_matches("./").trim_start_matches('/');
    format!("{base}/{relative}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: Option<&str> = Some("/static/files/");

    #[test]
    fn untitled_reference() {
        assert_eq!(
            rewrite_asset_urls("![x](a.png)", PREFIX),
            "![x](/static/files/a.png)"
        );
    }

    #[test]
    fn titled_reference_keeps_title() {
        assert_eq!(
            rewrite_asset_urls("![x](a.png \"t\")", PREFIX),
            "![x](/static/files/a.png \"t\")"
        );
    }

    #[test]
    fn title_with_spaces_and_alt_with_spaces() {
        assert_eq!(
            rewrite_asset_urls(
                "![blah blah](20100426-400x339.png \"png title\")",
                PREFIX
            ),
            "![blah blah](/static/files/20100426-400x339.png \"png title\")"
        );
    }

    #[test]
    fn no_prefix_is_identity() {
        let input = "![x](a.png) and ![y](b.png \"t\")";
        assert_eq!(rewrite_asset_urls(input, None), input);
        assert_eq!(rewrite_asset_urls(input, Some("  ")), input);
    }

    #[test]
    fn mixed_references_in_one_line() {
        let input = "![a](1.png) text ![b](2.png \"two\") ![c](3.png)";
        assert_eq!(
            rewrite_asset_urls(input, PREFIX),
            "![a](/static/files/1.png) text ![b](/static/files/2.png \"two\") ![c](/static/files/3.png)"
        );
    }

    #[test]
    fn plain_links_untouched() {
        let input = "[not an image](a.png)";
        assert_eq!(rewrite_asset_urls(input, PREFIX), input);
    }

    #[test]
    fn absolute_urls_untouched() {
        let input = "![x](https://example.org/a.png) ![y](//cdn.test/b.png)";
        assert_eq!(rewrite_asset_urls(input, PREFIX), input);
    }

    #[test]
    fn subdirectory_named_like_prefix_is_prefixed() {
        assert_eq!(
            rewrite_asset_urls("![x](files/a.png)", Some("files")),
            "![x](files/files/a.png)"
        );
        assert_eq!(
            join_asset_url("/static/files/", "/static/files/a.png"),
            "/static/files/static/files/a.png"
        );
    }

    #[test]
    fn title_with_inner_quotes() {
        assert_eq!(
            rewrite_asset_urls(r#"![x](a.png "say "hi" twice")"#, PREFIX),
            r#"![x](/static/files/a.png "say "hi" twice")"#
        );
    }

    #[test]
    fn titles_do_not_run_into_the_next_reference() {
        let input = r#"![a](1.png "one") and ![b](2.png "two")"#;
        assert_eq!(
            rewrite_asset_urls(input, PREFIX),
            r#"![a](/static/files/1.png "one") and ![b](/static/files/2.png "two")"#
        );
    }

    #[test]
    fn join_normalises_one_separator() {
        assert_eq!(join_asset_url("/static/files/", "a.png"), "/static/files/a.png");
        assert_eq!(join_asset_url("/static/files", "a.png"), "/static/files/a.png");
        assert_eq!(join_asset_url("/static/files//", "/a.png"), "/static/files/a.png");
        assert_eq!(join_asset_url("/static", "./img/a.png"), "/static/img/a.png");
        assert_eq!(join_asset_url("/", "a.png"), "/a.png");
    }

    #[test]
    fn join_leaves_data_uris() {
        assert_eq!(join_asset_url("/s/", "data:image/png;base64,AA"), "data:image/png;base64,AA");
    }
}
