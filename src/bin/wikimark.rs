//! CLI binary for wikimark.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `PipelineConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wikimark::{breadcrumb, MarkdownPipeline, PipelineConfig};

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render a page to stdout
  wikimark notes/rust.md

  # Render formulas into the static dir and prefix image URLs
  wikimark --asset-dir static/files --static-prefix /static/files/ page.md -o page.html

  # Read from stdin, print JSON with diagnostics
  cat page.md | wikimark --json -

  # Print the breadcrumb for a page path
  wikimark --breadcrumb zbox-wiki/notes/rust

FORMULAS:
  {{{ #!latex }}} blocks are rendered with `latex` and `dvipng` when
  --asset-dir is given. If either program is missing the page is still
  rendered and the formulas appear as code.
"#;

/// Render wiki-style Markdown documents to HTML.
#[derive(Parser, Debug)]
#[command(
    name = "wikimark",
    version,
    about = "Render wiki-style Markdown (legacy code blocks, LaTeX formulas) to HTML",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source document, or `-` for stdin.
    #[arg(required_unless_present = "breadcrumb")]
    input: Option<String>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long, env = "WIKIMARK_OUTPUT")]
    output: Option<PathBuf>,

    /// Directory generated formula images are written to. Enables formula rendering.
    #[arg(long, env = "WIKIMARK_ASSET_DIR")]
    asset_dir: Option<PathBuf>,

    /// URL prefix for relative image URLs (e.g. /static/files/).
    #[arg(long, env = "WIKIMARK_STATIC_PREFIX")]
    static_prefix: Option<String>,

    /// DPI for rendered formula images (50–600).
    #[arg(long, env = "WIKIMARK_DPI", default_value_t = wikimark::latex::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(50..=600))]
    dpi: u32,

    /// Print the breadcrumb for this document path and exit.
    #[arg(long, value_name = "PATH")]
    breadcrumb: Option<String>,

    /// Output structured JSON (RenderedDocument) instead of HTML.
    #[arg(long, env = "WIKIMARK_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "WIKIMARK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "WIKIMARK_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Breadcrumb mode ──────────────────────────────────────────────────
    if let Some(ref path) = cli.breadcrumb {
        let line = breadcrumb(path).context("Failed to build breadcrumb")?;
        println!("{line}");
        return Ok(());
    }

    let source = read_input(cli.input.as_deref().unwrap_or("-"))?;
    let pipeline = MarkdownPipeline::new(build_config(&cli)?);

    // ── Render ───────────────────────────────────────────────────────────
    let doc = if let Some(ref output_path) = cli.output {
        let doc = pipeline
            .render_to_file(&source, output_path)
            .context("Rendering failed")?;
        if !cli.quiet {
            eprintln!("{} bytes → {}", doc.html.len(), output_path.display());
        }
        doc
    } else {
        let doc = pipeline.render(&source);
        if cli.json {
            let json = serde_json::to_string_pretty(&doc).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(doc.html.as_bytes())
                .context("Failed to write to stdout")?;
        }
        doc
    };

    if doc.is_degraded() && !cli.quiet && !cli.json {
        eprintln!("warning: formulas were rendered as code (see log for details)");
    }
    Ok(())
}

/// Map CLI args to `PipelineConfig`.
fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut builder = PipelineConfig::builder().formula_renderer(std::sync::Arc::new(
        wikimark::LatexRenderer::new().dpi(cli.dpi),
    ));
    if let Some(ref dir) = cli.asset_dir {
        builder = builder.asset_dir(dir);
    }
    if let Some(ref prefix) = cli.static_prefix {
        builder = builder.static_prefix(prefix);
    }
    builder.build().context("Invalid configuration")
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read '{input}'"))
}
