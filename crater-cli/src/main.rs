//! Crater CLI
//!
//! Lays out an inline-styled HTML document and prints the result.
//!
//! - `crater page.html`                  # Indented layout tree
//! - `crater --json --pretty page.html`  # Layout tree as JSON
//! - `crater --paint --json page.html`   # Paint tree as JSON
//! - `crater --stats --html '<div></div>'`

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crater::LayoutSession;
use crater::layout::{Edges, LayoutSnapshot, PaintSnapshot};
use crater_common::warning::clear_warnings;
use owo_colors::{OwoColorize, Stream};
use serde_json::Value;

/// Crater: incremental block, flexbox and grid layout for inline-styled HTML
#[derive(Parser, Debug)]
#[command(name = "crater")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the layout tree of a file
    crater ./index.html

    # Custom viewport
    crater --width 1024 --height 768 ./index.html

    # Paint tree as pretty JSON
    crater --paint --json --pretty ./index.html

    # Inline markup with cache statistics
    crater --stats --html '<div style="display: flex"><p>a</p><p>b</p></div>'
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Lay out this HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Viewport width in CSS pixels
    #[arg(long, default_value = "800")]
    width: f64,

    /// Viewport height in CSS pixels
    #[arg(long, default_value = "600")]
    height: f64,

    /// Print the paint tree (layout plus colours, opacity and text)
    #[arg(long)]
    paint: bool,

    /// Print cache statistics after the pass
    #[arg(long)]
    stats: bool,

    /// Recompute from scratch, bypassing the cache
    #[arg(long)]
    full: bool,

    /// Print JSON instead of an indented tree
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let html = load_html(&cli)?;

    clear_warnings();
    let mut session = LayoutSession::from_html(&html, cli.width, cli.height);
    let layout_json = if cli.full {
        session.compute_full()
    } else {
        session.compute_incremental()
    };

    match (cli.json, cli.paint) {
        (true, false) => print_json(&layout_json, cli.pretty)?,
        (true, true) => print_json(&session.paint_tree(), cli.pretty)?,
        (false, false) => {
            print_header(&format!(
                "=== Layout Tree (viewport: {}x{}) ===",
                cli.width, cli.height
            ));
            print_layout_node(&session.layout_snapshot()?, 0);
        }
        (false, true) => {
            print_header(&format!(
                "=== Paint Tree (viewport: {}x{}) ===",
                cli.width, cli.height
            ));
            print_paint_node(&session.paint_snapshot()?, 0);
        }
    }

    if cli.stats {
        if cli.json {
            print_json(&session.cache_stats(), cli.pretty)?;
        } else {
            let stats = session.stats();
            print_header("\n=== Cache ===");
            println!(
                "nodes={} hits={} misses={} hit rate={:.1}%",
                stats.nodes_computed,
                stats.hits,
                stats.misses,
                stats.hit_rate * 100.0
            );
        }
    }

    Ok(())
}

/// Markup from `--html` or the file argument.
fn load_html(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    } else {
        bail!("expected a file path or --html")
    }
}

fn print_json(json: &str, pretty: bool) -> Result<()> {
    if pretty {
        let value: Value = serde_json::from_str(json)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{json}");
    }
    Ok(())
}

fn print_header(text: &str) {
    println!(
        "{}",
        text.if_supports_color(Stream::Stdout, |t| t.bold())
    );
}

fn print_layout_node(node: &LayoutSnapshot, depth: usize) {
    let indent = "  ".repeat(depth);
    println!(
        "{indent}[{}] x={:.1} y={:.1} w={:.1} h={:.1}",
        node.id.if_supports_color(Stream::Stdout, |t| t.cyan()),
        node.x,
        node.y,
        node.width,
        node.height
    );
    let m = node.margin;
    if m != Edges::all(0.0) {
        println!(
            "{indent}  margin: t={:.1} r={:.1} b={:.1} l={:.1}",
            m.top, m.right, m.bottom, m.left
        );
    }
    let p = node.padding;
    if p != Edges::all(0.0) {
        println!(
            "{indent}  padding: t={:.1} r={:.1} b={:.1} l={:.1}",
            p.top, p.right, p.bottom, p.left
        );
    }
    for child in &node.children {
        print_layout_node(child, depth + 1);
    }
}

fn print_paint_node(node: &PaintSnapshot, depth: usize) {
    let indent = "  ".repeat(depth);
    let label = node.text.as_ref().map_or_else(
        || node.id.clone(),
        |text| {
            let preview: String = text.chars().take(30).collect();
            let suffix = if text.chars().count() > 30 { "..." } else { "" };
            format!("Text(\"{preview}{suffix}\")")
        },
    );
    let mut visuals = Vec::new();
    if let Some(ref background) = node.background_color {
        visuals.push(format!("bg={background}"));
    }
    if let Some(ref color) = node.color {
        visuals.push(format!("color={color}"));
    }
    if node.opacity < 1.0 {
        visuals.push(format!("opacity={:.2}", node.opacity));
    }
    println!(
        "{indent}[{}] x={:.1} y={:.1} w={:.1} h={:.1} {}",
        label.if_supports_color(Stream::Stdout, |t| t.cyan()),
        node.x,
        node.y,
        node.width,
        node.height,
        visuals.join(" ")
    );
    for child in &node.children {
        print_paint_node(child, depth + 1);
    }
}
