use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagewright_editor::{snapshot, Document, Node, Page, Position, RegionContent};
use std::fmt::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Snapshot file to read
    pub input: PathBuf,

    /// Only show this page (0-based)
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Print the snapshot as JSON instead of a tree
    #[arg(long)]
    pub json: bool,
}

pub fn inspect(args: InspectArgs, cwd: &Path) -> Result<()> {
    let path = cwd.join(&args.input);
    let document =
        snapshot::load_file(&path).with_context(|| format!("reading {}", path.display()))?;

    if args.json {
        println!("{}", snapshot::to_json(&document)?);
        return Ok(());
    }

    println!("🔍 {} {}", "Inspecting".green().bold(), args.input.display());
    println!();
    print!("{}", render_document(&document, args.page));
    Ok(())
}

/// Indented outline of every (or one) page
pub fn render_document(document: &Document, only_page: Option<usize>) -> String {
    let mut out = String::new();

    for (index, page) in document.pages.iter().enumerate() {
        if only_page.is_some_and(|only| only != index) {
            continue;
        }
        render_page(&mut out, index, page, index == document.current_page_index);
    }

    out
}

fn render_page(out: &mut String, index: usize, page: &Page, current: bool) {
    let (width, height) = page.layout.size_mm();
    let marker = if current { " *" } else { "" };
    let name = page.layout.name.as_deref().unwrap_or("");
    let _ = writeln!(
        out,
        "Page {} [{}] {} {:?} {}x{}mm{}",
        index, page.id, name, page.layout.rectangle, width, height, marker
    );

    for position in Position::ALL {
        let region = page.region(position);
        let _ = writeln!(out, "  {} ({} nodes)", position, region.len());
        render_children(out, region, position.root_id(), 2);
    }
}

fn render_children(out: &mut String, region: &RegionContent, parent_id: &str, depth: usize) {
    for child in region.children_of(parent_id) {
        match region.get(child) {
            Some(node) => {
                let _ = writeln!(out, "{}{}", "  ".repeat(depth), describe(node));
                render_children(out, region, child, depth + 1);
            }
            None => {
                let _ = writeln!(out, "{}{} (missing)", "  ".repeat(depth), child);
            }
        }
    }
}

fn describe(node: &Node) -> String {
    match node.element.value() {
        Some(value) if !value.is_empty() => {
            format!("{} [{}] {:?}", node.element.category(), node.id, value)
        }
        _ => format!("{} [{}]", node.element.category(), node.id),
    }
}
