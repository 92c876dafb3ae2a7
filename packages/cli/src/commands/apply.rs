use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagewright_editor::{snapshot, DocumentStore, Edit, EditorConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Snapshot file to edit
    pub input: PathBuf,

    /// JSON file holding a list of edits
    pub edits: PathBuf,

    /// Where to write the result (defaults to overwriting the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail if any edit is rejected
    #[arg(long)]
    pub strict: bool,
}

pub fn apply(args: ApplyArgs, cwd: &Path) -> Result<()> {
    let input = cwd.join(&args.input);
    let edits_path = cwd.join(&args.edits);
    let output = cwd.join(args.output.as_ref().unwrap_or(&args.input));

    let config = EditorConfig::load(cwd).context("loading config")?;
    let document =
        snapshot::load_file(&input).with_context(|| format!("reading {}", input.display()))?;
    let script = fs::read_to_string(&edits_path)
        .with_context(|| format!("reading {}", edits_path.display()))?;
    let edits: Vec<Edit> = serde_json::from_str(&script)
        .with_context(|| format!("parsing edits in {}", edits_path.display()))?;

    println!("✏️  {} {} edits", "Applying".green().bold(), edits.len());

    let mut store = DocumentStore::with_config(document, &config);
    let mut rejected = 0;

    for (index, edit) in edits.into_iter().enumerate() {
        let label = edit_name(&edit);
        let result = store.apply(edit);
        match (&result.created, result.applied) {
            (Some(id), _) => println!("   {} {} → {}", "✓".green(), label, id),
            (None, true) => println!("   {} {}", "✓".green(), label),
            (None, false) => {
                rejected += 1;
                println!("   {} {} (#{}) had no effect", "✗".yellow(), label, index);
            }
        }
    }

    if args.strict && rejected > 0 {
        return Err(anyhow::anyhow!("{} edit(s) had no effect", rejected));
    }

    snapshot::save_file(store.document(), &output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!(version = store.version(), undo = store.undo_len(), "Edits applied");

    println!();
    println!("✨ {} Wrote {}", "Done".green().bold(), output.display());
    println!("   Undo levels available: {}", store.undo_len());

    Ok(())
}

fn edit_name(edit: &Edit) -> String {
    match serde_json::to_value(edit) {
        Ok(serde_json::Value::String(name)) => name,
        Ok(serde_json::Value::Object(map)) => map.keys().next().cloned().unwrap_or_default(),
        _ => "edit".to_string(),
    }
}
