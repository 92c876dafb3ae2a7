use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagewright_editor::{snapshot, Document, EditorConfig, DEFAULT_CONFIG_NAME};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Snapshot file to create
    #[arg(default_value = "document.json")]
    pub output: PathBuf,

    /// Undo depth written to the config (0 = unlimited)
    #[arg(short, long, default_value_t = pagewright_editor::HistoryOptions::default().limit)]
    pub limit: usize,

    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);
    let document_path = cwd.join(&args.output);

    // Check if files already exist
    for path in [&config_path, &document_path] {
        if path.exists() && !args.force {
            println!(
                "{} {} already exists",
                "⚠️".yellow(),
                path.display().to_string().bright_white()
            );
            println!("Use --force to overwrite");
            return Ok(());
        }
    }

    println!("{}", "📝 Initializing Pagewright document...".bright_blue().bold());

    let mut config = EditorConfig::default();
    config.history.limit = args.limit;
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)
        .with_context(|| format!("writing {}", config_path.display()))?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    snapshot::save_file(&Document::default(), &document_path)
        .with_context(|| format!("writing {}", document_path.display()))?;
    println!("  {} Created {}", "✓".green(), args.output.display());

    println!();
    println!("{}", "✅ Document initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Write an edit script (a JSON list of edits)");
    println!("  2. Run: pagewright apply {} edits.json", args.output.display());
    println!("  3. Run: pagewright inspect {}", args.output.display());

    Ok(())
}
