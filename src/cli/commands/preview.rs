use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use pagefix::{FixSet, Pagefix};

pub fn handle(root: &Path, fix_set: &str, file: &Path, diff: bool) -> Result<()> {
    let fix_set: FixSet = fix_set.parse()?;
    let pagefix = Pagefix::new(root)
        .with_context(|| format!("Failed to open site root: {}", root.display()))?;

    let preview = pagefix
        .preview(fix_set, file)
        .with_context(|| format!("Failed to preview file: {}", file.display()))?;

    println!("{}", "Pagefix Preview".bright_blue().bold());
    println!("{}", "===============".bright_blue());
    println!("File: {}", file.display());
    println!("Fix set: {}\n", fix_set.name().bright_cyan());

    if preview.applied.is_empty() {
        println!("{} No changes needed", "ℹ".bright_blue());
        return Ok(());
    }

    println!("{}", "Rules that would apply:".bright_blue().bold());
    for rule in &preview.applied {
        println!("  {} {}", "✓".bright_green(), rule);
    }
    println!();

    if diff {
        println!("{}", "CURRENT VERSION:".bright_green().bold());
        println!("{}", "----------------".bright_green());
        println!("{}", preview.original);
        println!();
        println!("{}", "FIXED VERSION:".bright_yellow().bold());
        println!("{}", "--------------".bright_yellow());
        println!("{}", preview.transformed);
    } else {
        println!("{}", "What will be written:".bright_yellow().bold());
        println!("{}", preview.transformed);
        println!();
        println!("Use {} to see the current version as well", "--diff".bright_cyan());
    }

    Ok(())
}
