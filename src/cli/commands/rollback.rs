use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use pagefix::error::Reason;
use pagefix::{Pagefix, RestoreOutcome};

pub fn handle(root: &Path) -> Result<()> {
    let pagefix = Pagefix::new(root)
        .with_context(|| format!("Failed to open site root: {}", root.display()))?;

    println!("\n{}\n", "🔄 Rolling back...".bright_blue().bold());

    let outcomes = pagefix.rollback().context("Failed to collect backups")?;
    if outcomes.is_empty() {
        println!("{} No backups found!", "❌".bright_red());
        return Ok(());
    }

    let mut failed = 0;
    for outcome in &outcomes {
        match outcome {
            RestoreOutcome::Restored { original } => {
                let relative = original.strip_prefix(pagefix.root()).unwrap_or(original);
                println!("  {} Restored: {}", "✓".bright_green(), relative.display());
            }
            RestoreOutcome::Failed { original, error } => {
                failed += 1;
                let relative = original.strip_prefix(pagefix.root()).unwrap_or(original);
                println!(
                    "  {} Failed: {} - {}",
                    "✗".bright_red(),
                    relative.display(),
                    Reason(error)
                );
            }
        }
    }

    if failed > 0 {
        println!(
            "\n{}",
            format!("⚠ Rollback finished with {} failure(s)", failed).bright_yellow().bold()
        );
    } else {
        println!("\n{}", "✅ Rollback complete!".bright_green().bold());
    }

    Ok(())
}
