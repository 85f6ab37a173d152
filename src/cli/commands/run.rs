use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use pagefix::error::Reason;
use pagefix::{BackupStatus, FileOutcome, FixSet, Pagefix, Progress, RunOptions, RunSummary};

pub struct Flags {
    pub paths: Vec<PathBuf>,
    pub discover: bool,
    pub dry_run: bool,
    pub yes: bool,
    pub refresh_backups: bool,
    pub verbose: bool,
}

pub fn handle(root: &Path, fix_set: &str, flags: Flags) -> Result<()> {
    let fix_set: FixSet = fix_set.parse()?;
    let pagefix = Pagefix::new(root)
        .with_context(|| format!("Failed to open site root: {}", root.display()))?;

    super::banner(&format!("🔥 PAGEFIX: {} 🔥", fix_set.description().to_uppercase()));
    println!("{}\n", format!("Repository root: {}", pagefix.root().display()).bold());

    if flags.dry_run {
        println!("{}\n", "Dry run: no files or backups will be written".bright_yellow());
    } else if fix_set.needs_confirmation() && !flags.yes {
        let question = format!("Apply all {} fixes? (yes/no): ", fix_set.name());
        if !confirm(&question)? {
            println!("{} Cancelled", "❌".bright_red());
            return Ok(());
        }
        println!();
    }

    let options = RunOptions {
        dry_run: flags.dry_run,
        refresh_backups: flags.refresh_backups,
        discover: flags.discover,
        paths: flags.paths,
    };
    let verbose = flags.verbose;
    let backups = pagefix.backups();

    let summary = pagefix.run(fix_set, &options, |progress| match progress {
        Progress::Group(group) => {
            println!(
                "{}\n",
                format!("📝 FIXING {} ({} files)...", group.label.to_uppercase(), group.paths.len())
                    .bright_blue()
                    .bold()
            );
        }
        Progress::File {
            path,
            relative,
            outcome,
        } => {
            print_outcome(relative, outcome);
            if verbose {
                print_details(&backups.backup_path(path), outcome);
            }
        }
    })?;

    print_summary(&summary, fix_set, flags.dry_run, backups.suffix());
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{}", question);
    io::stdout().flush().context("Failed to flush prompt")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

fn print_outcome(path: &Path, outcome: &FileOutcome) {
    let path = path.display();
    match outcome {
        FileOutcome::Fixed { .. } => {
            println!("{}", format!("✅ Fixed: {}", path).bright_green());
        }
        FileOutcome::Skipped { .. } => {
            println!("{}", format!("⏭️  Skipped: {} (no changes needed)", path).bright_yellow());
        }
        FileOutcome::Errored(err) if err.is_not_found() => {
            println!("{}", format!("❌ Not found: {}", path).bright_red());
        }
        FileOutcome::Errored(err) => {
            println!("{}", format!("❌ Failed: {} - {}", path, Reason(err)).bright_red());
        }
    }
}

fn print_details(backup: &Path, outcome: &FileOutcome) {
    let status = match outcome {
        FileOutcome::Fixed { backup, .. } | FileOutcome::Skipped { backup } => *backup,
        FileOutcome::Errored(_) => return,
    };

    match status {
        BackupStatus::Created => println!("  {} Backup: {}", "✓".bright_green(), backup.display()),
        BackupStatus::Refreshed => {
            println!("  {} Backup refreshed: {}", "✓".bright_green(), backup.display())
        }
        BackupStatus::Kept => {
            println!("  {} Existing backup kept: {}", "→".bright_black(), backup.display())
        }
        BackupStatus::Skipped => {}
    }

    if let FileOutcome::Fixed { rules, .. } = outcome {
        for rule in rules {
            println!("  {} {}", "✓".bright_green(), rule);
        }
    }
}

fn print_summary(summary: &RunSummary, fix_set: FixSet, dry_run: bool, suffix: &str) {
    println!();
    super::banner("📊 SUMMARY");

    println!("Total files processed: {}", summary.total().to_string().bold());
    println!("{}", format!("✅ Fixed: {}", summary.fixed).bright_green());
    println!("{}", format!("⏭️  Skipped: {}", summary.skipped).bright_yellow());
    println!("{}\n", format!("❌ Errors: {}", summary.errored).bright_red());

    if dry_run {
        println!("{}", "ℹ️  Dry run: nothing was written".bright_yellow());
        return;
    }

    if summary.fixed > 0 {
        println!(
            "{}\n",
            format!("🔥 SUCCESS! {} files updated! 🔥", summary.fixed).bright_green().bold()
        );
        println!("{}", "Next steps:".bright_yellow());
        println!("  1. Test a few pages in the browser");
        println!("  2. git add . && git commit -m \"Apply {} fixes\"", fix_set.name());
        println!("  3. git push");
        println!(
            "\n🔙 Rollback: {} (backups end in {})",
            "pagefix rollback".bright_cyan(),
            suffix
        );
    } else {
        println!("{}", "ℹ️  No changes needed - files may already be clean".bright_yellow());
    }
}
