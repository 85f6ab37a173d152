use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use pagefix::config::project::{CONFIG_DIR, CONFIG_FILE};
use pagefix::Pagefix;

pub fn handle(root: &Path) -> Result<()> {
    println!("{}", "Initializing pagefix...".bright_blue().bold());
    println!();

    let created = Pagefix::init(root)
        .context("Failed to write the default configuration")?;

    let path = Path::new(CONFIG_DIR).join(CONFIG_FILE);
    if created {
        println!("  {} Created {}", "✓".bright_green(), path.display());
    } else {
        println!("  {} {} already exists, left unchanged", "→".bright_black(), path.display());
    }

    println!("\n{}", "Quick start:".bright_blue().bold());
    println!("  1. Review the target lists and site facts in {}", path.display());
    println!("  2. Preview a fix:  {}", "pagefix preview audit index.html --diff".bright_yellow());
    println!("  3. Apply it:       {}", "pagefix run audit".bright_yellow());
    println!("  4. Undo if needed: {}", "pagefix rollback".bright_yellow());

    Ok(())
}
