use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use pagefix::rules::Selection;
use pagefix::{FixSet, Pagefix};

pub fn handle(root: &Path, verbose: bool) -> Result<()> {
    let pagefix = Pagefix::new(root)
        .with_context(|| format!("Failed to open site root: {}", root.display()))?;
    let config = &pagefix.config().data;

    println!("{}", "Available fix sets".bright_blue().bold());
    println!("{}", "==================".bright_blue());

    for fix_set in FixSet::ALL {
        let rules = fix_set.rules(config)?;
        println!(
            "\n{} {}",
            fix_set.name().bright_cyan().bold(),
            format!("- {}", fix_set.description()).bright_black()
        );

        match fix_set.selection() {
            Selection::Discover => {
                println!("  targets: every .{} file under the root", config.discovery.extension)
            }
            Selection::Categories(categories) => {
                for category in categories {
                    let paths = category.paths(config);
                    println!("  targets: {} ({} files)", category.label(), paths.len());
                    if verbose {
                        for path in paths {
                            println!("    {}", path.bright_black());
                        }
                    }
                }
            }
        }

        for name in rules.names() {
            println!("  {} {}", "•".bright_green(), name);
        }
    }

    println!(
        "\nRun {} to apply one",
        "pagefix run <fix-set>".bright_cyan()
    );
    Ok(())
}
