use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::cli::ConfigAction;
use pagefix::config::project::KEYS;
use pagefix::config::Config;

pub fn handle(root: &Path, action: ConfigAction) -> Result<()> {
    let mut config = Config::load_or_default(root).context("Failed to load configuration")?;

    match action {
        ConfigAction::Set { key, value } => {
            println!(
                "{} Setting {} = {}",
                "→".bright_green(),
                key.bright_cyan(),
                value.bright_yellow()
            );
            config
                .set(&key, &value)
                .with_context(|| format!("Failed to set {}", key))?;
            println!("{} Configuration updated", "✓".bright_green());
        }

        ConfigAction::Get { key } => {
            let value = config.get(&key)?;
            println!("{} = {}", key.bright_cyan(), value);
        }

        ConfigAction::List => {
            println!("{}", "Current Configuration:".bright_blue().bold());
            if !config.path.exists() {
                println!("  {} Using defaults, no config file written", "ℹ".bright_blue());
            }
            for key in KEYS {
                let value = config.get(key)?;
                println!("  {} = {}", key.bright_cyan(), value.bright_yellow());
            }
        }
    }

    Ok(())
}
