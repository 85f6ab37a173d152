pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pagefix")]
#[command(about = "Backup-guarded find-and-replace fixes for static HTML pages", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true, env = "PAGEFIX_ROOT", default_value = ".", help = "Site root the target paths are relative to")]
    pub root: PathBuf,

    #[arg(short, long, global = true, help = "Show debug logging and per-rule details")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply a fix set (wrap, unwrap, css, audit)")]
    Run {
        #[arg(help = "Fix set to apply")]
        fix_set: String,
        #[arg(help = "Files to process instead of the fix set's default targets")]
        paths: Vec<PathBuf>,
        #[arg(long, help = "Discover HTML files under the root instead of the fixed lists")]
        discover: bool,
        #[arg(short = 'n', long, help = "Report what would change without writing anything")]
        dry_run: bool,
        #[arg(short, long, help = "Do not ask for confirmation")]
        yes: bool,
        #[arg(long, help = "Overwrite backups left by earlier runs")]
        refresh_backups: bool,
    },

    #[command(about = "Restore every file from its backup copy")]
    Rollback,

    #[command(about = "Show what a fix set would do to one file")]
    Preview {
        #[arg(help = "Fix set to preview")]
        fix_set: String,
        #[arg(help = "File path to preview")]
        file: PathBuf,
        #[arg(short, long, help = "Show the original next to the result")]
        diff: bool,
    },

    #[command(about = "List fix sets and their rules")]
    List,

    #[command(about = "Write the default configuration file")]
    Init,

    #[command(about = "Configure pagefix settings")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Set a configuration value")]
    Set {
        key: String,
        value: String,
    },
    #[command(about = "Get a configuration value")]
    Get {
        key: String,
    },
    #[command(about = "List all configuration values")]
    List,
}
