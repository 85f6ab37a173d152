mod cli;

use anyhow::Result;
use clap::Parser;
use cli::commands;

fn main() {
    let cli = cli::Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    // Run the command and handle errors gracefully
    if let Err(err) = run_command(cli) {
        commands::display_error(&err);
        std::process::exit(1);
    }
}

fn run_command(cli: cli::Cli) -> Result<()> {
    use cli::Commands;

    let root = cli.root;
    let verbose = cli.verbose;

    match cli.command {
        Commands::Run {
            fix_set,
            paths,
            discover,
            dry_run,
            yes,
            refresh_backups,
        } => commands::run::handle(
            &root,
            &fix_set,
            commands::run::Flags {
                paths,
                discover,
                dry_run,
                yes,
                refresh_backups,
                verbose,
            },
        ),
        Commands::Rollback => commands::rollback::handle(&root),
        Commands::Preview { fix_set, file, diff } => {
            commands::preview::handle(&root, &fix_set, &file, diff)
        }
        Commands::List => commands::list::handle(&root, verbose),
        Commands::Init => commands::init::handle(&root),
        Commands::Config { action } => commands::config::handle(&root, action),
    }
}
