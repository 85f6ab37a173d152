pub mod config;
pub mod init;
pub mod list;
pub mod preview;
pub mod rollback;
pub mod run;

use colored::Colorize;

const RULE: &str = "============================================================";

/// Print a boxed section title
pub fn banner(title: &str) {
    println!("\n{}", RULE.bright_blue().bold());
    println!("{}", title.bright_blue().bold());
    println!("{}\n", RULE.bright_blue().bold());
}

/// Display an error message with proper formatting
pub fn display_error(err: &anyhow::Error) {
    eprintln!("\n{} {}", "✗".bright_red().bold(), "Operation failed".bright_red().bold());
    eprintln!("  {} {}", "├".bright_black(), err);

    // Display error chain
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "├".bright_black(), cause);
    }

    let hint = err.chain().find_map(|cause| {
        cause.downcast_ref::<pagefix::PagefixError>().map(|e| match e {
            pagefix::PagefixError::UnknownFixSet(_) => {
                format!("Run {} to see the available fix sets", "pagefix list".bright_cyan())
            }
            pagefix::PagefixError::NotFound { .. } => {
                format!("Check the path, or pass {} with the site root", "--root".bright_cyan())
            }
            pagefix::PagefixError::Config(_) => {
                format!("Inspect the configuration with {}", "pagefix config list".bright_cyan())
            }
            _ => format!("Run with {} for more details", "--verbose".bright_cyan()),
        })
    });

    match hint {
        Some(hint) => eprintln!("  {} {}", "└".bright_cyan(), hint),
        None => eprintln!(
            "  {} Run with {} for more details",
            "└".bright_black(),
            "--verbose".bright_cyan()
        ),
    }
}
