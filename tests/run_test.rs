use anyhow::Result;
use pagefix::config::ConfigData;
use pagefix::{BackupStatus, FileOutcome, FixSet, Pagefix, Progress, RestoreOutcome, RunOptions};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TOOL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <link rel="stylesheet" href="style.css">
</head>
<body>
  <div class="breadcrumb"><a href="index.html">Home</a> / GST Calculator</div>
  <div class="breadcrumb"><a href="index.html">Home</a> / GST Calculator</div>
  <h1>GST Calculator</h1>
  <a href="index.html#tools" class="back-link">← Back to All Tools</a>
  <a href="index.html#tools" class="back-link">← Back to All Tools</a>
  <footer class="footer">© GST Tools</footer>
</body>
</html>
"#;

const MSME_PAGE: &str = r#"<html>
<body>
  <h1>MSME Payment Calculator</h1>
  <form id="msmeForm">
    <button type="button" onclick="calculateMSMEInterest()">Calculate Interest</button>
  </form>
  <script>
    function calculateMSMEInterest() { const rate = 0.18; alert(rate); }
  </script>
</body>
</html>
"#;

fn write(root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
}

fn only(paths: &[&str]) -> RunOptions {
    RunOptions {
        paths: paths.iter().map(PathBuf::from).collect(),
        ..RunOptions::default()
    }
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn test_audit_is_idempotent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let page = write(temp_dir.path(), "gst-calculator.html", TOOL_PAGE)?;
    let pagefix = Pagefix::new(temp_dir.path())?;

    let first = pagefix.run(FixSet::Audit, &RunOptions::default(), |_| {})?;
    assert_eq!(first.fixed, 1);
    let after_first = fs::read_to_string(&page)?;

    let second = pagefix.run(FixSet::Audit, &RunOptions::default(), |_| {})?;
    assert_eq!(second.fixed, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(fs::read_to_string(&page)?, after_first);

    Ok(())
}

#[test]
fn test_duplicates_collapse_to_one() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let page = write(temp_dir.path(), "gst-calculator.html", TOOL_PAGE)?;
    let pagefix = Pagefix::new(temp_dir.path())?;

    let summary = pagefix.run(FixSet::Audit, &only(&["gst-calculator.html"]), |_| {})?;

    match summary.outcome_for(&page) {
        Some(FileOutcome::Fixed { rules, .. }) => {
            assert!(rules.contains(&"dedupe-breadcrumb"));
            assert!(rules.contains(&"dedupe-back-link"));
        }
        other => panic!("expected a fixed outcome, got {:?}", other),
    }

    let content = fs::read_to_string(&page)?;
    assert_eq!(content.matches(r#"<div class="breadcrumb">"#).count(), 1);
    assert_eq!(content.matches("Back to All Tools").count(), 1);
    assert!(content.contains("<h1>GST Calculator</h1>"));

    Ok(())
}

#[test]
fn test_backup_holds_pre_run_bytes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let page = write(temp_dir.path(), "gst-calculator.html", TOOL_PAGE)?;
    let pagefix = Pagefix::new(temp_dir.path())?;
    let backup = pagefix.backups().backup_path(&page);

    let summary = pagefix.run(FixSet::Audit, &RunOptions::default(), |_| {})?;
    assert!(matches!(
        summary.outcome_for(&page),
        Some(FileOutcome::Fixed { backup: BackupStatus::Created, .. })
    ));
    assert_eq!(fs::read_to_string(&backup)?, TOOL_PAGE);

    // A second run must not replace the backup with already-fixed content.
    let summary = pagefix.run(FixSet::Audit, &RunOptions::default(), |_| {})?;
    assert!(matches!(
        summary.outcome_for(&page),
        Some(FileOutcome::Skipped { backup: BackupStatus::Kept })
    ));
    assert_eq!(fs::read_to_string(&backup)?, TOOL_PAGE);

    Ok(())
}

#[test]
fn test_refresh_backups_overwrites() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let page = write(temp_dir.path(), "gst-calculator.html", TOOL_PAGE)?;
    let pagefix = Pagefix::new(temp_dir.path())?;

    pagefix.run(FixSet::Audit, &RunOptions::default(), |_| {})?;
    let fixed = fs::read_to_string(&page)?;

    let options = RunOptions {
        refresh_backups: true,
        ..RunOptions::default()
    };
    let summary = pagefix.run(FixSet::Audit, &options, |_| {})?;
    assert!(matches!(
        summary.outcome_for(&page),
        Some(FileOutcome::Skipped { backup: BackupStatus::Refreshed })
    ));
    assert_eq!(fs::read_to_string(pagefix.backups().backup_path(&page))?, fixed);

    Ok(())
}

#[test]
fn test_rollback_restores_every_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let tool = write(temp_dir.path(), "gst-calculator.html", TOOL_PAGE)?;
    let msme = write(temp_dir.path(), "msme-payment-calculator.html", MSME_PAGE)?;
    let pagefix = Pagefix::new(temp_dir.path())?;

    let summary = pagefix.run(FixSet::Audit, &RunOptions::default(), |_| {})?;
    assert_eq!(summary.fixed, 2);
    assert_ne!(fs::read_to_string(&tool)?, TOOL_PAGE);

    let outcomes = pagefix.rollback()?;
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, RestoreOutcome::Restored { .. })));

    assert_eq!(fs::read_to_string(&tool)?, TOOL_PAGE);
    assert_eq!(fs::read_to_string(&msme)?, MSME_PAGE);

    Ok(())
}

#[test]
fn test_rollback_without_backups() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "gst-calculator.html", TOOL_PAGE)?;
    let pagefix = Pagefix::new(temp_dir.path())?;

    assert!(pagefix.rollback()?.is_empty());
    Ok(())
}

#[test]
fn test_wrap_unwrap_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let original = "<html>\n<body>\n  <h1>Tool</h1>\n  <p>Body text</p>\n  <footer class=\"footer\">Footer</footer>\n</body>\n</html>\n";
    let page = write(temp_dir.path(), "gst-calculator.html", original)?;
    let pagefix = Pagefix::new(temp_dir.path())?;

    pagefix.run(FixSet::Wrap, &RunOptions::default(), |_| {})?;
    let wrapped = fs::read_to_string(&page)?;
    assert!(wrapped.contains("tool-card-wrapper"));

    let summary = pagefix.run(FixSet::Unwrap, &only(&["gst-calculator.html"]), |_| {})?;
    assert_eq!(summary.fixed, 1);

    let unwrapped = fs::read_to_string(&page)?;
    assert!(!unwrapped.contains("tool-card-wrapper"));
    assert_eq!(collapse(&unwrapped), collapse(original));

    Ok(())
}

#[test]
fn test_msme_calculator_replaced_once() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let page = write(temp_dir.path(), "msme-payment-calculator.html", MSME_PAGE)?;
    let pagefix = Pagefix::new(temp_dir.path())?;

    let summary = pagefix.run(FixSet::Audit, &RunOptions::default(), |_| {})?;
    match summary.outcome_for(&page) {
        Some(FileOutcome::Fixed { rules, .. }) => {
            assert_eq!(rules, &vec!["msme-agreement-checkbox", "msme-calculator"]);
        }
        other => panic!("expected a fixed outcome, got {:?}", other),
    }

    let content = fs::read_to_string(&page)?;
    assert_eq!(content.matches("function calculateMSMEInterest()").count(), 1);
    assert_eq!(content.matches("function resetMSMECalculator()").count(), 1);
    assert_eq!(content.matches(r#"id="hasAgreement""#).count(), 1);
    assert!(content.contains("const bankRate = 7.00;"));
    assert!(!content.contains("const rate = 0.18"));

    let checkbox = content.find(r#"id="hasAgreement""#).unwrap_or(usize::MAX);
    let button = content.find("<button").unwrap_or(0);
    assert!(checkbox < button);

    let again = pagefix.run(FixSet::Audit, &RunOptions::default(), |_| {})?;
    assert_eq!(again.skipped, 1);
    assert_eq!(fs::read_to_string(&page)?, content);

    Ok(())
}

#[test]
fn test_stylesheet_links_follow_depth() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let tool = write(
        temp_dir.path(),
        "gst-calculator.html",
        r#"<head><link rel="stylesheet" href="style.css"></head>"#,
    )?;
    let blog_index = write(
        temp_dir.path(),
        "blog/index.html",
        r#"<head><link rel="stylesheet" href="../style.css"></head>"#,
    )?;
    let pagefix = Pagefix::new(temp_dir.path())?;

    pagefix.run(FixSet::Css, &RunOptions::default(), |_| {})?;

    assert_eq!(
        fs::read_to_string(&tool)?,
        r#"<head><link rel="stylesheet" href="master-style.css"></head>"#
    );
    assert_eq!(
        fs::read_to_string(&blog_index)?,
        r#"<head><link rel="stylesheet" href="../master-style.css"></head>"#
    );

    Ok(())
}

#[test]
fn test_missing_targets_are_counted_and_run_continues() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(
        temp_dir.path(),
        "gst-calculator.html",
        r#"<link rel="stylesheet" href="style.css">"#,
    )?;
    write(
        temp_dir.path(),
        "blog/index.html",
        r#"<link rel="stylesheet" href="../style.css">"#,
    )?;
    let pagefix = Pagefix::new(temp_dir.path())?;

    let targets = &ConfigData::default().targets;
    let expected = targets.tool_pages.len() + targets.blog_posts.len() + targets.blog_index.len();

    let mut groups = Vec::new();
    let mut not_found = 0;
    let summary = pagefix.run(FixSet::Css, &RunOptions::default(), |progress| match progress {
        Progress::Group(group) => groups.push(group.label.clone()),
        Progress::File { outcome, .. } => {
            if let FileOutcome::Errored(err) = outcome {
                if err.is_not_found() {
                    not_found += 1;
                }
            }
        }
    })?;

    assert_eq!(groups, vec!["Tool Pages", "Blog Posts", "Blog Index"]);
    assert_eq!(summary.total(), expected);
    assert_eq!(summary.fixed, 2);
    assert_eq!(summary.errored, expected - 2);
    assert_eq!(not_found, expected - 2);

    Ok(())
}

#[test]
fn test_dry_run_leaves_disk_untouched() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let page = write(temp_dir.path(), "gst-calculator.html", TOOL_PAGE)?;
    let pagefix = Pagefix::new(temp_dir.path())?;

    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };
    let summary = pagefix.run(FixSet::Audit, &options, |_| {})?;

    assert_eq!(summary.fixed, 1);
    assert_eq!(fs::read_to_string(&page)?, TOOL_PAGE);
    assert!(!pagefix.backups().backup_path(&page).exists());

    Ok(())
}

#[test]
fn test_preview_does_not_write() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let page = write(temp_dir.path(), "gst-calculator.html", TOOL_PAGE)?;
    let pagefix = Pagefix::new(temp_dir.path())?;

    let preview = pagefix.preview(FixSet::Audit, Path::new("gst-calculator.html"))?;

    assert_eq!(preview.original, TOOL_PAGE);
    assert_ne!(preview.transformed, TOOL_PAGE);
    assert!(preview.applied.contains(&"dedupe-breadcrumb"));
    assert_eq!(fs::read_to_string(&page)?, TOOL_PAGE);
    assert!(!pagefix.backups().backup_path(&page).exists());

    Ok(())
}

#[test]
fn test_configured_facts_reach_the_rules() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let page = write(temp_dir.path(), "msme-payment-calculator.html", MSME_PAGE)?;

    Pagefix::init(temp_dir.path())?;
    let mut config = pagefix::config::Config::load_or_default(temp_dir.path())?;
    config.set("facts.bank_rate", "6.5")?;

    let pagefix = Pagefix::new(temp_dir.path())?;
    pagefix.run(FixSet::Audit, &RunOptions::default(), |_| {})?;

    let content = fs::read_to_string(&page)?;
    assert!(content.contains("const bankRate = 6.50;"));
    assert!(content.contains("// 9.50% total"));

    Ok(())
}

#[test]
fn test_rollback_after_hand_edit_restores_the_edit() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let v1 = "<html>\n<body>\n  <p>v1</p>\n  <footer class=\"footer\">f</footer>\n</body>\n</html>\n";
    let page = write(temp_dir.path(), "gst-calculator.html", v1)?;
    let pagefix = Pagefix::new(temp_dir.path())?;

    pagefix.run(FixSet::Wrap, &RunOptions::default(), |_| {})?;
    pagefix.rollback()?;
    assert_eq!(fs::read_to_string(&page)?, v1);
    assert!(!pagefix.backups().backup_path(&page).exists());

    let v2 = v1.replace("<p>v1</p>", "<p>v2 hand edit</p>");
    fs::write(&page, &v2)?;

    let summary = pagefix.run(FixSet::Wrap, &RunOptions::default(), |_| {})?;
    assert!(matches!(
        summary.outcome_for(&page),
        Some(FileOutcome::Fixed { backup: BackupStatus::Created, .. })
    ));
    assert_eq!(fs::read_to_string(pagefix.backups().backup_path(&page))?, v2);

    pagefix.rollback()?;
    assert_eq!(fs::read_to_string(&page)?, v2);

    Ok(())
}

#[test]
fn test_absolute_target_with_differently_spelled_root() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let page = write(
        temp_dir.path(),
        "gst-calculator.html",
        r#"<link rel="stylesheet" href="style.css">"#,
    )?;
    let post = write(
        temp_dir.path(),
        "blog/gst-rates-india-2026.html",
        r#"<link rel="stylesheet" href="../style.css">"#,
    )?;

    // Same directory, reached through `..`, so the absolute targets do not
    // share its spelling.
    let root = temp_dir.path().join("blog").join("..");
    let pagefix = Pagefix::new(&root)?;
    let options = RunOptions {
        paths: vec![page.clone(), post.clone()],
        ..RunOptions::default()
    };
    let summary = pagefix.run(FixSet::Css, &options, |_| {})?;

    assert_eq!(summary.fixed, 2);
    assert_eq!(
        fs::read_to_string(&page)?,
        r#"<link rel="stylesheet" href="master-style.css">"#
    );
    assert_eq!(
        fs::read_to_string(&post)?,
        r#"<link rel="stylesheet" href="../master-style.css">"#
    );

    Ok(())
}
