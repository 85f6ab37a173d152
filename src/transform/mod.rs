pub mod summary;

pub use summary::RunSummary;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{PagefixError, PagefixResult, PathContext};
use crate::page::Page;
use crate::rules::{Rewrite, RuleSet};
use crate::storage::{AtomicFile, BackupStatus, BackupStore};

/// Per-file result of a transform
#[derive(Debug)]
pub enum FileOutcome {
    Fixed {
        rules: Vec<&'static str>,
        backup: BackupStatus,
    },
    Skipped {
        backup: BackupStatus,
    },
    Errored(PagefixError),
}

impl FileOutcome {
    pub fn is_fixed(&self) -> bool {
        matches!(self, FileOutcome::Fixed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FileOutcome::Skipped { .. })
    }

    pub fn is_errored(&self) -> bool {
        matches!(self, FileOutcome::Errored(_))
    }
}

/// The guarded text transformer: backup first, rewrite in memory, write only
/// when something changed.
pub struct Transformer {
    root: PathBuf,
    rules: RuleSet,
    backups: BackupStore,
    dry_run: bool,
}

impl Transformer {
    pub fn new(root: impl AsRef<Path>, rules: RuleSet, backups: BackupStore) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            rules,
            backups,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn backups(&self) -> &BackupStore {
        &self.backups
    }

    /// Rewrite content without touching the file system
    pub fn rewrite(&self, content: &str, path: &Path) -> Rewrite {
        let page = Page::new(&self.root, path);
        self.rules.apply(content, &page)
    }

    /// Process one file. Failures are folded into the outcome so a run can
    /// continue with the next file.
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        match self.try_process(path) {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "file not processed");
                FileOutcome::Errored(error)
            }
        }
    }

    fn try_process(&self, path: &Path) -> PagefixResult<FileOutcome> {
        if !path.is_file() {
            return Err(PagefixError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = fs::read(path).with_path(path)?;
        let original = String::from_utf8(bytes).map_err(|e| PagefixError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        let backup = if self.dry_run {
            BackupStatus::Skipped
        } else {
            self.backups.ensure(path, original.as_bytes())?
        };

        let rewrite = self.rewrite(&original, path);
        if rewrite.content == original {
            tracing::debug!(path = %path.display(), "no changes needed");
            return Ok(FileOutcome::Skipped { backup });
        }

        if !self.dry_run {
            AtomicFile::new(path)?.write(rewrite.content.as_bytes())?;
        }
        tracing::debug!(path = %path.display(), rules = ?rewrite.applied, "file updated");

        Ok(FileOutcome::Fixed {
            rules: rewrite.applied,
            backup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackupConfig, ConfigData};
    use crate::rules::FixSet;
    use anyhow::Result;
    use tempfile::TempDir;

    fn transformer(root: &Path, set: FixSet) -> Result<Transformer> {
        let rules = set.rules(&ConfigData::default())?;
        let backups = BackupStore::new(root, &BackupConfig::default());
        Ok(Transformer::new(root, rules, backups))
    }

    #[test]
    fn test_fix_then_skip() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let page = temp_dir.path().join("gst-calculator.html");
        fs::write(&page, r#"<link rel="stylesheet" href="style.css">"#)?;
        let transformer = transformer(temp_dir.path(), FixSet::Css)?;

        let first = transformer.process_file(&page);
        assert!(matches!(
            first,
            FileOutcome::Fixed { ref rules, backup: BackupStatus::Created } if rules == &vec!["stylesheet-link"]
        ));
        assert!(transformer.process_file(&page).is_skipped());
        assert_eq!(
            fs::read_to_string(&page)?,
            r#"<link rel="stylesheet" href="master-style.css">"#
        );
        Ok(())
    }

    #[test]
    fn test_skipped_file_still_gets_backup() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let page = temp_dir.path().join("gst-calculator.html");
        fs::write(&page, "<p>nothing to do</p>")?;
        let transformer = transformer(temp_dir.path(), FixSet::Css)?;

        assert!(transformer.process_file(&page).is_skipped());
        assert!(transformer.backups().backup_path(&page).exists());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_not_found() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let transformer = transformer(temp_dir.path(), FixSet::Css)?;

        match transformer.process_file(&temp_dir.path().join("missing.html")) {
            FileOutcome::Errored(err) => assert!(err.is_not_found()),
            other => panic!("expected error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_is_errored() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let page = temp_dir.path().join("binary.html");
        fs::write(&page, [0xff, 0xfe, 0x00])?;
        let transformer = transformer(temp_dir.path(), FixSet::Css)?;

        let outcome = transformer.process_file(&page);
        assert!(outcome.is_errored());
        assert!(!transformer.backups().backup_path(&page).exists());
        Ok(())
    }

    #[test]
    fn test_dry_run_writes_nothing() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let page = temp_dir.path().join("gst-calculator.html");
        let original = r#"<link rel="stylesheet" href="style.css">"#;
        fs::write(&page, original)?;
        let transformer = transformer(temp_dir.path(), FixSet::Css)?.dry_run(true);

        assert!(transformer.process_file(&page).is_fixed());
        assert_eq!(fs::read_to_string(&page)?, original);
        assert!(!transformer.backups().backup_path(&page).exists());
        Ok(())
    }
}
