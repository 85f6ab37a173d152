use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::atomic::AtomicFile;
use crate::config::BackupConfig;
use crate::error::{PagefixError, PagefixResult, PathContext};

/// What happened to a file's backup while it was processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupStatus {
    Created,
    /// A backup from an earlier run was left untouched
    Kept,
    Refreshed,
    /// Dry runs write nothing
    Skipped,
}

/// Result of restoring one file from its backup
#[derive(Debug)]
pub enum RestoreOutcome {
    Restored { original: PathBuf },
    Failed { original: PathBuf, error: PagefixError },
}

/// Sibling backup copies named `<path><suffix>`.
#[derive(Debug, Clone)]
pub struct BackupStore {
    root: PathBuf,
    suffix: String,
    overwrite_existing: bool,
}

impl BackupStore {
    pub fn new(root: impl AsRef<Path>, config: &BackupConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            suffix: config.suffix.clone(),
            overwrite_existing: config.overwrite_existing,
        }
    }

    pub fn with_overwrite(mut self, overwrite_existing: bool) -> Self {
        self.overwrite_existing = overwrite_existing;
        self
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn backup_path(&self, path: &Path) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(&self.suffix);
        PathBuf::from(name)
    }

    /// The original path a backup belongs to, if `path` is a backup
    pub fn original_path(&self, path: &Path) -> Option<PathBuf> {
        let text = path.to_str()?;
        let original = text.strip_suffix(self.suffix.as_str())?;
        if original.is_empty() || original.ends_with(std::path::MAIN_SEPARATOR) || original.ends_with('/') {
            return None;
        }
        Some(PathBuf::from(original))
    }

    /// Make sure a backup holding `original` exists for `path` before the
    /// file is touched.
    pub fn ensure(&self, path: &Path, original: &[u8]) -> PagefixResult<BackupStatus> {
        let backup = self.backup_path(path);
        let existed = backup.exists();

        if existed && !self.overwrite_existing {
            tracing::debug!(backup = %backup.display(), "keeping existing backup");
            return Ok(BackupStatus::Kept);
        }

        AtomicFile::new(&backup)?.write(original)?;
        tracing::debug!(backup = %backup.display(), "backup written");

        Ok(if existed {
            BackupStatus::Refreshed
        } else {
            BackupStatus::Created
        })
    }

    /// Every backup under the working root, in a stable order
    pub fn find_all(&self) -> PagefixResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(PagefixError::NotFound {
                path: self.root.clone(),
            });
        }

        let mut backups: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || e.file_name() != ".git")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| self.original_path(p).is_some())
            .collect();

        backups.sort();
        Ok(backups)
    }

    pub fn restore(&self, backup: &Path) -> PagefixResult<PathBuf> {
        let original = self.original_path(backup).ok_or_else(|| {
            PagefixError::InvalidInput(format!("Not a backup file: {}", backup.display()))
        })?;

        let content = fs::read(backup).with_path(backup)?;
        AtomicFile::new(&original)?.write(&content)?;
        tracing::debug!(original = %original.display(), "restored from backup");

        // A consumed backup must not outlive later edits to the original.
        if let Err(error) = fs::remove_file(backup) {
            tracing::warn!(backup = %backup.display(), %error, "restored backup could not be removed");
        }

        Ok(original)
    }

    /// Restore every backup found under the root, removing each backup once
    /// its original is restored. Failures are reported per file, keep their
    /// backup, and do not stop the remaining restores.
    pub fn restore_all(&self) -> PagefixResult<Vec<RestoreOutcome>> {
        let outcomes = self
            .find_all()?
            .into_iter()
            .map(|backup| match self.restore(&backup) {
                Ok(original) => RestoreOutcome::Restored { original },
                Err(error) => {
                    let original = self.original_path(&backup).unwrap_or_else(|| backup.clone());
                    tracing::warn!(original = %original.display(), %error, "restore failed");
                    RestoreOutcome::Failed { original, error }
                }
            })
            .collect();

        Ok(outcomes)
    }
}
