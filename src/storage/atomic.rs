use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{PagefixError, PagefixResult, PathContext};

/// Whole-file replacement through a temporary sibling and a rename, so an
/// interrupted run never leaves a half-written page behind.
pub struct AtomicFile {
    path: PathBuf,
    temp_path: PathBuf,
}

impl AtomicFile {
    pub fn new<P: AsRef<Path>>(path: P) -> PagefixResult<Self> {
        let path = path.as_ref().to_path_buf();
        let temp_path = Self::temp_path(&path)?;

        Ok(Self { path, temp_path })
    }

    fn temp_path(path: &Path) -> PagefixResult<PathBuf> {
        let file_name = path
            .file_name()
            .ok_or_else(|| PagefixError::InvalidInput(format!("Invalid file path: {}", path.display())))?;

        let temp_name = format!(
            ".{}.tmp.{}",
            file_name.to_string_lossy(),
            std::process::id()
        );

        Ok(path.with_file_name(temp_name))
    }

    /// Atomically replace the file's content. An existing file keeps its
    /// permissions.
    pub fn write(&self, content: &[u8]) -> PagefixResult<()> {
        let result = self.write_temp(content).and_then(|()| {
            fs::rename(&self.temp_path, &self.path).with_path(&self.path)
        });

        if result.is_err() && self.temp_path.exists() {
            let _ = fs::remove_file(&self.temp_path);
        }

        result
    }

    fn write_temp(&self, content: &[u8]) -> PagefixResult<()> {
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .with_path(&self.temp_path)?;

        temp_file.write_all(content).with_path(&self.temp_path)?;
        temp_file.sync_all().with_path(&self.temp_path)?;

        if let Ok(metadata) = fs::metadata(&self.path) {
            fs::set_permissions(&self.temp_path, metadata.permissions()).with_path(&self.temp_path)?;
        }

        Ok(())
    }
}
