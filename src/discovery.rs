use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::{ConfigData, DiscoveryConfig};
use crate::error::{PagefixError, PagefixResult};
use crate::rules::Selection;

/// A labelled batch of files processed together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroup {
    pub label: String,
    pub paths: Vec<PathBuf>,
}

/// Resolve the files a run should visit.
///
/// Explicit paths win; otherwise the fix set's selection decides between the
/// configured category lists and a walk of the root.
pub fn select(
    root: &Path,
    selection: Selection,
    explicit: &[PathBuf],
    force_discover: bool,
    config: &ConfigData,
) -> PagefixResult<Vec<TargetGroup>> {
    if !root.is_dir() {
        return Err(PagefixError::NotFound {
            path: root.to_path_buf(),
        });
    }

    if !explicit.is_empty() {
        let paths = explicit
            .iter()
            .map(|p| if p.is_absolute() { p.clone() } else { root.join(p) })
            .collect();
        return Ok(vec![TargetGroup {
            label: "Selected Files".to_string(),
            paths,
        }]);
    }

    match selection {
        Selection::Discover => discover_group(root, &config.discovery),
        _ if force_discover => discover_group(root, &config.discovery),
        Selection::Categories(categories) => Ok(categories
            .iter()
            .map(|category| TargetGroup {
                label: category.label().to_string(),
                paths: category.paths(config).iter().map(|p| root.join(p)).collect(),
            })
            .collect()),
    }
}

fn discover_group(root: &Path, config: &DiscoveryConfig) -> PagefixResult<Vec<TargetGroup>> {
    let paths = discover(root, config)?;
    Ok(vec![TargetGroup {
        label: format!("{} Files", config.extension.to_uppercase()),
        paths,
    }])
}

/// Every file under `root` with the configured extension, skipping hidden and
/// excluded directories. Sorted for a stable processing order.
pub fn discover(root: &Path, config: &DiscoveryConfig) -> PagefixResult<Vec<PathBuf>> {
    let excluded = |entry: &DirEntry| {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || config.exclude_dirs.iter().any(|d| d.as_str() == name)
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_entry(|e| !excluded(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case(config.extension.as_str()));
        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!(count = files.len(), root = %root.display(), "discovered files");
    Ok(files)
}
