use std::path::{Component, Path, PathBuf};

/// A target file as the rules see it: where it sits relative to the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    relative: PathBuf,
    file_name: String,
}

impl Page {
    /// Build a page from a path relative to the working root. Paths that live
    /// under `root` are made relative to it, resolving `..` and symlinks when
    /// the two are spelled differently.
    pub fn new(root: &Path, path: &Path) -> Self {
        let relative = match path.strip_prefix(root) {
            Ok(relative) if !relative.components().any(|c| c == Component::ParentDir) => {
                relative.to_path_buf()
            }
            _ => canonical_relative(root, path).unwrap_or_else(|| path.to_path_buf()),
        };
        let relative: PathBuf = relative
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();

        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Self {
            relative,
            file_name,
        }
    }

    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Number of directories between the root and the file
    pub fn depth(&self) -> usize {
        self.relative
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count()
            .saturating_sub(1)
    }

    /// Relative prefix that climbs from the page back to the root
    pub fn root_prefix(&self) -> String {
        "../".repeat(self.depth())
    }

    pub fn is_index(&self) -> bool {
        self.file_name == "index.html"
    }

    /// Lowercase file name, used to gate page-specific rules
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn name_contains(&self, needle: &str) -> bool {
        self.file_name.contains(needle)
    }
}

/// Strip `root` from `path` after resolving both, for targets spelled
/// differently from the root (an absolute path against `.`, or a root reached
/// through `..`). A target that does not exist yet is resolved through its
/// parent directory.
fn canonical_relative(root: &Path, path: &Path) -> Option<PathBuf> {
    let root = root.canonicalize().ok()?;
    let path = match path.canonicalize() {
        Ok(path) => path,
        Err(_) => path.parent()?.canonicalize().ok()?.join(path.file_name()?),
    };

    path.strip_prefix(&root).ok().map(Path::to_path_buf)
}
