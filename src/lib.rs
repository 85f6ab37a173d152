pub mod config;
pub mod discovery;
pub mod error;
pub mod page;
pub mod rules;
pub mod storage;
pub mod transform;

use std::fs;
use std::path::{Path, PathBuf};

pub use discovery::TargetGroup;
pub use error::{PagefixError, PagefixResult};
pub use rules::FixSet;
pub use storage::{BackupStatus, RestoreOutcome};
pub use transform::{FileOutcome, RunSummary, Transformer};

use error::PathContext;
use page::Page;
use storage::BackupStore;

/// Options for a single run of a fix set
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub refresh_backups: bool,
    pub discover: bool,
    pub paths: Vec<PathBuf>,
}

/// Progress notifications emitted while a run walks its targets
#[derive(Debug)]
pub enum Progress<'a> {
    Group(&'a TargetGroup),
    File {
        path: &'a Path,
        relative: &'a Path,
        outcome: &'a FileOutcome,
    },
}

/// What a fix set would do to one file
#[derive(Debug, Clone)]
pub struct Preview {
    pub original: String,
    pub transformed: String,
    pub applied: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct Pagefix {
    root: PathBuf,
    config: config::Config,
}

impl Pagefix {
    pub fn new(project_root: impl AsRef<Path>) -> PagefixResult<Self> {
        let root = project_root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(PagefixError::NotFound { path: root });
        }
        let config = config::Config::load_or_default(&root)?;

        Ok(Self { root, config })
    }

    pub fn init(project_root: impl AsRef<Path>) -> PagefixResult<bool> {
        config::Config::init(project_root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &config::Config {
        &self.config
    }

    pub fn backups(&self) -> BackupStore {
        BackupStore::new(&self.root, &self.config.data.backup)
    }

    pub fn transformer(&self, fix_set: FixSet, options: &RunOptions) -> PagefixResult<Transformer> {
        let rules = fix_set.rules(&self.config.data)?;
        let backups = self
            .backups()
            .with_overwrite(self.config.data.backup.overwrite_existing || options.refresh_backups);

        Ok(Transformer::new(&self.root, rules, backups).dry_run(options.dry_run))
    }

    pub fn targets(&self, fix_set: FixSet, options: &RunOptions) -> PagefixResult<Vec<TargetGroup>> {
        discovery::select(
            &self.root,
            fix_set.selection(),
            &options.paths,
            options.discover,
            &self.config.data,
        )
    }

    /// Run a fix set over its targets, one file at a time.
    pub fn run<F>(&self, fix_set: FixSet, options: &RunOptions, mut on_progress: F) -> PagefixResult<RunSummary>
    where
        F: FnMut(Progress<'_>),
    {
        let transformer = self.transformer(fix_set, options)?;
        let groups = self.targets(fix_set, options)?;
        let mut summary = RunSummary::new();

        tracing::info!(fix_set = %fix_set, groups = groups.len(), dry_run = options.dry_run, "starting run");

        for group in &groups {
            on_progress(Progress::Group(group));
            for path in &group.paths {
                let outcome = summary.record(path, transformer.process_file(path));
                let page = Page::new(&self.root, path);
                on_progress(Progress::File {
                    path,
                    relative: page.relative(),
                    outcome,
                });
            }
        }

        tracing::info!(
            fixed = summary.fixed,
            skipped = summary.skipped,
            errored = summary.errored,
            "run finished"
        );
        Ok(summary)
    }

    pub fn preview(&self, fix_set: FixSet, file: &Path) -> PagefixResult<Preview> {
        let path = if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.root.join(file)
        };
        let original = fs::read_to_string(&path).with_path(&path)?;
        let transformer = self.transformer(fix_set, &RunOptions::default())?;
        let rewrite = transformer.rewrite(&original, &path);

        Ok(Preview {
            original,
            transformed: rewrite.content,
            applied: rewrite.applied,
        })
    }

    pub fn rollback(&self) -> PagefixResult<Vec<RestoreOutcome>> {
        self.backups().restore_all()
    }
}
