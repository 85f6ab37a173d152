use std::path::{Path, PathBuf};

use super::FileOutcome;

/// Tally of one run, with the per-file outcomes in processing order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub fixed: usize,
    pub skipped: usize,
    pub errored: usize,
    pub outcomes: Vec<(PathBuf, FileOutcome)>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: &Path, outcome: FileOutcome) -> &FileOutcome {
        match &outcome {
            FileOutcome::Fixed { .. } => self.fixed += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Errored(_) => self.errored += 1,
        }
        self.outcomes.push((path.to_path_buf(), outcome));
        &self.outcomes[self.outcomes.len() - 1].1
    }

    pub fn total(&self) -> usize {
        self.fixed + self.skipped + self.errored
    }

    pub fn outcome_for(&self, path: &Path) -> Option<&FileOutcome> {
        self.outcomes
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, outcome)| outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PagefixError;
    use crate::storage::BackupStatus;

    #[test]
    fn test_counts() {
        let mut summary = RunSummary::new();
        summary.record(
            Path::new("a.html"),
            FileOutcome::Fixed {
                rules: vec!["wrap-card"],
                backup: BackupStatus::Created,
            },
        );
        summary.record(
            Path::new("b.html"),
            FileOutcome::Skipped {
                backup: BackupStatus::Kept,
            },
        );
        summary.record(
            Path::new("c.html"),
            FileOutcome::Errored(PagefixError::NotFound {
                path: PathBuf::from("c.html"),
            }),
        );

        assert_eq!((summary.fixed, summary.skipped, summary.errored), (1, 1, 1));
        assert_eq!(summary.total(), 3);
        assert!(summary.outcome_for(Path::new("b.html")).unwrap().is_skipped());
        assert!(summary.outcome_for(Path::new("d.html")).is_none());
    }
}
