pub mod atomic;
pub mod backup;

pub use atomic::AtomicFile;
pub use backup::{BackupStatus, BackupStore, RestoreOutcome};
