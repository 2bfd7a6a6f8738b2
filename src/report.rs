use serde::Serialize;
use std::path::PathBuf;

/// Outcome of one migration run, printed as text or serialized for
/// `--format json`. Unchanged files are the difference between
/// `files_scanned` and the other two buckets.
#[derive(Debug, Default, Serialize)]
pub struct MigrationReport {
    pub files_scanned: usize,
    pub files_rewritten: usize,
    pub rewritten: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

#[derive(Debug, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

impl MigrationReport {
    pub fn record_rewritten(&mut self, path: PathBuf) {
        self.files_rewritten += 1;
        self.rewritten.push(path);
    }

    pub fn record_failure(&mut self, path: PathBuf, error: &anyhow::Error) {
        self.failures.push(FileFailure {
            path,
            error: format!("{error:#}"),
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
