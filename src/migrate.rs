use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::editor::MigrationEditor;
use crate::rules::RuleSet;

#[derive(Debug)]
pub enum FileStatus {
    /// Content survived both passes byte-identical; nothing was written.
    Unchanged,
    /// Content changed; carries both versions for diff and JSON output.
    Rewritten { original: String, rewritten: String },
}

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Read one file, run the full rule pipeline, and write the result back -
/// but only when it differs from the snapshot read at the start, and only
/// when `apply` is set. Unchanged files trigger no I/O beyond the read.
pub fn migrate_file(path: &Path, rules: &RuleSet, apply: bool) -> Result<FileOutcome> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut editor = MigrationEditor::new(&content);
    editor.apply(rules);

    if !editor.changed() {
        return Ok(FileOutcome {
            path: path.to_path_buf(),
            status: FileStatus::Unchanged,
        });
    }

    let rewritten = editor.into_content();
    if apply {
        fs::write(path, &rewritten)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        status: FileStatus::Rewritten {
            original: content,
            rewritten,
        },
    })
}
