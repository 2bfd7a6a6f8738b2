use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collect every file under `root` whose extension matches `ext`,
/// recursing through all subdirectories. The result is sorted so repeated
/// runs over the same tree visit files in the same order. Files are not
/// inspected here - ones without any matching pattern simply pass through
/// the pipeline unchanged.
pub fn collect_source_files(root: &Path, ext: &str, exclude: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file()
                    && entry.path().extension().and_then(|s| s.to_str()) == Some(ext)
                {
                    files.push(entry.path().to_path_buf());
                }
            }
            Err(e) => eprintln!("Warning: failed to walk entry: {}", e),
        }
    }

    if !exclude.is_empty() {
        files.retain(|file| {
            let file_str = file.to_string_lossy();
            !exclude.iter().any(|pattern| {
                if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
                    glob::Pattern::new(pattern)
                        .map(|p| p.matches(&file_str))
                        .unwrap_or(false)
                } else {
                    file_str.contains(pattern.as_str())
                }
            })
        });
    }

    files.sort();
    Ok(files)
}
