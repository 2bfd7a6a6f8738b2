use similar::{ChangeTag, TextDiff};
use std::path::Path;

/// Statistics accumulated across one run.
#[derive(Debug, Default)]
pub struct DiffStats {
    pub files_changed: usize,
    pub lines_added: usize,
    pub lines_removed: usize,
}

impl DiffStats {
    pub fn add(&mut self, other: &DiffStats) {
        self.files_changed += other.files_changed;
        self.lines_added += other.lines_added;
        self.lines_removed += other.lines_removed;
    }

    pub fn print_summary(&self) {
        println!("\nSummary:");
        println!("Files changed: {}", self.files_changed);
        println!("Lines added: {}", self.lines_added);
        println!("Lines removed: {}", self.lines_removed);
    }
}

/// Unified diff between the original and rewritten content of one file,
/// with `---`/`+++` headers naming the path on both sides (the rewrite is
/// in place).
pub fn generate_unified_diff(
    path: &Path,
    original: &str,
    rewritten: &str,
    context_lines: usize,
) -> (String, DiffStats) {
    let diff = TextDiff::from_lines(original, rewritten);
    let mut stats = DiffStats::default();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => stats.lines_added += 1,
            ChangeTag::Delete => stats.lines_removed += 1,
            ChangeTag::Equal => {}
        }
    }
    if stats.lines_added > 0 || stats.lines_removed > 0 {
        stats.files_changed = 1;
    }

    let path_str = path.display().to_string();
    let mut output = format!("--- {}\n+++ {}\n", path_str, path_str);
    output.push_str(&diff.unified_diff().context_radius(context_lines).to_string());

    (output, stats)
}

/// Print the unified diff for one file (nothing is printed when the
/// contents are identical) and return its statistics.
pub fn print_diff(path: &Path, original: &str, rewritten: &str) -> DiffStats {
    let (output, stats) = generate_unified_diff(path, original, rewritten, 3);
    if stats.files_changed > 0 {
        print!("{}", output);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn diff_reports_widened_line() {
        let original = "func (p *conn) LoginURL(state string) (string, error) {\n\treturn u.String(), nil\n}\n";
        let rewritten = "func (p *conn) LoginURL(state string) (string, []byte, error) {\n\treturn u.String(), nil, nil\n}\n";
        let path = PathBuf::from("connector/keystone/keystone.go");

        let (diff, stats) = generate_unified_diff(&path, original, rewritten, 3);

        assert!(diff.contains("--- connector/keystone/keystone.go"));
        assert!(diff.contains("+++ connector/keystone/keystone.go"));
        assert!(diff.contains("+\treturn u.String(), nil, nil"));
        assert!(diff.contains("-\treturn u.String(), nil"));
        assert_eq!(stats.files_changed, 1);
        assert_eq!(stats.lines_added, 2);
        assert_eq!(stats.lines_removed, 2);
    }

    #[test]
    fn diff_of_identical_content_counts_nothing() {
        let content = "package keystone\n";
        let path = PathBuf::from("connector/keystone/cache.go");

        let (_, stats) = generate_unified_diff(&path, content, content, 3);

        assert_eq!(stats.files_changed, 0);
        assert_eq!(stats.lines_added, 0);
        assert_eq!(stats.lines_removed, 0);
    }

    #[test]
    fn stats_accumulate_across_files() {
        let mut total = DiffStats::default();
        total.add(&DiffStats {
            files_changed: 1,
            lines_added: 4,
            lines_removed: 4,
        });
        total.add(&DiffStats {
            files_changed: 1,
            lines_added: 1,
            lines_removed: 1,
        });

        assert_eq!(total.files_changed, 2);
        assert_eq!(total.lines_added, 5);
        assert_eq!(total.lines_removed, 5);
    }
}
