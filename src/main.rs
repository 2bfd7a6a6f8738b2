use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sig_shift::diff::{print_diff, DiffStats};
use sig_shift::migrate::{migrate_file, FileStatus};
use sig_shift::report::MigrationReport;
use sig_shift::rules::RuleSet;
use sig_shift::source::collect_source_files;

#[derive(Parser)]
#[command(name = "sig-shift")]
#[command(about = "Widens LoginURL/HandleCallback signatures across a Go source tree", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format: "default", "diff", or "json"
    #[arg(long, default_value = "default", global = true)]
    format: String,

    /// Show summary statistics after the run
    #[arg(long, global = true)]
    summary: bool,

    /// Exclude paths matching these patterns (can be used multiple times)
    #[arg(long, global = true, num_args = 0..)]
    exclude: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite declarations and call sites under the root directory
    Migrate {
        /// Root directory to scan recursively
        #[arg(short, long, default_value = "connector")]
        root: PathBuf,

        /// File extension to match
        #[arg(short, long, default_value = "go")]
        ext: String,

        /// Apply changes (default is dry-run)
        #[arg(long)]
        apply: bool,
    },

    /// Scan for lines still carrying the old signatures
    Check {
        /// Root directory to scan recursively
        #[arg(short, long, default_value = "connector")]
        root: PathBuf,

        /// File extension to match
        #[arg(short, long, default_value = "go")]
        ext: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate { root, ext, apply } => {
            let files = collect_source_files(&root, &ext, &cli.exclude)?;
            let rules = RuleSet::new();
            run_migration(&files, &rules, apply, &cli.format, cli.summary)
        }
        Commands::Check { root, ext } => {
            let files = collect_source_files(&root, &ext, &cli.exclude)?;
            let rules = RuleSet::new();
            check_stale(&files, &rules)
        }
    }
}

fn run_migration(
    files: &[PathBuf],
    rules: &RuleSet,
    apply: bool,
    format: &str,
    show_summary: bool,
) -> Result<()> {
    let mut report = MigrationReport::default();
    let mut total_stats = DiffStats::default();
    report.files_scanned = files.len();

    for path in files {
        match migrate_file(path, rules, apply) {
            Ok(outcome) => {
                if let FileStatus::Rewritten { original, rewritten } = outcome.status {
                    match format {
                        "diff" => {
                            let stats = print_diff(path, &original, &rewritten);
                            total_stats.add(&stats);
                        }
                        "json" => {}
                        _ => {
                            if apply {
                                println!("✓ Modified: {}", path.display());
                            } else {
                                println!("Would modify: {}", path.display());
                            }
                        }
                    }
                    report.record_rewritten(path.clone());
                }
            }
            Err(e) => {
                // One bad file does not abort the rest of the tree.
                if format != "json" {
                    eprintln!("✗ {}: {:#}", path.display(), e);
                }
                report.record_failure(path.clone(), &e);
            }
        }
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.files_rewritten == 0 && !report.has_failures() {
        println!("No files needed rewriting - tree is already migrated or out of scope");
    } else if format == "diff" && show_summary {
        total_stats.print_summary();
    } else if format == "default" && !apply {
        println!("\n🔍 Dry run complete. Use --apply to make changes.");
        println!("Summary: {} file(s) would be modified", report.files_rewritten);
    }

    if report.has_failures() {
        anyhow::bail!("{} file(s) failed", report.failures.len());
    }
    Ok(())
}

fn check_stale(files: &[PathBuf], rules: &RuleSet) -> Result<()> {
    let mut hits = Vec::new();

    for path in files {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        for (line_no, line) in rules.stale_lines(&content) {
            hits.push((path.clone(), line_no, line.trim().to_string()));
        }
    }

    if hits.is_empty() {
        println!("✓ No signatures left to migrate.");
        return Ok(());
    }

    println!("❌ Found {} line(s) still using the old signatures:", hits.len());
    println!();
    for (path, line_no, code) in &hits {
        println!("  - {}:{}", path.display(), line_no);
        println!("    {}", code);
    }
    println!();
    println!("💡 Run 'sig-shift migrate --apply' to rewrite them.");

    anyhow::bail!("{} stale line(s) remain", hits.len())
}
