//! dirstat - a command-line disk usage analyzer with guarded cleanup.
//!
//! Usage:
//!   dirstat analyze [--path P]     Scan a subtree and show the breakdown
//!   dirstat large [-n N]           Show the N largest directories
//!   dirstat cleanup <APP> [--yes]  Delete an application's cached data
//!   dirstat --help                 Show help

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Context, Result};
use tracing_subscriber::EnvFilter;

use dirstat_analyze::{disk_usage, top_n};
use dirstat_clean::{CandidateInventory, CleanupExecutor, CleanupResolver};
use dirstat_scan::{ScanTree, TreeWalker, WalkOptions};

#[derive(Parser)]
#[command(
    name = "dirstat",
    version,
    about = "A command-line disk usage analyzer",
    long_about = "dirstat helps you understand where your disk space goes.\n\n\
                  Scan a subtree with `dirstat analyze`, rank the largest \
                  directories with `dirstat large`, or reclaim an \
                  application's cached data with `dirstat cleanup`."
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a subtree and show the per-directory breakdown
    Analyze {
        /// Path to analyze (defaults to the home directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Glob patterns for entry names to skip (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Maximum directory depth to expand
        #[arg(long)]
        max_depth: Option<u32>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the largest directories under a path
    Large {
        /// Path to analyze
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Number of directories to show
        #[arg(short = 'n', long, default_value = "10")]
        top: usize,

        /// Glob patterns for entry names to skip (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete an application's cache and support directories
    Cleanup {
        /// Application name (matched case-insensitively)
        app: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Analyze {
            path,
            exclude,
            max_depth,
            format,
        } => {
            let path = match path {
                Some(path) => path,
                None => dirs::home_dir().ok_or_else(|| eyre!("cannot determine home directory"))?,
            };
            run_analyze(&path, exclude, max_depth, format)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Large {
            path,
            top,
            exclude,
            format,
        } => {
            run_large(&path, top, exclude, format)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Cleanup { app, yes } => run_cleanup(&app, yes),
    }
}

/// Route tracing to stderr so piped output stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Scan and render the usage summary.
fn run_analyze(
    path: &Path,
    exclude: Vec<String>,
    max_depth: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    let tree = scan(path, exclude, max_depth)?;
    let disk = match disk_usage(&tree.root_path) {
        Ok(disk) => Some(disk),
        Err(err) => {
            tracing::debug!("disk usage unavailable: {err}");
            None
        }
    };

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(60));
            println!(
                " {} - {}",
                tree.root_path.display(),
                format_size(tree.total_size())
            );
            println!(
                " {} files, {} directories, {} symlinks",
                tree.stats.total_files, tree.stats.total_dirs, tree.stats.total_symlinks
            );
            println!(" Scanned in {:.2}s", tree.scan_duration.as_secs_f64());
            println!("{}", "─".repeat(60));
            println!();

            print_breakdown(&tree);

            if let Some(disk) = &disk {
                println!();
                println!(
                    " Disk: {} of {} used ({:.1}%) - {}",
                    format_size(disk.used_bytes),
                    format_size(disk.total_bytes),
                    disk.percent_used(),
                    disk.health().advice()
                );
            }

            print_warnings(&tree);
        }
        OutputFormat::Json => {
            let report = serde_json::json!({
                "path": tree.root_path,
                "total_size": tree.total_size(),
                "partial": tree.is_partial(),
                "stats": tree.stats,
                "scan_duration_secs": tree.scan_duration.as_secs_f64(),
                "warnings": tree.warnings,
                "disk": disk,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Scan and render the top-N largest directories.
fn run_large(path: &Path, top: usize, exclude: Vec<String>, format: OutputFormat) -> Result<()> {
    let tree = scan(path, exclude, None)?;
    let ranked = top_n(&tree, top);

    match format {
        OutputFormat::Text => {
            println!();
            if ranked.is_empty() {
                println!(" No directories found under {}", tree.root_path.display());
            } else {
                println!(" Largest directories under {}:", tree.root_path.display());
                println!();
                for (i, entry) in ranked.iter().enumerate() {
                    println!(
                        " {:>3}. {:>10}  {}",
                        i + 1,
                        format_size(entry.size),
                        entry.path.display()
                    );
                }
            }
            print_warnings(&tree);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
    }

    Ok(())
}

/// Resolve, preview, confirm, and execute a cleanup.
fn run_cleanup(app: &str, yes: bool) -> Result<ExitCode> {
    let home = dirs::home_dir().ok_or_else(|| eyre!("cannot determine home directory"))?;
    let roots = CandidateInventory::platform_roots(&home);
    let resolver = CleanupResolver::new(CandidateInventory::from_roots(&roots));

    let candidates = resolver.resolve(app);
    if candidates.is_empty() {
        eprintln!("No cached data found for '{}'.", app);
        return Ok(ExitCode::FAILURE);
    }

    let executor = CleanupExecutor::new();
    let preview = executor.preview(&candidates);
    let reclaimable: u64 = preview.iter().map(|(_, size)| size).sum();

    println!();
    println!(" The following will be deleted:");
    for (path, size) in &preview {
        println!("   {:>10}  {}", format_size(*size), path.display());
    }
    println!();
    println!(" Total reclaimable: {}", format_size(reclaimable));
    println!();

    let confirmed = yes || confirm(&format!("Delete {} item(s)?", preview.len()))?;
    if !confirmed {
        eprintln!("Aborted; nothing was deleted.");
        return Ok(ExitCode::FAILURE);
    }

    let report = executor.execute(&candidates, confirmed)?;

    println!(
        " Deleted {} item(s), freed {}",
        report.deleted.len(),
        format_size(report.freed_bytes)
    );
    if !report.is_clean() {
        eprintln!(" {} item(s) could not be deleted:", report.errors.len());
        for error in &report.errors {
            eprintln!("   {}", error);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Walk a subtree with the given filters.
fn scan(path: &Path, exclude: Vec<String>, max_depth: Option<u32>) -> Result<ScanTree> {
    eprintln!("Scanning {}...", path.display());

    let options = WalkOptions::builder()
        .root(path)
        .exclude(exclude)
        .max_depth(max_depth)
        .build()
        .context("invalid scan options")?;

    TreeWalker::new()
        .walk(&options)
        .with_context(|| format!("cannot scan {}", path.display()))
}

/// Print the root's immediate children, largest first.
fn print_breakdown(tree: &ScanTree) {
    let total = tree.total_size().max(1);
    for child in &tree.root.children {
        let ratio = child.size as f64 / total as f64;
        let marker = if child.is_dir() { "/" } else { "" };
        println!(
            " {:<40} {:>10} {:>5.1}% {}",
            truncate(&format!("{}{}", child.name, marker), 40),
            format_size(child.size),
            ratio * 100.0,
            make_bar(ratio, 10)
        );
    }
}

fn print_warnings(tree: &ScanTree) {
    if tree.has_warnings() {
        println!();
        println!(
            " {} subtree(s) skipped during the scan; sizes are a lower bound.",
            tree.warnings.len()
        );
    }
}

/// Ask a y/N question on the terminal.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Create a simple ASCII bar.
fn make_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to max length.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 1).collect();
        format!("{}…", cut)
    }
}
