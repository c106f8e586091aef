//! # CLI Module
//!
//! Command-line interface for the media scanner.
//!
//! ## Usage
//! ```bash
//! # Scan two trees, JSON to stdout
//! media-scanner ~/Pictures ~/Videos
//!
//! # CSV to a file, no duplicate detection
//! media-scanner ~/Pictures -f csv -o wide.csv --no-duplicates
//!
//! # Fewer concurrent reads, shorter ffprobe/identify timeout
//! media-scanner /mnt/nas -c 4 --timeout 10
//! ```
//!
//! Progress and the summary go to stderr; stdout carries only the report.

use clap::{Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use media_scanner::core::pipeline::{Pipeline, ScanResult};
use media_scanner::core::scanner::ScanConfig;
use media_scanner::events::{
    DiscoveryEvent, Event, EventChannel, ExtractionEvent, HashEvent, PipelineEvent,
};
use media_scanner::{write_report, OutputFormat, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

/// Media Scanner - find 16:9 images and videos, and the copies among them
#[derive(Parser, Debug)]
#[command(name = "media-scanner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan
    #[arg(required = true, value_name = "DIRECTORIES")]
    directories: Vec<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Skip duplicate detection
    #[arg(long)]
    no_duplicates: bool,

    /// Number of files read at once
    #[arg(short, long, default_value = "25", value_parser = clap::value_parser!(u64).range(1..))]
    concurrency: u64,

    /// Seconds before an ffprobe/identify call is killed (0 = never)
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Skip hidden files and directories
    #[arg(long)]
    skip_hidden: bool,

    /// Maximum directory depth below each root
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Debug logging and per-file progress
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Full result as JSON
    Json,
    /// One row per match
    Csv,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => OutputFormat::Json,
            Format::Csv => OutputFormat::Csv,
        }
    }
}

/// Run the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    media_scanner::init_tracing(cli.verbose);

    let term = Term::stderr();

    match run_scan(&term, cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            term.write_line(&format!("{} {}", style("Scan failed:").red().bold(), e))
                .ok();
            ExitCode::FAILURE
        }
    }
}

fn run_scan(term: &Term, cli: Cli) -> Result<()> {
    let detect_duplicates = !cli.no_duplicates;
    let tool_timeout = (cli.timeout > 0).then(|| Duration::from_secs(cli.timeout));

    term.write_line(&format!(
        "{} {}",
        style("Media Scanner").bold().cyan(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    term.write_line(&format!(
        "{}",
        style(format!("Scanning: {}", join_paths(&cli.directories))).dim()
    ))
    .ok();
    term.write_line("").ok();

    let pipeline = Pipeline::builder()
        .paths(cli.directories.clone())
        .concurrency(cli.concurrency as usize)
        .detect_duplicates(detect_duplicates)
        .scan_config(ScanConfig {
            follow_symlinks: false,
            skip_hidden: cli.skip_hidden,
            max_depth: cli.max_depth,
        })
        .tool_timeout(tool_timeout)
        .build()?;

    let (sender, receiver) = EventChannel::new();

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_message("Finding files...");

    let progress_clone = progress.clone();
    let verbose = cli.verbose;

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Discovery(DiscoveryEvent::RootScanned { total_files, .. }) => {
                    progress_clone.set_message(format!("Finding files... {} found", total_files));
                }
                Event::Extraction(ExtractionEvent::Progress(p)) => {
                    progress_clone.set_message(format!(
                        "Processing files [{}%] {}/{}",
                        percent(p.completed, p.total),
                        p.completed,
                        p.total
                    ));
                }
                Event::Extraction(ExtractionEvent::Skipped { path, reason }) if verbose => {
                    progress_clone.println(format!(
                        "  {} {}: {}",
                        style("skipped").yellow(),
                        path.display(),
                        reason
                    ));
                }
                Event::Hash(HashEvent::Progress(p)) => {
                    progress_clone.set_message(format!(
                        "Detecting duplicates [{}%] {}/{}",
                        percent(p.completed, p.total),
                        p.completed,
                        p.total
                    ));
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    progress_clone.finish_and_clear();
                }
                Event::Pipeline(PipelineEvent::Cancelled) => {
                    progress_clone.abandon_with_message("Scan cancelled");
                }
                _ => {}
            }
        }
    });

    let outcome = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();
    progress.finish_and_clear();

    let result = outcome?;

    print_summary(term, &result, detect_duplicates);

    write_report(&result, cli.format.into(), cli.output.as_deref())?;

    if let Some(path) = &cli.output {
        term.write_line(&format!(
            "{} {}",
            style("Results written to:").green(),
            path.display()
        ))
        .ok();
    }

    Ok(())
}

fn print_summary(term: &Term, result: &ScanResult, detect_duplicates: bool) {
    let stats = &result.stats;

    term.write_line(&format!("{} Scan complete!", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();
    term.write_line(&format!("{}", style("Results:").green())).ok();
    term.write_line(&format!("  Total files scanned: {}", style(stats.total_files).cyan()))
        .ok();
    term.write_line(&format!("  Images processed: {}", style(stats.images_processed).cyan()))
        .ok();
    term.write_line(&format!("  Videos processed: {}", style(stats.videos_processed).cyan()))
        .ok();
    term.write_line(&format!(
        "  {}",
        style(format!("16:9 matches: {}", stats.match_count)).bold()
    ))
    .ok();

    if detect_duplicates {
        term.write_line(&format!("  Duplicates found: {}", style(stats.duplicate_count).cyan()))
            .ok();
    }

    if stats.skipped_count > 0 {
        term.write_line(&format!(
            "  {}",
            style(format!("Skipped (errors): {}", stats.skipped_count)).yellow()
        ))
        .ok();
        for skipped in &result.skipped {
            term.write_line(&format!(
                "    {} {}",
                skipped.path.display(),
                style(&skipped.reason).dim()
            ))
            .ok();
        }
    }

    term.write_line(&format!("  Duration: {}", format_duration(stats.scan_duration)))
        .ok();
    term.write_line("").ok();
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}

fn format_duration(millis: u64) -> String {
    format!("{:.1}s", millis as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_documented_options() {
        let cli = Cli::try_parse_from(["media-scanner", "/media"]).unwrap();

        assert_eq!(cli.directories, vec![PathBuf::from("/media")]);
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.concurrency, 25);
        assert_eq!(cli.timeout, 30);
        assert!(!cli.no_duplicates);
        assert!(cli.output.is_none());
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "media-scanner", "/a", "/b", "-o", "out.csv", "-f", "csv", "--no-duplicates",
            "-c", "4", "--timeout", "0", "--skip-hidden", "--max-depth", "2", "-v",
        ])
        .unwrap();

        assert_eq!(cli.directories.len(), 2);
        assert_eq!(cli.output, Some(PathBuf::from("out.csv")));
        assert_eq!(OutputFormat::from(cli.format), OutputFormat::Csv);
        assert!(cli.no_duplicates);
        assert_eq!(cli.concurrency, 4);
        assert_eq!(cli.timeout, 0);
        assert!(cli.skip_hidden);
        assert_eq!(cli.max_depth, Some(2));
        assert!(cli.verbose);
    }

    #[test]
    fn directories_are_required() {
        assert!(Cli::try_parse_from(["media-scanner"]).is_err());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        assert!(Cli::try_parse_from(["media-scanner", "/media", "-c", "0"]).is_err());
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(0, 0), 100);
    }

    #[test]
    fn duration_has_one_decimal() {
        assert_eq!(format_duration(1234), "1.2s");
        assert_eq!(format_duration(0), "0.0s");
    }
}
