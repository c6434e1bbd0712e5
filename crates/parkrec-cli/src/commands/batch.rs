//! Batch processing command for multiple receipt PDFs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use parkrec_core::format_currency;
use parkrec_core::pdf::sanitize_file_stem;

use super::load_config;
use super::process::{process_file, OutputPaths};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching the input PDFs
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input)
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Counts kept for one successfully processed file.
struct FileReport {
    receipts: usize,
    unique: usize,
    duplicates_removed: usize,
    total: String,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    report: Option<FileReport>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .filter(|p| !is_batch_output(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    // Set by the first failing file unless --continue-on-error; no new file
    // starts once it is set.
    let halt = Arc::new(AtomicBool::new(false));
    let mut tasks = JoinSet::new();

    for (position, path) in files.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        if halt.load(Ordering::SeqCst) {
            break;
        }

        let config = Arc::clone(&config);
        let halt = Arc::clone(&halt);
        let continue_on_error = args.continue_on_error;
        let paths = output_paths(&path, args.output_dir.as_deref());

        tasks.spawn_blocking(move || {
            let _permit = permit;
            if halt.load(Ordering::SeqCst) {
                return None;
            }

            let file_start = Instant::now();
            let outcome = process_file(&path, &paths, &config, &ProgressBar::hidden());
            let processing_time_ms = file_start.elapsed().as_millis() as u64;

            let result = match outcome {
                Ok(result) => ProcessResult {
                    path,
                    report: Some(FileReport {
                        receipts: result.receipt_count(),
                        unique: result.unique_count(),
                        duplicates_removed: result.duplicates().removed_count(),
                        total: format_currency(result.total_amount()),
                    }),
                    error: None,
                    processing_time_ms,
                },
                Err(e) => {
                    if !continue_on_error {
                        halt.store(true, Ordering::SeqCst);
                    }
                    ProcessResult {
                        path,
                        report: None,
                        error: Some(format!("{:#}", e)),
                        processing_time_ms,
                    }
                }
            };
            Some((position, result))
        });
    }

    let mut results = Vec::new();
    let mut first_failure: Option<(usize, String)> = None;
    while let Some(joined) = tasks.join_next().await {
        let Some((position, result)) = joined? else {
            continue;
        };

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                if first_failure.as_ref().is_none_or(|(first, _)| position < *first) {
                    first_failure = Some((position, error_msg.clone()));
                }
            }
        } else {
            debug!("Processed {}", result.path.display());
        }

        results.push((position, result));
        overall_pb.inc(1);
    }

    if let Some((_, error_msg)) = first_failure {
        overall_pb.abandon_with_message("Stopped");
        anyhow::bail!("Processing failed: {}", error_msg);
    }

    overall_pb.finish_with_message("Complete");

    results.sort_by_key(|(position, _)| *position);
    let results: Vec<ProcessResult> = results.into_iter().map(|(_, r)| r).collect();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("batch_summary.csv"))
            .unwrap_or_else(|| PathBuf::from("batch_summary.csv"));

        write_batch_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful: Vec<_> = results.iter().filter(|r| r.report.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    for result in &successful {
        if let Some(report) = &result.report {
            println!(
                "  - {}: {} unique of {} receipts, total {}",
                result.path.display(),
                report.unique,
                report.receipts,
                report.total
            );
        }
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// `<stem>_processed.pdf` and `<stem>_summary.txt` in `output_dir`, or next
/// to the input when no directory is given.
fn output_paths(input: &Path, output_dir: Option<&Path>) -> OutputPaths {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .map(sanitize_file_stem)
        .unwrap_or_else(|| "receipts".to_string());

    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    OutputPaths {
        pdf: Some(dir.join(format!("{}_processed.pdf", stem))),
        summary: Some(dir.join(format!("{}_summary.txt", stem))),
    }
}

/// Skip PDFs an earlier batch run wrote next to its inputs.
fn is_batch_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with("_processed"))
}

fn write_batch_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "receipts",
        "unique",
        "duplicates_removed",
        "total",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(report) = &result.report {
            wtr.write_record([
                filename,
                "success",
                &report.receipts.to_string(),
                &report.unique.to_string(),
                &report.duplicates_removed.to_string(),
                &report.total,
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths_in_output_dir() {
        let paths = output_paths(Path::new("in/mars 2024.pdf"), Some(Path::new("out")));

        let pdf = paths.pdf.unwrap();
        let summary = paths.summary.unwrap();
        assert!(pdf.starts_with("out"));
        assert!(pdf.to_string_lossy().ends_with("_processed.pdf"));
        assert!(summary.to_string_lossy().ends_with("_summary.txt"));
    }

    #[test]
    fn test_previous_outputs_are_skipped() {
        assert!(is_batch_output(Path::new("in/receipts_processed.pdf")));
        assert!(!is_batch_output(Path::new("in/receipts.pdf")));
    }

    #[test]
    fn test_output_paths_next_to_input() {
        let paths = output_paths(Path::new("in/receipts.pdf"), None);
        assert_eq!(
            paths.pdf.unwrap(),
            PathBuf::from("in").join("receipts_processed.pdf")
        );
    }
}
