//! Process command - deduplicate and total a single receipt PDF.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use parkrec_core::models::config::ParkrecConfig;
use parkrec_core::pdf::{check_input_file, DocumentWriter, PdfDocument};
use parkrec_core::report::{render_summary, write_summary};
use parkrec_core::{PageRecord, ProcessingResult, ReceiptPipeline, ReceiptSummary};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input receipt PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output PDF (default: next to the input, named per config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the text summary; without a path it goes next to the output PDF
    #[arg(short, long)]
    summary: Option<Option<PathBuf>>,

    /// Report format printed to stdout
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Skip writing the filtered PDF
    #[arg(long)]
    no_pdf: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Where the outputs of one processed file go.
#[derive(Debug, Default)]
pub struct OutputPaths {
    pub pdf: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());

    let output_dir = args
        .input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let pdf_path = args
        .output
        .clone()
        .unwrap_or_else(|| output_dir.join(&config.output.pdf_file_name));
    let summary_path = args.summary.clone().map(|path| {
        path.unwrap_or_else(|| {
            pdf_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
                .join(&config.output.summary_file_name)
        })
    });

    let paths = OutputPaths {
        pdf: (!args.no_pdf).then_some(pdf_path),
        summary: summary_path,
    };

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
                .progress_chars("##-"),
        );
        pb
    };

    let result = process_file(&args.input, &paths, &config, &pb)?;
    pb.finish_and_clear();

    println!("{}", format_result(&result, args.format)?);

    if let Some(pdf) = &paths.pdf {
        eprintln!("{} Processed PDF written to {}", style("✓").green(), pdf.display());
    }
    if let Some(summary) = &paths.summary {
        eprintln!("{} Summary written to {}", style("✓").green(), summary.display());
    }
    debug!("Processing took {}ms", start.elapsed().as_millis());

    Ok(())
}

/// Check, scan and write outputs for one input file.
///
/// `pb` is advanced while pages are scanned and again while the filtered
/// document is assembled.
pub fn process_file(
    input: &Path,
    paths: &OutputPaths,
    config: &ParkrecConfig,
    pb: &ProgressBar,
) -> anyhow::Result<ProcessingResult> {
    if let Some(warning) = check_input_file(input, &config.input)? {
        pb.suspend(|| eprintln!("{} {}", style("⚠").yellow(), warning));
    }

    let document = PdfDocument::open(input)?;

    pb.set_message("Scanning pages...");
    let mut advance = |current: usize, total: usize| {
        pb.set_length(total as u64);
        pb.set_position(current as u64 + 1);
    };

    let result = ReceiptPipeline::from_config(config)
        .process(&document, &mut advance)
        .with_context(|| format!("Failed to process {}", input.display()))?;

    if let Some(pdf) = &paths.pdf {
        pb.set_message("Writing PDF...");
        pb.set_position(0);
        document
            .write_filtered(&result.page_order(), pdf, &mut advance)
            .with_context(|| format!("Failed to write {}", pdf.display()))?;
    }

    if let Some(summary) = &paths.summary {
        write_summary(&result, summary)
            .with_context(|| format!("Failed to write {}", summary.display()))?;
    }

    Ok(result)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    summary: ReceiptSummary,
    page_count: usize,
    records: &'a [PageRecord],
}

fn format_result(result: &ProcessingResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonReport {
            summary: result.summary(),
            page_count: result.page_count(),
            records: result.records(),
        })?),
        OutputFormat::Csv => format_records_csv(result),
        OutputFormat::Text => Ok(render_summary(result)),
    }
}

fn format_records_csv(result: &ProcessingResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["ticket_number", "amount", "date", "page"])?;
    for record in result.records() {
        wtr.write_record([
            record.ticket_number.clone(),
            record.amount.to_string(),
            record.date.clone().unwrap_or_default(),
            (record.page_index + 1).to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
