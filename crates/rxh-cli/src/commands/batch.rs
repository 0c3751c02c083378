//! Batch processing command for multiple RxH documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use rxh_core::{DocumentExtractor, InvoiceRecord, RxhExtractor};

use crate::output::{
    format_record, summary_error_row, summary_header, summary_row, OutputFormat,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

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

/// Result of processing a single file.
struct ProcessResult {
    index: usize,
    path: PathBuf,
    record: Option<InvoiceRecord>,
    error: Option<FileError>,
    processing_time_ms: u64,
}

struct FileError {
    kind: String,
    message: String,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("xml")
        })
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

    // Extraction is pure and synchronous, so each file runs on the blocking pool
    let extractor = Arc::new(RxhExtractor::with_config(config.extraction.clone()));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    let mut results = Vec::new();
    for (index, path) in files.into_iter().enumerate() {
        // Collect finished files while waiting for a worker so a failure stops spawning
        let permit = loop {
            tokio::select! {
                biased;
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    collect_result(&mut results, joined?, args.continue_on_error, &overall_pb)?;
                }
                permit = Arc::clone(&semaphore).acquire_owned() => break permit?,
            }
        };
        let extractor = Arc::clone(&extractor);
        tasks.spawn_blocking(move || {
            let _permit = permit;
            process_single_file(index, path, extractor.as_ref())
        });
    }

    while let Some(joined) = tasks.join_next().await {
        collect_result(&mut results, joined?, args.continue_on_error, &overall_pb)?;
    }
    results.sort_by_key(|r| r.index);

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            let Some(record) = &result.record else { continue };
            let output_name = result.path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("receipt");

            let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));
            let content = format_record(record, args.format, config.output.pretty_json)?;

            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args.output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

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

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Some(err) = &result.error {
                println!("  - {}: {}", result.path.display(), err.message);
            }
        }
    }

    Ok(())
}

/// Record a finished file, or fail the batch unless errors are tolerated.
fn collect_result(
    results: &mut Vec<ProcessResult>,
    result: ProcessResult,
    continue_on_error: bool,
    progress: &ProgressBar,
) -> anyhow::Result<()> {
    progress.inc(1);

    if let Some(err) = &result.error {
        if continue_on_error {
            warn!("Failed to process {}: {}", result.path.display(), err.message);
        } else {
            error!("Failed to process {}: {}", result.path.display(), err.message);
            progress.abandon();
            anyhow::bail!("Processing failed for {}: {}", result.path.display(), err.message);
        }
    }
    results.push(result);
    Ok(())
}

fn process_single_file(index: usize, path: PathBuf, extractor: &RxhExtractor) -> ProcessResult {
    let file_start = Instant::now();

    let outcome = match fs::read(&path) {
        Ok(data) => extractor.extract(&data).map_err(|e| FileError {
            kind: format!("{:?}", e.kind()),
            message: e.to_string(),
        }),
        Err(e) => Err(FileError {
            kind: "Io".to_string(),
            message: e.to_string(),
        }),
    };

    let processing_time_ms = file_start.elapsed().as_millis() as u64;
    let (record, error) = match outcome {
        Ok(record) => (Some(record), None),
        Err(err) => (None, Some(err)),
    };

    ProcessResult {
        index,
        path,
        record,
        error,
        processing_time_ms,
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = summary_header();
    header.push("processing_time_ms");
    wtr.write_record(&header)?;

    for result in results {
        let filename = result.path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time_ms = result.processing_time_ms.to_string();

        let mut row = match (&result.record, &result.error) {
            (Some(record), _) => summary_row(filename, record),
            (None, Some(err)) => summary_error_row(filename, &err.kind, &err.message),
            (None, None) => summary_error_row(filename, "", "unknown error"),
        };
        row.push(&time_ms);
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(index: usize) -> ProcessResult {
        ProcessResult {
            index,
            path: PathBuf::from(format!("{}.xml", index)),
            record: None,
            error: Some(FileError {
                kind: "InvalidXml".to_string(),
                message: "The xml content is not valid: unexpected end".to_string(),
            }),
            processing_time_ms: 0,
        }
    }

    #[test]
    fn test_collect_result_stops_on_first_failure() {
        let mut results = Vec::new();
        let progress = ProgressBar::hidden();

        let err = collect_result(&mut results, failed(0), false, &progress).unwrap_err();
        assert!(err.to_string().starts_with("Processing failed for 0.xml"));
        assert!(results.is_empty());
    }

    #[test]
    fn test_collect_result_keeps_failures_when_tolerated() {
        let mut results = Vec::new();
        let progress = ProgressBar::hidden();

        collect_result(&mut results, failed(0), true, &progress).unwrap();
        collect_result(&mut results, failed(1), true, &progress).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(progress.position(), 2);
    }
}
