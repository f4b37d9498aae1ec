//! Batch processing command for multiple OCR text files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use fwdmap_core::{FieldMapper, ForwarderMatcher, IdentificationResult, MappingOutcome};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// JSON file with forwarder patterns (default: built-in set)
    #[arg(short, long)]
    patterns: Option<PathBuf>,

    /// JSON file with mapping rules (default: universal rule set)
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Output directory for per-file JSON reports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    identification: Option<IdentificationResult>,
    mapping: Option<MappingOutcome>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs) -> anyhow::Result<()> {
    let start = Instant::now();

    let patterns = super::load_patterns(args.patterns.as_deref())?;
    let rules = super::load_rules(args.rules.as_deref())?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
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

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let matcher = ForwarderMatcher::new(patterns);
    let mapper = FieldMapper::new();

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();

        match process_single_file(&path, &matcher, &mapper, &rules) {
            Ok((identification, mapping)) => {
                results.push(ProcessResult {
                    path,
                    identification: Some(identification),
                    mapping: Some(mapping),
                    error: None,
                    processing_time_ms: file_start.elapsed().as_millis() as u64,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        identification: None,
                        mapping: None,
                        error: Some(error_msg),
                        processing_time_ms: file_start.elapsed().as_millis() as u64,
                    });
                } else {
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    // Write per-file reports
    if let Some(ref output_dir) = args.output_dir {
        for result in results.iter().filter(|r| r.error.is_none()) {
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document");
            let output_path = output_dir.join(format!("{output_name}.json"));

            let report = serde_json::json!({
                "identification": result.identification,
                "mapping": result.mapping,
            });
            fs::write(&output_path, serde_json::to_string_pretty(&report)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
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

    let successful: Vec<_> = results.iter().filter(|r| r.error.is_none()).collect();
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

fn process_single_file(
    path: &PathBuf,
    matcher: &ForwarderMatcher,
    mapper: &FieldMapper,
    rules: &[fwdmap_core::MappingRule],
) -> anyhow::Result<(IdentificationResult, MappingOutcome)> {
    let text = fs::read_to_string(path)?;

    let identification = matcher.identify(&text);
    let forwarder_id = if identification.is_identified {
        identification.forwarder_id.as_deref()
    } else {
        None
    };

    let mapping = mapper.map_fields(&text, rules, None, forwarder_id);

    Ok((identification, mapping))
}

fn write_summary(path: &PathBuf, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "forwarder_code",
        "confidence",
        "mapped_fields",
        "total_fields",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match (&result.identification, &result.mapping) {
            (Some(identification), Some(mapping)) => {
                wtr.write_record([
                    filename,
                    &identification.status().to_string(),
                    identification.forwarder_code.as_deref().unwrap_or(""),
                    &format!("{:.1}", identification.confidence),
                    &mapping.statistics.mapped_fields.to_string(),
                    &mapping.statistics.total_fields.to_string(),
                    &result.processing_time_ms.to_string(),
                    "",
                ])?;
            }
            _ => {
                wtr.write_record([
                    filename,
                    "ERROR",
                    "",
                    "",
                    "",
                    "",
                    &result.processing_time_ms.to_string(),
                    result.error.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
