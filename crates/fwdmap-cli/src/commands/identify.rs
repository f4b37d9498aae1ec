//! Identify command - detect the issuing forwarder of a document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use fwdmap_core::models::UnidentifiedReason;
use fwdmap_core::{ForwarderMatcher, IdentificationResult};

/// Arguments for the identify command.
#[derive(Args)]
pub struct IdentifyArgs {
    /// OCR text file
    #[arg(required = true)]
    input: PathBuf,

    /// JSON file with forwarder patterns (default: built-in set)
    #[arg(short, long)]
    patterns: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub fn run(args: IdentifyArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = fs::read_to_string(&args.input)?;
    let patterns = super::load_patterns(args.patterns.as_deref())?;
    let matcher = ForwarderMatcher::new(patterns);

    info!("Identifying forwarder in {} characters of text", text.len());

    let result = matcher.identify(&text);

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => format_text(&result),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            println!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn format_text(result: &IdentificationResult) -> String {
    // Threshold-based routing is the caller's job; the core only publishes
    // the thresholds.
    let status = result.status();

    let mut output = String::new();
    output.push_str(&format!("Status:     {status}\n"));
    output.push_str(&format!(
        "Forwarder:  {}\n",
        result.forwarder_name.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "Code:       {}\n",
        result.forwarder_code.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("Confidence: {:.1}\n", result.confidence));

    if let Some(reason) = result.reason {
        let label = match reason {
            UnidentifiedReason::EmptyText => "empty_text",
            UnidentifiedReason::NoMatch => "no_match",
        };
        output.push_str(&format!("Reason:     {label}\n"));
    }

    if !result.matched_patterns.is_empty() {
        output.push_str("\nMatched patterns:\n");
        for tag in &result.matched_patterns {
            output.push_str(&format!("  - {tag}\n"));
        }
    }

    output
}
