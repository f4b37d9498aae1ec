//! Map command - extract fields from a single OCR text file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use fwdmap_core::models::ConfidenceSource;
use fwdmap_core::{FieldMapper, MappingOutcome};

/// Arguments for the map command.
#[derive(Args)]
pub struct MapArgs {
    /// OCR text file
    #[arg(required = true)]
    input: PathBuf,

    /// JSON file with mapping rules (default: universal rule set)
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// JSON file with structured OCR output (field bag)
    #[arg(short, long)]
    structured: Option<PathBuf>,

    /// Forwarder id the rules were selected for
    #[arg(long)]
    forwarder: Option<String>,

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
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: MapArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = fs::read_to_string(&args.input)?;
    let rules = super::load_rules(args.rules.as_deref())?;
    let structured = super::load_structured(args.structured.as_deref())?;

    info!(
        "Mapping {} rules over {} characters of text",
        rules.len(),
        text.len()
    );

    let mapper = FieldMapper::new();
    let outcome = mapper.map_fields(
        &text,
        &rules,
        structured.as_ref(),
        args.forwarder.as_deref(),
    );

    let rendered = format_outcome(&outcome, args.format)?;

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

pub fn format_outcome(outcome: &MappingOutcome, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Csv => format_csv(outcome),
        OutputFormat::Text => Ok(format_text(outcome)),
    }
}

fn format_csv(outcome: &MappingOutcome) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field", "value", "raw_value", "confidence", "source", "validated"])?;

    for (field, result) in &outcome.field_mappings {
        wtr.write_record([
            field.as_str(),
            &result.value,
            &result.raw_value,
            &format!("{:.1}", result.confidence),
            source_label(result.source),
            &result.is_validated.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn source_label(source: ConfidenceSource) -> &'static str {
    match source {
        ConfidenceSource::Tier1 => "tier1",
        ConfidenceSource::Tier2 => "tier2",
        ConfidenceSource::Tier3 => "tier3",
        ConfidenceSource::Azure => "azure",
    }
}

fn format_text(outcome: &MappingOutcome) -> String {
    let mut output = String::new();

    output.push_str("Mapped fields:\n");
    for (field, result) in &outcome.field_mappings {
        let marker = if result.is_validated { " " } else { "!" };
        output.push_str(&format!(
            "  {marker} {field}: {} ({:.0}%)\n",
            result.value, result.confidence
        ));
    }

    if !outcome.unmapped_fields.is_empty() {
        output.push_str("\nUnmapped fields:\n");
        for (field, detail) in &outcome.unmapped_fields {
            output.push_str(&format!(
                "  - {field} ({} rules tried)\n",
                detail.attempts.len()
            ));
        }
    }

    let stats = &outcome.statistics;
    output.push_str(&format!(
        "\n{}/{} fields mapped, average confidence {:.2}, {}ms\n",
        stats.mapped_fields, stats.total_fields, stats.average_confidence, stats.processing_time_ms
    ));

    output
}
