//! Run command - identify a document, then map its fields.
//!
//! Composes the two engines the way the service layer would: the winning
//! forwarder id is fed into field mapping so results carry tier2
//! provenance.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use fwdmap_core::{
    FieldMapper, ForwarderMatcher, IdentificationResult, IdentificationStatus, MappingOutcome,
};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// OCR text file
    #[arg(required = true)]
    input: PathBuf,

    /// JSON file with forwarder patterns (default: built-in set)
    #[arg(short, long)]
    patterns: Option<PathBuf>,

    /// JSON file with mapping rules (default: universal rule set)
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// JSON file with structured OCR output (field bag)
    #[arg(short, long)]
    structured: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Combined output of the identify-then-map pipeline.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub status: IdentificationStatus,
    pub identification: IdentificationResult,
    pub mapping: MappingOutcome,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = fs::read_to_string(&args.input)?;
    let patterns = super::load_patterns(args.patterns.as_deref())?;
    let rules = super::load_rules(args.rules.as_deref())?;
    let structured = super::load_structured(args.structured.as_deref())?;

    let matcher = ForwarderMatcher::new(patterns);
    let identification = matcher.identify(&text);
    let status = identification.status();

    // Only an auto-identified forwarder feeds the mapper; a needs-review
    // result is surfaced without committing to its rules.
    let forwarder_id = if identification.is_identified {
        identification.forwarder_id.as_deref()
    } else {
        None
    };

    info!(
        status = %status,
        forwarder = forwarder_id.unwrap_or("-"),
        "running field mapping"
    );

    let mapper = FieldMapper::new();
    let mapping = mapper.map_fields(&text, &rules, structured.as_ref(), forwarder_id);

    let report = PipelineReport {
        status,
        identification,
        mapping,
    };
    let rendered = serde_json::to_string_pretty(&report)?;

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
