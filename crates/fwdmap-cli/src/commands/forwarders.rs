//! Forwarders command - list configured forwarder patterns.

use std::path::PathBuf;

use clap::Args;
use console::style;

/// Arguments for the forwarders command.
#[derive(Args)]
pub struct ForwardersArgs {
    /// JSON file with forwarder patterns (default: built-in set)
    #[arg(short, long)]
    patterns: Option<PathBuf>,

    /// Print as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub fn run(args: ForwardersArgs) -> anyhow::Result<()> {
    let patterns = super::load_patterns(args.patterns.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&patterns)?);
        return Ok(());
    }

    println!(
        "{:<10} {:<35} {:>8}  {}",
        style("CODE").bold(),
        style("NAME").bold(),
        style("PRIORITY").bold(),
        style("SIGNALS").bold()
    );

    for p in &patterns {
        let signals = format!(
            "{} names, {} keywords, {} formats",
            p.names.len(),
            p.keywords.len(),
            p.formats.len()
        );
        println!("{:<10} {:<35} {:>8}  {}", p.code, p.display_name, p.priority, signals);
    }

    println!("\n{} {} forwarders configured", style("ℹ").blue(), patterns.len());

    Ok(())
}
