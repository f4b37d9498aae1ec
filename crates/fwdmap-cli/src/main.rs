//! CLI application for forwarder identification and field mapping.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, forwarders, identify, map, run};

/// Identify forwarders and extract invoice fields from OCR text
#[derive(Parser)]
#[command(name = "fwdmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the forwarder that issued a document
    Identify(identify::IdentifyArgs),

    /// Map fields from OCR text using a rule set
    Map(map::MapArgs),

    /// Identify, then map with the winning forwarder
    Run(run::RunArgs),

    /// List the built-in forwarder patterns
    Forwarders(forwarders::ForwardersArgs),

    /// Process multiple OCR text files
    Batch(batch::BatchArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Identify(args) => identify::run(args),
        Commands::Map(args) => map::run(args),
        Commands::Run(args) => run::run(args),
        Commands::Forwarders(args) => forwarders::run(args),
        Commands::Batch(args) => batch::run(args),
    }
}
