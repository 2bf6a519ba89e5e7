//! Command implementations for the Synergy parser CLI
//!
//! Contains the command execution logic, logging setup, and terminal
//! reporting for the CLI interface.

use crate::cli::args::{Args, Commands, ParseArgs, ScanArgs};
use crate::config::ParseConfig;
use crate::{Document, MetaValue, Plate, Result, parse_file};
use anyhow::Context;
use colored::Colorize;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Main command runner
pub fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Some(Commands::Parse(parse_args)) => {
            let file = parse_args.file.clone();
            run_parse(parse_args).with_context(|| format!("while parsing {}", file.display()))
        }
        Some(Commands::Scan(scan_args)) => {
            let dir = scan_args.directory.clone();
            run_scan(scan_args).with_context(|| format!("while scanning {}", dir.display()))
        }
        None => unreachable!("main shows help when no subcommand is given"),
    }
}

// ============================================================================
// parse command
// ============================================================================

fn run_parse(args: ParseArgs) -> Result<()> {
    setup_logging(args.verbose);
    args.validate()?;

    let config = ParseConfig::default()
        .with_separator(args.separator)
        .with_encoding(&args.encoding);
    debug!(?config, "parse configuration");

    let document = parse_file(&args.file, &config)?;
    report_document(&args.file, &document, args.details);
    Ok(())
}

fn report_document(path: &Path, document: &Document, details: bool) {
    println!(
        "{} {} ({} plate{})",
        "Parsed".green().bold(),
        path.display(),
        document.len(),
        if document.len() == 1 { "" } else { "s" }
    );

    for (index, plate) in document.plates().iter().enumerate() {
        println!();
        println!("{}", format!("Plate {}", index + 1).bold());
        println!(
            "  wells:    {} rows x {} cols",
            plate.rows().len(),
            plate.cols().len()
        );
        println!("  channels: {}", plate.channels().join(", "));
        for channel in plate.channels() {
            let times = plate.times(channel);
            if times.len() > 1 {
                println!(
                    "  {channel}: {} reads, {:.0}s to {:.0}s",
                    times.len(),
                    times.first().copied().unwrap_or(0.0),
                    times.last().copied().unwrap_or(0.0)
                );
            }
        }
        if let Some((min, max)) = plate.temperature_range() {
            println!("  temperature: {min:.1} to {max:.1}");
        }
        if !plate.result_names().is_empty() {
            println!("  results:  {}", plate.result_names().join(", "));
        }
        if details {
            report_metadata(plate);
        }
    }

    if !document.diagnostics().is_empty() {
        println!();
        println!("{}", "Diagnostics".yellow().bold());
        for diagnostic in document.diagnostics() {
            println!("  {diagnostic}");
        }
    }
}

fn report_metadata(plate: &Plate) {
    let mut keys: Vec<&String> = plate.metadata_keys().collect();
    keys.sort();
    if keys.is_empty() {
        return;
    }
    println!("  metadata:");
    for key in keys {
        match plate.metadata(key) {
            Some(MetaValue::Text(text)) if text.contains('\n') => {
                println!("    {key}: ({} lines)", text.lines().count())
            }
            Some(value) => println!("    {key}: {value}"),
            None => {}
        }
    }
}

// ============================================================================
// scan command
// ============================================================================

fn run_scan(args: ScanArgs) -> Result<()> {
    setup_logging(args.verbose);
    args.validate()?;

    let config = ParseConfig::default()
        .with_separator(args.separator)
        .with_encoding(&args.encoding);

    let mut parsed = 0usize;
    let mut failed = 0usize;
    for entry in WalkDir::new(&args.directory)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(args.extension.as_str()) {
            continue;
        }
        match parse_file(path, &config) {
            Ok(document) => {
                parsed += 1;
                println!(
                    "{} {} ({} plate{}, {} channel{})",
                    "ok".green(),
                    path.display(),
                    document.len(),
                    if document.len() == 1 { "" } else { "s" },
                    document[0].channels().len(),
                    if document[0].channels().len() == 1 { "" } else { "s" },
                );
            }
            Err(error) => {
                failed += 1;
                warn!(path = %path.display(), %error, "file did not parse");
                println!("{} {} ({error})", "failed".red(), path.display());
            }
        }
    }

    println!();
    println!(
        "{} {parsed} parsed, {failed} failed",
        "Scan complete:".bold()
    );
    info!(parsed, failed, "scan finished");
    Ok(())
}

// ============================================================================
// Logging
// ============================================================================

/// Set up structured logging based on CLI flags
fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("synergy_parser={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .ok();
}
