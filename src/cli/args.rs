//! Command-line argument definitions for the Synergy parser
//!
//! Defines the complete CLI interface using the clap derive API.

use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the Synergy export parser
///
/// Parses BioTek Synergy microplate reader text exports into a structured
/// view: plates, channels, time series, aggregated results, and metadata.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "synergy_parser",
    version,
    about = "Parse BioTek Synergy microplate reader text exports",
    long_about = "Parses the flat-text export files produced by BioTek Synergy microplate \
                  readers. Block types are auto-detected from their shape; repeated \
                  metadata splits a file into multiple plates. Prints a per-plate summary \
                  of channels, wells, results, and metadata."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse a single export file and print a summary
    Parse(ParseArgs),
    /// Scan a directory tree and parse every export file found
    Scan(ScanArgs),
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// Path to the export file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field separator character used inside the file
    #[arg(short, long, default_value = "\t", value_name = "CHAR")]
    pub separator: char,

    /// Encoding of the file bytes (iso-8859-1 or windows-1252)
    #[arg(short, long, default_value = "iso-8859-1", value_name = "LABEL")]
    pub encoding: String,

    /// Print per-plate metadata and result tables in full
    #[arg(long)]
    pub details: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the scan command
#[derive(Debug, Clone, Parser)]
pub struct ScanArgs {
    /// Directory to scan recursively
    #[arg(value_name = "DIR")]
    pub directory: PathBuf,

    /// File extension to treat as an export
    #[arg(long, default_value = "txt", value_name = "EXT")]
    pub extension: String,

    /// Field separator character used inside the files
    #[arg(short, long, default_value = "\t", value_name = "CHAR")]
    pub separator: char,

    /// Encoding of the file bytes (iso-8859-1 or windows-1252)
    #[arg(short, long, default_value = "iso-8859-1", value_name = "LABEL")]
    pub encoding: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ParseArgs {
    /// Validate argument consistency before running
    pub fn validate(&self) -> Result<()> {
        if !self.file.exists() {
            return Err(Error::configuration(format!(
                "Input file does not exist: {}",
                self.file.display()
            )));
        }
        Ok(())
    }
}

impl ScanArgs {
    /// Validate argument consistency before running
    pub fn validate(&self) -> Result<()> {
        if !self.directory.is_dir() {
            return Err(Error::configuration(format!(
                "Scan target is not a directory: {}",
                self.directory.display()
            )));
        }
        Ok(())
    }
}
