//! Synergy Parser Library
//!
//! A Rust library for parsing the flat-text export files produced by BioTek
//! Synergy microplate readers into a structured in-memory document.
//!
//! Export files mix a firmware-dependent sequence of block types (metadata,
//! kinetic time-series tables in several orientations, aggregated result
//! tables, plate layouts, gain tables, spectra) with no leading marker
//! distinguishing them other than their internal shape. This library provides:
//! - A speculative, all-or-nothing multi-grammar dispatcher over a
//!   transactional line cursor
//! - A well/channel/time-series data model with ordering and consistency
//!   invariants
//! - Automatic splitting of a file into several plates when repeated
//!   metadata signals a new physical plate
//! - Sentinel-tolerant token parsing (`?????`, `OVRFLW`, `<x` censoring)
//!
//! # Example
//!
//! ```no_run
//! use synergy_parser::{ParseConfig, parse_file};
//!
//! # fn main() -> synergy_parser::Result<()> {
//! let document = parse_file("export.txt", &ParseConfig::default())?;
//! for plate in document.plates() {
//!     println!("{} channels, {} wells", plate.channels().len(),
//!              plate.rows().len() * plate.cols().len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod block_parser;
    }
    pub mod adapters {
        pub mod filesystem;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    Diagnostic, Document, Layout, MetaValue, Plate, PlateQuery, QueryResult, ResultCollection,
    SampleId, Value,
};
pub use app::services::block_parser::{parse_file, parse_str};
pub use config::ParseConfig;

/// Result type alias for the Synergy parser
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Synergy export parsing
///
/// Grammar mismatches and duplicate-data signals never surface here; they
/// are absorbed by the dispatcher (next grammar, or new plate). Only
/// terminal conditions reach the caller.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// No grammar recognizes the remaining content
    #[error("Unrecognized block at line {line}: '{snippet}'")]
    UnrecognizedBlock { line: usize, snippet: String },

    /// A structurally accepted block violated a data-model invariant,
    /// meaning the chosen grammar matched spuriously
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    /// A lookup against the parsed document could not be resolved
    #[error("Query error: {message}")]
    Query { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an unrecognized-block error
    pub fn unrecognized_block(line: usize, snippet: impl Into<String>) -> Self {
        Self::UnrecognizedBlock {
            line,
            snippet: snippet.into(),
        }
    }

    /// Create an invariant-violation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create a query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
