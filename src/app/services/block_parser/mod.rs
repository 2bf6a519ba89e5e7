//! Format-auto-detecting block parser for Synergy exports
//!
//! Export files are a sequence of blank-line-separated blocks whose type is
//! only recognizable from their internal shape. The parser tries a fixed
//! priority list of block grammars against a transactional line cursor:
//! each attempt either consumes a whole block and commits its records to
//! the current plate, or leaves the cursor untouched for the next grammar.
//!
//! ## Architecture
//!
//! - [`line_buffer`] - Transactional line cursor (attempt/commit/rollback)
//! - [`tokens`] - Sentinel-tolerant numeric and time token parsers
//! - [`identifiers`] - Well name, row label, channel, and sample-id resolvers
//! - [`records`] - Parsed block records and their all-or-nothing application
//! - [`grammars`] - One parser per block family
//! - [`dispatcher`] - The priority-ordered main loop
//!
//! ## Usage
//!
//! ```no_run
//! use synergy_parser::{ParseConfig, parse_file};
//!
//! # fn example() -> synergy_parser::Result<()> {
//! let document = parse_file("export.txt", &ParseConfig::default())?;
//! println!("{} plate(s)", document.len());
//! # Ok(())
//! # }
//! ```

pub mod identifiers;
pub mod line_buffer;
pub mod tokens;

pub(crate) mod dispatcher;
pub(crate) mod grammars;
pub(crate) mod records;

#[cfg(test)]
pub mod tests;

// Re-export main entry points
pub use dispatcher::{parse_file, parse_str};
pub use line_buffer::{LineBuffer, Transaction};

/// Grammar-level rejection: the content at the cursor does not have the
/// attempted shape
///
/// Token and identifier failures escalate to this and are absorbed by the
/// dispatcher, which simply tries the next grammar. A `Mismatch` never
/// reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch;

/// Result of a single token or grammar attempt
pub type Attempt<T> = std::result::Result<T, Mismatch>;
