//! Data models for parsed Synergy exports
//!
//! This module contains the structures the parsing engine populates: the
//! ordered [`Document`] of plates, the per-plate [`Plate`] aggregate, the
//! generic well/channel [`ResultCollection`], and the well-to-sample
//! [`Layout`]. Once a file is fully parsed these structures are immutable;
//! all mutators are crate-private and only reachable from the dispatcher.

pub mod document;
pub mod layout;
pub mod plate;
pub mod results;

pub use document::{Diagnostic, Document};
pub use layout::{Layout, SampleId};
pub use plate::{MetaValue, Plate};
pub use results::{PlateQuery, QueryResult, ResultCollection, Value};

/// Data-model mutation failures
///
/// `Duplicate` is the recoverable plate-boundary signal; everything else
/// indicates that a structurally accepted block violated an invariant and
/// is escalated to a fatal parse error by the dispatcher.
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    /// The key or value being added already exists on this plate
    #[error("duplicate data: {0}")]
    Duplicate(String),

    /// A timestamp moved backwards on a channel's time axis
    #[error("non-monotonic time on channel '{channel}': {time} after {last}")]
    NonMonotonicTime {
        channel: String,
        time: f64,
        last: f64,
    },

    /// A newly seen row label does not extend the canonical row order
    #[error("row '{row}' breaks canonical row order (maximum so far '{last}')")]
    RowOrder { row: String, last: String },

    /// A newly seen column does not extend the ascending column order
    #[error("column {col} breaks ascending column order (maximum so far {last})")]
    ColumnOrder { col: usize, last: usize },

    /// A per-well series diverged from its channel's time-axis length
    #[error("series length for {key} diverged from time axis (expected {expected})")]
    LengthMismatch { key: String, expected: usize },

    /// A single-measurement value and a time series landed on the same key
    #[error("well {key} holds both a single value and a series")]
    ShapeConflict { key: String },

    /// A synthetic aggregate column name was about to become a channel
    #[error("synthetic aggregate '{0}' cannot become a channel")]
    SyntheticChannel(String),
}

impl ModelError {
    /// Whether this failure signals a plate boundary rather than corruption
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ModelError::Duplicate(_))
    }
}
