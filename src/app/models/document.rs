//! The parse result: an ordered collection of plates
//!
//! A document starts with one empty plate; the dispatcher opens a new one
//! whenever a block collides with data already on the current plate.
//! Non-fatal oddities the parser works around (ignored synthetic columns,
//! discarded placeholder reads, truncated trailing rows) are recorded as
//! diagnostics for the caller to inspect.

use std::fmt;
use std::ops::Index;

use serde::Serialize;
use tracing::warn;

use super::plate::Plate;

/// A non-fatal oddity encountered and worked around while parsing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Diagnostic {
    /// A synthetic aggregate column (Mean, StDev, ...) was skipped instead
    /// of becoming a channel
    IgnoredSyntheticColumn { name: String },
    /// A zero-valued read at time 0 was consumed and discarded
    DiscardedPlaceholderRead { channel: String },
    /// A trailing zero-time row/column truncated a kinetic series
    TruncatedTrailingZeroTime { channel: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::IgnoredSyntheticColumn { name } => {
                write!(f, "ignored synthetic aggregate column '{name}'")
            }
            Diagnostic::DiscardedPlaceholderRead { channel } => {
                write!(f, "discarded zero-valued placeholder read on '{channel}'")
            }
            Diagnostic::TruncatedTrailingZeroTime { channel } => {
                write!(f, "truncated trailing zero-time entry on '{channel}'")
            }
        }
    }
}

/// Ordered sequence of plates parsed from one export file
#[derive(Debug, Clone)]
pub struct Document {
    plates: Vec<Plate>,
    diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// A new document holding one empty plate
    pub fn new() -> Self {
        Self {
            plates: vec![Plate::new()],
            diagnostics: Vec::new(),
        }
    }

    /// All plates, in file order
    pub fn plates(&self) -> &[Plate] {
        &self.plates
    }

    /// Number of plates
    pub fn len(&self) -> usize {
        self.plates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }

    /// Diagnostics recorded while parsing, in emission order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The plate currently being populated
    pub(crate) fn current(&self) -> &Plate {
        self.plates.last().expect("document always holds a plate")
    }

    pub(crate) fn current_mut(&mut self) -> &mut Plate {
        self.plates
            .last_mut()
            .expect("document always holds a plate")
    }

    /// Open a new plate in response to a duplicate-data signal
    pub(crate) fn start_plate(&mut self) {
        self.plates.push(Plate::new());
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for Document {
    type Output = Plate;

    fn index(&self, index: usize) -> &Plate {
        &self.plates[index]
    }
}
