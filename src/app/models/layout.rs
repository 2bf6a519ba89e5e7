//! Plate layout: well to sample-id assignments
//!
//! A layout block assigns user-defined sample ids (a bare label, or a label
//! with a concentration) to wells. The reverse label-to-wells index makes
//! sample-id lookups resolve to every well carrying the label. A layout is
//! read-only once attached to a plate.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// A user-defined sample assignment for one well
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleId {
    /// Letters-plus-digits label, e.g. `SPL8` or `STD1`
    pub label: String,
    /// Concentration or dilution, when the layout carries one
    pub concentration: Option<f64>,
}

impl SampleId {
    pub fn new(label: impl Into<String>, concentration: Option<f64>) -> Self {
        Self {
            label: label.into(),
            concentration,
        }
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.concentration {
            Some(concentration) => write!(f, "{} ({})", self.label, concentration),
            None => write!(f, "{}", self.label),
        }
    }
}

/// Well to sample-id assignment table with its reverse index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    assignments: HashMap<(String, usize), SampleId>,
    by_label: HashMap<String, Vec<(String, usize)>>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one assignment; wells keep file order in the reverse index
    pub(crate) fn assign(&mut self, row: &str, col: usize, sample: SampleId) {
        self.by_label
            .entry(sample.label.clone())
            .or_default()
            .push((row.to_string(), col));
        self.assignments.insert((row.to_string(), col), sample);
    }

    /// The sample id assigned to a well, if any
    pub fn sample_id(&self, row: &str, col: usize) -> Option<&SampleId> {
        self.assignments.get(&(row.to_string(), col))
    }

    /// Every well carrying a label, in layout file order
    ///
    /// A label used with several concentrations resolves to the union of
    /// its wells.
    pub fn wells_for_label(&self, label: &str) -> &[(String, usize)] {
        self.by_label.get(label).map_or(&[], Vec::as_slice)
    }

    /// Number of assigned wells
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
