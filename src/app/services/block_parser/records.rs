//! Parsed block records and their application to the current plate
//!
//! A grammar never mutates a plate while it is still reading lines; it
//! produces a [`BlockRecords`] value describing everything the block
//! contains. [`BlockRecords::apply`] first checks the records against the
//! plate for collisions and only then mutates, so a duplicate-data signal
//! leaves the plate untouched and the dispatcher can replay the same
//! content against a fresh plate.

use crate::app::models::{Diagnostic, Document, Layout, ModelError, Value};

/// Failure while applying an accepted block
#[derive(Debug)]
pub(crate) enum ApplyError {
    /// The block collides with existing plate data; recovered by starting
    /// a new plate and replaying the content
    Duplicate(String),
    /// The chosen grammar matched spuriously; terminal
    Invariant(String),
}

impl From<ModelError> for ApplyError {
    fn from(error: ModelError) -> Self {
        if error.is_duplicate() {
            ApplyError::Duplicate(error.to_string())
        } else {
            ApplyError::Invariant(error.to_string())
        }
    }
}

/// One kinetic or spectrum table: a shared axis with per-well series
///
/// `values` is indexed `[well][axis position]`; the axis doubles as the
/// wavelength axis for spectrum blocks.
#[derive(Debug, PartialEq)]
pub(crate) struct TimeSeriesBlock {
    pub channel: String,
    pub times: Vec<f64>,
    pub temperatures: Option<Vec<f64>>,
    pub wells: Vec<(String, usize)>,
    pub values: Vec<Vec<f64>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// One entry of an aggregated result table
#[derive(Debug, PartialEq)]
pub(crate) struct ResultEntry {
    pub table: String,
    pub row: String,
    pub col: usize,
    pub channel: String,
    pub value: f64,
}

/// One entry of a single-measurement table
#[derive(Debug, PartialEq)]
pub(crate) struct SingleEntry {
    pub row: String,
    pub col: usize,
    pub channel: String,
    pub value: f64,
}

/// Everything one successfully parsed block wants to record
#[derive(Debug, PartialEq)]
pub(crate) enum BlockRecords {
    /// Key/value metadata lines, applied as one all-or-nothing batch
    Metadata(Vec<(String, String)>),
    /// A verbatim free-text block stored under one metadata key
    FreeText { key: String, text: String },
    /// Detector gains per channel
    Gains(Vec<(String, f64)>),
    /// The plate layout
    Layout(Layout),
    /// A kinetic or spectrum table
    TimeSeries(TimeSeriesBlock),
    /// Aggregated result table entries
    Results {
        entries: Vec<ResultEntry>,
        diagnostics: Vec<Diagnostic>,
    },
    /// Single-measurement table entries
    Single {
        entries: Vec<SingleEntry>,
        diagnostics: Vec<Diagnostic>,
    },
    /// A structurally valid block that carries nothing worth keeping
    /// (e.g. a zero-valued placeholder read)
    Ignored(Vec<Diagnostic>),
}

impl BlockRecords {
    /// Apply this block to the document's current plate
    ///
    /// Duplicate detection happens before any mutation; once mutation has
    /// begun, the only possible failures are invariant violations, which
    /// abort the whole parse.
    pub(crate) fn apply(self, document: &mut Document) -> Result<(), ApplyError> {
        match self {
            BlockRecords::Metadata(pairs) => {
                document.current_mut().add_metadata(pairs)?;
                Ok(())
            }
            BlockRecords::FreeText { key, text } => {
                document.current_mut().add_metadata(vec![(key, text)])?;
                Ok(())
            }
            BlockRecords::Gains(gains) => {
                let plate = document.current();
                if let Some((channel, _)) =
                    gains.iter().find(|(channel, _)| plate.gain(channel).is_some())
                {
                    return Err(ApplyError::Duplicate(format!(
                        "gain for channel '{channel}' already present"
                    )));
                }
                let plate = document.current_mut();
                for (channel, gain) in gains {
                    plate.add_gain(&channel, gain)?;
                }
                Ok(())
            }
            BlockRecords::Layout(layout) => {
                document.current_mut().attach_layout(layout)?;
                Ok(())
            }
            BlockRecords::TimeSeries(block) => {
                let plate = document.current();
                let axis = plate.times(&block.channel);
                if let (Some(&last), Some(&first)) = (axis.last(), block.times.first()) {
                    // a restarted time axis means a new physical plate
                    if first <= last {
                        return Err(ApplyError::Duplicate(format!(
                            "time axis for channel '{}' restarts at {first} after {last}",
                            block.channel
                        )));
                    }
                }
                let plate = document.current_mut();
                for (index, &time) in block.times.iter().enumerate() {
                    match &block.temperatures {
                        Some(temperatures) => {
                            plate.add_temperature(&block.channel, time, temperatures[index])?
                        }
                        None => plate.add_time(&block.channel, time)?,
                    }
                    for (well, series) in block.wells.iter().zip(&block.values) {
                        let (row, col) = well;
                        plate.add_kinetic_value(&block.channel, row, *col, time, series[index])?;
                    }
                }
                for diagnostic in block.diagnostics {
                    document.push_diagnostic(diagnostic);
                }
                Ok(())
            }
            BlockRecords::Results {
                entries,
                diagnostics,
            } => {
                let plate = document.current();
                if let Some(entry) = entries.iter().find(|entry| {
                    plate.result_contains(&entry.table, &entry.row, entry.col, &entry.channel)
                }) {
                    return Err(ApplyError::Duplicate(format!(
                        "result '{}' for {}{} [{}] already present",
                        entry.table, entry.row, entry.col, entry.channel
                    )));
                }
                let plate = document.current_mut();
                for entry in entries {
                    plate.set_result(
                        &entry.table,
                        &entry.row,
                        entry.col,
                        &entry.channel,
                        Value::Single(entry.value),
                    )?;
                }
                for diagnostic in diagnostics {
                    document.push_diagnostic(diagnostic);
                }
                Ok(())
            }
            BlockRecords::Single {
                entries,
                diagnostics,
            } => {
                let plate = document.current();
                if let Some(entry) = entries
                    .iter()
                    .find(|entry| plate.raw().contains(&entry.row, entry.col, &entry.channel))
                {
                    return Err(ApplyError::Duplicate(format!(
                        "value for {}{} [{}] already present",
                        entry.row, entry.col, entry.channel
                    )));
                }
                let plate = document.current_mut();
                for entry in entries {
                    plate.set_raw(&entry.row, entry.col, &entry.channel, entry.value)?;
                }
                for diagnostic in diagnostics {
                    document.push_diagnostic(diagnostic);
                }
                Ok(())
            }
            BlockRecords::Ignored(diagnostics) => {
                for diagnostic in diagnostics {
                    document.push_diagnostic(diagnostic);
                }
                Ok(())
            }
        }
    }
}
