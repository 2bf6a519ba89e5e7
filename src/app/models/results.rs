//! Generic (row, column, channel) value container
//!
//! [`ResultCollection`] backs both the raw per-well data of a plate and the
//! named aggregated result sub-tables. It tracks discovered rows, columns,
//! and channels in first-seen order and enforces the canonical ordering
//! invariants on registration.

use std::collections::HashMap;

use super::layout::Layout;
use super::ModelError;
use crate::app::services::block_parser::identifiers::{is_sample_label_string, split_well_name};
use crate::constants::SYNTHETIC_AGGREGATES;
use crate::{Error, Result};

/// One stored measurement: a single value or a time/wavelength series
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Single-measurement files store one value per key
    Single(f64),
    /// Kinetic and spectrum files store an ordered series per key
    Series(Vec<f64>),
}

impl Value {
    /// The single value, if this is not a series
    pub fn as_single(&self) -> Option<f64> {
        match self {
            Value::Single(v) => Some(*v),
            Value::Series(_) => None,
        }
    }

    /// The ordered series, if this is one
    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            Value::Single(_) => None,
            Value::Series(values) => Some(values),
        }
    }
}

/// Normalized lookup index into a plate or result table
///
/// All the accepted index shapes (well string, (row, col) tuples, sample id)
/// normalize into this sum type so resolution happens at a single dispatch
/// point.
#[derive(Debug, Clone, PartialEq)]
pub enum PlateQuery {
    /// A concrete well coordinate, optionally pinned to a channel
    Well {
        row: String,
        col: usize,
        channel: Option<String>,
    },
    /// A layout sample label, optionally pinned to a channel
    Sample {
        label: String,
        channel: Option<String>,
    },
}

impl PlateQuery {
    fn channel(&self) -> Option<&str> {
        match self {
            PlateQuery::Well { channel, .. } | PlateQuery::Sample { channel, .. } => {
                channel.as_deref()
            }
        }
    }

    fn with_channel(self, channel: &str) -> Self {
        match self {
            PlateQuery::Well { row, col, .. } => PlateQuery::Well {
                row,
                col,
                channel: Some(channel.to_string()),
            },
            PlateQuery::Sample { label, .. } => PlateQuery::Sample {
                label,
                channel: Some(channel.to_string()),
            },
        }
    }
}

impl From<&str> for PlateQuery {
    fn from(index: &str) -> Self {
        match split_well_name(index) {
            Ok((row, col)) => PlateQuery::Well {
                row: row.to_string(),
                col,
                channel: None,
            },
            Err(_) => PlateQuery::Sample {
                label: index.to_string(),
                channel: None,
            },
        }
    }
}

impl From<(&str, &str)> for PlateQuery {
    fn from((index, channel): (&str, &str)) -> Self {
        PlateQuery::from(index).with_channel(channel)
    }
}

impl From<(&str, usize)> for PlateQuery {
    fn from((row, col): (&str, usize)) -> Self {
        PlateQuery::Well {
            row: row.to_string(),
            col,
            channel: None,
        }
    }
}

impl From<(&str, usize, &str)> for PlateQuery {
    fn from((row, col, channel): (&str, usize, &str)) -> Self {
        PlateQuery::Well {
            row: row.to_string(),
            col,
            channel: Some(channel.to_string()),
        }
    }
}

/// Outcome of a flexible lookup
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult<'a> {
    /// A well index resolved to one value
    One(&'a Value),
    /// A sample id resolved to every well carrying it
    Many(Vec<&'a Value>),
}

impl<'a> QueryResult<'a> {
    /// The single resolved value, if the index named exactly one well
    pub fn one(&self) -> Option<&'a Value> {
        match self {
            QueryResult::One(value) => Some(value),
            QueryResult::Many(_) => None,
        }
    }
}

/// Mapping from (row, column, channel) to measured values
#[derive(Debug, Clone, Default)]
pub struct ResultCollection {
    data: HashMap<(String, usize, String), Value>,
    rows: Vec<String>,
    cols: Vec<usize>,
    channels: Vec<String>,
}

/// Canonical ordering key for row labels: length first, then lexicographic,
/// so that "Z" < "AA" and "AZ" < "BA"
fn row_key(row: &str) -> (usize, &str) {
    (row.len(), row)
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discovered row labels in first-seen (canonical) order
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Discovered columns in first-seen (ascending) order
    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Discovered channels in first-seen order
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Direct keyed access
    pub fn get(&self, row: &str, col: usize, channel: &str) -> Option<&Value> {
        self.data
            .get(&(row.to_string(), col, channel.to_string()))
    }

    pub fn contains(&self, row: &str, col: usize, channel: &str) -> bool {
        self.get(row, col, channel).is_some()
    }

    /// Register a newly seen row, enforcing the canonical ordering invariant
    fn register_row(&mut self, row: &str) -> std::result::Result<(), ModelError> {
        if self.rows.iter().any(|r| r == row) {
            return Ok(());
        }
        if let Some(last) = self.rows.last() {
            if row_key(row) <= row_key(last) {
                return Err(ModelError::RowOrder {
                    row: row.to_string(),
                    last: last.clone(),
                });
            }
        }
        self.rows.push(row.to_string());
        Ok(())
    }

    /// Register a newly seen column, enforcing ascending order
    fn register_col(&mut self, col: usize) -> std::result::Result<(), ModelError> {
        if self.cols.contains(&col) {
            return Ok(());
        }
        if let Some(&last) = self.cols.last() {
            if col <= last {
                return Err(ModelError::ColumnOrder { col, last });
            }
        }
        self.cols.push(col);
        Ok(())
    }

    /// Register a channel; synthetic aggregate names are rejected
    fn register_channel(&mut self, channel: &str) -> std::result::Result<(), ModelError> {
        if SYNTHETIC_AGGREGATES.contains(&channel) {
            return Err(ModelError::SyntheticChannel(channel.to_string()));
        }
        if !self.channels.iter().any(|c| c == channel) {
            self.channels.push(channel.to_string());
        }
        Ok(())
    }

    fn register(
        &mut self,
        row: &str,
        col: usize,
        channel: &str,
    ) -> std::result::Result<(), ModelError> {
        self.register_channel(channel)?;
        self.register_row(row)?;
        self.register_col(col)?;
        Ok(())
    }

    /// Store a value; an existing key signals duplicate (= repeated plate) data
    pub(crate) fn set(
        &mut self,
        row: &str,
        col: usize,
        channel: &str,
        value: Value,
    ) -> std::result::Result<(), ModelError> {
        if self.contains(row, col, channel) {
            return Err(ModelError::Duplicate(format!(
                "value for {row}{col} [{channel}] already present"
            )));
        }
        self.register(row, col, channel)?;
        self.data
            .insert((row.to_string(), col, channel.to_string()), value);
        Ok(())
    }

    /// Append one sample to a per-well series, keeping it length-locked to
    /// the channel's time axis (`expected_len` = axis length after the
    /// current timestamp was added)
    pub(crate) fn append_series(
        &mut self,
        row: &str,
        col: usize,
        channel: &str,
        value: f64,
        expected_len: usize,
    ) -> std::result::Result<(), ModelError> {
        let key = (row.to_string(), col, channel.to_string());
        let display = format!("{row}{col} [{channel}]");
        match self.data.get_mut(&key) {
            Some(Value::Series(series)) => {
                if series.len() >= expected_len {
                    return Err(ModelError::Duplicate(format!(
                        "series value for {display} already present at this timestamp"
                    )));
                }
                series.push(value);
                if series.len() != expected_len {
                    return Err(ModelError::LengthMismatch {
                        key: display,
                        expected: expected_len,
                    });
                }
                Ok(())
            }
            Some(Value::Single(_)) => Err(ModelError::ShapeConflict { key: display }),
            None => {
                if expected_len != 1 {
                    return Err(ModelError::LengthMismatch {
                        key: display,
                        expected: expected_len,
                    });
                }
                self.register(row, col, channel)?;
                self.data.insert(key, Value::Series(vec![value]));
                Ok(())
            }
        }
    }

    /// Resolve a flexible lookup against this collection
    ///
    /// The channel may be omitted only while exactly one channel is known.
    /// Sample-id lookups need the plate's layout and may resolve to several
    /// wells, in layout file order.
    pub fn lookup(&self, query: &PlateQuery, layout: Option<&Layout>) -> Result<QueryResult<'_>> {
        let channel = match query.channel() {
            Some(channel) => channel.to_string(),
            None => {
                if self.channels.len() == 1 {
                    self.channels[0].clone()
                } else {
                    return Err(Error::query(format!(
                        "channel required: {} channels known",
                        self.channels.len()
                    )));
                }
            }
        };

        match query {
            PlateQuery::Well { row, col, .. } => self
                .get(row, *col, &channel)
                .map(QueryResult::One)
                .ok_or_else(|| {
                    Error::query(format!("no value for well {row}{col} [{channel}]"))
                }),
            PlateQuery::Sample { label, .. } => {
                if !is_sample_label_string(label) {
                    return Err(Error::query(format!("'{label}' is not a sample id")));
                }
                let layout = layout
                    .ok_or_else(|| Error::query("sample-id lookup requires a plate layout"))?;
                let wells = layout.wells_for_label(label);
                if wells.is_empty() {
                    return Err(Error::query(format!(
                        "sample id '{label}' not assigned to any well"
                    )));
                }
                let mut values = Vec::with_capacity(wells.len());
                for (row, col) in wells {
                    let value = self.get(row, *col, &channel).ok_or_else(|| {
                        Error::query(format!("no value for well {row}{col} [{channel}]"))
                    })?;
                    values.push(value);
                }
                Ok(QueryResult::Many(values))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut collection = ResultCollection::new();
        collection
            .set("A", 1, "OD:600", Value::Single(0.5))
            .unwrap();
        assert_eq!(
            collection.get("A", 1, "OD:600"),
            Some(&Value::Single(0.5))
        );
        assert_eq!(collection.rows(), &["A".to_string()]);
        assert_eq!(collection.cols(), &[1]);
        assert_eq!(collection.channels(), &["OD:600".to_string()]);
    }

    #[test]
    fn test_set_duplicate_key() {
        let mut collection = ResultCollection::new();
        collection
            .set("A", 1, "OD:600", Value::Single(0.5))
            .unwrap();
        let err = collection
            .set("A", 1, "OD:600", Value::Single(0.7))
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_row_ordering_invariant() {
        let mut collection = ResultCollection::new();
        collection.set("B", 1, "ch", Value::Single(1.0)).unwrap();
        // revisiting a known row is fine
        collection.set("B", 2, "ch", Value::Single(1.0)).unwrap();
        // a new row below the maximum is not
        let err = collection.set("A", 3, "ch", Value::Single(1.0)).unwrap_err();
        assert!(matches!(err, ModelError::RowOrder { .. }));
        // length dominates: AA sorts after Z
        collection.set("Z", 3, "ch", Value::Single(1.0)).unwrap();
        collection.set("AA", 4, "ch", Value::Single(1.0)).unwrap();
    }

    #[test]
    fn test_col_ordering_invariant() {
        let mut collection = ResultCollection::new();
        collection.set("A", 5, "ch", Value::Single(1.0)).unwrap();
        let err = collection.set("A", 2, "ch", Value::Single(1.0)).unwrap_err();
        assert!(matches!(err, ModelError::ColumnOrder { .. }));
    }

    #[test]
    fn test_synthetic_channel_rejected() {
        let mut collection = ResultCollection::new();
        let err = collection
            .set("A", 1, "Mean", Value::Single(1.0))
            .unwrap_err();
        assert!(matches!(err, ModelError::SyntheticChannel(_)));
        assert!(collection.channels().is_empty());
    }

    #[test]
    fn test_series_length_lock() {
        let mut collection = ResultCollection::new();
        collection.append_series("A", 1, "ch", 0.1, 1).unwrap();
        collection.append_series("A", 1, "ch", 0.2, 2).unwrap();
        // same timestamp again: the axis did not grow, so the slot is taken
        let err = collection.append_series("A", 1, "ch", 0.3, 2).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(
            collection.get("A", 1, "ch").unwrap().as_series().unwrap(),
            &[0.1, 0.2]
        );
    }

    #[test]
    fn test_query_normalization() {
        assert_eq!(
            PlateQuery::from("A1"),
            PlateQuery::Well {
                row: "A".into(),
                col: 1,
                channel: None
            }
        );
        assert_eq!(
            PlateQuery::from(("B", 12, "YFP")),
            PlateQuery::Well {
                row: "B".into(),
                col: 12,
                channel: Some("YFP".into())
            }
        );
        assert_eq!(
            PlateQuery::from(("SPL8", "OD:600")),
            PlateQuery::Sample {
                label: "SPL8".into(),
                channel: Some("OD:600".into())
            }
        );
    }

    #[test]
    fn test_lookup_channel_inference() {
        let mut collection = ResultCollection::new();
        collection.set("A", 1, "OD:600", Value::Single(0.5)).unwrap();

        let result = collection.lookup(&PlateQuery::from("A1"), None).unwrap();
        assert_eq!(result.one().unwrap().as_single(), Some(0.5));

        // a second channel makes the bare lookup ambiguous
        collection.set("A", 1, "YFP", Value::Single(7.0)).unwrap();
        assert!(collection.lookup(&PlateQuery::from("A1"), None).is_err());
        assert!(
            collection
                .lookup(&PlateQuery::from(("A1", "YFP")), None)
                .is_ok()
        );
    }
}
