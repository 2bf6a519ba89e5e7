//! One physical microplate's dataset
//!
//! [`Plate`] aggregates the raw per-well data with the per-channel time
//! axes and temperature series, typed metadata, named aggregated result
//! sub-tables, detector gains, and the optional layout. Mutators enforce
//! the consistency invariants (monotone time, series length parity,
//! single-assignment metadata and gains) and report collisions as
//! duplicate data so the dispatcher can open a new plate.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use super::layout::Layout;
use super::results::{PlateQuery, QueryResult, ResultCollection, Value};
use super::ModelError;
use crate::constants::{
    COMBINED_DATETIME_KEY, DATETIME_PATTERNS, EXEMPT_TEMPERATURE_KEYS, SOFTWARE_VERSION_KEY,
};
use crate::Result;

/// A typed metadata value
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    /// Verbatim text (the common case)
    Text(String),
    /// Dotted software version decomposed into integers
    Version(Vec<u32>),
    /// Combined `Date` + `Time` pair
    DateTime(NaiveDateTime),
}

impl MetaValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_version(&self) -> Option<&[u32]> {
        match self {
            MetaValue::Version(parts) => Some(parts),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            MetaValue::DateTime(datetime) => Some(*datetime),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaValue::Text(text) => write!(f, "{text}"),
            MetaValue::Version(parts) => {
                let dotted: Vec<String> = parts.iter().map(u32::to_string).collect();
                write!(f, "{}", dotted.join("."))
            }
            MetaValue::DateTime(datetime) => write!(f, "{datetime}"),
        }
    }
}

/// One plate's complete dataset within an export file
#[derive(Debug, Clone, Default)]
pub struct Plate {
    raw: ResultCollection,
    times: HashMap<String, Vec<f64>>,
    temperatures: HashMap<String, Vec<f64>>,
    metadata: HashMap<String, MetaValue>,
    result_tables: HashMap<String, ResultCollection>,
    result_names: Vec<String>,
    gains: HashMap<String, f64>,
    layout: Option<Layout>,
    explicit_temperature_range: Option<(f64, f64)>,
}

impl Plate {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Public read surface
    // =========================================================================

    /// Raw per-well data
    pub fn raw(&self) -> &ResultCollection {
        &self.raw
    }

    /// Discovered row labels in canonical order
    pub fn rows(&self) -> &[String] {
        self.raw.rows()
    }

    /// Discovered columns in ascending order
    pub fn cols(&self) -> &[usize] {
        self.raw.cols()
    }

    /// Channels in first-seen order
    pub fn channels(&self) -> &[String] {
        self.raw.channels()
    }

    /// A channel's time axis (wavelength axis for spectrum channels);
    /// empty for unknown channels
    pub fn times(&self, channel: &str) -> &[f64] {
        self.times.get(channel).map_or(&[], Vec::as_slice)
    }

    /// A channel's temperature series, length-locked to its time axis
    pub fn temperatures(&self, channel: &str) -> &[f64] {
        self.temperatures.get(channel).map_or(&[], Vec::as_slice)
    }

    /// A metadata value by key
    pub fn metadata(&self, key: &str) -> Option<&MetaValue> {
        self.metadata.get(key)
    }

    /// All metadata keys, in no particular order
    pub fn metadata_keys(&self) -> impl Iterator<Item = &String> {
        self.metadata.keys()
    }

    /// The combined acquisition timestamp, when the file carried one
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        self.metadata
            .get(COMBINED_DATETIME_KEY)
            .and_then(MetaValue::as_datetime)
    }

    /// The parsed software version tuple, when the file carried one
    pub fn software_version(&self) -> Option<&[u32]> {
        self.metadata
            .get(SOFTWARE_VERSION_KEY)
            .and_then(MetaValue::as_version)
    }

    /// Names of aggregated result sub-tables in first-seen order
    pub fn result_names(&self) -> &[String] {
        &self.result_names
    }

    /// An aggregated result sub-table by name (e.g. `Max V`)
    pub fn results(&self, name: &str) -> Option<&ResultCollection> {
        self.result_tables.get(name)
    }

    /// Detector gain for a channel
    pub fn gain(&self, channel: &str) -> Option<f64> {
        self.gains.get(channel).copied()
    }

    /// All recorded gains
    pub fn gains(&self) -> &HashMap<String, f64> {
        &self.gains
    }

    /// The plate layout, when the file carried one
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Temperature range over the measurement
    ///
    /// The explicit metadata accumulator wins when any of the exempted
    /// temperature fields were seen; otherwise the range is derived from
    /// the recorded temperature series.
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        if self.explicit_temperature_range.is_some() {
            return self.explicit_temperature_range;
        }
        let mut range: Option<(f64, f64)> = None;
        for series in self.temperatures.values() {
            for &sample in series {
                if sample.is_nan() {
                    continue;
                }
                range = Some(match range {
                    None => (sample, sample),
                    Some((lo, hi)) => (lo.min(sample), hi.max(sample)),
                });
            }
        }
        range
    }

    /// Flexible lookup by well string, (row, col[, channel]) tuple, or
    /// sample id
    pub fn get<Q: Into<PlateQuery>>(&self, query: Q) -> Result<QueryResult<'_>> {
        self.raw.lookup(&query.into(), self.layout.as_ref())
    }

    /// Whether anything has been recorded on this plate yet
    pub fn is_blank(&self) -> bool {
        self.raw.is_empty()
            && self.times.is_empty()
            && self.metadata.is_empty()
            && self.result_tables.is_empty()
            && self.gains.is_empty()
            && self.layout.is_none()
            && self.explicit_temperature_range.is_none()
    }

    // =========================================================================
    // Crate-private mutators (dispatcher only)
    // =========================================================================

    /// Extend a channel's time axis
    ///
    /// Appends a strictly greater timestamp, collapses an exact repeat of
    /// the last one, and rejects anything else.
    pub(crate) fn add_time(
        &mut self,
        channel: &str,
        time: f64,
    ) -> std::result::Result<(), ModelError> {
        let axis = self.times.entry(channel.to_string()).or_default();
        match axis.last() {
            None => {
                axis.push(time);
                Ok(())
            }
            Some(&last) if time == last => Ok(()),
            Some(&last) if time > last => {
                axis.push(time);
                Ok(())
            }
            Some(&last) => Err(ModelError::NonMonotonicTime {
                channel: channel.to_string(),
                time,
                last,
            }),
        }
    }

    /// Record a temperature sample, keeping the series length-locked to
    /// the channel's time axis
    pub(crate) fn add_temperature(
        &mut self,
        channel: &str,
        time: f64,
        temperature: f64,
    ) -> std::result::Result<(), ModelError> {
        self.add_time(channel, time)?;
        let axis_len = self.times(channel).len();
        let series = self.temperatures.entry(channel.to_string()).or_default();
        if series.len() >= axis_len {
            return Err(ModelError::Duplicate(format!(
                "temperature for channel '{channel}' already present at this timestamp"
            )));
        }
        series.push(temperature);
        if series.len() != axis_len {
            return Err(ModelError::LengthMismatch {
                key: format!("T [{channel}]"),
                expected: axis_len,
            });
        }
        Ok(())
    }

    /// Record one kinetic sample for a well
    pub(crate) fn add_kinetic_value(
        &mut self,
        channel: &str,
        row: &str,
        col: usize,
        time: f64,
        value: f64,
    ) -> std::result::Result<(), ModelError> {
        self.add_time(channel, time)?;
        let expected = self.times(channel).len();
        self.raw.append_series(row, col, channel, value, expected)
    }

    /// Record one single-measurement value for a well
    pub(crate) fn set_raw(
        &mut self,
        row: &str,
        col: usize,
        channel: &str,
        value: f64,
    ) -> std::result::Result<(), ModelError> {
        self.raw.set(row, col, channel, Value::Single(value))
    }

    /// Whether a named result table already holds a key
    pub(crate) fn result_contains(&self, name: &str, row: &str, col: usize, channel: &str) -> bool {
        self.result_tables
            .get(name)
            .is_some_and(|table| table.contains(row, col, channel))
    }

    /// Store one value in a named aggregated result sub-table
    pub(crate) fn set_result(
        &mut self,
        name: &str,
        row: &str,
        col: usize,
        channel: &str,
        value: Value,
    ) -> std::result::Result<(), ModelError> {
        if !self.result_tables.contains_key(name) {
            self.result_names.push(name.to_string());
            self.result_tables
                .insert(name.to_string(), ResultCollection::new());
        }
        let table = self
            .result_tables
            .get_mut(name)
            .expect("table inserted above");
        // result tables reference existing channels; register directly so
        // the synthetic-name guard still applies but well data is not needed
        table.set(row, col, channel, value)
    }

    /// Record a detector gain; gains are single-assignment per channel
    pub(crate) fn add_gain(
        &mut self,
        channel: &str,
        gain: f64,
    ) -> std::result::Result<(), ModelError> {
        if self.gains.contains_key(channel) {
            return Err(ModelError::Duplicate(format!(
                "gain for channel '{channel}' already present"
            )));
        }
        self.gains.insert(channel.to_string(), gain);
        Ok(())
    }

    /// Attach the plate layout; a second layout signals a new plate
    pub(crate) fn attach_layout(&mut self, layout: Layout) -> std::result::Result<(), ModelError> {
        if self.layout.is_some() {
            return Err(ModelError::Duplicate("layout already present".into()));
        }
        self.layout = Some(layout);
        Ok(())
    }

    /// Apply one metadata block
    ///
    /// The exempted temperature fields fold into the running range
    /// accumulator and never take part in the duplicate check. A `Date` +
    /// `Time` pair combines into one timestamp, and the software version
    /// decomposes into an integer tuple. The whole block is all-or-nothing:
    /// on a duplicate key nothing is applied.
    pub(crate) fn add_metadata(
        &mut self,
        pairs: Vec<(String, String)>,
    ) -> std::result::Result<(), ModelError> {
        let mut exempt: Vec<f64> = Vec::new();
        let mut date: Option<String> = None;
        let mut time: Option<String> = None;
        let mut typed: Vec<(String, MetaValue)> = Vec::new();

        for (key, value) in pairs {
            if EXEMPT_TEMPERATURE_KEYS.contains(&key.as_str()) {
                match value.trim().parse::<f64>() {
                    Ok(sample) => {
                        exempt.push(sample);
                        continue;
                    }
                    Err(_) => {
                        // a non-numeric reading cannot fold into the range;
                        // keep it as ordinary text so it stays visible
                        tracing::warn!(%key, %value, "non-numeric temperature field kept as text");
                        typed.push((key, MetaValue::Text(value)));
                        continue;
                    }
                }
            }
            match key.as_str() {
                "Date" => date = Some(value),
                "Time" => time = Some(value),
                SOFTWARE_VERSION_KEY => typed.push((key, parse_version(&value))),
                _ => typed.push((key, MetaValue::Text(value))),
            }
        }

        match (date, time) {
            (Some(date), Some(time)) => match combine_datetime(&date, &time) {
                Some(datetime) => typed.push((
                    COMBINED_DATETIME_KEY.to_string(),
                    MetaValue::DateTime(datetime),
                )),
                None => {
                    typed.push(("Date".to_string(), MetaValue::Text(date)));
                    typed.push(("Time".to_string(), MetaValue::Text(time)));
                }
            },
            (Some(date), None) => typed.push(("Date".to_string(), MetaValue::Text(date))),
            (None, Some(time)) => typed.push(("Time".to_string(), MetaValue::Text(time))),
            (None, None) => {}
        }

        if let Some((key, _)) = typed.iter().find(|(key, _)| self.metadata.contains_key(key)) {
            return Err(ModelError::Duplicate(format!(
                "metadata key '{key}' already present"
            )));
        }
        // the Date/Time pair and its combined form stand for the same
        // field, so any of the three colliding with any stored one marks
        // a plate boundary
        let datetime_keys = ["Date", "Time", COMBINED_DATETIME_KEY];
        if datetime_keys
            .iter()
            .any(|key| self.metadata.contains_key(*key))
        {
            if let Some((key, _)) = typed
                .iter()
                .find(|(key, _)| datetime_keys.contains(&key.as_str()))
            {
                return Err(ModelError::Duplicate(format!(
                    "timestamp key '{key}' already present"
                )));
            }
        }

        for sample in exempt {
            self.explicit_temperature_range = Some(match self.explicit_temperature_range {
                None => (sample, sample),
                Some((lo, hi)) => (lo.min(sample), hi.max(sample)),
            });
        }
        for (key, value) in typed {
            self.metadata.insert(key, value);
        }
        Ok(())
    }
}

/// Decompose a dotted version string; anything non-numeric stays text
fn parse_version(value: &str) -> MetaValue {
    let parts: Option<Vec<u32>> = value
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect();
    match parts {
        Some(parts) if !parts.is_empty() => MetaValue::Version(parts),
        _ => MetaValue::Text(value.to_string()),
    }
}

/// Combine a `Date` and `Time` pair, trying the known firmware patterns
/// in order
fn combine_datetime(date: &str, time: &str) -> Option<NaiveDateTime> {
    let combined = format!("{} {}", date.trim(), time.trim());
    DATETIME_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(&combined, pattern).ok())
}
