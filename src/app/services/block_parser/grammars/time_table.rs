//! Kinetic and spectrum series tables
//!
//! A channel name on its own line, a blank line, then a table in one of
//! two orientations: wells as columns (one line per time point, with an
//! optional temperature column) or wells as rows (time points across the
//! header, with an optional temperature line). The same shapes with a
//! `Wavelength` corner carry spectra; the wavelength axis is stored as the
//! channel's time axis.
//!
//! Some firmware appends a spurious zero-time entry after the last real
//! read; a trailing zero truncates the series instead of failing it.

use std::collections::HashSet;

use super::super::identifiers::{split_well_name, temperature_channel};
use super::super::line_buffer::Transaction;
use super::super::records::{BlockRecords, TimeSeriesBlock};
use super::super::tokens::{parse_number, parse_time};
use super::super::{Attempt, Mismatch};
use super::{parse_wells, split_fields};
use crate::app::models::Diagnostic;
use crate::config::ParseConfig;
use crate::constants::headers;

/// What the table's shared axis measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Time,
    Wavelength,
}

impl Axis {
    fn corner(self) -> &'static str {
        match self {
            Axis::Time => headers::TIME,
            Axis::Wavelength => headers::WAVELENGTH,
        }
    }

    fn parse(self, field: &str) -> Attempt<f64> {
        match self {
            Axis::Time => parse_time(field),
            Axis::Wavelength => parse_number(field),
        }
    }
}

/// Which way the table is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Orientation {
    /// One line per axis point, wells across the header
    WellsAsColumns,
    /// One line per well, axis points across the header
    WellsAsRows,
}

pub(crate) fn parse(
    tx: &mut Transaction<'_>,
    config: &ParseConfig,
    orientation: Orientation,
    axis: Axis,
) -> Attempt<BlockRecords> {
    let channel = tx.expect_line()?.to_string();
    if channel.is_empty() || channel.contains(config.separator) {
        return Err(Mismatch);
    }
    tx.expect_blank()?;
    match orientation {
        Orientation::WellsAsColumns => wells_as_columns(tx, config, axis, channel),
        Orientation::WellsAsRows => wells_as_rows(tx, config, axis, channel),
    }
}

fn wells_as_columns(
    tx: &mut Transaction<'_>,
    config: &ParseConfig,
    axis: Axis,
    channel: String,
) -> Attempt<BlockRecords> {
    let header = split_fields(tx.expect_line()?, config.separator);
    if header.len() < 2 || header[0] != axis.corner() {
        return Err(Mismatch);
    }
    let has_temperature = temperature_channel(&header[1]).is_ok_and(|ch| ch == channel);
    let well_fields = if has_temperature { &header[2..] } else { &header[1..] };
    let wells = parse_wells(well_fields)?;

    let mut times: Vec<f64> = Vec::new();
    let mut temperatures: Vec<f64> = Vec::new();
    let mut by_time: Vec<Vec<f64>> = Vec::new();
    while let Some(line) = tx.next_line() {
        if line.is_empty() {
            break;
        }
        let fields = split_fields(line, config.separator);
        if fields.len() != header.len() {
            return Err(Mismatch);
        }
        times.push(axis.parse(&fields[0])?);
        let value_fields = if has_temperature {
            temperatures.push(parse_number(&fields[1])?);
            &fields[2..]
        } else {
            &fields[1..]
        };
        let values = value_fields
            .iter()
            .map(|field| parse_number(field))
            .collect::<Attempt<Vec<f64>>>()?;
        by_time.push(values);
    }
    if times.is_empty() {
        return Err(Mismatch);
    }

    let mut diagnostics = Vec::new();
    if axis == Axis::Time && times.len() >= 2 && times.last() == Some(&0.0) {
        times.pop();
        by_time.pop();
        if has_temperature {
            temperatures.pop();
        }
        diagnostics.push(Diagnostic::TruncatedTrailingZeroTime {
            channel: channel.clone(),
        });
    }
    check_strictly_increasing(&times)?;

    // transpose to one series per well
    let values: Vec<Vec<f64>> = (0..wells.len())
        .map(|well| by_time.iter().map(|row| row[well]).collect())
        .collect();

    Ok(BlockRecords::TimeSeries(TimeSeriesBlock {
        channel,
        times,
        temperatures: has_temperature.then_some(temperatures),
        wells,
        values,
        diagnostics,
    }))
}

fn wells_as_rows(
    tx: &mut Transaction<'_>,
    config: &ParseConfig,
    axis: Axis,
    channel: String,
) -> Attempt<BlockRecords> {
    let header = split_fields(tx.expect_line()?, config.separator);
    if header.len() < 2 || header[0] != axis.corner() {
        return Err(Mismatch);
    }
    let mut times = header[1..]
        .iter()
        .map(|field| axis.parse(field))
        .collect::<Attempt<Vec<f64>>>()?;

    let mut temperatures: Option<Vec<f64>> = None;
    let mut wells: Vec<(String, usize)> = Vec::new();
    let mut values: Vec<Vec<f64>> = Vec::new();
    let mut seen = HashSet::new();
    let mut first = true;
    while let Some(line) = tx.next_line() {
        if line.is_empty() {
            break;
        }
        let fields = split_fields(line, config.separator);
        if fields.len() != times.len() + 1 {
            return Err(Mismatch);
        }
        // the optional temperature line comes directly after the header
        if first && temperature_channel(&fields[0]).is_ok_and(|ch| ch == channel) {
            temperatures = Some(
                fields[1..]
                    .iter()
                    .map(|field| parse_number(field))
                    .collect::<Attempt<Vec<f64>>>()?,
            );
            first = false;
            continue;
        }
        first = false;
        let (row, col) = split_well_name(&fields[0])?;
        if !seen.insert((row.to_string(), col)) {
            return Err(Mismatch);
        }
        wells.push((row.to_string(), col));
        values.push(
            fields[1..]
                .iter()
                .map(|field| parse_number(field))
                .collect::<Attempt<Vec<f64>>>()?,
        );
    }
    if wells.is_empty() {
        return Err(Mismatch);
    }

    let mut diagnostics = Vec::new();
    if axis == Axis::Time && times.len() >= 2 && times.last() == Some(&0.0) {
        times.pop();
        if let Some(temperatures) = &mut temperatures {
            temperatures.pop();
        }
        for series in &mut values {
            series.pop();
        }
        diagnostics.push(Diagnostic::TruncatedTrailingZeroTime {
            channel: channel.clone(),
        });
    }
    check_strictly_increasing(&times)?;

    Ok(BlockRecords::TimeSeries(TimeSeriesBlock {
        channel,
        times,
        temperatures,
        wells,
        values,
        diagnostics,
    }))
}

/// A block whose axis is not strictly increasing would collide with
/// itself when applied, so it cannot be this shape
fn check_strictly_increasing(times: &[f64]) -> Attempt<()> {
    if times.windows(2).all(|pair| pair[0] < pair[1]) {
        Ok(())
    } else {
        Err(Mismatch)
    }
}
