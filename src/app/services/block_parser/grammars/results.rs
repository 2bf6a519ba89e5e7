//! Aggregated-result tables
//!
//! Post-processing tables the instrument software computes from the raw
//! reads ("Max V", "Lag Time", ...). Headers carry the source channel in
//! square brackets, and the channel must already exist on the plate:
//! a results table never introduces a channel. Row-wise and column-wise
//! variants can carry sample-id and concentration columns that are
//! cross-validated against the attached layout.

use std::collections::HashSet;
use std::str::FromStr;

use super::super::identifiers::{extract_channel, split_well_name};
use super::super::line_buffer::Transaction;
use super::super::records::{BlockRecords, ResultEntry};
use super::super::tokens::parse_time_or_number;
use super::super::{Attempt, Mismatch};
use super::{parse_columns, parse_matrix_rows, parse_wells, split_fields};
use crate::app::models::Plate;
use crate::config::ParseConfig;
use crate::constants::headers;

/// `Name [Channel]` header, blank line, then a row/column matrix
pub(crate) fn matrix(
    tx: &mut Transaction<'_>,
    plate: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    let header = tx.expect_line()?;
    if header.contains(config.separator) {
        return Err(Mismatch);
    }
    let (table, channel) = extract_channel(header, plate.channels())?;
    tx.expect_blank()?;

    let column_header = split_fields(tx.expect_line()?, config.separator);
    if column_header.len() < 2 || !column_header[0].is_empty() {
        return Err(Mismatch);
    }
    let cols = parse_columns(&column_header[1..])?;
    let rows = parse_matrix_rows(tx, config.separator, cols.len(), parse_time_or_number)?;

    let mut entries = Vec::new();
    for (row, values) in rows {
        for (col, value) in cols.iter().zip(values) {
            entries.push(ResultEntry {
                table: table.clone(),
                row: row.clone(),
                col: *col,
                channel: channel.clone(),
                value,
            });
        }
    }
    Ok(BlockRecords::Results {
        entries,
        diagnostics: Vec::new(),
    })
}

/// One line per well; `Name [Channel]` columns, optionally preceded by
/// sample-id and concentration columns
pub(crate) fn rowwise(
    tx: &mut Transaction<'_>,
    plate: &Plate,
    config: &ParseConfig,
    has_sample: bool,
    has_conc: bool,
) -> Attempt<BlockRecords> {
    let header = split_fields(tx.expect_line()?, config.separator);
    let mut index = 0;
    expect_field(&header, &mut index, headers::WELL)?;
    if has_sample {
        expect_field(&header, &mut index, headers::SAMPLE_ID)?;
    }
    if has_conc {
        expect_field(&header, &mut index, headers::CONC)?;
    }
    if index >= header.len() {
        return Err(Mismatch);
    }
    let mut columns = Vec::new();
    let mut seen_columns = HashSet::new();
    for field in &header[index..] {
        let (table, channel) = extract_channel(field, plate.channels())?;
        if !seen_columns.insert((table.clone(), channel.clone())) {
            return Err(Mismatch);
        }
        columns.push((table, channel));
    }

    let mut entries = Vec::new();
    let mut seen_wells = HashSet::new();
    while let Some(line) = tx.next_line() {
        if line.is_empty() {
            break;
        }
        let fields = split_fields(line, config.separator);
        if fields.len() != header.len() {
            return Err(Mismatch);
        }
        let mut index = 0;
        let (row, col) = split_well_name(&fields[index])?;
        let (row, col) = (row.to_string(), col);
        index += 1;
        if !seen_wells.insert((row.clone(), col)) {
            return Err(Mismatch);
        }
        if has_sample {
            check_sample(plate, &row, col, &fields[index])?;
            index += 1;
        }
        if has_conc {
            check_concentration(plate, &row, col, &fields[index])?;
            index += 1;
        }
        for ((table, channel), field) in columns.iter().zip(&fields[index..]) {
            entries.push(ResultEntry {
                table: table.clone(),
                row: row.clone(),
                col,
                channel: channel.clone(),
                value: parse_time_or_number(field)?,
            });
        }
    }
    if entries.is_empty() {
        return Err(Mismatch);
    }
    Ok(BlockRecords::Results {
        entries,
        diagnostics: Vec::new(),
    })
}

/// One line per named result; wells across the header, optionally followed
/// by a sample-id line
pub(crate) fn columnwise(
    tx: &mut Transaction<'_>,
    plate: &Plate,
    config: &ParseConfig,
    has_sample: bool,
) -> Attempt<BlockRecords> {
    let header = split_fields(tx.expect_line()?, config.separator);
    if header.len() < 2 || header[0] != headers::WELL {
        return Err(Mismatch);
    }
    let wells = parse_wells(&header[1..])?;

    if has_sample {
        let fields = split_fields(tx.expect_line()?, config.separator);
        if fields.len() != header.len() || fields[0] != headers::SAMPLE_ID {
            return Err(Mismatch);
        }
        for ((row, col), field) in wells.iter().zip(&fields[1..]) {
            check_sample(plate, row, *col, field)?;
        }
    }

    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    while let Some(line) = tx.next_line() {
        if line.is_empty() {
            break;
        }
        let fields = split_fields(line, config.separator);
        if fields.len() != header.len() {
            return Err(Mismatch);
        }
        let (table, channel) = extract_channel(&fields[0], plate.channels())?;
        if !seen.insert((table.clone(), channel.clone())) {
            return Err(Mismatch);
        }
        for ((row, col), field) in wells.iter().zip(&fields[1..]) {
            entries.push(ResultEntry {
                table: table.clone(),
                row: row.clone(),
                col: *col,
                channel: channel.clone(),
                value: parse_time_or_number(field)?,
            });
        }
    }
    if entries.is_empty() {
        return Err(Mismatch);
    }
    Ok(BlockRecords::Results {
        entries,
        diagnostics: Vec::new(),
    })
}

fn expect_field(header: &[String], index: &mut usize, literal: &str) -> Attempt<()> {
    if header.get(*index).map(String::as_str) != Some(literal) {
        return Err(Mismatch);
    }
    *index += 1;
    Ok(())
}

/// A sample-id cell must name the label the layout assigned to the well
fn check_sample(plate: &Plate, row: &str, col: usize, field: &str) -> Attempt<()> {
    let layout = plate.layout().ok_or(Mismatch)?;
    let sample = layout.sample_id(row, col).ok_or(Mismatch)?;
    if sample.label == field {
        Ok(())
    } else {
        Err(Mismatch)
    }
}

/// A concentration cell must reproduce the layout's value for the well;
/// an empty cell matches a well without one
fn check_concentration(plate: &Plate, row: &str, col: usize, field: &str) -> Attempt<()> {
    let layout = plate.layout().ok_or(Mismatch)?;
    let sample = layout.sample_id(row, col).ok_or(Mismatch)?;
    match (sample.concentration, field.is_empty()) {
        (None, true) => Ok(()),
        (Some(expected), false) => {
            let value = f64::from_str(field).map_err(|_| Mismatch)?;
            if value == expected { Ok(()) } else { Err(Mismatch) }
        }
        _ => Err(Mismatch),
    }
}
