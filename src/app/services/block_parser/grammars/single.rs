//! Single-measurement tables
//!
//! Endpoint reads with no time axis; each well gets one scalar per channel.
//! Channel names here are bare (no bracketed suffix), which is what keeps
//! these shapes from swallowing aggregated-result tables. Columns or lines
//! named after a software aggregate (`Mean`, `StDev`, ...) are export
//! decoration, not channels, and are skipped with a diagnostic.

use std::collections::HashSet;

use super::super::identifiers::split_well_name;
use super::super::line_buffer::Transaction;
use super::super::records::{BlockRecords, SingleEntry};
use super::super::tokens::parse_number;
use super::super::{Attempt, Mismatch};
use super::{parse_columns, parse_matrix_rows, parse_wells, split_fields};
use crate::app::models::Diagnostic;
use crate::config::ParseConfig;
use crate::constants::{SYNTHETIC_AGGREGATES, headers};

fn is_synthetic(name: &str) -> bool {
    SYNTHETIC_AGGREGATES.contains(&name)
}

/// Channel line, blank line, then a row/column matrix of scalars
pub(crate) fn matrix(tx: &mut Transaction<'_>, config: &ParseConfig) -> Attempt<BlockRecords> {
    let channel = tx.expect_line()?.to_string();
    if channel.is_empty() || channel.contains(config.separator) || is_synthetic(&channel) {
        return Err(Mismatch);
    }
    tx.expect_blank()?;

    let column_header = split_fields(tx.expect_line()?, config.separator);
    if column_header.len() < 2 || !column_header[0].is_empty() {
        return Err(Mismatch);
    }
    let cols = parse_columns(&column_header[1..])?;
    let rows = parse_matrix_rows(tx, config.separator, cols.len(), parse_number)?;

    let mut entries = Vec::new();
    for (row, values) in rows {
        for (col, value) in cols.iter().zip(values) {
            entries.push(SingleEntry {
                row: row.clone(),
                col: *col,
                channel: channel.clone(),
                value,
            });
        }
    }
    Ok(BlockRecords::Single {
        entries,
        diagnostics: Vec::new(),
    })
}

/// One line per well, bare channel names across the header
pub(crate) fn rowwise(tx: &mut Transaction<'_>, config: &ParseConfig) -> Attempt<BlockRecords> {
    let header = split_fields(tx.expect_line()?, config.separator);
    if header.len() < 2 || header[0] != headers::WELL {
        return Err(Mismatch);
    }
    let mut channels: Vec<Option<String>> = Vec::new();
    let mut seen = HashSet::new();
    let mut diagnostics = Vec::new();
    for field in &header[1..] {
        if field.is_empty() || field.contains('[') {
            return Err(Mismatch);
        }
        if is_synthetic(field) {
            diagnostics.push(Diagnostic::IgnoredSyntheticColumn {
                name: field.clone(),
            });
            channels.push(None);
            continue;
        }
        if !seen.insert(field.clone()) {
            return Err(Mismatch);
        }
        channels.push(Some(field.clone()));
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
        let (row, col) = split_well_name(&fields[0])?;
        let (row, col) = (row.to_string(), col);
        if !seen_wells.insert((row.clone(), col)) {
            return Err(Mismatch);
        }
        for (channel, field) in channels.iter().zip(&fields[1..]) {
            let value = parse_number(field)?;
            if let Some(channel) = channel {
                entries.push(SingleEntry {
                    row: row.clone(),
                    col,
                    channel: channel.clone(),
                    value,
                });
            }
        }
    }
    if entries.is_empty() {
        return Err(Mismatch);
    }
    Ok(BlockRecords::Single {
        entries,
        diagnostics,
    })
}

/// One line per channel, wells across the header
pub(crate) fn columnwise(tx: &mut Transaction<'_>, config: &ParseConfig) -> Attempt<BlockRecords> {
    let header = split_fields(tx.expect_line()?, config.separator);
    if header.len() < 2 || header[0] != headers::WELL {
        return Err(Mismatch);
    }
    let wells = parse_wells(&header[1..])?;

    let mut entries = Vec::new();
    let mut diagnostics = Vec::new();
    let mut seen = HashSet::new();
    while let Some(line) = tx.next_line() {
        if line.is_empty() {
            break;
        }
        let fields = split_fields(line, config.separator);
        if fields.len() != header.len() {
            return Err(Mismatch);
        }
        let channel = &fields[0];
        if channel.is_empty() || channel.contains('[') {
            return Err(Mismatch);
        }
        if is_synthetic(channel) {
            for field in &fields[1..] {
                parse_number(field)?;
            }
            diagnostics.push(Diagnostic::IgnoredSyntheticColumn {
                name: channel.clone(),
            });
            continue;
        }
        if !seen.insert(channel.clone()) {
            return Err(Mismatch);
        }
        for ((row, col), field) in wells.iter().zip(&fields[1..]) {
            entries.push(SingleEntry {
                row: row.clone(),
                col: *col,
                channel: channel.clone(),
                value: parse_number(field)?,
            });
        }
    }
    if entries.is_empty() {
        return Err(Mismatch);
    }
    Ok(BlockRecords::Single {
        entries,
        diagnostics,
    })
}
