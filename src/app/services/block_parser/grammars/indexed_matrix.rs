//! Indexed-read matrix block
//!
//! One kinetic read exported as a matrix: a read header carrying the
//! timestamp and plate temperature, a column header whose corner repeats
//! the identical timestamp (cross-validated), then one line per plate row.
//! Some firmware emits a zero-valued read at time 0 before the first real
//! read; it is consumed and discarded.

use super::super::identifiers::temperature_channel;
use super::super::line_buffer::Transaction;
use super::super::records::{BlockRecords, TimeSeriesBlock};
use super::super::tokens::{parse_number, parse_timestamp};
use super::super::{Attempt, Mismatch};
use super::{parse_columns, parse_matrix_rows, split_fields};
use crate::app::models::Diagnostic;
use crate::config::ParseConfig;

pub(crate) fn parse(tx: &mut Transaction<'_>, config: &ParseConfig) -> Attempt<BlockRecords> {
    let header = split_fields(tx.expect_line()?, config.separator);
    if header.len() != 3 {
        return Err(Mismatch);
    }
    let (read_number, time) = parse_timestamp(&header[0])?;
    let channel = temperature_channel(&header[1])?.to_string();
    let temperature = parse_number(&header[2])?;

    let column_header = split_fields(tx.expect_line()?, config.separator);
    if column_header.len() < 2 {
        return Err(Mismatch);
    }
    // the corner cell duplicates the read header's timestamp
    if parse_timestamp(&column_header[0])? != (read_number, time) {
        return Err(Mismatch);
    }
    let columns = parse_columns(&column_header[1..])?;

    let rows = parse_matrix_rows(tx, config.separator, columns.len(), parse_number)?;

    if time == 0.0 && rows.iter().flat_map(|(_, values)| values).all(|&v| v == 0.0) {
        return Ok(BlockRecords::Ignored(vec![
            Diagnostic::DiscardedPlaceholderRead { channel },
        ]));
    }

    let mut wells = Vec::with_capacity(rows.len() * columns.len());
    let mut values = Vec::with_capacity(rows.len() * columns.len());
    for (row, row_values) in &rows {
        for (&col, &value) in columns.iter().zip(row_values) {
            wells.push((row.clone(), col));
            values.push(vec![value]);
        }
    }

    Ok(BlockRecords::TimeSeries(TimeSeriesBlock {
        channel,
        times: vec![time],
        temperatures: Some(vec![temperature]),
        wells,
        values,
        diagnostics: Vec::new(),
    }))
}
