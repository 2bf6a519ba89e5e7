//! Block grammars
//!
//! One module per block family. Every grammar is a small fixed-depth
//! consumer: it validates 1-3 header lines against literal or pattern
//! constraints, consumes the run of non-blank lines up to the blank
//! terminator while converting each into typed fields, and returns the
//! whole block as records. Nothing touches the plate until the entire
//! block has parsed cleanly.

pub(crate) mod free_text;
pub(crate) mod gains;
pub(crate) mod indexed_matrix;
pub(crate) mod layout;
pub(crate) mod metadata;
pub(crate) mod results;
pub(crate) mod single;
pub(crate) mod time_table;

use std::collections::HashSet;

use super::identifiers::{row_iter, split_well_name};
use super::line_buffer::Transaction;
use super::{Attempt, Mismatch};

/// Split a line into owned fields on the configured separator
pub(crate) fn split_fields(line: &str, separator: char) -> Vec<String> {
    line.split(separator).map(str::to_string).collect()
}

/// Parse a matrix column-header tail into ascending column numbers
pub(crate) fn parse_columns(fields: &[String]) -> Attempt<Vec<usize>> {
    if fields.is_empty() {
        return Err(Mismatch);
    }
    let mut columns = Vec::with_capacity(fields.len());
    for field in fields {
        let col = field.trim().parse::<usize>().map_err(|_| Mismatch)?;
        if col == 0 || columns.last().is_some_and(|&last| col <= last) {
            return Err(Mismatch);
        }
        columns.push(col);
    }
    Ok(columns)
}

/// Parse a run of header fields into distinct well coordinates
pub(crate) fn parse_wells(fields: &[String]) -> Attempt<Vec<(String, usize)>> {
    if fields.is_empty() {
        return Err(Mismatch);
    }
    let mut wells = Vec::with_capacity(fields.len());
    let mut seen = HashSet::new();
    for field in fields {
        let (row, col) = split_well_name(field)?;
        if !seen.insert((row.to_string(), col)) {
            return Err(Mismatch);
        }
        wells.push((row.to_string(), col));
    }
    Ok(wells)
}

/// Consume matrix body lines until the blank terminator
///
/// Row labels must follow the canonical sequence from `A`, and every line
/// must carry exactly one value per header column.
pub(crate) fn parse_matrix_rows(
    tx: &mut Transaction<'_>,
    separator: char,
    column_count: usize,
    parse_value: impl Fn(&str) -> Attempt<f64>,
) -> Attempt<Vec<(String, Vec<f64>)>> {
    let mut canonical = row_iter();
    let mut rows = Vec::new();
    while let Some(line) = tx.next_line() {
        if line.is_empty() {
            break;
        }
        let fields = split_fields(line, separator);
        if fields.len() != column_count + 1 {
            return Err(Mismatch);
        }
        let expected = canonical.next().ok_or(Mismatch)?;
        if fields[0] != expected {
            return Err(Mismatch);
        }
        let values = fields[1..]
            .iter()
            .map(|field| parse_value(field))
            .collect::<Attempt<Vec<f64>>>()?;
        rows.push((expected, values));
    }
    if rows.is_empty() {
        return Err(Mismatch);
    }
    Ok(rows)
}
