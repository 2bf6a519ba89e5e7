//! Plate layout block
//!
//! A literal `Layout` header, a column-number header, then per plate row a
//! sample-id line tagged `Well ID` in its last field, optionally followed
//! by a concentration line tagged `Conc/Dil` with an empty row label.
//! Empty cells and cells repeating the well's own coordinate stay
//! unassigned; everything else must be a sample label.

use super::super::identifiers::{is_sample_label_string, is_valid_row};
use super::super::line_buffer::Transaction;
use super::super::records::BlockRecords;
use super::super::{Attempt, Mismatch};
use super::{parse_columns, split_fields};
use crate::app::models::{Layout, SampleId};
use crate::config::ParseConfig;
use crate::constants::headers;

/// One parsed `Well ID` line waiting for its optional `Conc/Dil` line
struct PendingRow {
    row: String,
    cells: Vec<String>,
}

pub(crate) fn parse(tx: &mut Transaction<'_>, config: &ParseConfig) -> Attempt<BlockRecords> {
    if tx.expect_line()? != headers::LAYOUT {
        return Err(Mismatch);
    }
    let header = split_fields(tx.expect_line()?, config.separator);
    if header.len() < 2 || !header[0].is_empty() {
        return Err(Mismatch);
    }
    let columns = parse_columns(&header[1..])?;

    let mut layout = Layout::new();
    let mut pending: Option<PendingRow> = None;
    let mut last_row: Option<String> = None;

    while let Some(line) = tx.next_line() {
        if line.is_empty() {
            break;
        }
        let fields = split_fields(line, config.separator);
        // row label + one cell per column + trailing tag
        if fields.len() != columns.len() + 2 {
            return Err(Mismatch);
        }
        let tag = fields.last().ok_or(Mismatch)?;
        let cells = fields[1..fields.len() - 1].to_vec();

        if tag == headers::WELL_ID {
            if let Some(pending) = pending.take() {
                flush_row(&mut layout, &pending, &columns, None)?;
            }
            let row = fields[0].clone();
            if !is_valid_row(&row) {
                return Err(Mismatch);
            }
            if let Some(last) = &last_row {
                if (row.len(), row.as_str()) <= (last.len(), last.as_str()) {
                    return Err(Mismatch);
                }
            }
            last_row = Some(row.clone());
            pending = Some(PendingRow { row, cells });
        } else if tag == headers::CONC {
            if !fields[0].is_empty() {
                return Err(Mismatch);
            }
            let pending = pending.take().ok_or(Mismatch)?;
            flush_row(&mut layout, &pending, &columns, Some(&cells))?;
        } else {
            return Err(Mismatch);
        }
    }
    if let Some(pending) = pending.take() {
        flush_row(&mut layout, &pending, &columns, None)?;
    }
    if layout.is_empty() {
        return Err(Mismatch);
    }
    Ok(BlockRecords::Layout(layout))
}

fn flush_row(
    layout: &mut Layout,
    pending: &PendingRow,
    columns: &[usize],
    concentrations: Option<&[String]>,
) -> Attempt<()> {
    for (index, &col) in columns.iter().enumerate() {
        let cell = pending.cells[index].trim();
        if cell.is_empty() || cell == format!("{}{col}", pending.row) {
            continue;
        }
        if !is_sample_label_string(cell) {
            return Err(Mismatch);
        }
        let concentration = match concentrations.map(|cells| cells[index].trim()) {
            None | Some("") => None,
            Some(conc) => Some(conc.parse::<f64>().map_err(|_| Mismatch)?),
        };
        layout.assign(&pending.row, col, SampleId::new(cell, concentration));
    }
    Ok(())
}
