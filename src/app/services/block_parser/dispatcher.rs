//! Priority-ordered grammar dispatch
//!
//! The main parse loop: while non-blank content remains, try each grammar
//! in priority order inside a cursor transaction. A match commits the
//! cursor and applies the block's records to the current plate; a mismatch
//! rolls back and tries the next grammar; a duplicate-data collision
//! starts a new plate and replays the same content against it. If no
//! grammar matches, parsing fails with the offending line.
//!
//! Order is significant: the most syntactically constrained shapes come
//! first, and the bare key/value metadata grammar, which matches almost
//! anything, comes last.

use std::path::Path;

use tracing::{debug, info};

use super::grammars::{
    free_text, gains, indexed_matrix, layout, metadata, results, single,
    time_table::{self, Axis, Orientation},
};
use super::line_buffer::{LineBuffer, Transaction};
use super::records::{ApplyError, BlockRecords};
use super::{Attempt, Mismatch};
use crate::app::adapters::filesystem;
use crate::app::models::{Document, Plate};
use crate::config::ParseConfig;
use crate::constants::{PROCEDURE_KEY, headers};
use crate::{Error, Result};

type GrammarFn = fn(&mut Transaction<'_>, &Plate, &ParseConfig) -> Attempt<BlockRecords>;

/// All block grammars, most constrained first
const GRAMMARS: &[(&str, GrammarFn)] = &[
    ("procedure", procedure),
    ("curve_fit", curve_fit),
    ("gains", gains_block),
    ("layout", layout_block),
    ("indexed_read", indexed_read),
    ("kinetic_columns", kinetic_columns),
    ("kinetic_rows", kinetic_rows),
    ("spectrum_columns", spectrum_columns),
    ("spectrum_rows", spectrum_rows),
    ("results_matrix", results_matrix),
    ("results_rows_sample_conc", results_rows_sample_conc),
    ("results_rows_sample", results_rows_sample),
    ("results_rows_conc", results_rows_conc),
    ("results_rows", results_rows),
    ("results_columns_sample", results_columns_sample),
    ("results_columns", results_columns),
    ("single_matrix", single_matrix),
    ("single_rows", single_rows),
    ("single_columns", single_columns),
    ("metadata", metadata_block),
];

// ============================================================================
// Entry points
// ============================================================================

/// Parse a Synergy export file from disk
pub fn parse_file(path: impl AsRef<Path>, config: &ParseConfig) -> Result<Document> {
    let path = path.as_ref();
    info!(path = %path.display(), "parsing export file");
    let text = filesystem::read_to_string(path, config)?;
    parse_lines(filesystem::split_lines(&text), config)
}

/// Parse already-decoded export text
pub fn parse_str(text: &str, config: &ParseConfig) -> Result<Document> {
    parse_lines(filesystem::split_lines(text), config)
}

// ============================================================================
// Main loop
// ============================================================================

fn parse_lines(lines: Vec<String>, config: &ParseConfig) -> Result<Document> {
    let mut buffer = LineBuffer::new(lines);
    let mut document = Document::new();

    while buffer.has_content() {
        dispatch_block(&mut buffer, &mut document, config)?;
    }

    info!(
        plates = document.len(),
        diagnostics = document.diagnostics().len(),
        "parse complete"
    );
    Ok(document)
}

/// Try every grammar against the block at the cursor, replaying onto a
/// fresh plate when a structurally valid block collides with existing data
fn dispatch_block(
    buffer: &mut LineBuffer,
    document: &mut Document,
    config: &ParseConfig,
) -> Result<()> {
    let line = buffer.line_number();
    for (name, grammar) in GRAMMARS {
        let mut tx = buffer.transaction();
        let records = match grammar(&mut tx, document.current(), config) {
            Ok(records) => records,
            Err(Mismatch) => continue,
        };
        match records.apply(document) {
            Ok(()) => {
                debug!(grammar = name, line, "block matched");
                tx.commit();
                return Ok(());
            }
            Err(ApplyError::Duplicate(detail)) => {
                // a collision against an already-empty plate would replay
                // forever, so it is a spurious match instead
                if document.current().is_blank() {
                    return Err(Error::invariant(format!(
                        "duplicate data against an empty plate: {detail}"
                    )));
                }
                debug!(grammar = name, %detail, "duplicate data, starting new plate");
                drop(tx);
                document.start_plate();
                return dispatch_block(buffer, document, config);
            }
            Err(ApplyError::Invariant(detail)) => {
                return Err(Error::invariant(detail));
            }
        }
    }
    Err(Error::unrecognized_block(
        buffer.line_number(),
        buffer.snippet(),
    ))
}

// ============================================================================
// Grammar adapters
// ============================================================================

fn procedure(tx: &mut Transaction<'_>, _: &Plate, config: &ParseConfig) -> Attempt<BlockRecords> {
    free_text::parse(tx, config, headers::PROCEDURE, PROCEDURE_KEY)
}

fn curve_fit(tx: &mut Transaction<'_>, _: &Plate, config: &ParseConfig) -> Attempt<BlockRecords> {
    free_text::parse(tx, config, headers::CURVE_FIT, headers::CURVE_FIT)
}

fn gains_block(tx: &mut Transaction<'_>, _: &Plate, config: &ParseConfig) -> Attempt<BlockRecords> {
    gains::parse(tx, config)
}

fn layout_block(tx: &mut Transaction<'_>, _: &Plate, config: &ParseConfig) -> Attempt<BlockRecords> {
    layout::parse(tx, config)
}

fn indexed_read(tx: &mut Transaction<'_>, _: &Plate, config: &ParseConfig) -> Attempt<BlockRecords> {
    indexed_matrix::parse(tx, config)
}

fn kinetic_columns(
    tx: &mut Transaction<'_>,
    _: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    time_table::parse(tx, config, Orientation::WellsAsColumns, Axis::Time)
}

fn kinetic_rows(tx: &mut Transaction<'_>, _: &Plate, config: &ParseConfig) -> Attempt<BlockRecords> {
    time_table::parse(tx, config, Orientation::WellsAsRows, Axis::Time)
}

fn spectrum_columns(
    tx: &mut Transaction<'_>,
    _: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    time_table::parse(tx, config, Orientation::WellsAsColumns, Axis::Wavelength)
}

fn spectrum_rows(
    tx: &mut Transaction<'_>,
    _: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    time_table::parse(tx, config, Orientation::WellsAsRows, Axis::Wavelength)
}

fn results_matrix(
    tx: &mut Transaction<'_>,
    plate: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    results::matrix(tx, plate, config)
}

fn results_rows_sample_conc(
    tx: &mut Transaction<'_>,
    plate: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    results::rowwise(tx, plate, config, true, true)
}

fn results_rows_sample(
    tx: &mut Transaction<'_>,
    plate: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    results::rowwise(tx, plate, config, true, false)
}

fn results_rows_conc(
    tx: &mut Transaction<'_>,
    plate: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    results::rowwise(tx, plate, config, false, true)
}

fn results_rows(
    tx: &mut Transaction<'_>,
    plate: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    results::rowwise(tx, plate, config, false, false)
}

fn results_columns_sample(
    tx: &mut Transaction<'_>,
    plate: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    results::columnwise(tx, plate, config, true)
}

fn results_columns(
    tx: &mut Transaction<'_>,
    plate: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    results::columnwise(tx, plate, config, false)
}

fn single_matrix(
    tx: &mut Transaction<'_>,
    _: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    single::matrix(tx, config)
}

fn single_rows(tx: &mut Transaction<'_>, _: &Plate, config: &ParseConfig) -> Attempt<BlockRecords> {
    single::rowwise(tx, config)
}

fn single_columns(
    tx: &mut Transaction<'_>,
    _: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    single::columnwise(tx, config)
}

fn metadata_block(
    tx: &mut Transaction<'_>,
    _: &Plate,
    config: &ParseConfig,
) -> Attempt<BlockRecords> {
    metadata::parse(tx, config)
}
