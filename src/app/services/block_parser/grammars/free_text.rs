//! Verbatim free-text blocks (procedure details, curve-fit reports)
//!
//! A literal header line, a blank line, then verbatim text up to the next
//! blank line, stored under one metadata key. Embedded separator
//! characters are normalized back to literal tabs so a non-default
//! separator cannot corrupt the text.

use super::super::line_buffer::Transaction;
use super::super::records::BlockRecords;
use super::super::{Attempt, Mismatch};
use crate::config::ParseConfig;

pub(crate) fn parse(
    tx: &mut Transaction<'_>,
    config: &ParseConfig,
    header: &str,
    key: &str,
) -> Attempt<BlockRecords> {
    if tx.expect_line()? != header {
        return Err(Mismatch);
    }
    tx.expect_blank()?;
    let mut lines: Vec<String> = Vec::new();
    while let Some(line) = tx.next_line() {
        if line.is_empty() {
            break;
        }
        let line = if config.separator == '\t' {
            line.to_string()
        } else {
            line.replace(config.separator, "\t")
        };
        lines.push(line);
    }
    Ok(BlockRecords::FreeText {
        key: key.to_string(),
        text: lines.join("\n"),
    })
}
