//! Key/value metadata block
//!
//! The most permissive shape, tried last: every line holds exactly one
//! separator, splitting into a key (with an optional trailing colon) and a
//! verbatim value. The whole block is handed to the plate in one batch so
//! a duplicate key applies none of it.

use super::super::line_buffer::Transaction;
use super::super::records::BlockRecords;
use super::super::{Attempt, Mismatch};
use crate::config::ParseConfig;

pub(crate) fn parse(tx: &mut Transaction<'_>, config: &ParseConfig) -> Attempt<BlockRecords> {
    let mut pairs = Vec::new();
    while let Some(line) = tx.next_line() {
        if line.is_empty() {
            break;
        }
        if line.matches(config.separator).count() != 1 {
            return Err(Mismatch);
        }
        let (key, value) = line.split_once(config.separator).ok_or(Mismatch)?;
        let key = key.strip_suffix(':').unwrap_or(key);
        if key.is_empty() {
            return Err(Mismatch);
        }
        pairs.push((key.to_string(), value.to_string()));
    }
    if pairs.is_empty() {
        return Err(Mismatch);
    }
    Ok(BlockRecords::Metadata(pairs))
}
