//! Gain table block
//!
//! A literal `Gain Values` header followed by one `channel<sep>value` line
//! per channel. Channels must be distinct within the block; a channel that
//! already carries a gain on the plate signals a new plate.

use std::collections::HashSet;

use super::super::line_buffer::Transaction;
use super::super::records::BlockRecords;
use super::super::tokens::parse_number;
use super::super::{Attempt, Mismatch};
use super::split_fields;
use crate::config::ParseConfig;
use crate::constants::headers;

pub(crate) fn parse(tx: &mut Transaction<'_>, config: &ParseConfig) -> Attempt<BlockRecords> {
    if tx.expect_line()? != headers::GAINS {
        return Err(Mismatch);
    }
    let mut gains = Vec::new();
    let mut seen = HashSet::new();
    while let Some(line) = tx.next_line() {
        if line.is_empty() {
            break;
        }
        let fields = split_fields(line, config.separator);
        if fields.len() != 2 || fields[0].is_empty() {
            return Err(Mismatch);
        }
        if !seen.insert(fields[0].clone()) {
            return Err(Mismatch);
        }
        let value = parse_number(&fields[1])?;
        gains.push((fields[0].clone(), value));
    }
    if gains.is_empty() {
        return Err(Mismatch);
    }
    Ok(BlockRecords::Gains(gains))
}
