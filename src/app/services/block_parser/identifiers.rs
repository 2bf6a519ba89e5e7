//! Well, row, channel, and sample-id resolvers
//!
//! The canonical row label universe has exactly 99 entries: single letters
//! A..Z followed by double letters AA..CU, in that order. Anything outside
//! this set is not a row, which is also how sample labels like `CV1` are
//! told apart from well coordinates like `CU1`.

use std::sync::LazyLock;

use super::{Attempt, Mismatch};
use crate::app::models::SampleId;
use crate::constants::ROW_LABEL_COUNT;

static VALID_ROWS: LazyLock<Vec<String>> = LazyLock::new(|| row_iter().collect());

/// Lazily yield the canonical row labels in order, capped at
/// [`ROW_LABEL_COUNT`] so corrupt input can never push iteration past CU
pub fn row_iter() -> impl Iterator<Item = String> {
    ('A'..='Z')
        .map(String::from)
        .chain(
            ('A'..='C').flat_map(|first| ('A'..='Z').map(move |second| format!("{first}{second}"))),
        )
        .take(ROW_LABEL_COUNT)
}

/// Whether a label belongs to the canonical row universe
pub fn is_valid_row(label: &str) -> bool {
    VALID_ROWS.iter().any(|row| row == label)
}

/// Split ASCII text into its maximal leading alphabetic run and an
/// optional trailing integer
///
/// Fails on non-ASCII input or any other shape (embedded spaces,
/// punctuation, digits before letters).
pub fn split_alpha_and_number(text: &str) -> Attempt<(&str, Option<usize>)> {
    if text.is_empty() || !text.is_ascii() {
        return Err(Mismatch);
    }
    let boundary = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    if boundary == 0 {
        return Err(Mismatch);
    }
    let (alpha, digits) = text.split_at(boundary);
    if digits.is_empty() {
        return Ok((alpha, None));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Mismatch);
    }
    let number = digits.parse::<usize>().map_err(|_| Mismatch)?;
    Ok((alpha, Some(number)))
}

/// Split a well coordinate like `B12` into its row label and column
///
/// The alphabetic part must be a canonical row label and the column must
/// be present and at least 1.
pub fn split_well_name(name: &str) -> Attempt<(&str, usize)> {
    let (alpha, number) = split_alpha_and_number(name)?;
    let col = number.ok_or(Mismatch)?;
    if col == 0 || !is_valid_row(alpha) {
        return Err(Mismatch);
    }
    Ok((alpha, col))
}

/// Parse an aggregated-result header of the shape `<name> [<channel>]`
///
/// A trailing `:Spectrum` is stripped from the channel, and the resulting
/// channel must already be known to the current plate: aggregated result
/// blocks never introduce new channels.
pub fn extract_channel(text: &str, known_channels: &[String]) -> Attempt<(String, String)> {
    let inner = text.strip_suffix(']').ok_or(Mismatch)?;
    let (name, channel) = inner.rsplit_once(" [").ok_or(Mismatch)?;
    if name.is_empty() || channel.is_empty() {
        return Err(Mismatch);
    }
    let channel = channel.strip_suffix(":Spectrum").unwrap_or(channel);
    if !known_channels.iter().any(|known| known == channel) {
        return Err(Mismatch);
    }
    Ok((name.to_string(), channel.to_string()))
}

/// Parse a temperature column/row header of the shape `T° <channel>` or
/// `T <channel>`
pub fn temperature_channel(field: &str) -> Attempt<&str> {
    field
        .strip_prefix("T° ")
        .or_else(|| field.strip_prefix("T "))
        .filter(|channel| !channel.is_empty())
        .ok_or(Mismatch)
}

/// Whether a token is a layout sample label: a leading alphabetic run with
/// an optional trailing number, that is not a literal well coordinate
pub fn is_sample_label_string(label: &str) -> bool {
    match split_alpha_and_number(label) {
        Ok((_, None)) => true,
        Ok(_) => split_well_name(label).is_err(),
        Err(Mismatch) => false,
    }
}

/// Whether a parsed assignment is a valid sample id
pub fn is_sample_id(sample: &SampleId) -> bool {
    is_sample_label_string(&sample.label)
}
