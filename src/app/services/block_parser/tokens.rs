//! Sentinel-tolerant token parsers
//!
//! The export format represents special numeric conditions textually:
//! `?????` for a missing measurement, `OVRFLW` for detector saturation,
//! and a leading `<` for values below the detection limit. Every parser
//! here fails with a plain [`Mismatch`] so a wrong grammar is abandoned
//! cleanly by the dispatcher.

use std::sync::LazyLock;

use regex::Regex;

use super::{Attempt, Mismatch};
use crate::constants::{SENTINEL_MISSING, SENTINEL_OVERFLOW};

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Time\s+(\d+) \((\d+:\d{2}:\d{2})\)$").expect("valid pattern"));

/// Parse a measurement value
///
/// - empty or `?????` → NaN (missing)
/// - `OVRFLW` → +infinity (saturated)
/// - `<x` with numeric `x` → 0 (below detection limit)
/// - any other numeric literal → its value
pub fn parse_number(string: &str) -> Attempt<f64> {
    let token = string.trim();
    if token.is_empty() || token == SENTINEL_MISSING {
        return Ok(f64::NAN);
    }
    if token == SENTINEL_OVERFLOW {
        return Ok(f64::INFINITY);
    }
    if let Some(censored) = token.strip_prefix('<') {
        return match censored.trim().parse::<f64>() {
            Ok(_) => Ok(0.0),
            Err(_) => Err(Mismatch),
        };
    }
    token.parse::<f64>().map_err(|_| Mismatch)
}

/// Parse an `H:MM:SS` duration into seconds; `?????` → NaN
pub fn parse_time(string: &str) -> Attempt<f64> {
    let token = string.trim();
    if token == SENTINEL_MISSING {
        return Ok(f64::NAN);
    }
    let mut parts = token.split(':');
    let (hours, minutes, seconds) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(s), None) if m.len() == 2 && s.len() == 2 => (h, m, s),
        _ => return Err(Mismatch),
    };
    let hours: u64 = hours.parse().map_err(|_| Mismatch)?;
    let minutes: u64 = minutes.parse().map_err(|_| Mismatch)?;
    let seconds: u64 = seconds.parse().map_err(|_| Mismatch)?;
    let total = hours
        .checked_mul(60)
        .and_then(|h| h.checked_add(minutes))
        .and_then(|hm| hm.checked_mul(60))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or(Mismatch)?;
    Ok(total as f64)
}

/// Parse a `Time <read#> (<time>)` header into (read number, seconds)
///
/// Used to cross-check the duplicated per-read time headers of indexed
/// matrix blocks.
pub fn parse_timestamp(string: &str) -> Attempt<(u32, f64)> {
    let captures = TIMESTAMP_RE.captures(string.trim()).ok_or(Mismatch)?;
    let number = captures[1].parse::<u32>().map_err(|_| Mismatch)?;
    let seconds = parse_time(&captures[2])?;
    Ok((number, seconds))
}

/// Parse a field that is a time-of-day in some file variants and a plain
/// number in others; the first parser that succeeds wins
pub fn parse_time_or_number(string: &str) -> Attempt<f64> {
    parse_time(string).or_else(|_| parse_number(string))
}
