//! Reading and decoding export files
//!
//! Synergy exports are written in a single-byte legacy encoding, not
//! UTF-8, so files are read as raw bytes and decoded byte-for-byte with
//! the configured table. Line splitting recognizes `\r\n`, `\n`, and bare
//! `\r` endings; no other character ends a line.

use std::path::Path;

use crate::config::{Encoding, ParseConfig};
use crate::{Error, Result};

/// Read a file's bytes and decode them with the configured encoding
pub fn read_to_string(path: impl AsRef<Path>, config: &ParseConfig) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
    let encoding = config.resolved_encoding()?;
    Ok(decode(&bytes, encoding))
}

/// Decode raw bytes with a single-byte legacy encoding
pub fn decode(bytes: &[u8], encoding: Encoding) -> String {
    bytes
        .iter()
        .map(|&byte| match encoding {
            Encoding::Latin1 => byte as char,
            Encoding::Windows1252 => windows_1252(byte),
        })
        .collect()
}

/// Split decoded text into lines on `\r\n`, `\n`, or bare `\r` only
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\n' => lines.push(std::mem::take(&mut current)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            other => current.push(other),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Windows-1252 maps 0x80..=0x9F onto printable characters; everything
/// else coincides with Latin-1
fn windows_1252(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        other => other as char,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_decodes_every_byte() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = decode(&bytes, Encoding::Latin1);
        assert_eq!(text.chars().count(), 256);
        assert_eq!(text.chars().last(), Some('\u{FF}'));
    }

    #[test]
    fn test_windows_1252_remaps_control_range() {
        assert_eq!(decode(&[0x80], Encoding::Windows1252), "\u{20AC}");
        assert_eq!(decode(&[0x94], Encoding::Windows1252), "\u{201D}");
        assert_eq!(decode(&[0xE9], Encoding::Windows1252), "\u{E9}");
    }

    #[test]
    fn test_split_lines_handles_all_endings() {
        let lines = split_lines("a\r\nb\nc\rd");
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_lines_keeps_interior_blanks() {
        let lines = split_lines("a\n\nb\n");
        assert_eq!(lines, vec!["a", "", "b"]);
    }
}
