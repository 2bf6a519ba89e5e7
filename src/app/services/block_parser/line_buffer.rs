//! Transactional line cursor
//!
//! [`LineBuffer`] owns the file's lines and a committed position.
//! A [`Transaction`] iterates speculatively from that position: committing
//! it permanently discards everything consumed (through and including the
//! block's blank terminator), while dropping it restores the starting
//! position for the next grammar. This is what makes it safe to try ~20
//! candidate grammars per block with zero side effects on failure.

use super::{Attempt, Mismatch};

/// The file's lines with a committed read position
#[derive(Debug)]
pub struct LineBuffer {
    lines: Vec<String>,
    start: usize,
}

impl LineBuffer {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines, start: 0 }
    }

    /// Discard the leading run of blank lines and report whether any
    /// content remains
    pub fn has_content(&mut self) -> bool {
        while self.start < self.lines.len() && self.lines[self.start].is_empty() {
            self.start += 1;
        }
        self.start < self.lines.len()
    }

    /// 1-based number of the current line, for error reporting
    pub fn line_number(&self) -> usize {
        self.start + 1
    }

    /// The current line, for error reporting
    pub fn snippet(&self) -> &str {
        self.lines.get(self.start).map_or("", String::as_str)
    }

    /// Begin a speculative read from the committed position
    pub fn transaction(&mut self) -> Transaction<'_> {
        Transaction {
            buffer: self,
            consumed: 0,
        }
    }
}

/// A speculative read over a [`LineBuffer`]
///
/// Dropping the transaction without [`Transaction::commit`] leaves the
/// buffer exactly as it was.
#[derive(Debug)]
pub struct Transaction<'a> {
    buffer: &'a mut LineBuffer,
    consumed: usize,
}

impl<'a> Transaction<'a> {
    /// The next line, or `None` at end of input
    pub fn next_line(&mut self) -> Option<&str> {
        let index = self.buffer.start + self.consumed;
        let line = self.buffer.lines.get(index)?;
        self.consumed += 1;
        Some(line)
    }

    /// The next line, treating end of input as a shape mismatch
    pub fn expect_line(&mut self) -> Attempt<&str> {
        self.next_line().ok_or(Mismatch)
    }

    /// Require the next line to be blank
    pub fn expect_blank(&mut self) -> Attempt<()> {
        match self.expect_line()? {
            "" => Ok(()),
            _ => Err(Mismatch),
        }
    }

    /// Permanently discard everything consumed by this transaction
    pub fn commit(self) {
        self.buffer.start += self.consumed;
    }
}
