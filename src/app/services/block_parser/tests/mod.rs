//! Test utilities and shared fixtures for block parser testing
//!
//! Provides line buffer construction from literal text and canned export
//! fragments used across the test modules.

use crate::app::models::Document;
use crate::app::services::block_parser::LineBuffer;
use crate::app::services::block_parser::parse_str;
use crate::config::ParseConfig;

// Test modules
mod dispatcher_tests;
mod identifier_tests;

/// Build a line buffer from literal text
pub fn buffer(text: &str) -> LineBuffer {
    LineBuffer::new(text.lines().map(str::to_string).collect())
}

/// Parse export text with the default configuration
pub fn parse(text: &str) -> crate::Result<Document> {
    parse_str(text, &ParseConfig::default())
}

/// A row-wise kinetic block: channel OD:600, wells A1 and A2, three reads
pub fn kinetic_rowwise_block() -> String {
    [
        "OD:600",
        "",
        "Time\t0:00:30\t0:01:00\t0:01:30",
        "T\u{b0} OD:600\t23.5\t23.6\t23.7",
        "A1\t0.101\t0.202\t0.303",
        "A2\t0.111\t0.222\t0.333",
        "",
    ]
    .join("\n")
}

/// A column-wise kinetic block for the same channel and wells
pub fn kinetic_columnwise_block() -> String {
    [
        "OD:600",
        "",
        "Time\tT\u{b0} OD:600\tA1\tA2",
        "0:00:30\t23.5\t0.101\t0.111",
        "0:01:00\t23.6\t0.202\t0.222",
        "0:01:30\t23.7\t0.303\t0.333",
        "",
    ]
    .join("\n")
}

/// A layout block assigning SPL1 (with concentrations) to row A
pub fn layout_block() -> String {
    [
        "Layout",
        "\t1\t2",
        "A\tSPL1\tSPL1\tWell ID",
        "\t10\t20\tConc/Dil",
        "B\tBLK\t\tWell ID",
        "",
    ]
    .join("\n")
}
