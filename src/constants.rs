//! Application constants for the Synergy export parser
//!
//! This module contains the sentinel tokens, canonical plate geometry,
//! block header literals, and metadata conventions shared across the
//! parsing engine.

// =============================================================================
// Sentinel Tokens
// =============================================================================

/// Placeholder the reader emits for a missing measurement
pub const SENTINEL_MISSING: &str = "?????";

/// Placeholder the reader emits when a measurement saturated the detector
pub const SENTINEL_OVERFLOW: &str = "OVRFLW";

// =============================================================================
// Plate Geometry
// =============================================================================

/// Number of canonical row labels (A..Z, then AA..CU)
///
/// 99 rows cover every plate format the instrument family supports
/// (up to 3456-well). Iteration over row labels is capped at this count
/// so corrupt input can never drive the label generator past it.
pub const ROW_LABEL_COUNT: usize = 99;

/// Column names that aggregate over wells and must never become channels
pub const SYNTHETIC_AGGREGATES: &[&str] = &["Count", "Mean", "StDev", "Std Dev", "CV"];

// =============================================================================
// Block Header Literals
// =============================================================================

/// Fixed first lines and corner cells recognized by the block grammars
pub mod headers {
    /// Free-text block holding the measurement procedure
    pub const PROCEDURE: &str = "Procedure Details";

    /// Free-text block holding a curve-fit report
    pub const CURVE_FIT: &str = "Curve Fitting Results";

    /// Gain table block
    pub const GAINS: &str = "Gain Values";

    /// Plate layout block
    pub const LAYOUT: &str = "Layout";

    /// Corner cell of a time-series table
    pub const TIME: &str = "Time";

    /// Corner cell of a spectrum table
    pub const WAVELENGTH: &str = "Wavelength";

    /// Corner cell of row/column oriented result tables
    pub const WELL: &str = "Well";

    /// Sample-id column/row marker in result tables
    pub const SAMPLE_ID: &str = "Sample ID";

    /// Concentration column marker in layout and result tables
    pub const CONC: &str = "Conc/Dil";

    /// Trailing tag of a layout sample-id line
    pub const WELL_ID: &str = "Well ID";
}

// =============================================================================
// Metadata Conventions
// =============================================================================

/// Metadata keys that legitimately repeat across blocks; repeats fold into
/// the plate's running temperature range instead of signalling a new plate
pub const EXEMPT_TEMPERATURE_KEYS: &[&str] =
    &["Min Temperature", "Max Temperature", "Actual Temperature"];

/// Metadata key whose dotted value is decomposed into an integer tuple
pub const SOFTWARE_VERSION_KEY: &str = "Software Version";

/// Key under which a combined `Date` + `Time` pair is stored
pub const COMBINED_DATETIME_KEY: &str = "datetime";

/// Key under which the procedure free-text block is stored
pub const PROCEDURE_KEY: &str = "procedure";

/// Date-time patterns tried in order when combining `Date` and `Time`
/// metadata fields (US firmware first, then European and ISO exports)
pub const DATETIME_PATTERNS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

// =============================================================================
// Input Defaults
// =============================================================================

/// Default field separator in Synergy text exports
pub const DEFAULT_SEPARATOR: char = '\t';

/// Default single-byte encoding of Synergy text exports
pub const DEFAULT_ENCODING: &str = "iso-8859-1";
