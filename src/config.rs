//! Parser configuration.
//!
//! Provides the configuration structure controlling how export files are
//! decoded and split into fields before the block grammars see them.

use crate::constants::{DEFAULT_ENCODING, DEFAULT_SEPARATOR};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Legacy single-byte encodings produced by Synergy control software
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    /// ISO-8859-1 (the instrument default)
    Latin1,
    /// Windows-1252 (exports saved through Windows tooling)
    Windows1252,
}

impl Encoding {
    /// Resolve an encoding from its WHATWG-style label
    pub fn from_label(label: &str) -> Result<Self> {
        match label.to_ascii_lowercase().as_str() {
            "iso-8859-1" | "latin-1" | "latin1" | "l1" => Ok(Encoding::Latin1),
            "windows-1252" | "cp1252" => Ok(Encoding::Windows1252),
            other => Err(Error::configuration(format!(
                "Unsupported encoding label '{other}' (expected iso-8859-1 or windows-1252)"
            ))),
        }
    }
}

/// Global configuration for parsing a Synergy export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseConfig {
    /// Single-character field separator used inside blocks
    pub separator: char,

    /// Encoding label used to decode the file bytes
    pub encoding: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl ParseConfig {
    /// Create configuration with a custom field separator
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Create configuration with a custom encoding label
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Resolve the configured encoding label
    pub fn resolved_encoding(&self) -> Result<Encoding> {
        Encoding::from_label(&self.encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParseConfig::default();
        assert_eq!(config.separator, '\t');
        assert_eq!(config.resolved_encoding().unwrap(), Encoding::Latin1);
    }

    #[test]
    fn test_encoding_labels() {
        assert_eq!(Encoding::from_label("Latin-1").unwrap(), Encoding::Latin1);
        assert_eq!(
            Encoding::from_label("cp1252").unwrap(),
            Encoding::Windows1252
        );
        assert!(Encoding::from_label("utf-16").is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = ParseConfig::default()
            .with_separator(';')
            .with_encoding("windows-1252");
        assert_eq!(config.separator, ';');
        assert_eq!(
            config.resolved_encoding().unwrap(),
            Encoding::Windows1252
        );
    }
}
