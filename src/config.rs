//! Configuration for a disassembly run.
//!
//! Every field has a default, so a JSON file only needs to name the values
//! it changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Master configuration for the disassembler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisasmConfig {
    /// I/O configuration for loading the input file.
    pub io: IoConfig,
    /// How missing sections are treated.
    pub sections: SectionConfig,
    /// Which parts of the report are produced.
    pub output: OutputConfig,
}

impl DisasmConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// I/O configuration for file reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Maximum input file size (default: 67108864 = 64MB).
    pub max_file_size: u64,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            max_file_size: 64 * 1024 * 1024,
        }
    }
}

/// Section resolution configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Fail when `.text`, `.symtab` or `.strtab` is missing (default: true).
    /// When false a missing section is treated as empty.
    pub strict: bool,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// Report configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Append the `.symtab` listing after the disassembly (default: true).
    pub emit_symtab: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { emit_symtab: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DisasmConfig::default();
        assert_eq!(config.io.max_file_size, 64 * 1024 * 1024);
        assert!(config.sections.strict);
        assert!(config.output.emit_symtab);
    }

    #[test]
    fn test_partial_json() {
        let config =
            DisasmConfig::from_json_str(r#"{ "sections": { "strict": false } }"#).unwrap();
        assert!(!config.sections.strict);
        assert!(config.output.emit_symtab);
        assert_eq!(config.io, IoConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = DisasmConfig::default();
        config.io.max_file_size = 4096;
        config.output.emit_symtab = false;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(DisasmConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json() {
        assert!(DisasmConfig::from_json_str("{ sections: ").is_err());
    }
}
