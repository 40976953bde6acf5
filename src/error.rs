//! Error types for the disassembler.
//!
//! Format and I/O problems keep their own error types; this module wraps
//! them into the single error returned by the public API.

use thiserror::Error;

use crate::formats::elf::ElfError;
use crate::io::error::IoError;

/// Main error type for disassembly runs.
#[derive(Debug, Error)]
pub enum RvDisasmError {
    /// The input is not a usable ELF32 image
    #[error("Invalid ELF image: {0}")]
    Elf(#[from] ElfError),

    /// The input file could not be loaded
    #[error("Input error: {0}")]
    Input(#[from] IoError),

    /// Reading configuration or writing the report failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl RvDisasmError {
    /// True when the input did not start with the ELF magic.
    pub fn is_not_elf(&self) -> bool {
        matches!(self, RvDisasmError::Elf(ElfError::InvalidMagic))
    }
}

/// Result type alias for disassembler operations
pub type Result<T> = std::result::Result<T, RvDisasmError>;
