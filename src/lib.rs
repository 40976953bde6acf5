//! RISC-V RV32IM disassembler for ELF32 object files.
//!
//! Reads the `.text`, `.symtab` and `.strtab` sections of a little-endian
//! ELF32 image, decodes the code into assembly text with labels for every
//! function symbol and jump target, and lists the symbol table.

pub mod config;
pub mod disasm;
pub mod error;
pub mod formats;
pub mod io;
pub mod logging;
pub mod report;

pub use config::DisasmConfig;
pub use error::{Result, RvDisasmError};
pub use report::{disassemble, Report};
