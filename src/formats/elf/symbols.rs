//! Symbol table parsing

use crate::formats::elf::types::*;
use crate::formats::elf::utils::ByteReader;
use tracing::trace;

/// All `.symtab` records in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<SymbolEntry>,
}

impl SymbolTable {
    /// Parse every 16-byte record in `symtab`, resolving names against `strtab`.
    pub fn parse(
        reader: &ByteReader<'_>,
        symtab: &SectionInfo,
        strtab: &SectionInfo,
    ) -> Result<Self> {
        let start = symtab.file_offset as usize;
        let mut symbols = Vec::with_capacity(symtab.size as usize / SYM_SIZE);

        for offset in (start..symtab.end()).step_by(SYM_SIZE) {
            let symbol = parse_symbol(reader, offset, strtab)?;
            trace!(
                index = symbols.len(),
                name = %symbol.name,
                value = symbol.value,
                info = symbol.info,
                "Symbol"
            );
            symbols.push(symbol);
        }

        Ok(Self { symbols })
    }

    /// Get all records in file order
    pub fn entries(&self) -> &[SymbolEntry] {
        &self.symbols
    }

    /// Get symbol by index
    pub fn by_index(&self, index: usize) -> Option<&SymbolEntry> {
        self.symbols.get(index)
    }

    /// `(address, name)` for every function symbol, in file order
    pub fn function_labels(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.symbols
            .iter()
            .filter(|s| s.is_function())
            .map(|s| (s.value, s.name.as_str()))
    }

    /// Count total symbols
    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Parse a single symbol entry
fn parse_symbol(reader: &ByteReader<'_>, offset: usize, strtab: &SectionInfo) -> Result<SymbolEntry> {
    let name_offset = reader.read_u32(offset + ST_NAME)? as usize;
    let name = reader.read_cstring(strtab.file_offset as usize + name_offset)?;
    Ok(SymbolEntry {
        name,
        value: reader.read_u32(offset + ST_VALUE)?,
        size: reader.read_u32(offset + ST_SIZE)?,
        info: reader.read_u8(offset + ST_INFO)?,
        other: reader.read_u8(offset + ST_OTHER)?,
        section_index: reader.read_u16(offset + ST_SHNDX)?,
    })
}
