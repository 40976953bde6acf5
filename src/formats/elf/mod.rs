//! ELF32 little-endian reader
//!
//! Just enough of the format to disassemble an object file: the section
//! header walk for `.text`, `.symtab` and `.strtab`, and the symbol records.

pub mod sections;
pub mod symbols;
pub mod types;
pub mod utils;

use sections::ResolvedSections;
use symbols::SymbolTable;
pub use types::*;
use utils::ByteReader;

/// A validated ELF image with its sections of interest located.
pub struct ElfImage<'data> {
    reader: ByteReader<'data>,
    sections: ResolvedSections,
}

impl<'data> ElfImage<'data> {
    /// Check the magic and resolve sections.
    pub fn parse(data: &'data [u8], strict_sections: bool) -> Result<Self> {
        let reader = ByteReader::new(data)?;
        let sections = ResolvedSections::resolve(&reader, strict_sections)?;
        Ok(Self { reader, sections })
    }

    pub fn text(&self) -> &SectionInfo {
        &self.sections.text
    }

    /// Parse the full symbol table
    pub fn symbols(&self) -> Result<SymbolTable> {
        SymbolTable::parse(&self.reader, &self.sections.symtab, &self.sections.strtab)
    }

    /// `(file_offset, word)` for every whole 4-byte word in `.text`.
    pub fn text_words(&self) -> impl Iterator<Item = Result<(usize, u32)>> + '_ {
        let text = &self.sections.text;
        let whole = text.size as usize / 4 * 4;
        let start = text.file_offset as usize;
        (start..start + whole)
            .step_by(4)
            .map(move |offset| self.reader.word_at(offset).map(|word| (offset, word)))
    }
}
