//! Section header walk for `.text`, `.symtab` and `.strtab`

use crate::formats::elf::types::*;
use crate::formats::elf::utils::{check_bounds, ByteReader};
use tracing::{debug, trace, warn};

/// The three sections the disassembler needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSections {
    pub text: SectionInfo,
    pub symtab: SectionInfo,
    pub strtab: SectionInfo,
}

impl ResolvedSections {
    /// Walk the section header table and pick out the sections of interest by name.
    ///
    /// With `strict` set a missing section is an error; otherwise it resolves
    /// to an empty range and the corresponding pass does nothing.
    pub fn resolve(reader: &ByteReader<'_>, strict: bool) -> Result<Self> {
        let sh_offset = reader.read_u32(E_SHOFF)? as usize;
        let sh_num = reader.read_u16(E_SHNUM)? as usize;
        let sh_strndx = reader.read_u16(E_SHSTRNDX)? as usize;

        debug!(
            e_shoff = sh_offset,
            e_shnum = sh_num,
            e_shstrndx = sh_strndx,
            "Walking section headers"
        );

        let mut text = None;
        let mut symtab = None;
        let mut strtab = None;

        if sh_num > 0 {
            check_bounds(sh_offset, sh_num * SHDR_SIZE, reader.len())?;
            if sh_strndx >= sh_num {
                return Err(ElfError::InvalidOffset {
                    offset: sh_offset + sh_strndx * SHDR_SIZE,
                });
            }
            let names_offset =
                reader.read_u32(sh_offset + sh_strndx * SHDR_SIZE + SH_OFFSET)? as usize;

            for i in 0..sh_num {
                let entry = sh_offset + i * SHDR_SIZE;
                let name_offset = reader.read_u32(entry + SH_NAME)? as usize;
                let name = reader.read_cstring(names_offset + name_offset)?;
                trace!(index = i, name = %name, "Section header");

                let slot = match name.as_str() {
                    TEXT => &mut text,
                    SYMTAB => &mut symtab,
                    STRTAB => &mut strtab,
                    _ => continue,
                };
                *slot = Some(parse_section_info(reader, entry, &name)?);
            }
        }

        let text = require(text, TEXT, strict)?;
        let symtab = require(symtab, SYMTAB, strict)?;
        let strtab = require(strtab, STRTAB, strict)?;

        check_bounds(text.file_offset as usize, text.size as usize, reader.len())?;
        check_bounds(symtab.file_offset as usize, symtab.size as usize, reader.len())?;
        if symtab.size as usize % SYM_SIZE != 0 {
            return Err(ElfError::MisalignedSection {
                name: SYMTAB,
                size: symtab.size as usize,
                entry: SYM_SIZE,
            });
        }

        debug!(
            text.addr = text.virtual_address,
            text.offset = text.file_offset,
            text.size = text.size,
            symtab.offset = symtab.file_offset,
            symtab.size = symtab.size,
            strtab.offset = strtab.file_offset,
            "Resolved sections"
        );

        Ok(Self {
            text,
            symtab,
            strtab,
        })
    }
}

/// Read the fields recorded for a matched section header at `entry`.
fn parse_section_info(reader: &ByteReader<'_>, entry: usize, name: &str) -> Result<SectionInfo> {
    let file_offset = reader.read_u32(entry + SH_OFFSET)?;
    Ok(match name {
        TEXT => SectionInfo {
            name: TEXT,
            file_offset,
            size: reader.read_u32(entry + SH_SIZE)?,
            virtual_address: reader.read_u32(entry + SH_ADDR)?,
        },
        SYMTAB => SectionInfo {
            name: SYMTAB,
            file_offset,
            size: reader.read_u32(entry + SH_SIZE)?,
            virtual_address: 0,
        },
        _ => SectionInfo {
            name: STRTAB,
            file_offset,
            size: 0,
            virtual_address: 0,
        },
    })
}

fn require(found: Option<SectionInfo>, name: &'static str, strict: bool) -> Result<SectionInfo> {
    match found {
        Some(info) => Ok(info),
        None if strict => Err(ElfError::MissingSection(name)),
        None => {
            warn!(section = name, "Section not found, treating it as empty");
            Ok(SectionInfo::empty(name))
        }
    }
}
