//! Core ELF32 types, constants and symbol classification lookups

use std::fmt;

/// ELF parsing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElfError {
    InvalidMagic,
    InvalidOffset { offset: usize },
    Truncated { offset: usize, needed: usize },
    MissingSection(&'static str),
    MisalignedSection {
        name: &'static str,
        size: usize,
        entry: usize,
    },
}

impl fmt::Display for ElfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMagic => write!(f, "not an ELF file"),
            Self::InvalidOffset { offset } => write!(f, "Invalid offset: {:#x}", offset),
            Self::Truncated { offset, needed } => {
                write!(f, "Truncated at {:#x}, needed {} bytes", offset, needed)
            }
            Self::MissingSection(name) => write!(f, "Missing required section {}", name),
            Self::MisalignedSection { name, size, entry } => write!(
                f,
                "Section {} size {:#x} is not a multiple of {}",
                name, size, entry
            ),
        }
    }
}

impl std::error::Error for ElfError {}

pub type Result<T> = std::result::Result<T, ElfError>;

/// ELF magic number
pub const ELF_MAGIC: &[u8; 4] = b"\x7fELF";

/// ELF32 header field offsets
pub const E_SHOFF: usize = 0x20;
pub const E_SHNUM: usize = 0x30;
pub const E_SHSTRNDX: usize = 0x32;

/// ELF32 section header layout
pub const SHDR_SIZE: usize = 40;
pub const SH_NAME: usize = 0;
pub const SH_ADDR: usize = 12;
pub const SH_OFFSET: usize = 16;
pub const SH_SIZE: usize = 20;

/// ELF32 symbol record layout
pub const SYM_SIZE: usize = 16;
pub const ST_NAME: usize = 0;
pub const ST_VALUE: usize = 4;
pub const ST_SIZE: usize = 8;
pub const ST_INFO: usize = 12;
pub const ST_OTHER: usize = 13;
pub const ST_SHNDX: usize = 14;

/// Section names the disassembler cares about
pub const TEXT: &str = ".text";
pub const SYMTAB: &str = ".symtab";
pub const STRTAB: &str = ".strtab";

/// Symbol types
pub const STT_FUNC: u8 = 2;

/// Location of one section of interest.
///
/// `virtual_address` is only meaningful for `.text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    pub name: &'static str,
    pub file_offset: u32,
    pub size: u32,
    pub virtual_address: u32,
}

impl SectionInfo {
    /// Placeholder for a section that was not found (lenient mode).
    pub fn empty(name: &'static str) -> Self {
        Self {
            name,
            file_offset: 0,
            size: 0,
            virtual_address: 0,
        }
    }

    /// File offset one past the end of the section.
    pub fn end(&self) -> usize {
        self.file_offset as usize + self.size as usize
    }

    /// Difference between a file offset in this section and its virtual address.
    pub fn address_of(&self, file_offset: usize) -> u32 {
        (file_offset as u32).wrapping_add(self.virtual_address.wrapping_sub(self.file_offset))
    }
}

/// One 16-byte `.symtab` record with its resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub value: u32,
    pub size: u32,
    pub info: u8,
    pub other: u8,
    pub section_index: u16,
}

impl SymbolEntry {
    pub fn st_type(&self) -> u8 {
        self.info & 0xf
    }

    pub fn is_function(&self) -> bool {
        self.st_type() == STT_FUNC
    }

    pub fn symbol_type(&self) -> SymbolType {
        SymbolType::from_info(self.info)
    }

    pub fn binding(&self) -> SymbolBind {
        SymbolBind::from_info(self.info)
    }

    pub fn visibility(&self) -> SymbolVisibility {
        SymbolVisibility::from(self.other)
    }

    pub fn index(&self) -> SectionIndex {
        SectionIndex::from(self.section_index)
    }
}

/// Symbol type from the low nibble of `st_info`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolType {
    NoType,
    Object,
    Func,
    Section,
    File,
    Common,
    Tls,
    LoOs,
    HiOs,
    LoProc,
    HiProc,
    Unknown,
}

impl SymbolType {
    pub fn from_info(info: u8) -> Self {
        match info & 0xf {
            0 => SymbolType::NoType,
            1 => SymbolType::Object,
            2 => SymbolType::Func,
            3 => SymbolType::Section,
            4 => SymbolType::File,
            5 => SymbolType::Common,
            6 => SymbolType::Tls,
            10 => SymbolType::LoOs,
            12 => SymbolType::HiOs,
            13 => SymbolType::LoProc,
            15 => SymbolType::HiProc,
            _ => SymbolType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolType::NoType => "NOTYPE",
            SymbolType::Object => "OBJECT",
            SymbolType::Func => "FUNC",
            SymbolType::Section => "SECTION",
            SymbolType::File => "FILE",
            SymbolType::Common => "COMMON",
            SymbolType::Tls => "TLS",
            SymbolType::LoOs => "LOOS",
            SymbolType::HiOs => "HIOS",
            SymbolType::LoProc => "LOPROC",
            SymbolType::HiProc => "HIPROC",
            SymbolType::Unknown => "UNKNOWN",
        }
    }
}

/// Symbol binding from the high nibble of `st_info`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolBind {
    Local,
    Global,
    Weak,
    LoOs,
    HiOs,
    LoProc,
    HiProc,
    Unknown,
}

impl SymbolBind {
    pub fn from_info(info: u8) -> Self {
        match info >> 4 {
            0 => SymbolBind::Local,
            1 => SymbolBind::Global,
            2 => SymbolBind::Weak,
            10 => SymbolBind::LoOs,
            12 => SymbolBind::HiOs,
            13 => SymbolBind::LoProc,
            15 => SymbolBind::HiProc,
            _ => SymbolBind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolBind::Local => "LOCAL",
            SymbolBind::Global => "GLOBAL",
            SymbolBind::Weak => "WEAK",
            SymbolBind::LoOs => "LOOS",
            SymbolBind::HiOs => "HIOS",
            SymbolBind::LoProc => "LOPROC",
            SymbolBind::HiProc => "HIPROC",
            SymbolBind::Unknown => "UNKNOWN",
        }
    }
}

/// Symbol visibility from `st_other`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolVisibility {
    Default,
    Internal,
    Hidden,
    Protected,
    Unknown,
}

impl From<u8> for SymbolVisibility {
    fn from(other: u8) -> Self {
        match other {
            0 => SymbolVisibility::Default,
            1 => SymbolVisibility::Internal,
            2 => SymbolVisibility::Hidden,
            3 => SymbolVisibility::Protected,
            _ => SymbolVisibility::Unknown,
        }
    }
}

impl SymbolVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolVisibility::Default => "DEFAULT",
            SymbolVisibility::Internal => "INTERNAL",
            SymbolVisibility::Hidden => "HIDDEN",
            SymbolVisibility::Protected => "PROTECTED",
            SymbolVisibility::Unknown => "UNKNOWN",
        }
    }
}

/// Section index of a symbol, with the reserved values named
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionIndex {
    Undef,
    LoProc,
    After,
    Amd64LCommon,
    HiProc,
    LoOs,
    HiOs,
    Abs,
    Common,
    XIndex,
    Index(u16),
}

impl From<u16> for SectionIndex {
    fn from(idx: u16) -> Self {
        match idx {
            0 => SectionIndex::Undef,
            0xff00 => SectionIndex::LoProc,
            0xff01 => SectionIndex::After,
            0xff02 => SectionIndex::Amd64LCommon,
            0xff1f => SectionIndex::HiProc,
            0xff20 => SectionIndex::LoOs,
            0xff3f => SectionIndex::HiOs,
            0xfff1 => SectionIndex::Abs,
            0xfff2 => SectionIndex::Common,
            0xffff => SectionIndex::XIndex,
            other => SectionIndex::Index(other),
        }
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for SymbolBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for SymbolVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for SectionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionIndex::Undef => "UNDEF",
            SectionIndex::LoProc => "LOPROC",
            SectionIndex::After => "AFTER",
            SectionIndex::Amd64LCommon => "AMD64_LCOMMON",
            SectionIndex::HiProc => "HIPROC",
            SectionIndex::LoOs => "LOOS",
            SectionIndex::HiOs => "HIOS",
            SectionIndex::Abs => "ABS",
            SectionIndex::Common => "COMMON",
            SectionIndex::XIndex => "XINDEX",
            SectionIndex::Index(idx) => return f.pad(&idx.to_string()),
        };
        f.pad(name)
    }
}
