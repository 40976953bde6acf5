//! Common test utilities and helpers.
//!
//! Integration tests build their ELF32 inputs in memory with [`ElfBuilder`]
//! instead of relying on sample binaries.

#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

/// `info` byte for a global function symbol
pub const GLOBAL_FUNC: u8 = 0x12;
/// `info` byte for a local untyped symbol
pub const LOCAL_NOTYPE: u8 = 0x00;

const EHDR_SIZE: usize = 52;
const SHDR_SIZE: usize = 40;
const SYM_SIZE: usize = 16;

const SHT_PROGBITS: u32 = 1;
const SHT_SYMTAB: u32 = 2;
const SHT_STRTAB: u32 = 3;

pub struct TestSymbol {
    pub name: String,
    pub value: u32,
    pub size: u32,
    pub info: u8,
    pub other: u8,
    pub shndx: u16,
}

/// Minimal little-endian ELF32 RISC-V relocatable with `.text`, `.symtab`,
/// `.strtab` and `.shstrtab`.
///
/// Symbol index 0 is always the null symbol, as in real object files.
pub struct ElfBuilder {
    text_addr: u32,
    code: Vec<u32>,
    trailing: Vec<u8>,
    symbols: Vec<TestSymbol>,
    with_symtab: bool,
}

impl ElfBuilder {
    pub fn new(text_addr: u32) -> Self {
        Self {
            text_addr,
            code: Vec::new(),
            trailing: Vec::new(),
            symbols: Vec::new(),
            with_symtab: true,
        }
    }

    pub fn code(mut self, words: &[u32]) -> Self {
        self.code.extend_from_slice(words);
        self
    }

    /// Extra `.text` bytes after the last whole word.
    pub fn trailing_bytes(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    pub fn symbol(mut self, name: &str, value: u32, size: u32, info: u8) -> Self {
        self.symbols.push(TestSymbol {
            name: name.to_string(),
            value,
            size,
            info,
            other: 0,
            shndx: 1,
        });
        self
    }

    pub fn raw_symbol(mut self, symbol: TestSymbol) -> Self {
        self.symbols.push(symbol);
        self
    }

    /// Leave out `.symtab` and `.strtab` entirely.
    pub fn without_symtab(mut self) -> Self {
        self.with_symtab = false;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![0u8; EHDR_SIZE];

        // .text
        let text_offset = data.len();
        for word in &self.code {
            data.extend_from_slice(&word.to_le_bytes());
        }
        data.extend_from_slice(&self.trailing);
        let text_size = data.len() - text_offset;
        align4(&mut data);

        // .strtab
        let strtab_offset = data.len();
        let mut name_offsets = Vec::new();
        data.push(0);
        for sym in &self.symbols {
            name_offsets.push((data.len() - strtab_offset) as u32);
            data.extend_from_slice(sym.name.as_bytes());
            data.push(0);
        }
        let strtab_size = data.len() - strtab_offset;
        align4(&mut data);

        // .symtab
        let symtab_offset = data.len();
        data.extend_from_slice(&[0u8; SYM_SIZE]);
        for (sym, name) in self.symbols.iter().zip(&name_offsets) {
            data.extend_from_slice(&name.to_le_bytes());
            data.extend_from_slice(&sym.value.to_le_bytes());
            data.extend_from_slice(&sym.size.to_le_bytes());
            data.push(sym.info);
            data.push(sym.other);
            data.extend_from_slice(&sym.shndx.to_le_bytes());
        }
        let symtab_size = data.len() - symtab_offset;

        // .shstrtab
        let shstrtab_offset = data.len();
        let names = b"\0.text\0.symtab\0.strtab\0.shstrtab\0";
        data.extend_from_slice(names);
        let shstrtab_size = names.len();
        align4(&mut data);

        // section headers: null, .text, [.symtab, .strtab,] .shstrtab
        let shoff = data.len();
        data.extend_from_slice(&[0u8; SHDR_SIZE]);
        push_shdr(
            &mut data,
            [1, SHT_PROGBITS, 6, self.text_addr, text_offset as u32, text_size as u32, 0, 0, 4, 0],
        );
        let mut shnum = 2u16;
        if self.with_symtab {
            push_shdr(
                &mut data,
                [7, SHT_SYMTAB, 0, 0, symtab_offset as u32, symtab_size as u32, 3, 1, 4, SYM_SIZE as u32],
            );
            push_shdr(
                &mut data,
                [15, SHT_STRTAB, 0, 0, strtab_offset as u32, strtab_size as u32, 0, 0, 1, 0],
            );
            shnum += 2;
        }
        push_shdr(
            &mut data,
            [23, SHT_STRTAB, 0, 0, shstrtab_offset as u32, shstrtab_size as u32, 0, 0, 1, 0],
        );
        let shstrndx = shnum;
        shnum += 1;

        // ELF header
        data[0..4].copy_from_slice(b"\x7fELF");
        data[4] = 1; // ELFCLASS32
        data[5] = 1; // ELFDATA2LSB
        data[6] = 1; // EV_CURRENT
        put_u16(&mut data, 16, 1); // ET_REL
        put_u16(&mut data, 18, 243); // EM_RISCV
        put_u32(&mut data, 20, 1);
        put_u32(&mut data, 0x20, shoff as u32);
        put_u16(&mut data, 40, EHDR_SIZE as u16);
        put_u16(&mut data, 46, SHDR_SIZE as u16);
        put_u16(&mut data, 0x30, shnum);
        put_u16(&mut data, 0x32, shstrndx);

        data
    }
}

fn align4(data: &mut Vec<u8>) {
    while data.len() % 4 != 0 {
        data.push(0);
    }
}

fn push_shdr(data: &mut Vec<u8>, fields: [u32; 10]) {
    for field in fields {
        data.extend_from_slice(&field.to_le_bytes());
    }
}

fn put_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Creates a temporary file with the given content.
pub fn create_temp_file(content: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content).unwrap();
    temp_file
}
