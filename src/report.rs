//! The disassembly report: a `.text` listing followed by a `.symtab` listing.
//!
//! [`disassemble`] is the whole pipeline from raw bytes to report lines;
//! nothing here touches the filesystem.

use std::fmt;
use std::io::Write;

use tracing::info_span;

use crate::config::DisasmConfig;
use crate::disasm::labels::LabelMap;
use crate::disasm::riscv::DecodedInstruction;
use crate::disasm::{build_labels, decode_text};
use crate::error::Result;
use crate::formats::elf::symbols::SymbolTable;
use crate::formats::elf::{ElfImage, SymbolEntry};

/// Disassemble an ELF32 RISC-V image held in memory.
pub fn disassemble(data: &[u8], config: &DisasmConfig) -> Result<Report> {
    let _span = info_span!("disassemble", bytes = data.len()).entered();

    let image = ElfImage::parse(data, config.sections.strict)?;
    let symbols = image.symbols()?;
    let instructions = decode_text(&image)?;
    let labels = build_labels(&symbols, &instructions);

    let mut report = Report::default();
    report.push_text(&instructions, &labels);
    if config.output.emit_symtab {
        report.push_symtab(&symbols);
    }
    Ok(report)
}

/// Rendered report lines, without line terminators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Write every line followed by `\n`.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        for line in &self.lines {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }

    fn push_text(&mut self, instructions: &[DecodedInstruction], labels: &LabelMap) {
        self.lines.push(".text".to_string());
        for insn in instructions {
            if let Some(name) = labels.get(insn.address) {
                self.lines.push(label_line(insn.address, name));
            }
            self.lines.push(instruction_line(insn, labels));
        }
    }

    fn push_symtab(&mut self, symbols: &SymbolTable) {
        self.lines.push(String::new());
        self.lines.push(".symtab".to_string());
        self.lines.push(symtab_header());
        for (index, symbol) in symbols.entries().iter().enumerate() {
            self.lines.push(symtab_row(index, symbol));
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// `00010074   <main>:`
pub fn label_line(address: u32, name: &str) -> String {
    format!("{:08x}   <{}>:", address, name)
}

/// `   10074: \t00400513\t   addi\ta0, zero, 4`
pub fn instruction_line(insn: &DecodedInstruction, labels: &LabelMap) -> String {
    format!(
        "   {:05x}: \t{:08x}\t{}",
        insn.address,
        insn.raw_word,
        insn.render(labels)
    )
}

pub fn symtab_header() -> String {
    format!(
        "{} {:<15} {:>7} {:<8} {:<8} {:<8} {:>6} {}",
        "Symbol", "Value", "Size", "Type", "Bind", "Vis", "Index", "Name"
    )
}

pub fn symtab_row(index: usize, symbol: &SymbolEntry) -> String {
    format!(
        "[{:>4x}] 0x{:<15x} {:>5} {:<8} {:<8} {:<8} {:>6} {}",
        index,
        symbol.value,
        symbol.size,
        symbol.symbol_type(),
        symbol.binding(),
        symbol.visibility(),
        symbol.index(),
        symbol.name
    )
}
