//! RISC-V disassembly of the `.text` section.

pub mod labels;
pub mod riscv;

use tracing::{debug, warn};

use crate::formats::elf::symbols::SymbolTable;
use crate::formats::elf::{ElfImage, Result};
use labels::LabelMap;
use riscv::DecodedInstruction;

/// Decode every whole word of `.text`, in address order.
pub fn decode_text(image: &ElfImage<'_>) -> Result<Vec<DecodedInstruction>> {
    let text = image.text();
    if text.size % 4 != 0 {
        warn!(
            size = text.size,
            "Trailing bytes in .text do not form a whole instruction"
        );
    }

    let instructions = image
        .text_words()
        .map(|word| word.map(|(offset, raw)| DecodedInstruction::new(text.address_of(offset), raw)))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        count = instructions.len(),
        unknown = instructions
            .iter()
            .filter(|i| i.instruction.is_unknown())
            .count(),
        "Decoded .text"
    );
    Ok(instructions)
}

/// Seed labels from function symbols, then name all remaining jump targets.
pub fn build_labels(symbols: &SymbolTable, instructions: &[DecodedInstruction]) -> LabelMap {
    let mut labels = LabelMap::from_symbols(symbols);
    labels.discover(instructions);
    debug!(
        labels = labels.len(),
        synthetic = labels.synthetic_count(),
        "Labels assigned"
    );
    labels
}
