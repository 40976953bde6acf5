//! Address to label mapping for the listing.
//!
//! Seeded with function symbols, then extended with synthetic `L<n>` names
//! for every jump/branch target that has none. Once an address has a name it
//! keeps it, and synthetic numbers are never reused.

use std::collections::BTreeMap;

use tracing::trace;

use crate::disasm::riscv::DecodedInstruction;
use crate::formats::elf::symbols::SymbolTable;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    names: BTreeMap<u32, String>,
    next_synthetic: usize,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every function symbol's address to its name. A later record at
    /// the same address replaces an earlier one.
    pub fn from_symbols(symbols: &SymbolTable) -> Self {
        let mut labels = Self::new();
        for (address, name) in symbols.function_labels() {
            labels.insert_symbol(address, name);
        }
        labels
    }

    pub fn insert_symbol(&mut self, address: u32, name: &str) {
        self.names.insert(address, name.to_string());
    }

    /// Name for `address`, creating the next `L<n>` if it has none yet.
    pub fn label_for(&mut self, address: u32) -> &str {
        let next = &mut self.next_synthetic;
        self.names.entry(address).or_insert_with(|| {
            let name = format!("L{}", *next);
            *next += 1;
            trace!(address, name = %name, "Synthetic label");
            name
        })
    }

    /// Assign synthetic labels to every unnamed jump/branch target, in the
    /// order the instructions are given.
    pub fn discover<'a, I>(&mut self, instructions: I)
    where
        I: IntoIterator<Item = &'a DecodedInstruction>,
    {
        for insn in instructions {
            if let Some(target) = insn.jump_target() {
                self.label_for(target);
            }
        }
    }

    pub fn get(&self, address: u32) -> Option<&str> {
        self.names.get(&address).map(String::as_str)
    }

    pub fn contains(&self, address: u32) -> bool {
        self.names.contains_key(&address)
    }

    /// Number of `L<n>` names handed out so far.
    pub fn synthetic_count(&self) -> usize {
        self.next_synthetic
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Labels in ascending address order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.names.iter().map(|(&addr, name)| (addr, name.as_str()))
    }
}
