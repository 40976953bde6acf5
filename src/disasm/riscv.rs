//! RISC-V RV32IM decoder.
//!
//! Each 32-bit word is classified by opcode/funct3/funct7 into an
//! [`Instruction`] variant carrying its operand fields. Text rendering is
//! separate from decoding so that branch and jump targets can be labelled
//! after the whole section has been scanned.

use std::fmt;

use crate::disasm::labels::LabelMap;

/// Placeholder rendered for encodings outside RV32IM.
pub const UNKNOWN_INSTRUCTION: &str = "unknown_instruction";

// -- Register ABI names --

const REG_ABI: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// An integer register `x0`..`x31`, displayed by its ABI name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reg(u8);

impl Reg {
    pub fn new(index: u32) -> Self {
        Reg((index & 0x1f) as u8)
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    pub fn abi_name(&self) -> &'static str {
        REG_ABI[self.0 as usize]
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abi_name())
    }
}

/// Interpret the low `width` bits of `value` as a two's complement number.
///
/// Values at or above `2^(width-1)` have `2^width` subtracted; anything below
/// is returned unchanged.
pub fn twos_complement(value: u32, width: u32) -> i32 {
    debug_assert!((1..=32).contains(&width));
    let value = u64::from(value) & ((1u64 << width) - 1);
    if value >= 1u64 << (width - 1) {
        (value as i64 - (1i64 << width)) as i32
    } else {
        value as i32
    }
}

// -- Field extraction --

fn opcode(insn: u32) -> u32 {
    insn & 0x7f
}

fn rd(insn: u32) -> Reg {
    Reg::new(insn >> 7)
}

fn funct3(insn: u32) -> u32 {
    (insn >> 12) & 0x7
}

fn rs1(insn: u32) -> Reg {
    Reg::new(insn >> 15)
}

fn rs2(insn: u32) -> Reg {
    Reg::new(insn >> 20)
}

fn funct7(insn: u32) -> u32 {
    insn >> 25
}

// -- Immediate extraction --

fn utype_imm(insn: u32) -> i32 {
    twos_complement(insn >> 12, 21)
}

fn itype_imm(insn: u32) -> i32 {
    twos_complement(insn >> 20, 12)
}

fn stype_imm(insn: u32) -> i32 {
    let hi = (insn >> 25) & 0x7f;
    let lo = (insn >> 7) & 0x1f;
    twos_complement((hi << 5) | lo, 12)
}

fn btype_imm(insn: u32) -> i32 {
    let b12 = (insn >> 31) & 1;
    let b11 = (insn >> 7) & 1;
    let b10_5 = (insn >> 25) & 0x3f;
    let b4_1 = (insn >> 8) & 0xf;
    twos_complement((b12 << 12) | (b11 << 11) | (b10_5 << 5) | (b4_1 << 1), 13)
}

fn jtype_imm(insn: u32) -> i32 {
    let b20 = (insn >> 31) & 1;
    let b19_12 = (insn >> 12) & 0xff;
    // imm[11] is taken from insn bit 19, which also supplies imm[19]
    let b11 = (insn >> 19) & 1;
    let b10_1 = (insn >> 21) & 0x3ff;
    twos_complement((b20 << 20) | (b19_12 << 12) | (b11 << 11) | (b10_1 << 1), 21)
}

// -- Operation kinds --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOp {
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,
}

impl BranchOp {
    fn from_funct3(f3: u32) -> Option<Self> {
        Some(match f3 {
            0b000 => BranchOp::Beq,
            0b001 => BranchOp::Bne,
            0b100 => BranchOp::Blt,
            0b101 => BranchOp::Bge,
            0b110 => BranchOp::Bltu,
            0b111 => BranchOp::Bgeu,
            _ => return None,
        })
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            BranchOp::Beq => "beq",
            BranchOp::Bne => "bne",
            BranchOp::Blt => "blt",
            BranchOp::Bge => "bge",
            BranchOp::Bltu => "bltu",
            BranchOp::Bgeu => "bgeu",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOp {
    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,
}

impl LoadOp {
    fn from_funct3(f3: u32) -> Option<Self> {
        Some(match f3 {
            0b000 => LoadOp::Lb,
            0b001 => LoadOp::Lh,
            0b010 => LoadOp::Lw,
            0b100 => LoadOp::Lbu,
            0b101 => LoadOp::Lhu,
            _ => return None,
        })
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            LoadOp::Lb => "lb",
            LoadOp::Lh => "lh",
            LoadOp::Lw => "lw",
            LoadOp::Lbu => "lbu",
            LoadOp::Lhu => "lhu",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Sb,
    Sh,
    Sw,
}

impl StoreOp {
    fn from_funct3(f3: u32) -> Option<Self> {
        Some(match f3 {
            0b000 => StoreOp::Sb,
            0b001 => StoreOp::Sh,
            0b010 => StoreOp::Sw,
            _ => return None,
        })
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            StoreOp::Sb => "sb",
            StoreOp::Sh => "sh",
            StoreOp::Sw => "sw",
        }
    }
}

/// Register-immediate arithmetic other than shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmOp {
    Addi,
    Slti,
    Sltiu,
    Xori,
    Ori,
    Andi,
}

impl ImmOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            ImmOp::Addi => "addi",
            ImmOp::Slti => "slti",
            ImmOp::Sltiu => "sltiu",
            ImmOp::Xori => "xori",
            ImmOp::Ori => "ori",
            ImmOp::Andi => "andi",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftOp {
    Slli,
    Srli,
    Srai,
}

impl ShiftOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            ShiftOp::Slli => "slli",
            ShiftOp::Srli => "srli",
            ShiftOp::Srai => "srai",
        }
    }
}

/// Register-register operations, RV32I base plus the M extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegOp {
    Add,
    Sub,
    Sll,
    Slt,
    Sltu,
    Xor,
    Srl,
    Sra,
    Or,
    And,
    Mul,
    Mulh,
    Mulhsu,
    Mulhu,
    Div,
    Divu,
    Rem,
    Remu,
}

impl RegOp {
    fn from_funct(f7: u32, f3: u32) -> Option<Self> {
        Some(match (f7, f3) {
            (0b0000000, 0b000) => RegOp::Add,
            (0b0000000, 0b001) => RegOp::Sll,
            (0b0000000, 0b010) => RegOp::Slt,
            (0b0000000, 0b011) => RegOp::Sltu,
            (0b0000000, 0b100) => RegOp::Xor,
            (0b0000000, 0b101) => RegOp::Srl,
            (0b0000000, 0b110) => RegOp::Or,
            (0b0000000, 0b111) => RegOp::And,
            (0b0100000, 0b000) => RegOp::Sub,
            (0b0100000, 0b101) => RegOp::Sra,
            (0b0000001, 0b000) => RegOp::Mul,
            (0b0000001, 0b001) => RegOp::Mulh,
            (0b0000001, 0b010) => RegOp::Mulhsu,
            (0b0000001, 0b011) => RegOp::Mulhu,
            (0b0000001, 0b100) => RegOp::Div,
            (0b0000001, 0b101) => RegOp::Divu,
            (0b0000001, 0b110) => RegOp::Rem,
            (0b0000001, 0b111) => RegOp::Remu,
            _ => return None,
        })
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            RegOp::Add => "add",
            RegOp::Sub => "sub",
            RegOp::Sll => "sll",
            RegOp::Slt => "slt",
            RegOp::Sltu => "sltu",
            RegOp::Xor => "xor",
            RegOp::Srl => "srl",
            RegOp::Sra => "sra",
            RegOp::Or => "or",
            RegOp::And => "and",
            RegOp::Mul => "mul",
            RegOp::Mulh => "mulh",
            RegOp::Mulhsu => "mulhsu",
            RegOp::Mulhu => "mulhu",
            RegOp::Div => "div",
            RegOp::Divu => "divu",
            RegOp::Rem => "rem",
            RegOp::Remu => "remu",
        }
    }
}

/// One decoded RV32IM instruction.
///
/// Offsets on `Jal` and `Branch` are relative to the instruction's own address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Lui { rd: Reg, imm: i32 },
    Auipc { rd: Reg, imm: i32 },
    Jal { rd: Reg, offset: i32 },
    Jalr { rd: Reg, rs1: Reg, offset: i32 },
    Branch { op: BranchOp, rs1: Reg, rs2: Reg, offset: i32 },
    Load { op: LoadOp, rd: Reg, rs1: Reg, offset: i32 },
    Store { op: StoreOp, rs1: Reg, rs2: Reg, offset: i32 },
    OpImm { op: ImmOp, rd: Reg, rs1: Reg, imm: i32 },
    Shift { op: ShiftOp, rd: Reg, rs1: Reg, shamt: i32 },
    Op { op: RegOp, rd: Reg, rs1: Reg, rs2: Reg },
    Fence,
    Ecall,
    Ebreak,
    Unknown,
}

impl Instruction {
    /// Classify a 32-bit instruction word. Never fails: unsupported
    /// encodings become [`Instruction::Unknown`].
    pub fn decode(insn: u32) -> Self {
        let f3 = funct3(insn);
        match opcode(insn) {
            0b0110111 => Instruction::Lui {
                rd: rd(insn),
                imm: utype_imm(insn),
            },
            0b0010111 => Instruction::Auipc {
                rd: rd(insn),
                imm: utype_imm(insn),
            },
            0b1101111 => Instruction::Jal {
                rd: rd(insn),
                offset: jtype_imm(insn),
            },
            0b1100111 if f3 == 0 => Instruction::Jalr {
                rd: rd(insn),
                rs1: rs1(insn),
                offset: itype_imm(insn),
            },
            0b1100011 => match BranchOp::from_funct3(f3) {
                Some(op) => Instruction::Branch {
                    op,
                    rs1: rs1(insn),
                    rs2: rs2(insn),
                    offset: btype_imm(insn),
                },
                None => Instruction::Unknown,
            },
            0b0000011 => match LoadOp::from_funct3(f3) {
                Some(op) => Instruction::Load {
                    op,
                    rd: rd(insn),
                    rs1: rs1(insn),
                    offset: itype_imm(insn),
                },
                None => Instruction::Unknown,
            },
            0b0100011 => match StoreOp::from_funct3(f3) {
                Some(op) => Instruction::Store {
                    op,
                    rs1: rs1(insn),
                    rs2: rs2(insn),
                    offset: stype_imm(insn),
                },
                None => Instruction::Unknown,
            },
            0b0010011 => decode_op_imm(insn, f3),
            0b0110011 => match RegOp::from_funct(funct7(insn), f3) {
                Some(op) => Instruction::Op {
                    op,
                    rd: rd(insn),
                    rs1: rs1(insn),
                    rs2: rs2(insn),
                },
                None => Instruction::Unknown,
            },
            0b0001111 => Instruction::Fence,
            0b1110011 => decode_system(insn, f3),
            _ => Instruction::Unknown,
        }
    }

    /// Mnemonic, or `unknown_instruction`.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Lui { .. } => "lui",
            Instruction::Auipc { .. } => "auipc",
            Instruction::Jal { .. } => "jal",
            Instruction::Jalr { .. } => "jalr",
            Instruction::Branch { op, .. } => op.mnemonic(),
            Instruction::Load { op, .. } => op.mnemonic(),
            Instruction::Store { op, .. } => op.mnemonic(),
            Instruction::OpImm { op, .. } => op.mnemonic(),
            Instruction::Shift { op, .. } => op.mnemonic(),
            Instruction::Op { op, .. } => op.mnemonic(),
            Instruction::Fence => "fence",
            Instruction::Ecall => "ecall",
            Instruction::Ebreak => "ebreak",
            Instruction::Unknown => UNKNOWN_INSTRUCTION,
        }
    }

    /// Destination of a `jal` or conditional branch at `address`.
    pub fn jump_target(&self, address: u32) -> Option<u32> {
        match self {
            Instruction::Jal { offset, .. } | Instruction::Branch { offset, .. } => {
                Some(address.wrapping_add(*offset as u32))
            }
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Instruction::Unknown)
    }
}

fn decode_op_imm(insn: u32, f3: u32) -> Instruction {
    let rd = rd(insn);
    let rs1 = rs1(insn);
    let imm = itype_imm(insn);
    let op = match f3 {
        0b000 => ImmOp::Addi,
        0b010 => ImmOp::Slti,
        0b011 => ImmOp::Sltiu,
        0b100 => ImmOp::Xori,
        0b110 => ImmOp::Ori,
        0b111 => ImmOp::Andi,
        _ => {
            // funct3 001/101: the top 7 bits of the immediate pick the shift kind,
            // and the listed amount is the immediate shifted down by 5
            let shamt = imm >> 5;
            let op = match (f3, funct7(insn)) {
                (0b001, 0b0000000) => ShiftOp::Slli,
                (0b101, 0b0000000) => ShiftOp::Srli,
                (0b101, 0b0100000) => ShiftOp::Srai,
                _ => return Instruction::Unknown,
            };
            return Instruction::Shift { op, rd, rs1, shamt };
        }
    };
    Instruction::OpImm { op, rd, rs1, imm }
}

fn decode_system(insn: u32, f3: u32) -> Instruction {
    if f3 != 0 || rd(insn).index() != 0 {
        return Instruction::Unknown;
    }
    match insn >> 20 {
        0 => Instruction::Ecall,
        1 => Instruction::Ebreak,
        _ => Instruction::Unknown,
    }
}

/// An instruction together with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub address: u32,
    pub raw_word: u32,
    pub instruction: Instruction,
}

impl DecodedInstruction {
    pub fn new(address: u32, raw_word: u32) -> Self {
        Self {
            address,
            raw_word,
            instruction: Instruction::decode(raw_word),
        }
    }

    pub fn jump_target(&self) -> Option<u32> {
        self.instruction.jump_target(self.address)
    }

    /// Mnemonic and operands as listed in the report.
    ///
    /// Jump and branch targets are suffixed with their label when `labels`
    /// has one for the target address.
    pub fn render(&self, labels: &LabelMap) -> String {
        let target_label = |target: u32| match labels.get(target) {
            Some(name) => format!(" <{}>", name),
            None => String::new(),
        };

        match self.instruction {
            Instruction::Lui { rd, imm } => format!("{:>7}\t{}, 0x{:x}", "lui", rd, imm),
            Instruction::Auipc { rd, imm } => format!("{:>7}\t{}, {}", "auipc", rd, imm),
            Instruction::Jal { rd, offset } => {
                let target = self.address.wrapping_add(offset as u32);
                format!("{:>7}\t{}, {}{}", "jal", rd, offset, target_label(target))
            }
            Instruction::Jalr { rd, rs1, offset } => {
                format!("{:>7}\t{}, {}({})", "jalr", rd, offset, rs1)
            }
            Instruction::Branch {
                op,
                rs1,
                rs2,
                offset,
            } => {
                let target = self.address.wrapping_add(offset as u32);
                format!(
                    "{:>7}\t{}, {}, 0x{:x}{}",
                    op.mnemonic(),
                    rs1,
                    rs2,
                    target,
                    target_label(target)
                )
            }
            Instruction::Load {
                op,
                rd,
                rs1,
                offset,
            } => format!("{:>7}\t{}, {}({})", op.mnemonic(), rd, offset, rs1),
            Instruction::Store {
                op,
                rs1,
                rs2,
                offset,
            } => format!("{:>7}\t{}, {}({})", op.mnemonic(), rs2, offset, rs1),
            Instruction::OpImm { op, rd, rs1, imm } => {
                format!("{:>7}\t{}, {}, {}", op.mnemonic(), rd, rs1, imm)
            }
            Instruction::Shift { op, rd, rs1, shamt } => {
                format!("{:>7}\t{}, {}, {}", op.mnemonic(), rd, rs1, shamt)
            }
            Instruction::Op { op, rd, rs1, rs2 } => {
                format!("{:>7}\t{}, {}, {}", op.mnemonic(), rd, rs1, rs2)
            }
            Instruction::Fence | Instruction::Ecall | Instruction::Ebreak => {
                format!("{:>7}\t", self.instruction.mnemonic())
            }
            Instruction::Unknown => UNKNOWN_INSTRUCTION.to_string(),
        }
    }
}
