//! Heads Instruction Set
//!
//! The closed set of instructions a genome symbol can decode to.
//! Which symbol means which instruction is decided by the loaded
//! [`InstructionTable`](crate::instset::InstructionTable); this module only
//! knows instruction identities, their mnemonics and their no-op labels.

use serde::{Deserialize, Serialize};

/// No-op label / operand modifier.
///
/// A no-op following an instruction selects register or head `A`, `B` or `C`
/// and doubles as one letter of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Nop {
    A = 0,
    B = 1,
    C = 2,
}

impl Nop {
    /// Cyclic label complement: a -> b -> c -> a.
    #[inline]
    pub fn complement(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::C,
            Self::C => Self::A,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::A => 'a',
            Self::B => 'b',
            Self::C => 'c',
        }
    }
}

/// Complement every label in a no-op sequence.
pub fn complement_label(label: &[Nop]) -> Vec<Nop> {
    label.iter().map(|n| n.complement()).collect()
}

/// Coarse grouping of instructions, used by drivers that colour or tally
/// genomes by instruction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstructionClass {
    NoOp,
    FlowControl,
    SingleArgMath,
    DoubleArgMath,
    Biological,
    InputOutput,
    Sensory,
    Unused,
}

/// Every instruction the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Instruction {
    // ── Labels / operand modifiers ──
    NopA = 0x00,
    NopB = 0x01,
    NopC = 0x02,
    NopX = 0x03,

    // ── Flow control ──
    IfNEqu  = 0x10,
    IfLess  = 0x11,
    IfLabel = 0x12,
    MovHead = 0x13,
    JmpHead = 0x14,
    GetHead = 0x15,
    SetFlow = 0x16,

    // ── Single-argument math and stacks ──
    ShiftR  = 0x20,
    ShiftL  = 0x21,
    Inc     = 0x22,
    Dec     = 0x23,
    Push    = 0x24,
    Pop     = 0x25,
    SwapStk = 0x26,
    Swap    = 0x27,

    // ── Double-argument math ──
    Add  = 0x30,
    Sub  = 0x31,
    Nand = 0x32,

    // ── Biological ──
    HCopy   = 0x40,
    HAlloc  = 0x41,
    HDivide = 0x42,

    // ── I/O and search ──
    Io      = 0x50,
    HSearch = 0x51,

    // ── Environment sensors ──
    SenseReactNand = 0x60,
    SenseReactNot  = 0x61,
    SenseReactAnd  = 0x62,
    SenseReactOrn  = 0x63,
    SenseReactOr   = 0x64,
    SenseReactAndn = 0x65,
}

impl Instruction {
    pub const ALL: [Instruction; 33] = [
        Self::NopA, Self::NopB, Self::NopC, Self::NopX,
        Self::IfNEqu, Self::IfLess, Self::IfLabel, Self::MovHead,
        Self::JmpHead, Self::GetHead, Self::SetFlow,
        Self::ShiftR, Self::ShiftL, Self::Inc, Self::Dec,
        Self::Push, Self::Pop, Self::SwapStk, Self::Swap,
        Self::Add, Self::Sub, Self::Nand,
        Self::HCopy, Self::HAlloc, Self::HDivide,
        Self::Io, Self::HSearch,
        Self::SenseReactNand, Self::SenseReactNot, Self::SenseReactAnd,
        Self::SenseReactOrn, Self::SenseReactOr, Self::SenseReactAndn,
    ];

    /// Name as it appears in instruction-set configuration files.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::NopA => "nop-A",
            Self::NopB => "nop-B",
            Self::NopC => "nop-C",
            Self::NopX => "nop-X",
            Self::IfNEqu => "if-n-equ",
            Self::IfLess => "if-less",
            Self::IfLabel => "if-label",
            Self::MovHead => "mov-head",
            Self::JmpHead => "jmp-head",
            Self::GetHead => "get-head",
            Self::SetFlow => "set-flow",
            Self::ShiftR => "shift-r",
            Self::ShiftL => "shift-l",
            Self::Inc => "inc",
            Self::Dec => "dec",
            Self::Push => "push",
            Self::Pop => "pop",
            Self::SwapStk => "swap-stk",
            Self::Swap => "swap",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Nand => "nand",
            Self::HCopy => "h-copy",
            Self::HAlloc => "h-alloc",
            Self::HDivide => "h-divide",
            Self::Io => "IO",
            Self::HSearch => "h-search",
            Self::SenseReactNand => "sense-react-NAND",
            Self::SenseReactNot => "sense-react-NOT",
            Self::SenseReactAnd => "sense-react-AND",
            Self::SenseReactOrn => "sense-react-ORN",
            Self::SenseReactOr => "sense-react-OR",
            Self::SenseReactAndn => "sense-react-ANDN",
        }
    }

    /// Look up an instruction by its configuration name.
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|inst| inst.mnemonic() == name)
    }

    /// The operand/label this instruction stands for, if it is `nop-A/B/C`.
    /// `nop-X` is inert and never acts as a label.
    #[inline]
    pub fn nop(&self) -> Option<Nop> {
        match self {
            Self::NopA => Some(Nop::A),
            Self::NopB => Some(Nop::B),
            Self::NopC => Some(Nop::C),
            _ => None,
        }
    }

    pub fn is_nop(&self) -> bool {
        matches!(self, Self::NopA | Self::NopB | Self::NopC | Self::NopX)
    }

    pub fn class(&self) -> InstructionClass {
        match self {
            Self::NopA | Self::NopB | Self::NopC => InstructionClass::NoOp,
            Self::IfNEqu | Self::IfLess | Self::IfLabel | Self::MovHead
            | Self::JmpHead | Self::GetHead | Self::SetFlow => InstructionClass::FlowControl,
            Self::ShiftR | Self::ShiftL | Self::Inc | Self::Dec
            | Self::Push | Self::Pop | Self::SwapStk | Self::Swap => InstructionClass::SingleArgMath,
            Self::Add | Self::Sub | Self::Nand => InstructionClass::DoubleArgMath,
            Self::HCopy | Self::HAlloc | Self::HDivide => InstructionClass::Biological,
            Self::Io | Self::HSearch => InstructionClass::InputOutput,
            Self::SenseReactNand | Self::SenseReactNot | Self::SenseReactAnd
            | Self::SenseReactOrn | Self::SenseReactOr | Self::SenseReactAndn => InstructionClass::Sensory,
            Self::NopX => InstructionClass::Unused,
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl From<Nop> for Instruction {
    fn from(nop: Nop) -> Self {
        match nop {
            Nop::A => Self::NopA,
            Nop::B => Self::NopB,
            Nop::C => Self::NopC,
        }
    }
}
