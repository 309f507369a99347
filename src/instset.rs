//! Instruction-Set Table
//!
//! Maps one-character genome symbols to instructions. Symbols are handed out
//! `a..z` then `A..Z` in the order instructions are declared, giving at most
//! 52 distinct instructions per set.
//!
//! Configuration format (compatible with `instset-*.cfg` files):
//!
//! ```text
//! # comment
//! INSTSET heads_default:hw_type=0     <- ignored, first token is not INST
//! INST nop-A
//! INST nop-B   1   # extra columns are ignored
//! ```

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{Error, Result};
use crate::opcodes::Instruction;

/// Size of the symbol alphabet (`a..z` + `A..Z`).
pub const MAX_INSTRUCTIONS: usize = 52;

/// The heads instruction set with environment sensors, in declaration order.
/// Symbols run `a` (nop-A) through `F` (sense-react-ANDN), with `G` = nop-X.
pub const HEADS_SENSORS: [Instruction; 33] = [
    Instruction::NopA,
    Instruction::NopB,
    Instruction::NopC,
    Instruction::IfNEqu,
    Instruction::IfLess,
    Instruction::IfLabel,
    Instruction::MovHead,
    Instruction::JmpHead,
    Instruction::GetHead,
    Instruction::SetFlow,
    Instruction::ShiftR,
    Instruction::ShiftL,
    Instruction::Inc,
    Instruction::Dec,
    Instruction::Push,
    Instruction::Pop,
    Instruction::SwapStk,
    Instruction::Swap,
    Instruction::Add,
    Instruction::Sub,
    Instruction::Nand,
    Instruction::HCopy,
    Instruction::HAlloc,
    Instruction::HDivide,
    Instruction::Io,
    Instruction::HSearch,
    Instruction::SenseReactNand,
    Instruction::SenseReactNot,
    Instruction::SenseReactAnd,
    Instruction::SenseReactOrn,
    Instruction::SenseReactOr,
    Instruction::SenseReactAndn,
    Instruction::NopX,
];

/// Symbol assigned to the `index`-th declared instruction.
#[inline]
pub fn symbol_for_index(index: usize) -> Option<char> {
    match index {
        0..=25 => Some((b'a' + index as u8) as char),
        26..=51 => Some((b'A' + (index - 26) as u8) as char),
        _ => None,
    }
}

/// Inverse of [`symbol_for_index`].
#[inline]
pub fn index_for_symbol(symbol: char) -> Option<usize> {
    match symbol {
        'a'..='z' => Some(symbol as usize - 'a' as usize),
        'A'..='Z' => Some(symbol as usize - 'A' as usize + 26),
        _ => None,
    }
}

/// Ordered instruction set. Index `i` is encoded by `symbol_for_index(i)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionTable {
    entries: Vec<Instruction>,
}

impl InstructionTable {
    /// Build a table from instructions in declaration order.
    pub fn from_instructions(instructions: &[Instruction]) -> Result<Self> {
        if instructions.is_empty() {
            return Err(Error::EmptyInstructionSet);
        }
        if instructions.len() > MAX_INSTRUCTIONS {
            return Err(Error::AlphabetExhausted {
                count: instructions.len(),
                max: MAX_INSTRUCTIONS,
            });
        }
        let mut entries = Vec::with_capacity(instructions.len());
        for (idx, &inst) in instructions.iter().enumerate() {
            if entries.contains(&inst) {
                return Err(Error::DuplicateEntry {
                    index: idx,
                    name: inst.mnemonic().to_string(),
                });
            }
            entries.push(inst);
        }
        Ok(Self { entries })
    }

    /// Default heads instruction set with sensors.
    pub fn heads_default() -> Self {
        Self { entries: HEADS_SENSORS.to_vec() }
    }

    /// Parse instruction-set configuration text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries: Vec<Instruction> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            let mut tokens = line.split_whitespace();
            if tokens.next() != Some("INST") {
                continue;
            }

            let name = tokens.next().ok_or_else(|| Error::MalformedLine {
                line: line_no,
                text: raw.trim().to_string(),
            })?;
            let inst = Instruction::from_mnemonic(name).ok_or_else(|| Error::UnknownInstruction {
                line: line_no,
                name: name.to_string(),
            })?;
            if entries.contains(&inst) {
                return Err(Error::DuplicateInstruction {
                    line: line_no,
                    name: name.to_string(),
                });
            }
            entries.push(inst);
        }

        if entries.is_empty() {
            return Err(Error::EmptyInstructionSet);
        }
        if entries.len() > MAX_INSTRUCTIONS {
            return Err(Error::AlphabetExhausted {
                count: entries.len(),
                max: MAX_INSTRUCTIONS,
            });
        }
        Ok(Self { entries })
    }

    /// Load and parse an instruction-set file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), instructions = table.len(), "instruction set loaded");
        Ok(table)
    }

    /// Render back to configuration text, one `INST` line per entry.
    pub fn to_config_string(&self) -> String {
        let mut out = String::new();
        for (idx, inst) in self.entries.iter().enumerate() {
            // Index is always below MAX_INSTRUCTIONS.
            let symbol = symbol_for_index(idx).unwrap_or('?');
            let _ = writeln!(out, "INST {}  # {}", inst.mnemonic(), symbol);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Instruction> {
        self.entries.get(index).copied()
    }

    pub fn index_of(&self, inst: Instruction) -> Option<usize> {
        self.entries.iter().position(|&e| e == inst)
    }

    pub fn contains(&self, inst: Instruction) -> bool {
        self.entries.contains(&inst)
    }

    #[inline]
    pub fn decode(&self, symbol: char) -> Option<Instruction> {
        index_for_symbol(symbol).and_then(|idx| self.get(idx))
    }

    #[inline]
    pub fn encode(&self, inst: Instruction) -> Option<char> {
        self.index_of(inst).and_then(symbol_for_index)
    }

    /// Decode a genome string. Every symbol must belong to this table.
    pub fn decode_genome(&self, genome: &str) -> Result<Vec<Instruction>> {
        if genome.is_empty() {
            return Err(Error::EmptyGenome);
        }
        genome
            .chars()
            .enumerate()
            .map(|(position, symbol)| {
                self.decode(symbol)
                    .ok_or(Error::UnknownSymbol { symbol, position })
            })
            .collect()
    }

    /// Encode instructions back to symbols. Instructions missing from the
    /// table render as `?`.
    pub fn encode_genome(&self, instructions: &[Instruction]) -> String {
        instructions
            .iter()
            .map(|&inst| self.encode(inst).unwrap_or('?'))
            .collect()
    }

    /// Neighbour of `inst` in symbol order, wrapping at both ends. Used by
    /// point mutation, so `nop-X` is skipped: only a knockout produces it,
    /// and a knocked-out locus stays put.
    pub fn cycle(&self, inst: Instruction, reverse: bool) -> Instruction {
        let alphabet: Vec<Instruction> = self
            .entries
            .iter()
            .copied()
            .filter(|&e| e != Instruction::NopX)
            .collect();
        let n = alphabet.len();
        match alphabet.iter().position(|&e| e == inst) {
            Some(idx) => {
                let next = if reverse { (idx + n - 1) % n } else { (idx + 1) % n };
                alphabet[next]
            }
            None => inst,
        }
    }

    /// Instruction written into freshly allocated memory (symbol `a`).
    pub fn filler(&self) -> Instruction {
        self.entries[0]
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.entries
    }
}

impl Default for InstructionTable {
    fn default() -> Self {
        Self::heads_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heads_cfg() -> String {
        HEADS_SENSORS
            .iter()
            .map(|inst| format!("INST {}\n", inst.mnemonic()))
            .collect()
    }

    #[test]
    fn test_symbol_alphabet() {
        assert_eq!(symbol_for_index(0), Some('a'));
        assert_eq!(symbol_for_index(25), Some('z'));
        assert_eq!(symbol_for_index(26), Some('A'));
        assert_eq!(symbol_for_index(51), Some('Z'));
        assert_eq!(symbol_for_index(52), None);
        for idx in 0..MAX_INSTRUCTIONS {
            assert_eq!(index_for_symbol(symbol_for_index(idx).unwrap()), Some(idx));
        }
        assert_eq!(index_for_symbol('?'), None);
    }

    #[test]
    fn test_parse_matches_default() {
        let table = InstructionTable::parse(&heads_cfg()).unwrap();
        assert_eq!(table, InstructionTable::heads_default());
        assert_eq!(table.decode('v'), Some(Instruction::HCopy));
        assert_eq!(table.decode('w'), Some(Instruction::HAlloc));
        assert_eq!(table.decode('x'), Some(Instruction::HDivide));
        assert_eq!(table.decode('F'), Some(Instruction::SenseReactAndn));
        assert_eq!(table.decode('G'), Some(Instruction::NopX));
        assert_eq!(table.decode('H'), None);
    }

    #[test]
    fn test_parse_skips_comments_and_other_lines() {
        let text = "# heads\nINSTSET heads_default:hw_type=0\n\nINST nop-A 1 # a\n  INST h-copy\n";
        let table = InstructionTable::parse(text).unwrap();
        assert_eq!(table.instructions(), &[Instruction::NopA, Instruction::HCopy]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            InstructionTable::parse("INST\n"),
            Err(Error::MalformedLine { line: 1, .. })
        ));
        assert!(matches!(
            InstructionTable::parse("INST nop-A\nINST h-repro\n"),
            Err(Error::UnknownInstruction { line: 2, .. })
        ));
        assert!(matches!(
            InstructionTable::parse("INST nop-A\nINST nop-A\n"),
            Err(Error::DuplicateInstruction { line: 2, .. })
        ));
        assert!(matches!(InstructionTable::parse("# nothing\n"), Err(Error::EmptyInstructionSet)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = InstructionTable::from_file("/definitely/not/here.cfg").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_genome_codec() {
        let table = InstructionTable::heads_default();
        let genome = "wzcagcccczvfcaxgab";
        let decoded = table.decode_genome(genome).unwrap();
        assert_eq!(decoded[0], Instruction::HAlloc);
        assert_eq!(table.encode_genome(&decoded), genome);
        assert!(matches!(
            table.decode_genome("ab9"),
            Err(Error::UnknownSymbol { symbol: '9', position: 2 })
        ));
        assert!(matches!(table.decode_genome(""), Err(Error::EmptyGenome)));
    }

    #[test]
    fn test_cycle_wraps() {
        let table = InstructionTable::heads_default();
        assert_eq!(table.cycle(Instruction::NopA, false), Instruction::NopB);
        assert_eq!(table.cycle(Instruction::NopA, true), Instruction::SenseReactAndn);
        assert_eq!(table.cycle(Instruction::SenseReactAndn, false), Instruction::NopA);
        assert_eq!(table.cycle(Instruction::NopX, false), Instruction::NopX);
        assert_eq!(table.cycle(Instruction::NopX, true), Instruction::NopX);
        assert_eq!(table.cycle(Instruction::HSearch, false), Instruction::SenseReactNand);
    }

    #[test]
    fn test_duplicate_entry_reports_index() {
        let err = InstructionTable::from_instructions(&[
            Instruction::NopA,
            Instruction::Inc,
            Instruction::NopA,
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry { index: 2, .. }));
        assert!(!err.to_string().contains("line"));
    }

    #[test]
    fn test_config_string_roundtrip() {
        let table = InstructionTable::heads_default();
        let reparsed = InstructionTable::parse(&table.to_config_string()).unwrap();
        assert_eq!(reparsed, table);
    }
}
