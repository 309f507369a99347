//! Genome and Memory
//!
//! The organism keeps two owned buffers: the genome (pristine copy plus the
//! possibly mutated active copy) and working memory. Memory starts as a copy
//! of the active genome and can grow to twice the genome length through
//! `h-alloc`. Nothing is shared between the two; every transfer is an
//! explicit copy.

use crate::error::{Error, Result};
use crate::instset::InstructionTable;
use crate::opcodes::Instruction;

// ═══════════════════════════════════════════════════════════════
// GENOME
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    pristine: Vec<Instruction>,
    active: Vec<Instruction>,
}

impl Genome {
    /// `instructions` must be non-empty; `decode_genome` already rejects
    /// empty genomes.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { active: instructions.clone(), pristine: instructions }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn active(&self) -> &[Instruction] {
        &self.active
    }

    pub fn pristine(&self) -> &[Instruction] {
        &self.pristine
    }

    pub fn is_mutated(&self) -> bool {
        self.active != self.pristine
    }

    /// Overwrite one locus of the active genome, returning the old value.
    pub fn set(&mut self, locus: usize, inst: Instruction) -> Instruction {
        std::mem::replace(&mut self.active[locus], inst)
    }

    /// Throw away all mutations.
    pub fn restore(&mut self) {
        self.active.clone_from(&self.pristine);
    }
}

// ═══════════════════════════════════════════════════════════════
// MEMORY
// ═══════════════════════════════════════════════════════════════

/// Circular working buffer addressed by the heads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<Instruction>,
}

impl Memory {
    pub fn from_genome(genome: &Genome) -> Self {
        Self { cells: genome.active().to_vec() }
    }

    /// Reload from the genome, dropping any allocated tail.
    pub fn reload(&mut self, genome: &Genome) {
        self.cells.clear();
        self.cells.extend_from_slice(genome.active());
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_slice(&self) -> &[Instruction] {
        &self.cells
    }

    #[inline]
    pub fn wrap(&self, pos: usize) -> usize {
        pos % self.cells.len()
    }

    /// Wrap a signed position (head moved by a negative register value).
    #[inline]
    pub fn wrap_signed(&self, pos: i64) -> usize {
        pos.rem_euclid(self.cells.len() as i64) as usize
    }

    #[inline]
    pub fn get(&self, pos: usize) -> Instruction {
        self.cells[self.wrap(pos)]
    }

    #[inline]
    pub fn set(&mut self, pos: usize, inst: Instruction) {
        let idx = self.wrap(pos);
        self.cells[idx] = inst;
    }

    /// Flow-head target rule used by `set-flow`:
    /// negative -> 0, `[len, 2*len)` -> `pos - len`, `>= 2*len` -> `pos % len`.
    pub fn clamp_flow(&self, pos: i64) -> usize {
        let len = self.cells.len() as i64;
        let clamped = if pos < 0 {
            0
        } else if pos < len {
            pos
        } else if pos < 2 * len {
            pos - len
        } else {
            pos % len
        };
        clamped as usize
    }

    /// Grow by `min(genome_len, 2 * genome_len - len)` filler cells.
    /// Returns the length before growth, or `None` when already at the cap.
    pub fn allocate(&mut self, genome_len: usize, filler: Instruction) -> Option<usize> {
        let old_len = self.cells.len();
        let add = genome_len.min((2 * genome_len).saturating_sub(old_len));
        if add == 0 {
            return None;
        }
        self.cells.resize(old_len + add, filler);
        Some(old_len)
    }

    /// Cells in `[from, to)`, walking forward circularly. Equal bounds give
    /// an empty slice.
    pub fn circular_slice(&self, from: usize, to: usize) -> Vec<Instruction> {
        let (from, to) = (self.wrap(from), self.wrap(to));
        if from <= to {
            self.cells[from..to].to_vec()
        } else {
            let mut out = self.cells[from..].to_vec();
            out.extend_from_slice(&self.cells[..to]);
            out
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// MUTANT GENERATION
// ═══════════════════════════════════════════════════════════════

/// Every genome obtained by replacing a single locus with `nop-X`, in locus
/// order.
pub fn knockouts(genome: &str, table: &InstructionTable) -> Result<Vec<String>> {
    let knockout = table
        .encode(Instruction::NopX)
        .ok_or(Error::MissingInstruction { name: Instruction::NopX.mnemonic() })?;
    let symbols: Vec<char> = genome.chars().collect();
    table.decode_genome(genome)?;

    Ok((0..symbols.len())
        .map(|locus| {
            let mut mutant = symbols.clone();
            mutant[locus] = knockout;
            mutant.into_iter().collect()
        })
        .collect())
}

/// Every single-substitution mutant: `(table.len() - 1) * genome.len()`
/// genomes, grouped by locus and then by symbol order.
pub fn one_step_mutants(genome: &str, table: &InstructionTable) -> Result<Vec<String>> {
    let original = table.decode_genome(genome)?;
    let mut mutants = Vec::with_capacity(original.len() * table.len().saturating_sub(1));

    for (locus, &current) in original.iter().enumerate() {
        for &candidate in table.instructions() {
            if candidate == current {
                continue;
            }
            let mut mutant = original.clone();
            mutant[locus] = candidate;
            mutants.push(table.encode_genome(&mutant));
        }
    }
    Ok(mutants)
}

/// Every genome with two distinct loci `a < b` both substituted, grouped by
/// first locus and symbol, then second locus and symbol. Single-step mutants
/// are not repeated: both substitutions differ from the original.
pub fn two_step_mutants(genome: &str, table: &InstructionTable) -> Result<Vec<String>> {
    let original = table.decode_genome(genome)?;
    let mut mutants = Vec::new();

    for (locus_a, &current_a) in original.iter().enumerate() {
        for &candidate_a in table.instructions() {
            if candidate_a == current_a {
                continue;
            }
            let mut partial = original.clone();
            partial[locus_a] = candidate_a;
            for (locus_b, &current_b) in original.iter().enumerate().skip(locus_a + 1) {
                for &candidate_b in table.instructions() {
                    if candidate_b == current_b {
                        continue;
                    }
                    let mut mutant = partial.clone();
                    mutant[locus_b] = candidate_b;
                    mutants.push(table.encode_genome(&mutant));
                }
            }
        }
    }
    Ok(mutants)
}
