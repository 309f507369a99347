//! Organism Virtual CPU
//!
//! Fetch-decode-execute over an organism's own memory. Each [`Organism::step`]
//! runs exactly one instruction, resolves the no-op modifiers that follow it,
//! and moves the instruction pointer by however many cells it consumed.
//!
//! Operand rule: the no-ops directly after an instruction are scanned; the
//! first one picks the register (A/B/C) or head (IP/read/write) to act on and
//! the IP moves past all of them. With no following no-op the instruction
//! uses its default operand and the IP moves by one.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::OrganismConfig;
use crate::environment::Environment;
use crate::error::Result;
use crate::genome::{Genome, Memory};
use crate::instset::InstructionTable;
use crate::io::{InputBuffer, InputGenerator, OutputEvent};
use crate::opcodes::{complement_label, Instruction, Nop};
use crate::registers::{Head, Heads, Register, RegisterFile, Stacks};
use crate::tasks::{Task, TaskRecord};

// ═══════════════════════════════════════════════════════════════
// TRACE EVENT SYSTEM
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum TraceSeverity {
    Debug = 0,
    Info  = 1,
    Warn  = 2,
}

/// Human-readable record of what an instruction did, delivered to trace
/// hooks. This is where register provenance lives; the CPU state itself only
/// holds values.
#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub severity: TraceSeverity,
    pub event_type: &'static str,
    pub message: String,
    pub ip: usize,
}

impl std::fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}@{}: {}", self.severity, self.event_type, self.ip, self.message)
    }
}

type TraceHook = Box<dyn Fn(&TraceEvent) + Send>;

// ═══════════════════════════════════════════════════════════════
// STEP RESULTS
// ═══════════════════════════════════════════════════════════════

/// What a single step produced, for the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    Executed,
    /// `IO` emitted `value`; `solved` lists tasks credited for the first time.
    Output { value: i32, solved: Vec<Task> },
    /// Successful `h-divide`. `offspring` is memory `[read, write)`; `tasks` is
    /// the record of the episode that just ended. The organism has been reset.
    Divided { offspring: Vec<Instruction>, tasks: TaskRecord },
    /// `h-divide` with too little copied. Nothing else changed.
    DivideFailed { copied: usize, required: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: u64,
    pub outputs: usize,
    pub offspring: Option<Vec<Instruction>>,
    pub tasks: TaskRecord,
}

impl RunSummary {
    pub fn divided(&self) -> bool {
        self.offspring.is_some()
    }
}

/// A single-locus genome edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    pub locus: usize,
    pub from: Instruction,
    pub to: Instruction,
}

/// Read-only copy of the CPU state, rendered with the organism's symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub genome: String,
    pub memory: String,
    pub registers: RegisterFile,
    pub heads: Heads,
    pub stacks: Stacks,
    pub copy_history: String,
    pub inputs: InputBuffer,
    pub outputs: Vec<OutputEvent>,
    pub tasks: TaskRecord,
    pub instructions_executed: u64,
}

// ═══════════════════════════════════════════════════════════════
// ORGANISM
// ═══════════════════════════════════════════════════════════════

pub struct Organism {
    table: Arc<InstructionTable>,
    genome: Genome,
    memory: Memory,
    registers: RegisterFile,
    heads: Heads,
    stacks: Stacks,
    copy_history: VecDeque<Instruction>,
    inputs: InputBuffer,
    input_gen: InputGenerator,
    outputs: Vec<OutputEvent>,
    tasks: TaskRecord,
    environment: Environment,
    instructions_executed: u64,
    trace_hooks: Vec<TraceHook>,
}

impl Organism {
    /// Organism on the default heads instruction set with random inputs.
    pub fn new(genome: &str, sensors_enabled: bool, in_env_a: bool) -> Result<Self> {
        Self::with_config(
            genome,
            Arc::new(InstructionTable::heads_default()),
            OrganismConfig::new(sensors_enabled, in_env_a),
        )
    }

    pub fn with_config(
        genome: &str,
        table: Arc<InstructionTable>,
        config: OrganismConfig,
    ) -> Result<Self> {
        let genome = Genome::new(table.decode_genome(genome)?);
        let mut input_gen = InputGenerator::new(config.inputs);
        let inputs = InputBuffer::new(input_gen.draw());

        Ok(Self {
            memory: Memory::from_genome(&genome),
            genome,
            table,
            registers: RegisterFile::new(),
            heads: Heads::default(),
            stacks: Stacks::default(),
            copy_history: VecDeque::new(),
            inputs,
            input_gen,
            outputs: Vec::new(),
            tasks: TaskRecord::new(),
            environment: config.environment(),
            instructions_executed: 0,
            trace_hooks: Vec::new(),
        })
    }

    pub fn add_trace_hook<F: Fn(&TraceEvent) + Send + 'static>(&mut self, hook: F) {
        self.trace_hooks.push(Box::new(hook));
    }

    fn emit_trace(&self, severity: TraceSeverity, event_type: &'static str, message: impl FnOnce() -> String) {
        if self.trace_hooks.is_empty() {
            return;
        }
        let event = TraceEvent { severity, event_type, message: message(), ip: self.heads.ip };
        for hook in &self.trace_hooks {
            hook(&event);
        }
    }

    // ── Lifecycle ──

    /// Reinitialise all execution state. The genome (and its mutations) stays.
    pub fn reset(&mut self) {
        self.memory.reload(&self.genome);
        self.registers.reset();
        self.heads.reset();
        self.stacks.reset();
        self.copy_history.clear();
        self.inputs = InputBuffer::new(self.input_gen.draw());
        self.outputs.clear();
        self.tasks.reset();
        self.instructions_executed = 0;
        debug!(genome_len = self.genome.len(), "organism reset");
        self.emit_trace(TraceSeverity::Info, "reset", || "execution state cleared".to_string());
    }

    /// Restore the pristine genome, then reset.
    pub fn clear(&mut self) {
        self.genome.restore();
        self.input_gen.restart();
        debug!("genome restored to pristine");
        self.reset();
    }

    /// Step the symbol at `locus` one place forward (or back) through the
    /// instruction-set alphabet, wrapping at the ends and skipping `nop-X`,
    /// then reset. `locus` wraps around the genome length.
    pub fn mutate(&mut self, locus: usize, reverse: bool) -> Mutation {
        let locus = locus % self.genome.len();
        let from = self.genome.active()[locus];
        let to = self.table.cycle(from, reverse);
        self.apply_mutation(locus, to);
        Mutation { locus, from, to }
    }

    /// Replace `locus` with `nop-X`. `None` if the instruction set has none.
    pub fn knockout(&mut self, locus: usize) -> Option<Mutation> {
        if !self.table.contains(Instruction::NopX) {
            return None;
        }
        let locus = locus % self.genome.len();
        let from = self.genome.active()[locus];
        self.apply_mutation(locus, Instruction::NopX);
        Some(Mutation { locus, from, to: Instruction::NopX })
    }

    fn apply_mutation(&mut self, locus: usize, to: Instruction) {
        let from = self.genome.set(locus, to);
        self.memory.set(locus, to);
        debug!(locus, from = from.mnemonic(), to = to.mnemonic(), "genome mutated");
        self.emit_trace(TraceSeverity::Info, "mutate", || format!("locus {}: {} -> {}", locus, from, to));
        self.reset();
    }

    /// Move the organism to another environment. Takes effect immediately;
    /// call between episodes.
    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    // ── Accessors ──

    pub fn table(&self) -> &InstructionTable {
        &self.table
    }

    pub fn genome(&self) -> &[Instruction] {
        self.genome.active()
    }

    pub fn pristine_genome(&self) -> &[Instruction] {
        self.genome.pristine()
    }

    pub fn genome_string(&self) -> String {
        self.table.encode_genome(self.genome.active())
    }

    pub fn memory(&self) -> &[Instruction] {
        self.memory.as_slice()
    }

    pub fn memory_string(&self) -> String {
        self.table.encode_genome(self.memory.as_slice())
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn heads(&self) -> &Heads {
        &self.heads
    }

    pub fn stacks(&self) -> &Stacks {
        &self.stacks
    }

    pub fn copy_history(&self) -> &VecDeque<Instruction> {
        &self.copy_history
    }

    pub fn inputs(&self) -> &InputBuffer {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputEvent] {
        &self.outputs
    }

    pub fn tasks(&self) -> &TaskRecord {
        &self.tasks
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn instructions_executed(&self) -> u64 {
        self.instructions_executed
    }

    pub fn snapshot(&self) -> Snapshot {
        let history: Vec<Instruction> = self.copy_history.iter().copied().collect();
        Snapshot {
            genome: self.genome_string(),
            memory: self.memory_string(),
            registers: self.registers,
            heads: self.heads,
            stacks: self.stacks.clone(),
            copy_history: self.table.encode_genome(&history),
            inputs: self.inputs,
            outputs: self.outputs.clone(),
            tasks: self.tasks,
            instructions_executed: self.instructions_executed,
        }
    }

    // ── Execution ──

    /// Execute the instruction under the IP.
    pub fn step(&mut self) -> StepEvent {
        let ip = self.heads.ip;
        let inst = self.memory.get(ip);
        trace!(ip, instruction = inst.mnemonic(), "dispatch");

        let (advance, event) = self.dispatch(inst, ip);

        if !matches!(event, StepEvent::Divided { .. }) {
            self.instructions_executed += 1;
        }
        self.heads.ip = self.memory.wrap(self.heads.ip + advance);

        let regs = self.registers;
        self.emit_trace(TraceSeverity::Debug, "execute", || {
            format!("{} at {} | A={} B={} C={}", inst, ip, regs.a, regs.b, regs.c)
        });
        event
    }

    /// Step until a successful divide or `max_steps` instructions.
    pub fn run(&mut self, max_steps: u64) -> RunSummary {
        let mut summary = RunSummary::default();
        while summary.steps < max_steps {
            let event = self.step();
            summary.steps += 1;
            match event {
                StepEvent::Output { .. } => summary.outputs += 1,
                StepEvent::Divided { offspring, tasks } => {
                    summary.offspring = Some(offspring);
                    summary.tasks = tasks;
                    return summary;
                }
                StepEvent::Executed | StepEvent::DivideFailed { .. } => {}
            }
        }
        summary.tasks = self.tasks;
        summary
    }

    /// Apply one instruction. Returns how far to move the IP afterwards
    /// (from wherever the instruction left it) and the step event.
    fn dispatch(&mut self, inst: Instruction, ip: usize) -> (usize, StepEvent) {
        use Instruction::*;

        let executed = StepEvent::Executed;
        match inst {
            NopA | NopB | NopC | NopX => (1, executed),

            // ── Flow control ──
            IfNEqu | IfLess => {
                let nops = self.following_nops();
                let reg = operand(&nops, Register::B);
                let (x, y) = (self.registers.get(reg), self.registers.get(reg.next()));
                let holds = if inst == IfNEqu { x != y } else { x < y };
                (consumed(&nops) + usize::from(!holds), executed)
            }
            IfLabel => {
                let nops = self.following_nops();
                if nops.is_empty() {
                    return (1, executed);
                }
                let matched = self.copy_history_ends_with(&complement_label(&nops));
                (consumed(&nops) + usize::from(!matched), executed)
            }
            MovHead => {
                let nops = self.following_nops();
                let head = head_operand(&nops);
                self.heads.set(head, self.heads.flow);
                if head == Head::Ip {
                    (0, executed)
                } else {
                    (consumed(&nops), executed)
                }
            }
            JmpHead => {
                let nops = self.following_nops();
                let head = head_operand(&nops);
                let target = self.heads.get(head) as i64 + self.registers.c as i64;
                self.heads.set(head, self.memory.wrap_signed(target));
                (consumed(&nops), executed)
            }
            GetHead => {
                let nops = self.following_nops();
                let head = head_operand(&nops);
                self.registers.c = self.heads.get(head) as i32;
                (consumed(&nops), executed)
            }
            SetFlow => {
                let nops = self.following_nops();
                let reg = operand(&nops, Register::C);
                self.heads.flow = self.memory.clamp_flow(self.registers.get(reg) as i64);
                (consumed(&nops), executed)
            }

            // ── Single-argument math and stacks ──
            ShiftR | ShiftL | Inc | Dec => {
                let nops = self.following_nops();
                let reg = operand(&nops, Register::B);
                let v = self.registers.get(reg);
                let result = match inst {
                    ShiftR => v >> 1,
                    ShiftL => v.wrapping_shl(1),
                    Inc => v.wrapping_add(1),
                    _ => v.wrapping_sub(1),
                };
                self.registers.set(reg, result);
                (consumed(&nops), executed)
            }
            Push => {
                let nops = self.following_nops();
                self.stacks.push(self.registers.get(operand(&nops, Register::B)));
                (consumed(&nops), executed)
            }
            Pop => {
                let nops = self.following_nops();
                let value = self.stacks.pop();
                self.registers.set(operand(&nops, Register::B), value);
                (consumed(&nops), executed)
            }
            SwapStk => {
                self.stacks.toggle();
                (1, executed)
            }
            Swap => {
                let nops = self.following_nops();
                let reg = operand(&nops, Register::B);
                self.registers.swap(reg, reg.next());
                (consumed(&nops), executed)
            }

            // ── Double-argument math: always B op C ──
            Add | Sub | Nand => {
                let nops = self.following_nops();
                let (b, c) = (self.registers.b, self.registers.c);
                let result = match inst {
                    Add => b.wrapping_add(c),
                    Sub => b.wrapping_sub(c),
                    _ => !(b & c),
                };
                self.registers.set(operand(&nops, Register::B), result);
                (consumed(&nops), executed)
            }

            // ── Biological ──
            HAlloc => {
                if let Some(old_len) = self.memory.allocate(self.genome.len(), self.table.filler()) {
                    self.registers.a = old_len as i32;
                    debug!(old_len, new_len = self.memory.len(), "memory allocated");
                }
                (1, executed)
            }
            HCopy => {
                let copied = self.memory.get(self.heads.read);
                self.memory.set(self.heads.write, copied);
                self.record_copy(copied);
                self.heads.read = self.memory.wrap(self.heads.read + 1);
                self.heads.write = self.memory.wrap(self.heads.write + 1);
                (1, executed)
            }
            HDivide => self.divide(),

            // ── I/O and search ──
            Io => {
                let nops = self.following_nops();
                let reg = operand(&nops, Register::B);
                let value = self.registers.get(reg);
                let solved = self.output(value, ip);
                let input = self.inputs.next_input();
                self.registers.set(reg, input);
                (consumed(&nops), StepEvent::Output { value, solved })
            }
            HSearch => {
                let nops = self.following_nops();
                if nops.is_empty() {
                    self.registers.b = 0;
                    self.registers.c = 0;
                    self.heads.flow = self.memory.wrap(ip + 1);
                    return (1, executed);
                }
                let size = nops.len();
                match self.find_label(ip, &complement_label(&nops)) {
                    Some(pos) => {
                        self.registers.b = pos as i32 - ip as i32;
                        self.heads.flow = self.memory.wrap(pos + size);
                    }
                    None => {
                        self.registers.b = 0;
                        self.heads.flow = self.memory.wrap(ip + 1);
                    }
                }
                self.registers.c = size as i32;
                (consumed(&nops), executed)
            }

            // ── Sensors ──
            SenseReactNand | SenseReactNot | SenseReactAnd | SenseReactOrn
            | SenseReactOr | SenseReactAndn => {
                if let Some(value) = self.environment.sense(inst) {
                    self.stacks.push(value);
                }
                (1, executed)
            }
        }
    }

    fn divide(&mut self) -> (usize, StepEvent) {
        let required = self.genome.len();
        let copied = self.copy_history.len();
        if copied < required {
            debug!(copied, required, "unsuccessful divide: not enough instructions copied");
            self.emit_trace(TraceSeverity::Warn, "divide_failed", || {
                format!("copied {} of {}", copied, required)
            });
            return (1, StepEvent::DivideFailed { copied, required });
        }

        let offspring = self.memory.circular_slice(self.heads.read, self.heads.write);
        let tasks = self.tasks;
        info!(
            offspring_len = offspring.len(),
            tasks = tasks.count(),
            executed = self.instructions_executed + 1,
            "divide"
        );
        self.emit_trace(TraceSeverity::Info, "divide", || {
            format!("offspring {}", self.table.encode_genome(&offspring))
        });
        self.reset();
        (0, StepEvent::Divided { offspring, tasks })
    }

    fn output(&mut self, value: i32, ip: usize) -> Vec<Task> {
        let index = self.outputs.len();
        self.outputs.push(OutputEvent { value, ip });
        let inputs = *self.inputs.values();
        let solved = self.tasks.observe(&inputs, value, ip, index);
        for task in &solved {
            info!(task = task.name(), ip, value, "task performed");
        }
        self.emit_trace(TraceSeverity::Info, "output", || format!("{} (solved {:?})", value, solved));
        solved
    }

    /// No-op labels directly after the IP, wrapping, never past the IP itself.
    fn following_nops(&self) -> Vec<Nop> {
        let ip = self.heads.ip;
        let mut labels = Vec::new();
        let mut pos = self.memory.wrap(ip + 1);
        while pos != ip {
            match self.memory.get(pos).nop() {
                Some(nop) => labels.push(nop),
                None => break,
            }
            pos = self.memory.wrap(pos + 1);
        }
        labels
    }

    /// First position after `ip` (circular) where `label` starts.
    fn find_label(&self, ip: usize, label: &[Nop]) -> Option<usize> {
        let mut pos = self.memory.wrap(ip + 1);
        while pos != ip {
            let matched = label
                .iter()
                .enumerate()
                .all(|(offset, &nop)| self.memory.get(pos + offset).nop() == Some(nop));
            if matched {
                return Some(pos);
            }
            pos = self.memory.wrap(pos + 1);
        }
        None
    }

    fn copy_history_ends_with(&self, label: &[Nop]) -> bool {
        label.len() <= self.copy_history.len()
            && self
                .copy_history
                .iter()
                .rev()
                .zip(label.iter().rev())
                .all(|(inst, &nop)| inst.nop() == Some(nop))
    }

    /// Append to the copy history, keeping at most one memory's worth.
    fn record_copy(&mut self, inst: Instruction) {
        self.copy_history.push_back(inst);
        while self.copy_history.len() > self.memory.len() {
            self.copy_history.pop_front();
        }
    }
}

impl std::fmt::Debug for Organism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Organism")
            .field("genome", &self.genome_string())
            .field("registers", &self.registers)
            .field("heads", &self.heads)
            .field("tasks", &self.tasks)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

/// Register chosen by the first modifier, or `default`.
#[inline]
fn operand(nops: &[Nop], default: Register) -> Register {
    nops.first().map(|&n| Register::from(n)).unwrap_or(default)
}

/// Head chosen by the first modifier, or the IP.
#[inline]
fn head_operand(nops: &[Nop]) -> Head {
    nops.first().map(|&n| Head::from_nop(n)).unwrap_or(Head::Ip)
}

/// Cells taken by the instruction and its modifiers.
#[inline]
fn consumed(nops: &[Nop]) -> usize {
    1 + nops.len()
}
