//! # avidian
//!
//! **Heads-based virtual CPU for digital organisms**
//!
//! Each [`Organism`](vm::Organism) owns a genome of single-character
//! instruction symbols, a circular working memory, three 32-bit registers,
//! four heads (IP, read, write, flow) and two stacks. Stepping it executes
//! the heads instruction set: self-copying through `h-alloc` / `h-copy` /
//! `h-divide`, label-based flow control, arithmetic, I/O against three
//! per-episode inputs, and environment sensors. Outputs are checked against
//! six boolean logic tasks (NOT, AND, OR, NAND, ANDNOT, ORNOT).
//!
//! The crate is a pure execution engine. Population dynamics, fitness and
//! visualisation belong to the caller, which drives organisms one step at a
//! time and reads their state back through accessors, snapshots and trace
//! hooks.
//!
//! ## Quick Start
//!
//! ```rust
//! use avidian::vm::Organism;
//!
//! let ancestor = "wzcagcccczvfcaxgab";
//! let mut org = Organism::new(ancestor, false, true).unwrap();
//! let summary = org.run(1_000);
//!
//! assert!(summary.divided());
//! let offspring = summary.offspring.unwrap();
//! assert_eq!(org.table().encode_genome(&offspring), ancestor);
//! ```
//!
//! ## Instruction sets
//!
//! The default table is the 33-entry heads set with sensors. Others load
//! from `INST` configuration files via
//! [`InstructionTable::from_file`](instset::InstructionTable::from_file).

pub mod config;
pub mod environment;
pub mod error;
pub mod genome;
pub mod instset;
pub mod io;
pub mod opcodes;
pub mod registers;
pub mod tasks;
pub mod vm;

pub use config::OrganismConfig;
pub use environment::{Environment, EnvironmentKind};
pub use error::{Error, Result};
pub use genome::{knockouts, one_step_mutants, two_step_mutants};
pub use instset::InstructionTable;
pub use io::InputSource;
pub use opcodes::{Instruction, InstructionClass, Nop};
pub use tasks::{Task, TaskRecord};
pub use vm::{Mutation, Organism, RunSummary, StepEvent};
