//! Construction-time errors
//!
//! Execution itself never fails; only loading an instruction set or decoding
//! a genome against it can.

use std::path::PathBuf;

use thiserror::Error;

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read instruction set {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: malformed instruction entry `{text}`")]
    MalformedLine { line: usize, text: String },

    #[error("line {line}: unknown instruction `{name}`")]
    UnknownInstruction { line: usize, name: String },

    #[error("line {line}: instruction `{name}` declared more than once")]
    DuplicateInstruction { line: usize, name: String },

    #[error("entry {index}: instruction `{name}` listed more than once")]
    DuplicateEntry { index: usize, name: String },

    #[error("instruction set has {count} entries but only {max} symbols exist")]
    AlphabetExhausted { count: usize, max: usize },

    #[error("instruction set is empty")]
    EmptyInstructionSet,

    #[error("symbol `{symbol}` at position {position} is not in the instruction set")]
    UnknownSymbol { symbol: char, position: usize },

    #[error("genome is empty")]
    EmptyGenome,

    #[error("instruction set has no `{name}`")]
    MissingInstruction { name: &'static str },
}
