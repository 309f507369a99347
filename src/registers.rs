//! Register File, Heads and Stacks
//!
//! Three 32-bit registers (A, B, C) with two's-complement wraparound, four
//! heads indexing into memory, and two stacks of which one is active.

use serde::{Deserialize, Serialize};

use crate::opcodes::Nop;

/// Register selector. No-op modifiers map 1:1 onto registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Register {
    A = 0,
    B = 1,
    C = 2,
}

impl Register {
    /// Partner register for two-register instructions: (A,B), (B,C), (C,A).
    #[inline]
    pub fn next(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::C,
            Self::C => Self::A,
        }
    }
}

impl From<Nop> for Register {
    fn from(nop: Nop) -> Self {
        match nop {
            Nop::A => Self::A,
            Nop::B => Self::B,
            Nop::C => Self::C,
        }
    }
}

/// Head selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Head {
    Ip,
    Read,
    Write,
    Flow,
}

impl Head {
    /// Head named by a modifier: `nop-A` = IP, `nop-B` = read, `nop-C` = write.
    pub fn from_nop(nop: Nop) -> Self {
        match nop {
            Nop::A => Self::Ip,
            Nop::B => Self::Read,
            Nop::C => Self::Write,
        }
    }
}

/// General-purpose registers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterFile {
    pub a: i32,
    pub b: i32,
    pub c: i32,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, reg: Register) -> i32 {
        match reg {
            Register::A => self.a,
            Register::B => self.b,
            Register::C => self.c,
        }
    }

    #[inline]
    pub fn set(&mut self, reg: Register, value: i32) {
        match reg {
            Register::A => self.a = value,
            Register::B => self.b = value,
            Register::C => self.c = value,
        }
    }

    pub fn swap(&mut self, x: Register, y: Register) {
        let tmp = self.get(x);
        self.set(x, self.get(y));
        self.set(y, tmp);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Instruction pointer plus read, write and flow heads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heads {
    pub ip: usize,
    pub read: usize,
    pub write: usize,
    pub flow: usize,
}

impl Heads {
    #[inline]
    pub fn get(&self, head: Head) -> usize {
        match head {
            Head::Ip => self.ip,
            Head::Read => self.read,
            Head::Write => self.write,
            Head::Flow => self.flow,
        }
    }

    #[inline]
    pub fn set(&mut self, head: Head, pos: usize) {
        match head {
            Head::Ip => self.ip = pos,
            Head::Read => self.read = pos,
            Head::Write => self.write = pos,
            Head::Flow => self.flow = pos,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Two unbounded stacks; `swap-stk` flips which one is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stacks {
    stack_a: Vec<i32>,
    stack_b: Vec<i32>,
    using_b: bool,
}

impl Stacks {
    pub fn push(&mut self, value: i32) {
        self.active_mut().push(value);
    }

    /// Pop the active stack; an empty stack yields 0.
    pub fn pop(&mut self) -> i32 {
        self.active_mut().pop().unwrap_or(0)
    }

    pub fn toggle(&mut self) {
        self.using_b = !self.using_b;
    }

    pub fn active(&self) -> &[i32] {
        if self.using_b { &self.stack_b } else { &self.stack_a }
    }

    pub fn stack_a(&self) -> &[i32] {
        &self.stack_a
    }

    pub fn stack_b(&self) -> &[i32] {
        &self.stack_b
    }

    pub fn is_b_active(&self) -> bool {
        self.using_b
    }

    fn active_mut(&mut self) -> &mut Vec<i32> {
        if self.using_b { &mut self.stack_b } else { &mut self.stack_a }
    }

    pub fn reset(&mut self) {
        self.stack_a.clear();
        self.stack_b.clear();
        self.using_b = false;
    }
}
