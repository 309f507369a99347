//! Environment Context
//!
//! Two-environment world: environment A rewards NOT, AND and OR, environment
//! B rewards NAND, ORNOT and ANDNOT. Each `sense-react-*` instruction is tied
//! to one task and reports +1 when the organism currently sits in that
//! task's environment, -1 otherwise. With sensors disabled the instructions
//! do nothing.

use serde::{Deserialize, Serialize};

use crate::opcodes::Instruction;
use crate::tasks::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnvironmentKind {
    #[default]
    A,
    B,
}

impl EnvironmentKind {
    /// Environment in which `task` is rewarded.
    pub fn rewarding(task: Task) -> Self {
        match task {
            Task::Not | Task::And | Task::Or => Self::A,
            Task::Nand | Task::OrNot | Task::AndNot => Self::B,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Task a sensor instruction reports on.
pub fn sensed_task(inst: Instruction) -> Option<Task> {
    match inst {
        Instruction::SenseReactNand => Some(Task::Nand),
        Instruction::SenseReactNot => Some(Task::Not),
        Instruction::SenseReactAnd => Some(Task::And),
        Instruction::SenseReactOrn => Some(Task::OrNot),
        Instruction::SenseReactOr => Some(Task::Or),
        Instruction::SenseReactAndn => Some(Task::AndNot),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub sensors_enabled: bool,
    pub kind: EnvironmentKind,
}

impl Environment {
    pub fn new(sensors_enabled: bool, kind: EnvironmentKind) -> Self {
        Self { sensors_enabled, kind }
    }

    /// Build from the two construction flags.
    pub fn from_flags(sensors_enabled: bool, in_env_a: bool) -> Self {
        let kind = if in_env_a { EnvironmentKind::A } else { EnvironmentKind::B };
        Self { sensors_enabled, kind }
    }

    pub fn in_env_a(&self) -> bool {
        self.kind == EnvironmentKind::A
    }

    /// Value a sensor pushes: `Some(1)` if the sensed task is rewarded here,
    /// `Some(-1)` if not, `None` when sensors are off or `inst` is not a
    /// sensor.
    pub fn sense(&self, inst: Instruction) -> Option<i32> {
        if !self.sensors_enabled {
            return None;
        }
        let task = sensed_task(inst)?;
        Some(if EnvironmentKind::rewarding(task) == self.kind { 1 } else { -1 })
    }
}
