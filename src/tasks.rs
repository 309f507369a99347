//! Logic-Task Detection
//!
//! Every output is compared against the organism's three inputs. A task is
//! credited when the output equals the task's boolean function applied to a
//! single input (NOT) or to an unordered pair of inputs (everything else).
//! Credit is first-wins: the record keeps the instruction pointer of the
//! first witnessing output and never changes it afterwards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Task {
    Not    = 0,
    And    = 1,
    Or     = 2,
    Nand   = 3,
    AndNot = 4,
    OrNot  = 5,
}

impl Task {
    /// Detection priority order.
    pub const ALL: [Task; 6] = [
        Task::Not,
        Task::And,
        Task::Or,
        Task::Nand,
        Task::AndNot,
        Task::OrNot,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Not => "NOT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Nand => "NAND",
            Self::AndNot => "ANDNOT",
            Self::OrNot => "ORNOT",
        }
    }

    /// Does `value` witness this task for inputs `a` and `b`?
    /// NOT only looks at `a`; ANDNOT and ORNOT accept either operand order.
    #[inline]
    pub fn witnessed_by(self, a: i32, b: i32, value: i32) -> bool {
        match self {
            Self::Not => !a == value,
            Self::And => a & b == value,
            Self::Or => a | b == value,
            Self::Nand => !(a & b) == value,
            Self::AndNot => (!a & b) == value || (a & !b) == value,
            Self::OrNot => (!a | b) == value || (a | !b) == value,
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Unordered input pairs tested for the two-input tasks.
const INPUT_PAIRS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

/// Does `value` witness `task` for any single input / input pair?
pub fn detect(task: Task, inputs: &[i32; 3], value: i32) -> bool {
    match task {
        Task::Not => inputs.iter().any(|&a| task.witnessed_by(a, a, value)),
        _ => INPUT_PAIRS
            .iter()
            .any(|&(i, j)| task.witnessed_by(inputs[i], inputs[j], value)),
    }
}

/// Where a task was first performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHit {
    /// Instruction pointer of the `IO` that produced the witnessing output.
    pub ip: usize,
    /// Index of that output in the episode's output history.
    pub output_index: usize,
}

/// Monotonic per-episode task record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    hits: [Option<TaskHit>; 6],
}

impl TaskRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check one output event. Returns the tasks this event solved for the
    /// first time, in priority order. Already-solved tasks are skipped.
    pub fn observe(
        &mut self,
        inputs: &[i32; 3],
        value: i32,
        ip: usize,
        output_index: usize,
    ) -> Vec<Task> {
        let mut solved = Vec::new();
        for task in Task::ALL {
            let slot = &mut self.hits[task as usize];
            if slot.is_none() && detect(task, inputs, value) {
                *slot = Some(TaskHit { ip, output_index });
                solved.push(task);
            }
        }
        solved
    }

    pub fn hit(&self, task: Task) -> Option<TaskHit> {
        self.hits[task as usize]
    }

    pub fn is_done(&self, task: Task) -> bool {
        self.hits[task as usize].is_some()
    }

    pub fn solved(&self) -> impl Iterator<Item = (Task, TaskHit)> + '_ {
        Task::ALL
            .into_iter()
            .filter_map(|task| self.hits[task as usize].map(|hit| (task, hit)))
    }

    pub fn count(&self) -> usize {
        self.hits.iter().filter(|h| h.is_some()).count()
    }

    pub fn reset(&mut self) {
        self.hits = [None; 6];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUTS: [i32; 3] = [0x0F0F_1234, 0x3355_00FF, -0x0123_4568];

    #[test]
    fn test_single_task_functions() {
        let [a, b, _] = INPUTS;
        assert!(Task::Not.witnessed_by(a, b, !a));
        assert!(Task::And.witnessed_by(a, b, a & b));
        assert!(Task::Or.witnessed_by(a, b, a | b));
        assert!(Task::Nand.witnessed_by(a, b, !(a & b)));
        assert!(Task::AndNot.witnessed_by(a, b, a & !b));
        assert!(Task::AndNot.witnessed_by(a, b, !a & b));
        assert!(Task::OrNot.witnessed_by(a, b, !a | b));
        assert!(Task::OrNot.witnessed_by(a, b, a | !b));
    }

    #[test]
    fn test_detect_over_all_pairs() {
        let [_, b, c] = INPUTS;
        assert!(detect(Task::And, &INPUTS, b & c));
        assert!(detect(Task::Not, &INPUTS, !c));
        assert!(!detect(Task::Not, &INPUTS, 12345));
    }

    #[test]
    fn test_and_does_not_credit_nand() {
        let [a, b, _] = INPUTS;
        let mut record = TaskRecord::new();
        let solved = record.observe(&INPUTS, a & b, 17, 0);
        assert!(solved.contains(&Task::And));
        assert!(!record.is_done(Task::Nand));
    }

    #[test]
    fn test_record_is_first_wins() {
        let [a, b, _] = INPUTS;
        let mut record = TaskRecord::new();
        record.observe(&INPUTS, a | b, 4, 0);
        assert_eq!(record.hit(Task::Or), Some(TaskHit { ip: 4, output_index: 0 }));

        let again = record.observe(&INPUTS, a | b, 40, 1);
        assert!(!again.contains(&Task::Or));
        assert_eq!(record.hit(Task::Or).map(|h| h.ip), Some(4));
        assert!(record.count() >= 1);

        record.reset();
        assert_eq!(record.count(), 0);
        assert_eq!(record.solved().count(), 0);
    }
}
