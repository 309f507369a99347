use std::sync::Arc;

use proptest::prelude::*;

use avidian::genome::{Genome, Memory};
use avidian::instset::symbol_for_index;
use avidian::io::InputSource;
use avidian::tasks::detect;
use avidian::vm::StepEvent;
use avidian::{Instruction, InstructionTable, Organism, OrganismConfig, Task, TaskRecord};

fn genome_strategy(max_len: usize) -> impl Strategy<Value = String> {
    let table_len = InstructionTable::heads_default().len();
    prop::collection::vec(0..table_len, 1..max_len)
        .prop_map(|indices| indices.into_iter().filter_map(symbol_for_index).collect())
}

fn organism(genome: &str, sensors: bool, seed: u64) -> Organism {
    Organism::with_config(
        genome,
        Arc::new(InstructionTable::heads_default()),
        OrganismConfig::new(sensors, seed % 2 == 0).with_inputs(InputSource::Seeded(seed)),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn test_heads_stay_in_memory(
        genome in genome_strategy(48),
        steps in 0usize..600,
        sensors: bool,
        seed: u64,
    ) {
        let mut org = organism(&genome, sensors, seed);
        for _ in 0..steps {
            org.step();
            let len = org.memory().len();
            let heads = org.heads();
            prop_assert!(heads.ip < len);
            prop_assert!(heads.read < len);
            prop_assert!(heads.write < len);
            prop_assert!(heads.flow < len);
            prop_assert!(len <= 2 * genome.len());
        }
    }

    #[test]
    fn test_mutate_reverse_is_inverse(
        genome in genome_strategy(32),
        locus in 0usize..64,
        reverse: bool,
    ) {
        let mut org = organism(&genome, false, 1);
        org.run(50);
        let forward = org.mutate(locus, reverse);
        prop_assert_eq!(org.instructions_executed(), 0);
        let back = org.mutate(locus, !reverse);
        prop_assert_eq!(back.to, forward.from);
        prop_assert_eq!(org.genome_string(), genome);
        prop_assert_eq!(org.heads().ip, 0);
    }

    #[test]
    fn test_clear_restores_fresh_state(
        genome in genome_strategy(32),
        edits in prop::collection::vec((0usize..64, any::<bool>()), 0..6),
        steps in 0u64..300,
        seed: u64,
    ) {
        let mut org = organism(&genome, true, seed);
        for (locus, reverse) in edits {
            org.mutate(locus, reverse);
            org.run(steps);
        }
        org.clear();
        prop_assert_eq!(org.snapshot(), organism(&genome, true, seed).snapshot());
    }

    #[test]
    fn test_task_record_is_monotonic(
        genome in genome_strategy(40),
        steps in 0usize..800,
        seed: u64,
    ) {
        let mut org = organism(&genome, true, seed);
        let mut seen = TaskRecord::default();
        for _ in 0..steps {
            if let StepEvent::Divided { .. } = org.step() {
                seen = TaskRecord::default();
                continue;
            }
            for (task, hit) in seen.solved() {
                prop_assert_eq!(org.tasks().hit(task), Some(hit));
            }
            seen = *org.tasks();
        }
    }

    #[test]
    fn test_and_output_does_not_credit_nand(inputs: [i32; 3]) {
        let value = inputs[0] & inputs[1];
        prop_assume!(!detect(Task::Nand, &inputs, value));
        let mut record = TaskRecord::new();
        record.observe(&inputs, value, 3, 0);
        prop_assert!(record.is_done(Task::And));
        prop_assert!(!record.is_done(Task::Nand));
    }

    #[test]
    fn test_set_flow_three_tier_clamp(len in 1usize..64, pos in -200i64..400) {
        let memory = Memory::from_genome(&Genome::new(vec![Instruction::NopC; len]));
        let len = len as i64;
        let expected = match pos {
            p if p < 0 => 0,
            p if p < len => p,
            p if p < 2 * len => p - len,
            p => p % len,
        };
        prop_assert_eq!(memory.clamp_flow(pos) as i64, expected);
        prop_assert_eq!(memory.clamp_flow(2 * len + pos.rem_euclid(len)) as i64, pos.rem_euclid(len));
    }

    #[test]
    fn test_genome_round_trip(genome in genome_strategy(64)) {
        let table = InstructionTable::heads_default();
        let decoded = table.decode_genome(&genome).unwrap();
        prop_assert_eq!(table.encode_genome(&decoded), genome);
    }

    #[test]
    fn test_failed_divide_only_moves_ip(tail in genome_strategy(24), seed: u64) {
        let genome = format!("x{}", tail);
        let mut org = organism(&genome, false, seed);
        let before = org.snapshot();
        let event = org.step();
        prop_assert_eq!(event, StepEvent::DivideFailed { copied: 0, required: genome.len() });
        let after = org.snapshot();
        prop_assert_eq!(after.heads.ip, 1);
        prop_assert_eq!(after.registers, before.registers);
        prop_assert_eq!(after.memory, before.memory);
        prop_assert_eq!(after.stacks, before.stacks);
        prop_assert_eq!(after.outputs, before.outputs);
    }
}
