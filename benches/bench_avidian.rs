//! avidian Benchmarks
//!
//! Run: cargo bench

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use avidian::genome::{knockouts, one_step_mutants};
use avidian::io::InputSource;
use avidian::{InstructionTable, Organism, OrganismConfig};

const ANCESTOR: &str = "wzcagcccczvfcaxgab";
const NOT_PERFORMER: &str = "wzcagccybobpcubybcczvfcaxgab";

fn organism(genome: &str) -> Organism {
    Organism::with_config(
        genome,
        Arc::new(InstructionTable::heads_default()),
        OrganismConfig::default().with_inputs(InputSource::Seeded(1)),
    )
    .unwrap()
}

fn bench_step(c: &mut Criterion) {
    let mut org = organism(ANCESTOR);
    c.bench_function("step (ancestor)", |b| {
        b.iter(|| black_box(org.step()));
    });

    let mut org = organism(NOT_PERFORMER);
    c.bench_function("step (io + tasks)", |b| {
        b.iter(|| black_box(org.step()));
    });
}

fn bench_replication(c: &mut Criterion) {
    let mut group = c.benchmark_group("replication");
    for genome in [ANCESTOR, NOT_PERFORMER] {
        let mut org = organism(genome);
        group.bench_function(format!("len_{}", genome.len()), |b| {
            b.iter(|| black_box(org.run(10_000)));
        });
    }
    group.finish();
}

fn bench_mutants(c: &mut Criterion) {
    let table = InstructionTable::heads_default();

    c.bench_function("knockouts (ancestor)", |b| {
        b.iter(|| knockouts(black_box(ANCESTOR), &table));
    });

    c.bench_function("one_step_mutants (ancestor)", |b| {
        b.iter(|| one_step_mutants(black_box(ANCESTOR), &table));
    });

    let mut org = organism(ANCESTOR);
    c.bench_function("mutate + clear", |b| {
        b.iter(|| {
            org.mutate(black_box(7), false);
            org.clear();
        });
    });
}

fn bench_table(c: &mut Criterion) {
    let config = InstructionTable::heads_default().to_config_string();
    c.bench_function("instset_parse (heads_default)", |b| {
        b.iter(|| InstructionTable::parse(black_box(&config)));
    });
}

criterion_group!(benches, bench_step, bench_replication, bench_mutants, bench_table);
criterion_main!(benches);
