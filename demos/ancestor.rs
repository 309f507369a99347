//! Ancestor replication and knockout scan
//!
//! Runs the default ancestor until it divides, then knocks out every locus
//! in turn and reports which knockouts still replicate. A NOT-performing
//! variant shows task detection.
//!
//! Usage: cargo run --example ancestor
//!        RUST_LOG=avidian=debug cargo run --example ancestor

use std::sync::Arc;

use tracing_subscriber::prelude::*;

use avidian::genome::knockouts;
use avidian::io::InputSource;
use avidian::vm::TraceSeverity;
use avidian::{InstructionTable, Organism, OrganismConfig, Task};

const ANCESTOR: &str = "wzcagcccczvfcaxgab";
const NOT_PERFORMER: &str = "wzcagccybobpcubybcczvfcaxgab";
const MAX_STEPS: u64 = 10_000;

fn main() -> avidian::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avidian=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== avidian ancestor ===\n");

    let table = Arc::new(InstructionTable::heads_default());
    let config = OrganismConfig::new(true, true).with_inputs(InputSource::Seeded(2021));

    // 1. Replicate the ancestor
    let mut org = Organism::with_config(ANCESTOR, Arc::clone(&table), config)?;
    org.add_trace_hook(|event| {
        if event.severity >= TraceSeverity::Info {
            println!("  {}", event);
        }
    });
    let summary = org.run(MAX_STEPS);
    match &summary.offspring {
        Some(offspring) => println!(
            "\n  Divided after {} steps -> {}",
            summary.steps,
            table.encode_genome(offspring)
        ),
        None => println!("\n  No divide within {} steps", MAX_STEPS),
    }

    // 2. Knockout scan
    println!("\n  Knockouts:");
    let mut viable = 0;
    for (locus, mutant) in knockouts(ANCESTOR, &table)?.iter().enumerate() {
        let mut org = Organism::with_config(mutant, Arc::clone(&table), config)?;
        let summary = org.run(MAX_STEPS);
        if summary.divided() {
            viable += 1;
        }
        println!(
            "    {:>2} {} {}",
            locus,
            mutant,
            if summary.divided() { "replicates" } else { "-" }
        );
    }
    println!("  {}/{} knockouts still replicate", viable, ANCESTOR.len());

    // 3. Task detection
    let mut org = Organism::with_config(NOT_PERFORMER, Arc::clone(&table), config)?;
    let summary = org.run(MAX_STEPS);
    println!("\n  {} outputs before divide", summary.outputs);
    for task in Task::ALL {
        match summary.tasks.hit(task) {
            Some(hit) => println!("    {:<6} at ip {}", task, hit.ip),
            None => println!("    {:<6} -", task),
        }
    }

    println!("\n=== done ===");
    Ok(())
}
