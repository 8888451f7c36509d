use blocks_planner::blocks_world::BlocksWorld;
use blocks_planner::heuristics::Heuristic;
use blocks_planner::solver::solve;
use log::LevelFilter;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::time::Instant;

const NUM_RANDOM_INSTANCES: usize = 20;
const START_SEED: u64 = 0;
const MIN_STACKS: usize = 3;
const MAX_STACKS: usize = 4;
const MAX_BLOCKS: usize = 6;

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    let mut iterations: BTreeMap<&str, Vec<u64>> = BTreeMap::new();
    let mut seconds: BTreeMap<&str, f64> = BTreeMap::new();

    println!(
        "Starting heuristic evaluation on {} random instances...",
        NUM_RANDOM_INSTANCES
    );

    for instance in 0..NUM_RANDOM_INSTANCES {
        let seed = START_SEED + instance as u64;
        let mut rng = SmallRng::seed_from_u64(seed);
        let stacks = rng.gen_range(MIN_STACKS..=MAX_STACKS);
        let blocks = rng.gen_range(1..=MAX_BLOCKS);
        let world = match BlocksWorld::new(stacks, blocks) {
            Ok(world) => world,
            Err(e) => {
                eprintln!("Skipping instance {} (seed {}): {}", instance, seed, e);
                continue;
            }
        };

        println!(
            "\nInstance {} (seed {}): {} stacks, {} blocks",
            instance, seed, stacks, blocks
        );

        let mut costs = Vec::new();
        for heuristic in Heuristic::ALL {
            let started = Instant::now();
            let outcome = solve(&world.clone().with_heuristic(heuristic));
            let elapsed = started.elapsed().as_secs_f64();

            let cost = outcome.solution().map(|s| s.total_cost);
            println!(
                "  Heuristic: {:<16}, Cost: {:<6}, Iterations: {:<8}, Time: {:.4}s",
                heuristic.name(),
                cost.map_or("none".to_string(), |c| c.to_string()),
                outcome.iterations(),
                elapsed
            );
            costs.push(cost);
            iterations
                .entry(heuristic.name())
                .or_default()
                .push(outcome.iterations());
            *seconds.entry(heuristic.name()).or_default() += elapsed;
        }

        if costs.windows(2).any(|w| w[0] != w[1]) {
            eprintln!(
                "Warning: heuristics disagree on the optimal cost for instance {} (seed {}): {:?}",
                instance, seed, costs
            );
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("\n--- Average Iterations ---");
    for (name, counts) in &iterations {
        if counts.is_empty() {
            println!("Heuristic {}: No runs recorded.", name);
            continue;
        }
        let average = counts.iter().sum::<u64>() as f64 / counts.len() as f64;
        println!(
            "Heuristic {:<16}: Average Iterations = {:.2}, Total Time = {:.4}s",
            name,
            average,
            seconds.get(name).copied().unwrap_or_default()
        );
    }
}
