use anyhow::{bail, Context, Result};
use blocks_planner::blocks_world::BlocksWorld;
use blocks_planner::heuristics::Heuristic;
use blocks_planner::problem::Cost;
use blocks_planner::solver::{solve, SearchOutcome};
use blocks_planner::utils::breadth_first_distance;
use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Checks A* costs against breadth-first search on small instances.", long_about = None)]
struct Args {
    /// Largest stack count to check
    #[clap(long, default_value_t = 4)]
    max_stacks: usize,

    /// Largest block count to check
    #[clap(long, default_value_t = 5)]
    max_blocks: usize,

    /// Increase log output
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut mismatches = 0;
    for stacks in 1..=args.max_stacks {
        for blocks in 1..=args.max_blocks {
            let world = BlocksWorld::new(stacks, blocks)
                .with_context(|| format!("{} stacks, {} blocks", stacks, blocks))?;
            let expected = breadth_first_distance(&world).map(|d| d as Cost);

            for heuristic in Heuristic::ALL {
                let outcome = solve(&world.clone().with_heuristic(heuristic));
                let found = match &outcome {
                    SearchOutcome::Found(solution) => Some(solution.total_cost),
                    _ => None,
                };
                let verdict = if found == expected { "ok" } else { "MISMATCH" };
                if found != expected {
                    mismatches += 1;
                }
                println!(
                    "{:>2} stacks {:>2} blocks {:<16} bfs={:<6} astar={:<6} iterations={:<8} {}",
                    stacks,
                    blocks,
                    heuristic.name(),
                    expected.map_or("none".to_string(), |c| c.to_string()),
                    found.map_or("none".to_string(), |c| c.to_string()),
                    outcome.iterations(),
                    verdict
                );
                if expected.is_some() != world.is_solvable() {
                    log::warn!(
                        "solvability prediction disagrees with search for {} stacks, {} blocks",
                        stacks,
                        blocks
                    );
                    mismatches += 1;
                }
            }
        }
    }

    if mismatches > 0 {
        bail!("{} mismatches between A* and breadth-first search", mismatches);
    }
    println!("All instances agree.");
    Ok(())
}
