use anyhow::{Context, Result};
use blocks_planner::config::PlannerConfig;
use blocks_planner::heuristics::Heuristic;
use blocks_planner::solver::SearchOutcome;
use clap::Parser;
use log::LevelFilter;
use std::time::Instant;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Finds a shortest plan gathering all blocks on the last stack.", long_about = None)]
struct Args {
    /// Number of stacks
    #[clap(short, long, env = "BLOCKS_STACKS", allow_negative_numbers = true)]
    stacks: i64,

    /// Number of blocks
    #[clap(short, long, env = "BLOCKS_COUNT", allow_negative_numbers = true)]
    blocks: i64,

    /// Heuristic guiding the search
    #[clap(long, value_enum, default_value_t = Heuristic::Zero)]
    heuristic: Heuristic,

    /// Give up after expanding this many states
    #[clap(long)]
    max_iterations: Option<u64>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = PlannerConfig::new(args.stacks, args.blocks)
        .context("invalid planner configuration")?
        .with_heuristic(args.heuristic)
        .with_max_iterations(args.max_iterations);
    let problem = config.problem().context("building the blocks world")?;
    log::info!(
        "solving {} blocks on {} stacks with the {} heuristic",
        config.blocks(),
        config.stacks(),
        config.heuristic().name()
    );

    let start = Instant::now();
    let outcome = config.search().solve(&problem);
    let elapsed = start.elapsed().as_secs_f64();

    match outcome {
        SearchOutcome::Found(solution) => {
            println!(
                "Optimal solution of length {} found in {} iterations and {:.6} seconds",
                solution.total_cost, solution.stats.iterations, elapsed
            );
            println!("Init: {}", solution.start);
            for step in &solution.steps {
                println!("{}: {}", step.action, step.state);
            }
        }
        SearchOutcome::NotFound { stats } => {
            println!(
                "The problem has no solution (number of iterations = {}; CPU time = {:.6}s)",
                stats.iterations, elapsed
            );
        }
        SearchOutcome::Interrupted { stats } => {
            println!(
                "Search stopped after {} iterations without a solution (CPU time = {:.6}s)",
                stats.iterations, elapsed
            );
        }
    }
    Ok(())
}
