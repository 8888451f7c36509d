//! # Blocks Planner Library
//!
//! This library provides a generic A* search over state-transition problems
//! and a blocks-world planning domain to drive it.
//!
//! It is used by three binaries:
//! - `planner`: Takes a stack count and a block count, then prints an optimal
//!   sequence of moves that gathers every block on the last stack.
//! - `heuristic_evaluator`: Compares the available heuristics on random
//!   instances.
//! - `exhaustive_check`: Cross-checks A* against breadth-first search on a
//!   grid of small instances.
//!
//! ## Modules
//! - `problem`: The `ProblemGraph` trait any domain implements to be searched.
//! - `solver`: `AStarSearch`, its outcome types and the `solve` entry point.
//! - `state`: Blocks-world states (`BlockState`) and moves (`Move`).
//! - `blocks_world`: The blocks-world `ProblemGraph`.
//! - `heuristics`: Admissible estimates for the blocks-world goal.
//! - `config`: Validated planner settings.
//! - `error`: `PlanError`.
//! - `utils`: Textual state parsing and a breadth-first reference search.

pub mod blocks_world;
pub mod config;
pub mod error;
pub mod heuristics;
pub mod problem;
pub mod solver;
pub mod state;
pub mod utils;
