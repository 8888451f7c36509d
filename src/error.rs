//! Error types for planning problems.
//!
//! An exhausted search is not an error: it is reported through
//! [`crate::solver::SearchOutcome::NotFound`].

use thiserror::Error;

/// Failures raised while building or manipulating a planning problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Stack count or block count was not a positive number.
    #[error("the number of stacks and the number of blocks must be positive (got {stacks} stacks, {blocks} blocks)")]
    InvalidConfiguration { stacks: i64, blocks: i64 },

    /// A move was requested that violates the state's preconditions.
    #[error("illegal move {from}->{to}: {reason}")]
    IllegalMove {
        from: usize,
        to: usize,
        reason: &'static str,
    },

    /// A textual state description could not be parsed.
    #[error("cannot parse stack {stack}: {reason}")]
    Parse { stack: usize, reason: String },
}
