//! Validated planner settings.
//!
//! Stack and block counts arrive from outside the library (command line or
//! environment) as signed integers and are checked here, before any problem
//! is built or searched.
use crate::blocks_world::BlocksWorld;
use crate::error::PlanError;
use crate::heuristics::Heuristic;
use crate::solver::AStarSearch;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannerConfig {
    stacks: usize,
    blocks: usize,
    heuristic: Heuristic,
    max_iterations: Option<u64>,
}

impl PlannerConfig {
    /// Checks that both counts are positive.
    ///
    /// # Errors
    /// Returns [`PlanError::InvalidConfiguration`] if `stacks <= 0` or
    /// `blocks <= 0`.
    ///
    /// # Examples
    /// ```
    /// use blocks_planner::config::PlannerConfig;
    /// assert!(PlannerConfig::new(3, 4).is_ok());
    /// assert!(PlannerConfig::new(-1, 4).is_err());
    /// assert!(PlannerConfig::new(3, 0).is_err());
    /// ```
    pub fn new(stacks: i64, blocks: i64) -> Result<Self, PlanError> {
        let invalid = PlanError::InvalidConfiguration { stacks, blocks };
        let (Ok(stack_count), Ok(block_count)) = (usize::try_from(stacks), usize::try_from(blocks))
        else {
            return Err(invalid);
        };
        if stack_count == 0 || block_count == 0 {
            return Err(invalid);
        }
        Ok(PlannerConfig {
            stacks: stack_count,
            blocks: block_count,
            heuristic: Heuristic::Zero,
            max_iterations: None,
        })
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Sets an iteration budget; `None` searches until the frontier is empty.
    pub fn with_max_iterations(mut self, max_iterations: Option<u64>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn stacks(&self) -> usize {
        self.stacks
    }

    pub fn blocks(&self) -> usize {
        self.blocks
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn max_iterations(&self) -> Option<u64> {
        self.max_iterations
    }

    /// The blocks-world instance described by this configuration.
    ///
    /// # Errors
    /// Never fails for a configuration built with [`PlannerConfig::new`]; the
    /// error is forwarded from [`BlocksWorld::new`].
    pub fn problem(&self) -> Result<BlocksWorld, PlanError> {
        Ok(BlocksWorld::new(self.stacks, self.blocks)?.with_heuristic(self.heuristic))
    }

    /// The search driver described by this configuration.
    pub fn search(&self) -> AStarSearch {
        match self.max_iterations {
            Some(limit) => AStarSearch::new().with_max_iterations(limit),
            None => AStarSearch::new(),
        }
    }
}
