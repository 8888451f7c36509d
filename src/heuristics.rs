//! Lower-bound estimates for the blocks-world goal.
//!
//! The planner only needs [`Heuristic::Zero`] to be correct; it is admissible
//! but gives the search no guidance. [`Heuristic::MisplacedBlocks`] is a
//! stronger estimate that is still admissible and consistent, so it never
//! changes the cost A* returns, only how many states it expands.
use crate::problem::Cost;
use crate::state::BlockState;

/// The heuristics available to [`crate::blocks_world::BlocksWorld`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Heuristic {
    /// Always 0.
    #[default]
    Zero,
    /// Number of blocks outside the correctly ordered base of the last stack.
    MisplacedBlocks,
}

impl Heuristic {
    /// Every heuristic, in declaration order.
    pub const ALL: [Heuristic; 2] = [Heuristic::Zero, Heuristic::MisplacedBlocks];

    /// Short name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::Zero => "zero",
            Heuristic::MisplacedBlocks => "misplaced-blocks",
        }
    }

    /// Estimates the number of moves still needed from `state`.
    pub fn estimate(&self, state: &BlockState) -> Cost {
        match self {
            Heuristic::Zero => 0,
            Heuristic::MisplacedBlocks => Cost::from(count_misplaced_blocks(state)),
        }
    }
}

/// Counts the blocks that are not yet in their final place.
///
/// In the goal, the last stack holds block `n-1-i` at height `i`. A block sits
/// in its final place when it belongs to the longest bottom run of the last
/// stack that already matches that order. Every other block has to be moved
/// at least once, so the count never overestimates. A single move changes the
/// run length by at most one, which keeps the estimate consistent under unit
/// move costs.
///
/// # Examples
/// ```
/// use blocks_planner::heuristics::count_misplaced_blocks;
/// use blocks_planner::utils::state_from_str_array;
///
/// // Goal for 3 blocks is "cba" on the last stack.
/// let s = state_from_str_array(&["a", "", "cb"]).unwrap();
/// assert_eq!(count_misplaced_blocks(&s), 1);
/// ```
pub fn count_misplaced_blocks(state: &BlockState) -> u32 {
    let n = state.block_count();
    if state.stack_count() == 0 {
        return 0;
    }
    let last = state.stack(state.stack_count() - 1);
    let in_place = last
        .iter()
        .enumerate()
        .take_while(|&(i, &block)| block as usize + 1 + i == n)
        .count();
    (n - in_place) as u32
}
