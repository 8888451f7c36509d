//! The blocks-world planning problem.
//!
//! `BlocksWorld` starts from blocks dealt round-robin over the stacks and asks
//! for every block on the last stack, ordered so that block `n-1` is at the
//! bottom and block `0` on top. Any top block may move onto any other stack at
//! a cost of one.
use crate::error::PlanError;
use crate::heuristics::Heuristic;
use crate::problem::{Cost, ProblemGraph, Transition};
use crate::state::{Block, BlockState, Move};

/// Cost of a single move.
pub const MOVE_COST: Cost = 1;

/// A blocks-world instance: `stack_count` stacks holding `block_count` blocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlocksWorld {
    stack_count: usize,
    block_count: usize,
    heuristic: Heuristic,
}

impl BlocksWorld {
    /// Creates an instance using [`Heuristic::Zero`].
    ///
    /// # Errors
    /// Returns [`PlanError::InvalidConfiguration`] if either count is zero.
    pub fn new(stack_count: usize, block_count: usize) -> Result<Self, PlanError> {
        if stack_count == 0 || block_count == 0 {
            return Err(PlanError::InvalidConfiguration {
                stacks: stack_count as i64,
                blocks: block_count as i64,
            });
        }
        Ok(BlocksWorld {
            stack_count,
            block_count,
            heuristic: Heuristic::Zero,
        })
    }

    /// Replaces the heuristic used by [`ProblemGraph::heuristic`].
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn stack_count(&self) -> usize {
        self.stack_count
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn heuristic_kind(&self) -> Heuristic {
        self.heuristic
    }

    /// The unique goal state.
    pub fn goal_state(&self) -> BlockState {
        let mut stacks = vec![Vec::new(); self.stack_count];
        stacks[self.stack_count - 1] = (0..self.block_count as Block).rev().collect();
        BlockState::from_stacks(stacks)
    }

    /// Every legal move from `state`, ordered by source then destination stack.
    pub fn legal_moves(&self, state: &BlockState) -> Vec<Move> {
        let n = state.stack_count();
        let mut moves = Vec::with_capacity(n * n.saturating_sub(1));
        for from in 0..n {
            if state.stack_len(from) == 0 {
                continue;
            }
            moves.extend((0..n).filter(|&to| to != from).map(|to| Move::new(from, to)));
        }
        moves
    }

    /// Finds the move that turns `from` into `to`, if there is one.
    pub fn move_between(&self, from: &BlockState, to: &BlockState) -> Option<Move> {
        self.legal_moves(from)
            .into_iter()
            .find(|&mv| from.moved(mv) == *to)
    }

    /// Whether the goal can be reached from the initial state at all.
    ///
    /// With three or more stacks any arrangement can be built. With two, a
    /// move never changes the sequence read up the first stack and back down
    /// the second, so the goal is reachable only if that sequence already
    /// matches. With one stack nothing can move.
    pub fn is_solvable(&self) -> bool {
        match self.stack_count {
            1 => self.block_count == 1,
            2 => {
                let start = self.initial_state();
                let goal = self.goal_state();
                two_stack_sequence(&start) == two_stack_sequence(&goal)
            }
            _ => true,
        }
    }
}

fn two_stack_sequence(state: &BlockState) -> Vec<Block> {
    state
        .stack(0)
        .iter()
        .chain(state.stack(1).iter().rev())
        .copied()
        .collect()
}

impl ProblemGraph for BlocksWorld {
    type State = BlockState;
    type Action = Move;

    fn initial_state(&self) -> BlockState {
        BlockState::round_robin(self.stack_count, self.block_count)
    }

    fn is_goal(&self, state: &BlockState) -> bool {
        let last = self.stack_count - 1;
        if (0..last).any(|i| state.stack_len(i) > 0) {
            return false;
        }
        let top = state.stack(last);
        top.len() == self.block_count
            && top
                .iter()
                .enumerate()
                .all(|(i, &block)| block as usize == self.block_count - 1 - i)
    }

    fn expand(&self, state: &BlockState) -> Vec<Transition<BlockState, Move>> {
        self.legal_moves(state)
            .into_iter()
            .map(|mv| Transition::new(mv, MOVE_COST, state.moved(mv)))
            .collect()
    }

    fn heuristic(&self, state: &BlockState) -> Cost {
        self.heuristic.estimate(state)
    }
}
