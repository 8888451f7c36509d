use crate::error::PlanError;
use crate::problem::ProblemGraph;
use crate::state::{Block, BlockState};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Parses stacks written as strings of block letters into a `BlockState`.
///
/// Each string slice is one stack, listed bottom to top, using `a` for block 0,
/// `b` for block 1 and so on. An empty string is an empty stack. The letters
/// used must be exactly the first `n` letters of the alphabet, each once, where
/// `n` is the total number of letters.
///
/// # Errors
/// * [`PlanError::InvalidConfiguration`] if `s` is empty.
/// * [`PlanError::Parse`] on a character outside `a..=z`, a repeated block, or
///   a gap in the labels.
///
/// # Examples
/// ```
/// use blocks_planner::utils::state_from_str_array;
///
/// let s = state_from_str_array(&["ac", "", "b"]).unwrap();
/// assert_eq!(s.stack(0), &[0, 2]);
/// assert!(s.stack(1).is_empty());
/// assert_eq!(s.to_string(), "stack[0]=ac stack[1]= stack[2]=b");
///
/// assert!(state_from_str_array(&["aB"]).is_err());
/// assert!(state_from_str_array(&["a", "a"]).is_err());
/// assert!(state_from_str_array(&["ac"]).is_err());
/// ```
pub fn state_from_str_array(s: &[&str]) -> Result<BlockState, PlanError> {
    if s.is_empty() {
        return Err(PlanError::InvalidConfiguration {
            stacks: 0,
            blocks: 0,
        });
    }

    let total: usize = s.iter().map(|row| row.chars().count()).sum();
    let mut seen = FxHashSet::default();
    let mut stacks = Vec::with_capacity(s.len());

    for (k, row) in s.iter().enumerate() {
        let mut stack = Vec::with_capacity(row.len());
        for ch in row.chars() {
            if !ch.is_ascii_lowercase() {
                return Err(PlanError::Parse {
                    stack: k,
                    reason: format!("unrecognized block '{}'", ch),
                });
            }
            let block = Block::from(ch as u8 - b'a');
            if block as usize >= total {
                return Err(PlanError::Parse {
                    stack: k,
                    reason: format!("block '{}' is beyond the {} blocks in use", ch, total),
                });
            }
            if !seen.insert(block) {
                return Err(PlanError::Parse {
                    stack: k,
                    reason: format!("block '{}' appears twice", ch),
                });
            }
            stack.push(block);
        }
        stacks.push(stack);
    }
    Ok(BlockState::from_stacks(stacks))
}

/// Number of actions on a shortest path to a goal, found by breadth-first
/// search. Only meaningful for problems whose actions all cost the same.
///
/// Returns `None` when no goal is reachable.
pub fn breadth_first_distance<P: ProblemGraph>(problem: &P) -> Option<usize> {
    let start = problem.initial_state();
    let mut depth = FxHashMap::default();
    let mut queue = VecDeque::new();
    depth.insert(start.clone(), 0usize);
    queue.push_back(start);

    while let Some(state) = queue.pop_front() {
        let d = depth[&state];
        if problem.is_goal(&state) {
            return Some(d);
        }
        for transition in problem.expand(&state) {
            if !depth.contains_key(&transition.successor) {
                depth.insert(transition.successor.clone(), d + 1);
                queue.push_back(transition.successor);
            }
        }
    }
    None
}

/// Number of states reachable from the initial state, the initial state
/// included.
pub fn count_reachable_states<P: ProblemGraph>(problem: &P) -> usize {
    let start = problem.initial_state();
    let mut seen = FxHashSet::default();
    let mut queue = VecDeque::new();
    seen.insert(start.clone());
    queue.push_back(start);

    while let Some(state) = queue.pop_front() {
        for transition in problem.expand(&state) {
            if seen.insert(transition.successor.clone()) {
                queue.push_back(transition.successor);
            }
        }
    }
    seen.len()
}
