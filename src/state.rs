//! World state for the blocks-world domain.
//!
//! This module defines the value types that the planner searches over:
//! - `Block`: the label of a single block.
//! - `Move`: relocation of the top block of one stack onto another.
//! - `BlockState`: an immutable configuration of stacks, bottom to top.
//!
//! States are never mutated once built. Applying a move yields a new state
//! that shares every untouched stack with its source.
use crate::error::PlanError;
use std::fmt;
use std::rc::Rc;

/// Label of a block. Blocks are numbered `0..block_count` in creation order.
pub type Block = u32;

/// Returns the display label of a block: `a`, `b`, ... then `#26`, `#27`, ...
///
/// # Examples
/// ```
/// use blocks_planner::state::block_label;
/// assert_eq!(block_label(0), "a");
/// assert_eq!(block_label(25), "z");
/// assert_eq!(block_label(26), "#26");
/// ```
pub fn block_label(block: Block) -> String {
    match u8::try_from(block) {
        Ok(b) if b < 26 => char::from(b'a' + b).to_string(),
        _ => format!("#{}", block),
    }
}

/// Moves the block on top of stack `from` to the top of stack `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

impl Move {
    pub fn new(from: usize, to: usize) -> Self {
        Move { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// One configuration of the blocks world.
///
/// Each stack is stored bottom to top. Stacks are reference counted so that a
/// successor produced by [`BlockState::apply_move`] only allocates the two
/// stacks the move touches. Equality and hashing are structural over the full
/// stack contents, so equal states always hash identically.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockState {
    stacks: Vec<Rc<[Block]>>,
}

impl BlockState {
    /// Builds the state where `block_count` blocks are dealt round-robin over
    /// `stack_count` stacks: block `j` goes on top of stack `j % stack_count`.
    ///
    /// # Errors
    /// Returns [`PlanError::InvalidConfiguration`] if either count is zero.
    ///
    /// # Examples
    /// ```
    /// use blocks_planner::state::BlockState;
    /// let s = BlockState::initial(2, 3).unwrap();
    /// assert_eq!(s.stack(0), &[0, 2]);
    /// assert_eq!(s.stack(1), &[1]);
    /// ```
    pub fn initial(stack_count: usize, block_count: usize) -> Result<Self, PlanError> {
        if stack_count == 0 || block_count == 0 {
            return Err(PlanError::InvalidConfiguration {
                stacks: stack_count as i64,
                blocks: block_count as i64,
            });
        }
        Ok(Self::round_robin(stack_count, block_count))
    }

    /// Infallible core of [`BlockState::initial`]; `stack_count` must be positive.
    pub(crate) fn round_robin(stack_count: usize, block_count: usize) -> Self {
        let mut stacks = vec![Vec::new(); stack_count];
        for j in 0..block_count {
            stacks[j % stack_count].push(j as Block);
        }
        Self::from_stacks(stacks)
    }

    /// Wraps raw stacks, listed bottom to top, into a state.
    ///
    /// No check is made that labels are distinct; callers building states by
    /// hand (see [`crate::utils::state_from_str_array`]) are responsible for it.
    pub fn from_stacks(stacks: Vec<Vec<Block>>) -> Self {
        BlockState {
            stacks: stacks.into_iter().map(Rc::from).collect(),
        }
    }

    /// Number of stacks.
    pub fn stack_count(&self) -> usize {
        self.stacks.len()
    }

    /// Total number of blocks over all stacks.
    pub fn block_count(&self) -> usize {
        self.stacks.iter().map(|s| s.len()).sum()
    }

    /// Blocks of stack `i`, bottom first.
    ///
    /// # Panics
    /// Panics if `i >= stack_count()`.
    pub fn stack(&self, i: usize) -> &[Block] {
        &self.stacks[i]
    }

    /// Number of blocks on stack `i`.
    ///
    /// # Panics
    /// Panics if `i >= stack_count()`.
    pub fn stack_len(&self, i: usize) -> usize {
        self.stacks[i].len()
    }

    /// The `j`th block of stack `i`, counting from the bottom.
    ///
    /// # Panics
    /// Panics if `i >= stack_count()` or `j >= stack_len(i)`.
    pub fn block_at(&self, i: usize, j: usize) -> Block {
        self.stacks[i][j]
    }

    /// Top block of stack `i`, or `None` if the stack is empty or out of range.
    pub fn top(&self, i: usize) -> Option<Block> {
        self.stacks.get(i).and_then(|s| s.last().copied())
    }

    /// Returns the state reached by applying `mv` to `self`.
    ///
    /// `self` is left untouched.
    ///
    /// # Errors
    /// Returns [`PlanError::IllegalMove`] if either stack index is out of range,
    /// if source and destination are the same stack, or if the source stack is
    /// empty.
    pub fn apply_move(&self, mv: Move) -> Result<Self, PlanError> {
        let illegal = |reason| PlanError::IllegalMove {
            from: mv.from,
            to: mv.to,
            reason,
        };
        if mv.from >= self.stack_count() || mv.to >= self.stack_count() {
            return Err(illegal("stack index out of range"));
        }
        if mv.from == mv.to {
            return Err(illegal("source and destination are the same stack"));
        }
        if self.stacks[mv.from].is_empty() {
            return Err(illegal("source stack is empty"));
        }
        Ok(self.moved(mv))
    }

    /// Unchecked form of [`BlockState::apply_move`] for moves already known to
    /// be legal.
    pub(crate) fn moved(&self, mv: Move) -> Self {
        debug_assert!(mv.from != mv.to, "move onto the same stack");
        let source = &self.stacks[mv.from];
        let (&block, rest) = source
            .split_last()
            .unwrap_or_else(|| panic!("move {} from an empty stack", mv));

        let mut target = Vec::with_capacity(self.stacks[mv.to].len() + 1);
        target.extend_from_slice(&self.stacks[mv.to]);
        target.push(block);

        let mut stacks = self.stacks.clone();
        stacks[mv.from] = Rc::from(rest);
        stacks[mv.to] = Rc::from(target);
        BlockState { stacks }
    }
}

impl fmt::Display for BlockState {
    /// Formats as `stack[0]=ab stack[1]= stack[2]=c`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, stack) in self.stacks.iter().enumerate() {
            if k > 0 {
                f.write_str(" ")?;
            }
            write!(f, "stack[{}]=", k)?;
            for &block in stack.iter() {
                f.write_str(&block_label(block))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;
    use std::hash::{Hash, Hasher};

    fn hash_of(s: &BlockState) -> u64 {
        let mut h = DefaultHasher::new();
        s.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_initial_round_robin() {
        let s = BlockState::initial(3, 7).unwrap();
        assert_eq!(s.stack_count(), 3);
        assert_eq!(s.block_count(), 7);
        assert_eq!(s.stack(0), &[0, 3, 6]);
        assert_eq!(s.stack(1), &[1, 4]);
        assert_eq!(s.stack(2), &[2, 5]);
        assert_eq!(s.block_at(0, 2), 6);
        assert_eq!(s.top(1), Some(4));
    }

    #[test]
    fn test_initial_more_stacks_than_blocks() {
        let s = BlockState::initial(4, 2).unwrap();
        assert_eq!(s.stack(0), &[0]);
        assert_eq!(s.stack(1), &[1]);
        assert!(s.stack(2).is_empty());
        assert!(s.stack(3).is_empty());
        assert_eq!(s.top(3), None);
        assert_eq!(s.top(9), None);
    }

    #[test]
    fn test_initial_rejects_zero_counts() {
        assert_eq!(
            BlockState::initial(0, 3),
            Err(PlanError::InvalidConfiguration {
                stacks: 0,
                blocks: 3
            })
        );
        assert!(BlockState::initial(3, 0).is_err());
        assert!(BlockState::initial(0, 0).is_err());
    }

    #[test]
    fn test_apply_move_leaves_source_untouched() {
        let s = BlockState::initial(3, 4).unwrap();
        let before = s.clone();
        let next = s.apply_move(Move::new(0, 2)).unwrap();

        assert_eq!(s, before, "original state must not change");
        assert_eq!(next.stack(0), &[0]);
        assert_eq!(next.stack(1), &[1]);
        assert_eq!(next.stack(2), &[2, 3]);
        assert_eq!(next.block_count(), s.block_count());
    }

    #[test]
    fn test_apply_move_shares_untouched_stacks() {
        let s = BlockState::initial(3, 3).unwrap();
        let next = s.apply_move(Move::new(0, 1)).unwrap();
        assert!(Rc::ptr_eq(&s.stacks[2], &next.stacks[2]));
    }

    #[test]
    fn test_apply_move_rejects_illegal_moves() {
        let s = BlockState::initial(3, 1).unwrap();
        assert!(matches!(
            s.apply_move(Move::new(1, 0)),
            Err(PlanError::IllegalMove { reason: "source stack is empty", .. })
        ));
        assert!(matches!(
            s.apply_move(Move::new(0, 0)),
            Err(PlanError::IllegalMove { .. })
        ));
        assert!(matches!(
            s.apply_move(Move::new(0, 3)),
            Err(PlanError::IllegalMove { reason: "stack index out of range", .. })
        ));
    }

    #[test]
    fn test_equality_and_hash_agree() {
        let a = BlockState::initial(2, 2).unwrap();
        // Same contents reached along a different route.
        let b = a
            .apply_move(Move::new(0, 1))
            .unwrap()
            .apply_move(Move::new(1, 0))
            .unwrap()
            .apply_move(Move::new(1, 0))
            .unwrap()
            .apply_move(Move::new(0, 1))
            .unwrap();
        assert_eq!(b.stack(0), &[0]);
        assert_eq!(b.stack(1), &[1]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        let mut seen = HashSet::new();
        seen.insert(a);
        assert!(seen.contains(&b));
    }

    #[test]
    fn test_states_differ_by_order_within_stack() {
        let a = BlockState::from_stacks(vec![vec![0, 1], vec![]]);
        let b = BlockState::from_stacks(vec![vec![1, 0], vec![]]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let s = BlockState::initial(3, 4).unwrap();
        assert_eq!(s.to_string(), "stack[0]=ad stack[1]=b stack[2]=c");
        let empty_tail = BlockState::initial(3, 1).unwrap();
        assert_eq!(empty_tail.to_string(), "stack[0]=a stack[1]= stack[2]=");
        assert_eq!(Move::new(2, 0).to_string(), "2->0");
    }
}
