//! The contract between a planning domain and the search core.
//!
//! A domain describes its state space through [`ProblemGraph`]; the search in
//! [`crate::solver`] only ever talks to this trait and never calls back into
//! domain-specific code.
use std::fmt::Debug;
use std::hash::Hash;

/// Path and edge cost. Costs are non-negative integers.
pub type Cost = u64;

/// One legal action out of a state, with its cost and the state it leads to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition<S, A> {
    pub action: A,
    pub cost: Cost,
    pub successor: S,
}

impl<S, A> Transition<S, A> {
    pub fn new(action: A, cost: Cost, successor: S) -> Self {
        Transition {
            action,
            cost,
            successor,
        }
    }
}

/// A state-transition problem that A* can solve.
///
/// Implementations must be deterministic: the same state always expands to
/// the same transitions. `expand` returns a fresh sequence on every call and
/// must not rely on state carried over from previous calls.
pub trait ProblemGraph {
    /// A configuration of the world. Must be immutable once built; equal
    /// states must hash identically.
    type State: Clone + Eq + Hash + Debug;
    /// A label for an edge of the state graph.
    type Action: Clone + Debug;

    /// The state the search starts from.
    fn initial_state(&self) -> Self::State;

    /// Whether `state` satisfies the goal.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// All legal actions out of `state`, with their costs and successors.
    fn expand(&self, state: &Self::State) -> Vec<Transition<Self::State, Self::Action>>;

    /// A lower bound on the cost from `state` to the nearest goal.
    ///
    /// A* only returns optimal paths when this never overestimates. It must
    /// also be consistent (`h(s) <= cost(s, s') + h(s')`) for closed states to
    /// stay final.
    fn heuristic(&self, state: &Self::State) -> Cost;
}
