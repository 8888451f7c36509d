//! A* search over any [`ProblemGraph`].
//!
//! The search keeps one [`SearchRecord`] per discovered state (best known cost,
//! predecessor, open/closed status) and a binary-heap frontier ordered by
//! `cost + heuristic`. The heap has no decrease-key: when a cheaper path to a
//! state is found a new entry is pushed, and outdated entries are dropped when
//! they surface.
use crate::problem::{Cost, ProblemGraph};
use log::{debug, info, trace};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// One transition of a solution path: `action` applied to the previous state
/// yields `state` at `cost`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step<S, A> {
    pub action: A,
    pub cost: Cost,
    pub state: S,
}

/// Counters collected while searching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped from the frontier and processed (stale entries excluded).
    pub iterations: u64,
    /// Frontier entries discarded because a better path had superseded them.
    pub stale_entries: u64,
    /// Distinct states that received a record.
    pub discovered: u64,
    /// Largest frontier size seen.
    pub frontier_high_water: usize,
}

/// An optimal path from the initial state to a goal.
#[derive(Clone, Debug)]
pub struct Solution<S, A> {
    /// The initial state of the problem.
    pub start: S,
    /// Transitions in execution order. Empty when the start is a goal.
    pub steps: Vec<Step<S, A>>,
    /// Sum of the step costs.
    pub total_cost: Cost,
    pub stats: SearchStats,
}

impl<S, A: Clone> Solution<S, A> {
    /// The actions of the path, in order.
    pub fn actions(&self) -> Vec<A> {
        self.steps.iter().map(|step| step.action.clone()).collect()
    }

    /// The goal state reached by the path.
    pub fn final_state(&self) -> &S {
        self.steps.last().map_or(&self.start, |step| &step.state)
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// How a search run ended.
#[derive(Clone, Debug)]
pub enum SearchOutcome<S, A> {
    /// A goal was reached.
    Found(Solution<S, A>),
    /// The frontier ran dry: no goal is reachable.
    NotFound { stats: SearchStats },
    /// The iteration budget set with [`AStarSearch::with_max_iterations`] ran out.
    Interrupted { stats: SearchStats },
}

impl<S, A> SearchOutcome<S, A> {
    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchOutcome::Found(solution) => &solution.stats,
            SearchOutcome::NotFound { stats } | SearchOutcome::Interrupted { stats } => stats,
        }
    }

    pub fn iterations(&self) -> u64 {
        self.stats().iterations
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn solution(&self) -> Option<&Solution<S, A>> {
        match self {
            SearchOutcome::Found(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn into_solution(self) -> Option<Solution<S, A>> {
        match self {
            SearchOutcome::Found(solution) => Some(solution),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Open,
    Closed,
}

/// Bookkeeping for one discovered state.
struct SearchRecord<S, A> {
    best_cost: Cost,
    /// Previous state, the action taken from it and that action's cost.
    predecessor: Option<(S, A, Cost)>,
    status: Status,
}

impl<S, A> SearchRecord<S, A> {
    fn reached_from(best_cost: Cost, state: S, action: A, step_cost: Cost) -> Self {
        SearchRecord {
            best_cost,
            predecessor: Some((state, action, step_cost)),
            status: Status::Open,
        }
    }
}

/// Frontier entry. `BinaryHeap` is a max-heap, so the ordering is reversed on
/// priority: lowest `cost + heuristic` first. On equal priority the entry with
/// the higher cost wins, as it is likely closer to a goal, then the older one.
struct FrontierEntry<S> {
    priority: Cost,
    cost: Cost,
    order: u64,
    state: S,
}

impl<S> PartialEq for FrontierEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for FrontierEntry<S> {}

impl<S> PartialOrd for FrontierEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for FrontierEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then(self.cost.cmp(&other.cost))
            .then(other.order.cmp(&self.order))
    }
}

/// Configurable A* driver.
///
/// Every call to [`AStarSearch::solve`] owns its record table and frontier;
/// nothing is shared between runs.
///
/// # Examples
/// ```
/// use blocks_planner::blocks_world::BlocksWorld;
/// use blocks_planner::solver::AStarSearch;
///
/// let world = BlocksWorld::new(3, 3).unwrap();
/// let outcome = AStarSearch::new().solve(&world);
/// let solution = outcome.solution().expect("3 stacks are always solvable");
/// assert_eq!(solution.total_cost, solution.len() as u64);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct AStarSearch {
    max_iterations: Option<u64>,
}

impl AStarSearch {
    /// A search without an iteration budget.
    pub fn new() -> Self {
        AStarSearch::default()
    }

    /// Stops the search with [`SearchOutcome::Interrupted`] once `limit` states
    /// have been expanded without reaching a goal.
    pub fn with_max_iterations(mut self, limit: u64) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    pub fn max_iterations(&self) -> Option<u64> {
        self.max_iterations
    }

    /// Searches `problem` for a cheapest path from its initial state to a goal.
    ///
    /// The path is optimal whenever the problem's heuristic is admissible.
    pub fn solve<P: ProblemGraph>(&self, problem: &P) -> SearchOutcome<P::State, P::Action> {
        let start = problem.initial_state();
        let mut records: FxHashMap<P::State, SearchRecord<P::State, P::Action>> =
            FxHashMap::default();
        let mut frontier = BinaryHeap::new();
        let mut stats = SearchStats::default();
        let mut order: u64 = 0;

        debug!("A* starting from {:?}", start);
        records.insert(
            start.clone(),
            SearchRecord {
                best_cost: 0,
                predecessor: None,
                status: Status::Open,
            },
        );
        stats.discovered = 1;
        frontier.push(FrontierEntry {
            priority: problem.heuristic(&start),
            cost: 0,
            order,
            state: start.clone(),
        });
        stats.frontier_high_water = 1;

        while let Some(FrontierEntry { cost, state, .. }) = frontier.pop() {
            let current = match records.get(&state) {
                Some(record) if record.status == Status::Open && record.best_cost == cost => {
                    record.best_cost
                }
                _ => {
                    trace!("discarding stale entry {:?} at cost {}", state, cost);
                    stats.stale_entries += 1;
                    continue;
                }
            };

            if self.max_iterations.is_some_and(|limit| stats.iterations >= limit) {
                info!(
                    "A* interrupted after {} iterations ({} states discovered)",
                    stats.iterations, stats.discovered
                );
                return SearchOutcome::Interrupted { stats };
            }
            stats.iterations += 1;

            if problem.is_goal(&state) {
                let steps = reconstruct_path(&records, state);
                let total_cost: Cost = steps.iter().map(|step| step.cost).sum();
                info!(
                    "A* found a path of cost {} in {} iterations",
                    total_cost, stats.iterations
                );
                return SearchOutcome::Found(Solution {
                    start,
                    steps,
                    total_cost,
                    stats,
                });
            }

            for transition in problem.expand(&state) {
                let tentative = current.saturating_add(transition.cost);
                let improved = match records.entry(transition.successor.clone()) {
                    Entry::Vacant(e) => {
                        stats.discovered += 1;
                        e.insert(SearchRecord::reached_from(
                            tentative,
                            state.clone(),
                            transition.action,
                            transition.cost,
                        ));
                        true
                    }
                    Entry::Occupied(mut e) => {
                        if tentative < e.get().best_cost {
                            e.insert(SearchRecord::reached_from(
                                tentative,
                                state.clone(),
                                transition.action,
                                transition.cost,
                            ));
                            true
                        } else {
                            false
                        }
                    }
                };
                if !improved {
                    continue;
                }

                let priority = tentative.saturating_add(problem.heuristic(&transition.successor));
                trace!(
                    "push {:?} cost {} priority {}",
                    transition.successor,
                    tentative,
                    priority
                );
                order += 1;
                frontier.push(FrontierEntry {
                    priority,
                    cost: tentative,
                    order,
                    state: transition.successor,
                });
                stats.frontier_high_water = stats.frontier_high_water.max(frontier.len());
            }

            if let Some(record) = records.get_mut(&state) {
                record.status = Status::Closed;
            }
            if stats.iterations % 10_000 == 0 {
                debug!(
                    "{} iterations, frontier {}, {} states discovered",
                    stats.iterations,
                    frontier.len(),
                    stats.discovered
                );
            }
        }

        info!("A* exhausted the frontier after {} iterations", stats.iterations);
        SearchOutcome::NotFound { stats }
    }
}

/// Runs an unbounded A* search on `problem`.
pub fn solve<P: ProblemGraph>(problem: &P) -> SearchOutcome<P::State, P::Action> {
    AStarSearch::new().solve(problem)
}

/// Follows predecessor links back from `goal` and returns the steps in forward
/// order.
fn reconstruct_path<S, A>(records: &FxHashMap<S, SearchRecord<S, A>>, goal: S) -> Vec<Step<S, A>>
where
    S: Clone + Eq + Hash,
    A: Clone,
{
    let mut steps = Vec::new();
    let mut current = goal;
    while let Some((previous, action, cost)) =
        records.get(&current).and_then(|record| record.predecessor.as_ref())
    {
        steps.push(Step {
            action: action.clone(),
            cost: *cost,
            state: current,
        });
        current = previous.clone();
    }
    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks_world::BlocksWorld;
    use crate::heuristics::Heuristic;
    use crate::problem::Transition;
    use crate::state::{BlockState, Move};
    use crate::utils::{breadth_first_distance, count_reachable_states};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    /// Small explicit graph with weighted edges and a per-node heuristic.
    struct WeightedGraph {
        edges: Vec<Vec<(usize, Cost)>>,
        goal: usize,
        h: Vec<Cost>,
    }

    impl WeightedGraph {
        fn new(node_count: usize, goal: usize, edges: &[(usize, usize, Cost)]) -> Self {
            let mut adjacency = vec![Vec::new(); node_count];
            for &(from, to, cost) in edges {
                adjacency[from].push((to, cost));
            }
            WeightedGraph {
                edges: adjacency,
                goal,
                h: vec![0; node_count],
            }
        }

        fn with_heuristic(mut self, h: Vec<Cost>) -> Self {
            self.h = h;
            self
        }
    }

    impl ProblemGraph for WeightedGraph {
        type State = usize;
        type Action = (usize, usize);

        fn initial_state(&self) -> usize {
            0
        }

        fn is_goal(&self, state: &usize) -> bool {
            *state == self.goal
        }

        fn expand(&self, state: &usize) -> Vec<Transition<usize, (usize, usize)>> {
            self.edges[*state]
                .iter()
                .map(|&(to, cost)| Transition::new((*state, to), cost, to))
                .collect()
        }

        fn heuristic(&self, state: &usize) -> Cost {
            self.h[*state]
        }
    }

    /// Wraps a blocks world with an arbitrary heuristic.
    struct WithHeuristic<F> {
        world: BlocksWorld,
        h: F,
    }

    impl<F: Fn(&BlockState) -> Cost> ProblemGraph for WithHeuristic<F> {
        type State = BlockState;
        type Action = Move;

        fn initial_state(&self) -> BlockState {
            self.world.initial_state()
        }

        fn is_goal(&self, state: &BlockState) -> bool {
            self.world.is_goal(state)
        }

        fn expand(&self, state: &BlockState) -> Vec<Transition<BlockState, Move>> {
            self.world.expand(state)
        }

        fn heuristic(&self, state: &BlockState) -> Cost {
            (self.h)(state)
        }
    }

    fn assert_valid_path<P: ProblemGraph>(problem: &P, solution: &Solution<P::State, P::Action>)
    where
        P::Action: PartialEq,
    {
        let mut previous = solution.start.clone();
        let mut cost = 0;
        for step in &solution.steps {
            let matching = problem
                .expand(&previous)
                .into_iter()
                .find(|t| t.action == step.action && t.successor == step.state);
            let transition = matching.unwrap_or_else(|| {
                panic!("step {:?} is not a legal transition from {:?}", step, previous)
            });
            assert_eq!(transition.cost, step.cost);
            cost += step.cost;
            previous = step.state.clone();
        }
        assert!(problem.is_goal(&previous), "path must end in a goal");
        assert_eq!(cost, solution.total_cost);
    }

    #[test]
    fn test_start_is_goal() {
        let graph = WeightedGraph::new(2, 0, &[(0, 1, 1)]);
        let outcome = solve(&graph);
        let solution = outcome.solution().unwrap();
        assert!(solution.is_empty());
        assert_eq!(solution.total_cost, 0);
        assert_eq!(*solution.final_state(), 0);
        assert_eq!(outcome.iterations(), 1);
    }

    #[test]
    fn test_not_found_when_goal_unreachable() {
        let graph = WeightedGraph::new(3, 2, &[(0, 1, 1), (1, 0, 1)]);
        let outcome = solve(&graph);
        assert!(matches!(outcome, SearchOutcome::NotFound { .. }));
        assert_eq!(outcome.iterations(), 2);
        assert!(outcome.solution().is_none());
    }

    #[test]
    fn test_cheaper_path_supersedes_frontier_entry() {
        // 0 -> 2 directly costs 5, through 1 it costs 2.
        let graph = WeightedGraph::new(
            5,
            4,
            &[(0, 1, 1), (0, 2, 5), (1, 2, 1), (2, 3, 1), (3, 4, 10)],
        );
        let outcome = solve(&graph);
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.total_cost, 13);
        assert_eq!(solution.actions(), vec![(0, 1), (1, 2), (2, 3), (3, 4)]);
        assert_eq!(solution.stats.iterations, 5);
        assert_eq!(solution.stats.stale_entries, 1, "the cost-5 entry for node 2");
        assert_eq!(solution.stats.discovered, 5);
        assert_valid_path(&graph, solution);
    }

    #[test]
    fn test_closed_state_reopened_on_cheaper_path() {
        // Nodes: 0=S, 1=A, 2=B, 3=G. h(A)=5 is admissible but inconsistent,
        // so B is first closed at cost 4 and later improved to 2 through A.
        let graph = WeightedGraph::new(4, 3, &[(0, 1, 1), (0, 2, 4), (1, 2, 1), (2, 3, 5)])
            .with_heuristic(vec![0, 5, 0, 0]);
        let outcome = solve(&graph);
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.total_cost, 7);
        assert_eq!(solution.actions(), vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(solution.stats.iterations, 5, "B is expanded twice");
        assert_valid_path(&graph, solution);
    }

    #[test]
    fn test_overestimating_heuristic_can_lose_optimality() {
        // 0 -> 1 -> 3 costs 2, 0 -> 2 -> 3 costs 3.
        let edges = [(0, 1, 1), (1, 3, 1), (0, 2, 1), (2, 3, 2)];
        let exact = solve(&WeightedGraph::new(4, 3, &edges));
        assert_eq!(exact.solution().unwrap().total_cost, 2);

        let misled = solve(&WeightedGraph::new(4, 3, &edges).with_heuristic(vec![0, 10, 0, 0]));
        assert_eq!(misled.solution().unwrap().total_cost, 3);
    }

    #[test]
    fn test_two_stacks_two_blocks() {
        let world = BlocksWorld::new(2, 2).unwrap();
        let outcome = solve(&world);
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.total_cost, 1);
        assert_eq!(solution.actions(), vec![Move::new(0, 1)]);
        let last = solution.final_state();
        assert!(last.stack(0).is_empty());
        assert_eq!(last.stack(1), &[1, 0]);
        assert_valid_path(&world, solution);
    }

    #[test]
    fn test_single_block_already_placed() {
        let world = BlocksWorld::new(1, 1).unwrap();
        let solution = solve(&world).into_solution().unwrap();
        assert!(solution.is_empty());
        assert_eq!(solution.total_cost, 0);
    }

    #[test]
    fn test_single_stack_without_solution() {
        let world = BlocksWorld::new(1, 3).unwrap();
        let outcome = solve(&world);
        assert!(matches!(outcome, SearchOutcome::NotFound { .. }));
        assert_eq!(outcome.iterations(), 1);
    }

    #[test]
    fn test_costs_match_breadth_first_search() {
        for &(stacks, blocks) in &[(3, 2), (3, 3), (3, 4), (4, 3), (2, 2)] {
            let world = BlocksWorld::new(stacks, blocks).unwrap();
            let expected = breadth_first_distance(&world).map(|d| d as Cost);
            for heuristic in Heuristic::ALL {
                let problem = world.clone().with_heuristic(heuristic);
                let outcome = solve(&problem);
                let solution = outcome.solution().unwrap();
                assert_eq!(
                    Some(solution.total_cost),
                    expected,
                    "{} stacks, {} blocks, {:?}",
                    stacks,
                    blocks,
                    heuristic
                );
                assert_valid_path(&problem, solution);
            }
        }
    }

    #[test]
    fn test_informed_heuristic_expands_no_more_than_blind_search() {
        let world = BlocksWorld::new(3, 4).unwrap();
        let blind = solve(&world);
        let informed = solve(&world.clone().with_heuristic(Heuristic::MisplacedBlocks));
        assert_eq!(
            blind.solution().unwrap().total_cost,
            informed.solution().unwrap().total_cost
        );
        assert!(informed.iterations() <= blind.iterations());
    }

    #[test]
    fn test_zero_heuristic_wrapper_is_optimal() {
        let world = BlocksWorld::new(3, 3).unwrap();
        let expected = breadth_first_distance(&world).unwrap() as Cost;
        let zero = WithHeuristic {
            world: world.clone(),
            h: |_: &BlockState| -> Cost { 0 },
        };
        assert_eq!(solve(&zero).solution().unwrap().total_cost, expected);
    }

    #[test]
    fn test_random_instances_never_miss_a_solution() {
        let mut rng = SmallRng::seed_from_u64(514514);
        for _ in 0..30 {
            let stacks = rng.gen_range(1..=4usize);
            let blocks = rng.gen_range(1..=5usize);
            let world = BlocksWorld::new(stacks, blocks).unwrap();
            let outcome = solve(&world);
            if world.is_solvable() {
                let solution = outcome.solution().unwrap_or_else(|| {
                    panic!("{} stacks, {} blocks: no solution found", stacks, blocks)
                });
                let expected = breadth_first_distance(&world).unwrap() as Cost;
                assert_eq!(solution.total_cost, expected);
                assert_valid_path(&world, solution);
            } else {
                assert!(matches!(outcome, SearchOutcome::NotFound { .. }));
                assert_eq!(
                    outcome.iterations(),
                    count_reachable_states(&world) as u64,
                    "every reachable state is expanded once"
                );
            }
        }
    }

    #[test]
    fn test_iteration_budget() {
        let world = BlocksWorld::new(3, 4).unwrap();
        let outcome = AStarSearch::new().with_max_iterations(1).solve(&world);
        assert!(matches!(outcome, SearchOutcome::Interrupted { .. }));
        assert_eq!(outcome.iterations(), 1);

        let unbounded = solve(&world);
        let generous = AStarSearch::new()
            .with_max_iterations(unbounded.iterations())
            .solve(&world);
        assert_eq!(
            generous.solution().unwrap().total_cost,
            unbounded.solution().unwrap().total_cost
        );
    }

    #[test]
    fn test_solve_does_not_mutate_initial_state() {
        let world = BlocksWorld::new(3, 3).unwrap();
        let before = world.initial_state();
        let solution = solve(&world).into_solution().unwrap();
        assert_eq!(solution.start, before);
        assert_eq!(world.initial_state(), before);
    }

    #[test]
    fn test_frontier_ordering() {
        let entry = |priority, cost, order| FrontierEntry {
            priority,
            cost,
            order,
            state: (),
        };
        let mut heap = BinaryHeap::new();
        heap.push(entry(5, 0, 0));
        heap.push(entry(3, 1, 1));
        heap.push(entry(3, 2, 2));
        heap.push(entry(3, 2, 3));
        let popped: Vec<u64> = std::iter::from_fn(|| heap.pop().map(|e| e.order)).collect();
        assert_eq!(popped, vec![2, 3, 1, 0]);
    }
}
