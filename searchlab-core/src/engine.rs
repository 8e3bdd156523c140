//! Best-first frontier explorer
//!
//! A priority-queue search over any `SearchProblem`, bounded by a
//! `CostBound` and a wall-clock deadline. Each `search` call restarts from
//! the initial state, so a driver can re-run it under a tighter bound.
//!
//! ## Architecture
//! - Level 2: `SearchEngine::search` (frontier loop)
//! - Level 3: successor generation, pruning, path reconstruction
//! - Level 4: frontier ordering

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;
use std::time::Instant;

use rustc_hash::FxHashMap;

use crate::valuation::NodeValuation;

/// Expansions between deadline polls
const DEADLINE_CHECK_INTERVAL: usize = 64;

// ============================================================================
// PROBLEM INTERFACE
// ============================================================================

/// A state space the engine can explore
pub trait SearchProblem {
    type State: Clone + Eq + Hash;
    type Action: Clone;

    /// Every legal successor with the action that produced it and its
    /// incremental cost
    fn successors(&self, state: &Self::State) -> Vec<Successor<Self::State, Self::Action>>;

    fn is_goal(&self, state: &Self::State) -> bool;
}

/// One expansion result
#[derive(Clone, Debug)]
pub struct Successor<S, A> {
    pub action: A,
    pub state: S,
    pub cost: f64,
}

/// Anything that can run a bounded search. The anytime driver only needs
/// this, so it can be driven by scripted explorers too.
pub trait FrontierExplorer {
    type State;
    type Action;

    /// Find a goal within `bound` before `deadline`, or report failure
    fn search(&mut self, deadline: Instant, bound: CostBound) -> Option<Solution<Self::State, Self::Action>>;
}

// ============================================================================
// COST BOUND
// ============================================================================

/// Pruning bound: a node is discarded when its g exceeds `g`, its h
/// exceeds `h`, or g + h exceeds `f`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostBound {
    pub g: f64,
    pub h: f64,
    pub f: f64,
}

impl CostBound {
    pub const UNBOUNDED: CostBound = CostBound {
        g: f64::INFINITY,
        h: f64::INFINITY,
        f: f64::INFINITY,
    };

    /// Bound after finding a solution of cost `gval`: nothing worse than
    /// it, and nothing ranked beyond twice it.
    pub fn tightened(gval: f64) -> Self {
        Self {
            g: gval,
            h: gval,
            f: 2.0 * gval,
        }
    }

    pub fn admits(&self, gval: f64, hval: f64) -> bool {
        gval <= self.g && hval <= self.h && gval + hval <= self.f
    }
}

impl Default for CostBound {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

// ============================================================================
// STRATEGY
// ============================================================================

/// How frontier nodes are ranked (lowest first)
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Strategy {
    /// h only
    BestFirst,
    /// g only
    UniformCost,
    /// g + h
    AStar,
    /// g + weight * h
    Custom(NodeValuation),
}

impl Strategy {
    pub fn rank(&self, gval: f64, hval: f64) -> f64 {
        match self {
            Strategy::BestFirst => hval,
            Strategy::UniformCost => gval,
            Strategy::AStar => gval + hval,
            Strategy::Custom(valuation) => valuation.fval(gval, hval),
        }
    }
}

// ============================================================================
// NODES
// ============================================================================

/// Node identifier (index into the arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A state with its path cost, heuristic estimate and rank
#[derive(Clone, Debug)]
pub struct SearchNode<S, A> {
    pub state: S,
    pub gval: f64,
    pub hval: f64,
    pub fval: f64,
    pub parent: Option<NodeId>,
    pub action: Option<A>,
}

/// Goal found by a search call
#[derive(Clone, Debug)]
pub struct Solution<S, A> {
    pub state: S,
    pub gval: f64,
    /// Actions from the initial state to `state`
    pub path: Vec<A>,
    /// Nodes expanded by the call that found it
    pub expanded: usize,
}

/// Frontier entry ordered as a min-heap on (rank, insertion order)
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    rank: f64,
    order: u64,
    id: NodeId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .rank
            .total_cmp(&self.rank)
            .then_with(|| other.order.cmp(&self.order))
    }
}

// ============================================================================
// SEARCH ENGINE (Level 2 - Frontier Loop)
// ============================================================================

/// Priority-queue search engine with full cycle checking
pub struct SearchEngine<P: SearchProblem, H> {
    problem: P,
    initial: P::State,
    heuristic: H,
    strategy: Strategy,
}

impl<P, H> SearchEngine<P, H>
where
    P: SearchProblem,
    H: Fn(&P::State) -> f64,
{
    pub fn new(problem: P, initial: P::State, heuristic: H, strategy: Strategy) -> Self {
        Self {
            problem,
            initial,
            heuristic,
            strategy,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Run one bounded search from the initial state
    pub fn run(&self, deadline: Instant, bound: CostBound) -> Option<Solution<P::State, P::Action>> {
        let mut nodes: Vec<SearchNode<P::State, P::Action>> = Vec::new();
        let mut frontier = BinaryHeap::new();
        let mut best_g: FxHashMap<P::State, f64> = FxHashMap::default();
        let mut order = 0u64;

        let hval = (self.heuristic)(&self.initial);
        if !hval.is_finite() || !bound.admits(0.0, hval) {
            tracing::debug!("initial state pruned (h={})", hval);
            return None;
        }
        best_g.insert(self.initial.clone(), 0.0);
        self.push(&mut nodes, &mut frontier, &mut order, SearchNode {
            state: self.initial.clone(),
            gval: 0.0,
            hval,
            fval: self.strategy.rank(0.0, hval),
            parent: None,
            action: None,
        });

        let mut expanded = 0usize;
        while let Some(entry) = frontier.pop() {
            let (state, gval) = {
                let node = &nodes[entry.id.0];
                (node.state.clone(), node.gval)
            };

            // Stale entry: the state was re-opened with a cheaper path
            if best_g.get(&state).is_some_and(|&seen| seen < gval) {
                continue;
            }

            if self.problem.is_goal(&state) {
                return Some(build_solution(&nodes, entry.id, expanded));
            }

            if expanded % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
                tracing::debug!("search hit deadline after {} expansions", expanded);
                return None;
            }

            expanded += 1;
            self.expand(entry.id, &state, gval, bound, &mut nodes, &mut frontier, &mut best_g, &mut order);
        }

        None
    }

    // ========================================================================
    // LEVEL 3 - EXPANSION
    // ========================================================================

    #[allow(clippy::too_many_arguments)]
    fn expand(
        &self,
        parent: NodeId,
        state: &P::State,
        gval: f64,
        bound: CostBound,
        nodes: &mut Vec<SearchNode<P::State, P::Action>>,
        frontier: &mut BinaryHeap<FrontierEntry>,
        best_g: &mut FxHashMap<P::State, f64>,
        order: &mut u64,
    ) {
        for succ in self.problem.successors(state) {
            let g = gval + succ.cost;
            if best_g.get(&succ.state).is_some_and(|&seen| seen <= g) {
                continue;
            }

            // Infinite estimates mark dead branches
            let h = (self.heuristic)(&succ.state);
            if !h.is_finite() || !bound.admits(g, h) {
                continue;
            }

            best_g.insert(succ.state.clone(), g);
            self.push(nodes, frontier, order, SearchNode {
                state: succ.state,
                gval: g,
                hval: h,
                fval: self.strategy.rank(g, h),
                parent: Some(parent),
                action: Some(succ.action),
            });
        }
    }

    fn push(
        &self,
        nodes: &mut Vec<SearchNode<P::State, P::Action>>,
        frontier: &mut BinaryHeap<FrontierEntry>,
        order: &mut u64,
        node: SearchNode<P::State, P::Action>,
    ) {
        let id = NodeId(nodes.len());
        frontier.push(FrontierEntry { rank: node.fval, order: *order, id });
        *order += 1;
        nodes.push(node);
    }
}

impl<P, H> FrontierExplorer for SearchEngine<P, H>
where
    P: SearchProblem,
    H: Fn(&P::State) -> f64,
{
    type State = P::State;
    type Action = P::Action;

    fn search(&mut self, deadline: Instant, bound: CostBound) -> Option<Solution<P::State, P::Action>> {
        self.run(deadline, bound)
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Walk parent links back to the root
fn build_solution<S: Clone, A: Clone>(nodes: &[SearchNode<S, A>], goal: NodeId, expanded: usize) -> Solution<S, A> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(id) = current {
        let node = &nodes[id.0];
        if let Some(action) = &node.action {
            path.push(action.clone());
        }
        current = node.parent;
    }
    path.reverse();

    let node = &nodes[goal.0];
    Solution {
        state: node.state.clone(),
        gval: node.gval,
        path,
        expanded,
    }
}

// ============================================================================
// TESTS
// ============================================================================
