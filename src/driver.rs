use derive_more::Display;
use log::debug;
use log::trace;
use rustc_hash::FxHashSet;

use crate::frontier::Frontier;
use crate::frontier::Strategy;
use crate::problem::InvalidAction;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::State;
use crate::tree::SearchNode;
use crate::tree::SearchTree;

/// Whether expanded states are remembered.
///
/// Tree mode skips all visited bookkeeping; it permits revisits and may not
/// terminate on cyclic state spaces.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    #[display("graph")]
    Graph,
    #[display("tree")]
    Tree,
}

/// Counters accumulated over one search invocation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped and expanded (goal checks included).
    pub expanded: usize,
    /// Child nodes pushed onto the frontier.
    pub generated: usize,
    /// Largest frontier seen.
    pub peak_frontier: usize,
}

/// How a search ended.
///
/// Exhaustion is a normal outcome, not an error: the reachable space was
/// fully explored without meeting a goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    Success {
        path: Path<St, A, C>,
        stats: SearchStats,
    },
    Exhausted {
        stats: SearchStats,
    },
}

impl<St, A, C> SearchOutcome<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success { .. })
    }

    pub fn path(&self) -> Option<&Path<St, A, C>> {
        match self {
            SearchOutcome::Success { path, .. } => Some(path),
            SearchOutcome::Exhausted { .. } => None,
        }
    }

    pub fn cost(&self) -> Option<C> {
        self.path().map(|p| p.cost)
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            SearchOutcome::Success { stats, .. } => stats,
            SearchOutcome::Exhausted { stats } => stats,
        }
    }
}

/// The expand loop shared by all five strategies.
///
/// Pops per the strategy's frontier ordering, goal-checks, expands through
/// the [`Problem`], pushes children, repeats until a goal is popped or the
/// frontier runs dry. In graph mode a state is added to the visited set
/// exactly once, at expansion time; stale frontier entries for an already
/// expanded state are discarded on pop (lazy deletion).
#[derive(Debug)]
pub struct SearchDriver<P, St, A, C>
where
    P: Problem<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    problem: P,
    strategy: Strategy,
    mode: SearchMode,

    tree: SearchTree<St, A, C>,
    frontier: Frontier<C>,
    /// States already expanded. Unused in tree mode.
    visited: FxHashSet<St>,
    stats: SearchStats,
}

impl<P, St, A, C> SearchDriver<P, St, A, C>
where
    P: Problem<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    #[must_use]
    pub fn new(problem: P, strategy: Strategy, mode: SearchMode) -> Self {
        let mut tree = SearchTree::new();
        let mut frontier = Frontier::new(strategy);

        let initial = problem.initial_state();
        let root_key = Self::ordering_key(&problem, strategy, C::zero(), &initial);
        let root = tree.push_root(initial);
        frontier.push(root, root_key);

        Self {
            problem,
            strategy,
            mode,
            tree,
            frontier,
            visited: FxHashSet::default(),
            stats: SearchStats::default(),
        }
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Runs the search to completion.
    pub fn run(&mut self) -> Result<SearchOutcome<St, A, C>, InvalidAction<St, A>> {
        self.run_with(|_| {})
    }

    /// Runs the search, invoking `on_expand` once per expanded node.
    ///
    /// The callback is synchronous and runs inside the loop; keeping it
    /// non-blocking is the caller's responsibility.
    pub fn run_with<F>(
        &mut self,
        mut on_expand: F,
    ) -> Result<SearchOutcome<St, A, C>, InvalidAction<St, A>>
    where
        F: FnMut(&SearchNode<St, A, C>),
    {
        while let Some(id) = self.frontier.pop() {
            let state = self.tree[id].state().clone();

            if self.mode == SearchMode::Graph && !self.visited.insert(state.clone()) {
                // Lazy deletion: a cheaper or earlier entry for this state
                // was already expanded.
                continue;
            }

            if self.problem.is_goal(&state) {
                let path = self.tree.path(id);
                debug!(
                    "{}/{} search found a goal at depth {} and cost {} ({} expanded, {} generated)",
                    self.strategy,
                    self.mode,
                    self.tree[id].depth(),
                    path.cost,
                    self.stats.expanded,
                    self.stats.generated,
                );
                return Ok(SearchOutcome::Success {
                    path,
                    stats: self.stats,
                });
            }

            self.stats.expanded += 1;
            on_expand(&self.tree[id]);
            trace!("expanding {:?} (g={})", state, self.tree[id].g());

            let g = self.tree[id].g();
            for action in self.problem.actions(&state) {
                let child_state = self.problem.result(&state, &action)?;

                if self.mode == SearchMode::Graph && self.visited.contains(&child_state) {
                    // Pre-filter only; the pop-time check above stays the
                    // final authority.
                    continue;
                }

                let step_cost = self.problem.cost(&state, &action, &child_state);
                let key = Self::ordering_key(
                    &self.problem,
                    self.strategy,
                    g.saturating_add(&step_cost),
                    &child_state,
                );
                let child = self.tree.push_child(id, action, child_state, step_cost);
                self.frontier.push(child, key);
                self.stats.generated += 1;
            }

            self.stats.peak_frontier = self.stats.peak_frontier.max(self.frontier.len());
        }

        debug!(
            "{}/{} search exhausted the space ({} expanded, {} generated)",
            self.strategy, self.mode, self.stats.expanded, self.stats.generated,
        );
        Ok(SearchOutcome::Exhausted { stats: self.stats })
    }

    /// The frontier key for a node with accumulated cost `g` at `state`.
    ///
    /// FIFO/LIFO frontiers ignore the key, so the heuristic is never
    /// evaluated for them.
    #[inline(always)]
    fn ordering_key(problem: &P, strategy: Strategy, g: C, state: &St) -> C {
        match strategy {
            Strategy::BreadthFirst | Strategy::DepthFirst => C::zero(),
            Strategy::UniformCost => g,
            Strategy::Greedy => problem.heuristic(state),
            Strategy::AStar => g.saturating_add(&problem.heuristic(state)),
        }
    }
}

/// Single-shot convenience over [`SearchDriver`].
pub fn search<P, St, A, C>(
    problem: P,
    strategy: Strategy,
    mode: SearchMode,
) -> Result<SearchOutcome<St, A, C>, InvalidAction<St, A>>
where
    P: Problem<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    SearchDriver::new(problem, strategy, mode).run()
}
