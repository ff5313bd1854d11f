//! Search over an explicit weighted graph.
//!
//! States are dense node ids, actions are hops along stored arcs. Mostly
//! useful as a fixture for tests and benchmarks, and as the smallest
//! possible example of implementing [`Problem`].

use derive_more::Display;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::problem::InvalidAction;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::Cost;
use crate::space::State;

pub type GraphNode = u32;
impl State for GraphNode {}

pub type GraphCost = u32;
impl Cost for GraphCost {}

/// Move to an adjacent node.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display("->{_0}")]
pub struct Hop(pub GraphNode);
impl Action for Hop {}

#[derive(Clone, Debug)]
pub struct GraphProblem {
    arcs: Vec<SmallVec<[(GraphNode, GraphCost); 4]>>,
    start: GraphNode,
    goals: FxHashSet<GraphNode>,
    /// Per-node heuristic table; empty means h = 0 everywhere.
    heuristic: Vec<GraphCost>,
}

impl GraphProblem {
    #[must_use]
    pub fn new(nodes: usize, start: GraphNode, goals: impl IntoIterator<Item = GraphNode>) -> Self {
        let goals: FxHashSet<GraphNode> = goals.into_iter().collect();
        debug_assert!((start as usize) < nodes);
        debug_assert!(goals.iter().all(|&g| (g as usize) < nodes));

        Self {
            arcs: vec![SmallVec::new(); nodes],
            start,
            goals,
            heuristic: vec![],
        }
    }

    /// Adds a one-way arc.
    pub fn add_arc(&mut self, from: GraphNode, to: GraphNode, cost: GraphCost) {
        self.arcs[from as usize].push((to, cost));
    }

    /// Adds a two-way edge.
    pub fn add_edge(&mut self, a: GraphNode, b: GraphNode, cost: GraphCost) {
        self.add_arc(a, b, cost);
        self.add_arc(b, a, cost);
    }

    /// Attaches a per-node heuristic table (indexed by node id).
    #[must_use]
    pub fn with_heuristic(mut self, table: Vec<GraphCost>) -> Self {
        debug_assert_eq!(table.len(), self.arcs.len());
        self.heuristic = table;
        self
    }

    fn arc_cost(&self, from: GraphNode, to: GraphNode) -> Option<GraphCost> {
        self.arcs[from as usize]
            .iter()
            .find(|(n, _)| *n == to)
            .map(|(_, c)| *c)
    }
}

impl Problem<GraphNode, Hop, GraphCost> for GraphProblem {
    fn initial_state(&self) -> GraphNode {
        self.start
    }

    fn actions(&self, s: &GraphNode) -> Vec<Hop> {
        self.arcs[*s as usize].iter().map(|(n, _)| Hop(*n)).collect()
    }

    fn result(&self, s: &GraphNode, a: &Hop) -> Result<GraphNode, InvalidAction<GraphNode, Hop>> {
        match self.arc_cost(*s, a.0) {
            Some(_) => Ok(a.0),
            None => Err(InvalidAction {
                state: *s,
                action: *a,
            }),
        }
    }

    fn cost(&self, from: &GraphNode, a: &Hop, to: &GraphNode) -> GraphCost {
        debug_assert_eq!(a.0, *to);
        match self.arc_cost(*from, *to) {
            Some(c) => c,
            // Contract violation; poison the path instead of panicking.
            None => GraphCost::MAX,
        }
    }

    fn is_goal(&self, s: &GraphNode) -> bool {
        self.goals.contains(s)
    }

    fn heuristic(&self, s: &GraphNode) -> GraphCost {
        self.heuristic.get(*s as usize).copied().unwrap_or(0)
    }
}
