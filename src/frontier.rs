use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;
use std::str::FromStr;

use derive_more::Display;
use thiserror::Error;

use crate::space::Cost;
use crate::tree::NodeId;

/// The closed set of supported search strategies.
///
/// All five share one expand loop; a strategy only decides how the
/// [`Frontier`] orders nodes.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// FIFO frontier; finds minimum-step paths on uniform step costs.
    #[display("breadth_first")]
    BreadthFirst,
    /// LIFO frontier.
    #[display("depth_first")]
    DepthFirst,
    /// Minimum accumulated cost `g` first.
    #[display("uniform_cost")]
    UniformCost,
    /// Minimum heuristic `h` first.
    #[display("greedy")]
    Greedy,
    /// Minimum `g + h` first.
    #[display("astar")]
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::UniformCost,
        Strategy::Greedy,
        Strategy::AStar,
    ];
}

/// Unknown strategy name at setup; surfaced before any search runs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unsupported search strategy '{0}'")]
pub struct UnsupportedStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnsupportedStrategy;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "breadth_first" => Ok(Strategy::BreadthFirst),
            "depth_first" => Ok(Strategy::DepthFirst),
            "uniform_cost" => Ok(Strategy::UniformCost),
            "greedy" => Ok(Strategy::Greedy),
            "astar" => Ok(Strategy::AStar),
            _ => Err(UnsupportedStrategy(name.to_string())),
        }
    }
}

/// Priority-frontier ordering: the strategy's numeric key, tie-broken by
/// insertion sequence number so equal keys pop in insertion order.
///
/// The derived lexicographic `Ord` does exactly that.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rank<C: Cost> {
    key: C,
    seq: u64,
}

/// An ordered container of generated-but-not-yet-expanded nodes.
#[derive(Debug)]
pub enum Frontier<C>
where
    C: Cost,
{
    Fifo(VecDeque<NodeId>),
    Lifo(Vec<NodeId>),
    Priority {
        heap: BinaryHeap<Reverse<(Rank<C>, NodeId)>>,
        seq: u64,
    },
}

impl<C> Frontier<C>
where
    C: Cost,
{
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        match strategy {
            Strategy::BreadthFirst => Frontier::Fifo(VecDeque::new()),
            Strategy::DepthFirst => Frontier::Lifo(vec![]),
            Strategy::UniformCost | Strategy::Greedy | Strategy::AStar => Frontier::Priority {
                heap: BinaryHeap::new(),
                seq: 0,
            },
        }
    }

    /// Inserts a node. `key` is the strategy's ordering key and is ignored
    /// by the FIFO and LIFO variants.
    pub fn push(&mut self, node: NodeId, key: C) {
        match self {
            Frontier::Fifo(queue) => queue.push_back(node),
            Frontier::Lifo(stack) => stack.push(node),
            Frontier::Priority { heap, seq } => {
                heap.push(Reverse((Rank { key, seq: *seq }, node)));
                *seq += 1;
            }
        }
        self.verify();
    }

    /// Removes the next node per the strategy's ordering, or `None` when
    /// the frontier is exhausted.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.verify();
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Lifo(stack) => stack.pop(),
            Frontier::Priority { heap, .. } => heap.pop().map(|Reverse((_, node))| node),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Frontier::Fifo(queue) => queue.len(),
            Frontier::Lifo(stack) => stack.len(),
            Frontier::Priority { heap, .. } => heap.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify(&self) {
        // All good... (hopefully)
    }
    #[cfg(feature = "verify")]
    fn verify(&self) {
        if let Frontier::Priority { heap, seq } = self {
            // Sequence numbers are unique, so the counter bounds the size.
            debug_assert!(heap.len() as u64 <= *seq);
            for Reverse((rank, _)) in heap.iter() {
                debug_assert!(rank.seq < *seq);
                debug_assert!(rank.key.valid());
            }
        }
    }
}
