use std::fmt::Debug;

use nonmax::NonMaxUsize;

use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::State;

/// A reference to a [`SearchNode`] inside its [`SearchTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(NonMaxUsize);

impl NodeId {
    #[inline(always)]
    fn new(index: usize) -> Self {
        debug_assert!(index != usize::MAX);
        Self(NonMaxUsize::new(index).unwrap())
    }

    #[inline(always)]
    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// A state together with how the search reached it.
///
/// `g` is the accumulated path cost from the root; it is monotonically
/// non-decreasing along any parent chain while step costs are non-negative.
#[derive(Debug)]
pub struct SearchNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub(crate) state: St,
    pub(crate) parent: Option<(NodeId, A)>,
    pub(crate) g: C,
    pub(crate) depth: u32,
}

impl<St, A, C> SearchNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    pub fn state(&self) -> &St {
        &self.state
    }

    #[inline(always)]
    pub fn g(&self) -> C {
        self.g
    }

    #[inline(always)]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The action that produced this node from its parent, if any.
    pub fn action(&self) -> Option<&A> {
        self.parent.as_ref().map(|(_, a)| a)
    }
}

/// Append-only arena holding every node a search has generated.
///
/// Nodes form a forest through their parent links; reconstruction walks a
/// chain of them back to the root.
pub struct SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    nodes: Vec<SearchNode<St, A, C>>,
}

impl<St, A, C> SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: vec![] }
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a root node: no parent, zero cost, zero depth.
    pub fn push_root(&mut self, state: St) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(SearchNode {
            state,
            parent: None,
            g: C::zero(),
            depth: 0,
        });
        id
    }

    /// Adds a child of `parent` reached by `action` at `step_cost`.
    pub fn push_child(&mut self, parent: NodeId, action: A, state: St, step_cost: C) -> NodeId {
        let g = self[parent].g.saturating_add(&step_cost);
        let depth = self[parent].depth + 1;
        debug_assert!(g >= self[parent].g, "negative step cost");

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(SearchNode {
            state,
            parent: Some((parent, action)),
            g,
            depth,
        });
        id
    }

    /// Reconstructs the root-to-`node` path by walking parent links and
    /// reversing. The root entry carries no action.
    #[must_use]
    pub fn path(&self, node: NodeId) -> Path<St, A, C> {
        let mut steps = Vec::with_capacity(self[node].depth as usize + 1);

        let mut current = Some(node);
        while let Some(id) = current {
            let n = &self[id];
            steps.push((n.action().cloned(), n.state.clone()));
            current = n.parent.as_ref().map(|(p, _)| *p);
        }
        steps.reverse();

        Path {
            steps,
            cost: self[node].g,
        }
    }
}

impl<St, A, C> Default for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A, C> std::ops::Index<NodeId> for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    type Output = SearchNode<St, A, C>;

    #[inline(always)]
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.get()]
    }
}

impl<St, A, C> Debug for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::graph::Hop;

    #[test]
    fn root_reconstructs_to_single_entry() {
        let mut tree = SearchTree::<u32, Hop, u32>::new();
        let root = tree.push_root(42);

        let path = tree.path(root);
        assert_eq!(path.steps, vec![(None, 42)]);
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn child_costs_and_depths() {
        let mut tree = SearchTree::<u32, Hop, u32>::new();
        let root = tree.push_root(0);
        let b = tree.push_child(root, Hop(1), 1, 4);
        let c = tree.push_child(b, Hop(2), 2, 6);

        assert_eq!(tree[root].depth(), 0);
        assert_eq!(tree[b].depth(), 1);
        assert_eq!(tree[c].depth(), 2);
        assert_eq!(tree[root].g(), 0);
        assert_eq!(tree[b].g(), 4);
        assert_eq!(tree[c].g(), 10);
        assert!(tree[root].is_root());
        assert!(!tree[c].is_root());
    }

    #[test]
    fn path_orders_root_first() {
        let mut tree = SearchTree::<u32, Hop, u32>::new();
        let root = tree.push_root(0);
        let b = tree.push_child(root, Hop(1), 1, 4);
        let c = tree.push_child(b, Hop(2), 2, 6);

        let path = tree.path(c);
        assert_eq!(
            path.steps,
            vec![(None, 0), (Some(Hop(1)), 1), (Some(Hop(2)), 2)]
        );
        assert_eq!(path.cost, 10);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn siblings_share_a_parent() {
        let mut tree = SearchTree::<u32, Hop, u32>::new();
        let root = tree.push_root(0);
        let l = tree.push_child(root, Hop(1), 1, 1);
        let r = tree.push_child(root, Hop(2), 2, 2);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.path(l).end(), Some(&1));
        assert_eq!(tree.path(r).end(), Some(&2));
        assert_eq!(tree.path(r).start(), Some(&0));
    }
}
