use std::fmt::Debug;
use std::hash::Hash;

use num_traits::bounds::UpperBounded;
use num_traits::SaturatingAdd;
use num_traits::Zero;

/// An opaque state of the space being searched.
///
/// The engine never looks inside a state; it only clones, compares and
/// hashes them, and hands them back to the [`crate::problem::Problem`].
pub trait State: Clone + Debug + PartialEq + Eq + Hash {}

/// A transition between two states.
pub trait Action: Clone + Debug + PartialEq + Eq {}

/// An accumulated path cost.
///
/// Must be totally ordered so priority frontiers can rank nodes, and
/// non-negative by contract (uniform-cost and A* are undefined otherwise).
pub trait Cost:
    Copy
    + Clone
    + Debug
    + std::fmt::Display
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + SaturatingAdd
    + Zero
    + UpperBounded
    + std::ops::Add<Self, Output = Self>
    + std::ops::AddAssign
{
    #[inline(always)]
    fn valid(&self) -> bool {
        *self != Self::max_value()
    }
}

/// A root-to-goal walk through the space.
///
/// Each step pairs a state with the action that produced it from the
/// previous state; the root entry carries no action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub steps: Vec<(Option<A>, St)>,
    pub cost: C,
}

impl<St, A, C> Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    pub fn new_from_root(root: St) -> Self {
        Self {
            steps: vec![(None, root)],
            cost: C::zero(),
        }
    }

    #[inline(always)]
    pub fn push_step(&mut self, action: A, state: St, step_cost: C) {
        self.steps.push((Some(action), state));
        self.cost = self.cost.saturating_add(&step_cost);
    }

    /// Number of actions taken, not counting the root entry.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn start(&self) -> Option<&St> {
        self.steps.first().map(|(_, s)| s)
    }

    pub fn end(&self) -> Option<&St> {
        self.steps.last().map(|(_, s)| s)
    }

    /// Runs sanity checks
    pub fn seems_valid(&self) -> bool {
        !self.steps.is_empty()
            && self.steps[0].0.is_none()
            && self.steps[1..].iter().all(|(a, _)| a.is_some())
            && self.cost.valid()
    }
}

impl<St, A, C> std::fmt::Display for Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => write!(
                f,
                "Path({}, {:?}:{:?}:{:?})",
                self.cost,
                start,
                self.steps
                    .iter()
                    .filter_map(|(a, _)| a.as_ref())
                    .take(20)
                    .collect::<Vec<_>>(),
                end
            ),
            _ => write!(f, "Path()"),
        }
    }
}
