use std::fmt::Debug;

use thiserror::Error;

use crate::space::Action;
use crate::space::Cost;
use crate::space::State;

/// Contract violation: `result` or `cost` received an action that
/// `actions(state)` cannot produce.
///
/// Not a runtime path when the driver is the caller; surfaced immediately
/// and fatal for the search invocation when a problem misbehaves.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("action {action:?} is not applicable in state {state:?}")]
pub struct InvalidAction<St, A>
where
    St: State,
    A: Action,
{
    pub state: St,
    pub action: A,
}

/// A search problem: the five functions the engine consumes.
///
/// All methods take `&self`; a problem is read-only during a search and may
/// be shared across independent search invocations.
pub trait Problem<St, A, C>: Debug
where
    St: State,
    A: Action,
    C: Cost,
{
    fn initial_state(&self) -> St;

    /// All actions applicable in `s`. Must be finite for terminating search
    /// and may depend only on `s`.
    fn actions(&self, s: &St) -> Vec<A>;

    /// Deterministic transition function.
    fn result(&self, s: &St, a: &A) -> Result<St, InvalidAction<St, A>>;

    /// Step cost of reaching `to` from `from` via `a`. Non-negative by
    /// contract; `a` must come from `actions(from)`.
    fn cost(&self, from: &St, a: &A, to: &St) -> C;

    fn is_goal(&self, s: &St) -> bool;

    /// Estimated remaining cost to a goal, used by greedy and A*.
    ///
    /// A* is optimal when this never overestimates the true remaining cost.
    fn heuristic(&self, _s: &St) -> C {
        C::zero()
    }
}
