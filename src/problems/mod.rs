//! Concrete instantiations of the generic search engine.
//!
//! These implement [`crate::problem::Problem`] so the strategy-agnostic
//! driver can explore them; the engine itself knows nothing about them.

pub mod delivery;
pub mod graph;
