//! Strategy-parameterized state-space search.
//!
//! A single expand loop ([`driver::SearchDriver`]) covers breadth-first,
//! depth-first, uniform-cost, greedy and A* search; the strategies differ
//! only in the [`frontier::Frontier`] ordering plugged into the loop.

// Core engine
// -----------
pub mod driver;
pub mod frontier;
pub mod problem;
pub mod space;
pub mod tree;

// Cost types
// ----------
pub mod float_cost;

// Problems
// --------
pub mod problems;
