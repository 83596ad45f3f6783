//! Symbolic (decision-diagram) representation of marking sets and the
//! forward reachability fixed point over them.
//!
//! The decision-diagram engine itself is external; this module owns the
//! variable context for one analysis run and the transition encoding.

pub mod context;
pub mod reachability;

pub use context::SymbolicContext;
pub use reachability::{reachable_set, ReachableSet};
