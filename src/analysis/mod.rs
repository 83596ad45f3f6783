//! Analyses over the symbolic reachable set: deadlock search (two
//! strategies sharing one dead-state integer program), linear-cost
//! marking optimization, and an explicit-state baseline.

pub mod deadlock;
pub mod explicit;
pub mod optimize;

pub use deadlock::{
    find_deadlock_filtered, find_deadlock_iterative, DeadStateModel, DeadlockResult, IpOutcome,
    NoDeadlockReason,
};
pub use explicit::explicit_reachable;
pub use optimize::{maximize, Optimum};
