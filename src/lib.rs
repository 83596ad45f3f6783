//! Symbolic analysis of 1-safe place/transition nets.
//!
//! Three questions about the behavioral state space of a net:
//!
//! 1. **Reachability** — which markings are reachable from the initial
//!    one, computed as a symbolic fixed point ([`symbolic`]);
//! 2. **Deadlock** — does a reachable marking enable no transition,
//!    searched either by iterative IP refinement or by an IP precheck
//!    plus symbolic filtering ([`analysis::deadlock`]);
//! 3. **Optimization** — the best value of a linear cost over the
//!    reachable markings, by branch-and-bound over the symbolic set
//!    ([`analysis::optimize`]).
//!
//! Nets are built programmatically ([`net`]) or loaded from PNML
//! ([`pnml`]). The decision-diagram engine and the integer-program
//! solver are external capabilities consumed through
//! [`symbolic::SymbolicContext`] and [`analysis::DeadStateModel`].

pub mod analysis;
pub mod error;
pub mod net;
pub mod options;
pub mod pnml;
pub mod report;
pub mod symbolic;

pub use error::AnalysisError;
