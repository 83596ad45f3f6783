//! Analysis-level error taxonomy.
//!
//! Loader failures live in [`crate::pnml::PnmlError`] and firing failures
//! in [`crate::net::FireError`]; everything the symbolic analyses can
//! report is collected here. Infeasibility of the dead-state program is
//! *not* an error (it is the "no dead state exists" outcome) and never
//! appears in this enum.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("place `{place}` starts with {tokens} tokens; the symbolic analyses require a 1-safe net")]
    UnsafeMarking { place: String, tokens: u64 },
    #[error("arc between `{place}` and `{transition}` has weight {weight}; the symbolic analyses require weight-1 arcs")]
    WeightedArc {
        place: String,
        transition: String,
        weight: u64,
    },
    #[error("duplicate place id `{0}` cannot be used as a symbolic variable name")]
    DuplicatePlaceId(String),
    #[error("cost vector has {got} entries but the net has {expected} places")]
    CostLength { expected: usize, got: usize },
    #[error("integer program solver failed: {0}")]
    Solver(String),
}
