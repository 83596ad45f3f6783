//! # Place/Transition net model
//!
//! Let `P` be the place set and `T` the transition set, with input and
//! output incidence `Pre, Post ∈ ℕ^{|P|×|T|}`. For a marking
//! `M ∈ ℕ^{|P|}`:
//!
//! * transition `t` is **enabled** iff `∀p: M[p] ≥ Pre[p, t]` (a
//!   transition with an empty preset is enabled everywhere);
//! * firing an enabled `t` yields `M' = M + Post[:, t] − Pre[:, t]`.
//!
//! The symbolic analyses in [`crate::symbolic`] and [`crate::analysis`]
//! additionally assume the net is **1-safe**: every reachable marking
//! restricts each place to 0 or 1 tokens, and all arc weights are 1.
//!
//! ## Example
//!
//! ```rust
//! use pnsym::net::{Net, Place, Transition};
//!
//! let mut net = Net::empty();
//! let p0 = net.add_place(Place::new("p0", 1));
//! let p1 = net.add_place(Place::new("p1", 0));
//! let t0 = net.add_transition(Transition::new("t0"));
//!
//! net.add_input_arc(p0, t0, 1);
//! net.add_output_arc(p1, t0, 1);
//!
//! let marking = net.initial_marking();
//! assert_eq!(net.enabled_transitions(&marking), vec![t0]);
//! let next = net.fire_transition(&marking, t0).unwrap();
//! assert_eq!(next.tokens(p0), 0);
//! assert_eq!(next.tokens(p1), 1);
//! ```

pub mod core;
pub mod ids;
pub mod incidence;
pub mod index_vec;
pub mod structure;

pub use core::{FireError, Net};
pub use ids::{PlaceId, TransitionId};
pub use incidence::Incidence;
pub use index_vec::{Idx, IndexVec};
pub use structure::{Marking, Place, Transition, Weight};
