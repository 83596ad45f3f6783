//! The symbolic variable context shared by one analysis run.
//!
//! One Boolean variable is declared per place, named by the place id and
//! ordered like the places themselves. The context is created once per
//! run and passed explicitly to every symbolic operation; all set handles
//! it produces are canonical, so two handles are equal exactly when they
//! denote the same set of markings.

use std::collections::HashSet;

use biodivine_lib_bdd::{Bdd, BddVariable, BddVariableSet, BddVariableSetBuilder};
use num_bigint::BigInt;

use crate::error::AnalysisError;
use crate::net::{Marking, Net, PlaceId};

pub struct SymbolicContext {
    variables: BddVariableSet,
    place_vars: Vec<BddVariable>,
}

impl SymbolicContext {
    /// Declares the place variables for `net` and checks the 1-safe
    /// domain contract: initial tokens in {0,1} and unit arc weights.
    pub fn new(net: &Net) -> Result<Self, AnalysisError> {
        let mut seen = HashSet::new();
        for place in net.places.iter() {
            if !seen.insert(place.id.as_str()) {
                return Err(AnalysisError::DuplicatePlaceId(place.id.clone()));
            }
            if place.tokens > 1 {
                return Err(AnalysisError::UnsafeMarking {
                    place: place.id.clone(),
                    tokens: place.tokens,
                });
            }
        }
        for (transition_id, transition) in net.transitions.iter_enumerated() {
            for incidence in [&net.pre, &net.post] {
                for (place, weight) in incidence.connected(transition_id) {
                    if weight > 1 {
                        return Err(AnalysisError::WeightedArc {
                            place: net.places[place].id.clone(),
                            transition: transition.id.clone(),
                            weight,
                        });
                    }
                }
            }
        }

        let mut builder = BddVariableSetBuilder::new();
        let place_vars = net
            .places
            .iter()
            .map(|place| builder.make_variable(&place.id))
            .collect();
        Ok(Self {
            variables: builder.build(),
            place_vars,
        })
    }

    pub fn num_places(&self) -> usize {
        self.place_vars.len()
    }

    pub fn var(&self, place: PlaceId) -> BddVariable {
        self.place_vars[place.raw() as usize]
    }

    pub fn mk_true(&self) -> Bdd {
        self.variables.mk_true()
    }

    pub fn mk_false(&self) -> Bdd {
        self.variables.mk_false()
    }

    /// The set of markings where `place` is occupied (`value` = true) or
    /// empty (`value` = false).
    pub fn literal(&self, place: PlaceId, value: bool) -> Bdd {
        self.variables.mk_literal(self.var(place), value)
    }

    /// The point set containing exactly the given 1-safe marking.
    pub fn marking_formula(&self, marking: &Marking) -> Bdd {
        let bits: Vec<bool> = marking.iter().map(|(_, &tokens)| tokens > 0).collect();
        self.point_formula(&bits)
    }

    /// The point set for one per-place assignment.
    pub fn point_formula(&self, bits: &[bool]) -> Bdd {
        let mut formula = self.variables.mk_true();
        for (idx, &bit) in bits.iter().enumerate() {
            formula = formula.and(&self.variables.mk_literal(self.place_vars[idx], bit));
        }
        formula
    }

    /// Whether the marking is a member of the set.
    pub fn contains(&self, set: &Bdd, marking: &Marking) -> bool {
        !set.and(&self.marking_formula(marking)).is_false()
    }

    /// Exact number of markings in the set, counted over all P place
    /// variables: places the formula does not mention count as free
    /// Boolean choices.
    pub fn count(&self, set: &Bdd) -> BigInt {
        set.exact_cardinality()
    }

    /// One arbitrary marking from the set, or `None` if it is empty.
    pub fn witness(&self, set: &Bdd) -> Option<Marking> {
        let valuation = set.sat_witness()?;
        let bits: Vec<bool> = self.place_vars.iter().map(|&v| valuation.value(v)).collect();
        Some(Marking::from_bits(&bits))
    }

    /// The places whose variables the formula actually constrains, in
    /// place order.
    pub fn support_places(&self, set: &Bdd) -> Vec<PlaceId> {
        let support = set.support_set();
        self.place_vars
            .iter()
            .enumerate()
            .filter(|(_, var)| support.contains(var))
            .map(|(idx, _)| PlaceId::new(idx as u32))
            .collect()
    }
}
