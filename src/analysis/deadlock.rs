//! Deadlock detection: dead-state integer program plus two search
//! strategies over the symbolic reachable set.
//!
//! A marking is *dead* when it enables no transition. Deadness is a pure
//! Boolean property, so it is encoded once as a 0/1 feasibility program
//! over the whole marking space; reachability is then checked against the
//! symbolic set. The iterative strategy interleaves IP solves with
//! no-good cuts, the filter strategy prechecks the IP once and falls back
//! to a purely symbolic subtraction.

use std::fmt;

use biodivine_lib_bdd::Bdd;
use good_lp::{microlp, variable, variables, Expression, ResolutionError, Solution, SolverModel};
use serde::Serialize;

use crate::error::AnalysisError;
use crate::net::{Idx, Marking, Net, PlaceId, TransitionId};
use crate::symbolic::{ReachableSet, SymbolicContext};

/// Outcome of one feasibility solve of the dead-state program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpOutcome {
    /// A dead marking somewhere in {0,1}^P, not necessarily reachable.
    Candidate(Vec<bool>),
    /// No dead marking exists in the remaining feasible region.
    Infeasible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sense {
    Leq,
    Geq,
}

#[derive(Debug, Clone)]
struct LinearConstraint {
    terms: Vec<(usize, f64)>,
    sense: Sense,
    rhs: f64,
}

/// The dead-state 0/1 program: one binary variable per place and, per
/// transition, "not all preset places occupied at once". The model is an
/// owned builder; the iterative search appends cuts to it between solves
/// and must not be shared across concurrent searches.
#[derive(Debug, Clone)]
pub struct DeadStateModel {
    places: usize,
    constraints: Vec<LinearConstraint>,
}

impl DeadStateModel {
    pub fn build(net: &Net) -> Self {
        let places = net.places_len();
        let mut constraints = Vec::new();

        for transition in net.transitions.indices() {
            let preset = net.preset(transition);
            if preset.is_empty() {
                // Always-enabled transition: no marking is dead anywhere.
                // Force infeasibility with a contradictory pair so the
                // solver answers "no dead state exists".
                let all: Vec<(usize, f64)> = (0..places).map(|p| (p, 1.0)).collect();
                constraints.push(LinearConstraint {
                    terms: all.clone(),
                    sense: Sense::Leq,
                    rhs: 0.0,
                });
                constraints.push(LinearConstraint {
                    terms: all,
                    sense: Sense::Geq,
                    rhs: 1.0,
                });
                continue;
            }
            let terms: Vec<(usize, f64)> = preset
                .iter()
                .map(|&(place, _)| (place.index(), 1.0))
                .collect();
            let rhs = preset.len() as f64 - 1.0;
            constraints.push(LinearConstraint {
                terms,
                sense: Sense::Leq,
                rhs,
            });
        }

        Self {
            places,
            constraints,
        }
    }

    /// Standard no-good cut excluding exactly this 0/1 point:
    /// `sum(ones) - sum(zeros) <= |ones| - 1`.
    pub fn add_exclusion_cut(&mut self, candidate: &[bool]) {
        let terms: Vec<(usize, f64)> = candidate
            .iter()
            .enumerate()
            .map(|(place, &bit)| (place, if bit { 1.0 } else { -1.0 }))
            .collect();
        let ones = candidate.iter().filter(|&&bit| bit).count();
        self.constraints.push(LinearConstraint {
            terms,
            sense: Sense::Leq,
            rhs: ones as f64 - 1.0,
        });
    }

    pub fn constraints_len(&self) -> usize {
        self.constraints.len()
    }

    /// Feasibility solve. The accumulated constraints are materialized
    /// into a fresh solver model each call, because the solver consumes
    /// its model on `solve`.
    pub fn solve(&self) -> Result<IpOutcome, AnalysisError> {
        let mut problem = variables!();
        let vars: Vec<good_lp::Variable> = (0..self.places)
            .map(|_| problem.add(variable().binary()))
            .collect();

        let mut model = problem.minimise(Expression::default()).using(microlp);
        for constraint in &self.constraints {
            let mut lhs = Expression::default();
            for &(place, coefficient) in &constraint.terms {
                lhs += coefficient * vars[place];
            }
            model = match constraint.sense {
                Sense::Leq => model.with(lhs.leq(constraint.rhs)),
                Sense::Geq => model.with(lhs.geq(constraint.rhs)),
            };
        }

        match model.solve() {
            Ok(solution) => Ok(IpOutcome::Candidate(
                vars.iter().map(|&v| solution.value(v) > 0.5).collect(),
            )),
            Err(ResolutionError::Infeasible) => Ok(IpOutcome::Infeasible),
            Err(other) => Err(AnalysisError::Solver(other.to_string())),
        }
    }
}

/// Why no deadlock was reported. Budget exhaustion is a timeout, not a
/// proof of absence, and is kept distinct from genuine infeasibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NoDeadlockReason {
    /// The dead-state program is infeasible: no dead marking exists in
    /// the whole 0/1 space, reachable or not.
    NoDeadState,
    /// Dead markings exist, but none of them is reachable.
    DeadStatesUnreachable,
    /// The iteration budget ran out before the search concluded.
    BudgetExhausted { iterations: usize },
}

impl fmt::Display for NoDeadlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDeadlockReason::NoDeadState => write!(f, "no dead state exists"),
            NoDeadlockReason::DeadStatesUnreachable => {
                write!(f, "dead states exist but none is reachable")
            }
            NoDeadlockReason::BudgetExhausted { iterations } => {
                write!(f, "search budget exhausted after {iterations} iterations")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeadlockResult {
    Found { marking: Marking, iterations: usize },
    NotFound(NoDeadlockReason),
}

impl DeadlockResult {
    pub fn found(&self) -> bool {
        matches!(self, DeadlockResult::Found { .. })
    }
}

impl fmt::Display for DeadlockResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlockResult::Found {
                marking,
                iterations,
            } => write!(f, "deadlock at {marking} (after {iterations} iterations)"),
            DeadlockResult::NotFound(reason) => write!(f, "no deadlock: {reason}"),
        }
    }
}

/// Iterative refinement: solve the dead-state program, test the candidate
/// against the reachable set, and cut unreachable candidates away until a
/// reachable dead marking appears or the program goes infeasible.
///
/// Each cut removes exactly one point, so the loop terminates within
/// 2^P iterations; `max_iterations` bounds it in practice.
pub fn find_deadlock_iterative(
    net: &Net,
    ctx: &SymbolicContext,
    reach: &ReachableSet,
    max_iterations: usize,
) -> Result<DeadlockResult, AnalysisError> {
    let mut model = DeadStateModel::build(net);

    for iteration in 0..max_iterations {
        match model.solve()? {
            IpOutcome::Infeasible => {
                let reason = if iteration == 0 {
                    NoDeadlockReason::NoDeadState
                } else {
                    NoDeadlockReason::DeadStatesUnreachable
                };
                return Ok(DeadlockResult::NotFound(reason));
            }
            IpOutcome::Candidate(bits) => {
                let candidate = ctx.point_formula(&bits);
                if !reach.formula().and(&candidate).is_false() {
                    return Ok(DeadlockResult::Found {
                        marking: Marking::from_bits(&bits),
                        iterations: iteration + 1,
                    });
                }
                log::debug!(
                    "iteration {}: dead candidate unreachable, adding cut",
                    iteration + 1
                );
                model.add_exclusion_cut(&bits);
            }
        }
    }

    Ok(DeadlockResult::NotFound(NoDeadlockReason::BudgetExhausted {
        iterations: max_iterations,
    }))
}

/// Precheck + symbolic filter: one IP solve decides whether any dead
/// marking exists at all; if the single candidate is unreachable, the
/// reachable dead states are computed purely symbolically by subtracting,
/// transition by transition, every reachable state that still enables
/// something.
pub fn find_deadlock_filtered(
    net: &Net,
    ctx: &SymbolicContext,
    reach: &ReachableSet,
) -> Result<DeadlockResult, AnalysisError> {
    let model = DeadStateModel::build(net);

    let bits = match model.solve()? {
        IpOutcome::Infeasible => {
            return Ok(DeadlockResult::NotFound(NoDeadlockReason::NoDeadState));
        }
        IpOutcome::Candidate(bits) => bits,
    };

    let candidate = ctx.point_formula(&bits);
    if !reach.formula().and(&candidate).is_false() {
        return Ok(DeadlockResult::Found {
            marking: Marking::from_bits(&bits),
            iterations: 1,
        });
    }
    log::debug!("dead states exist somewhere; filtering the reachable set");

    let mut dead = reach.formula().clone();
    for transition in net.transitions.indices() {
        if dead.is_false() {
            break;
        }
        dead = dead.and_not(&enabling_formula(net, ctx, transition));
    }

    match ctx.witness(&dead) {
        Some(marking) => Ok(DeadlockResult::Found {
            marking,
            iterations: 1,
        }),
        None => Ok(DeadlockResult::NotFound(
            NoDeadlockReason::DeadStatesUnreachable,
        )),
    }
}

/// The set of 1-safe markings under which `transition` can fire: the full
/// preset is occupied and every postset-only place is empty. This is
/// recomputed from the net, independently of the firing relation used by
/// the reachability engine.
fn enabling_formula(net: &Net, ctx: &SymbolicContext, transition: TransitionId) -> Bdd {
    let preset: Vec<PlaceId> = net
        .preset(transition)
        .into_iter()
        .map(|(place, _)| place)
        .collect();

    let mut formula = ctx.mk_true();
    for &place in &preset {
        formula = formula.and(&ctx.literal(place, true));
    }
    for (place, _) in net.postset(transition) {
        if !preset.contains(&place) {
            formula = formula.and(&ctx.literal(place, false));
        }
    }
    formula
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{Place, Transition};
    use crate::symbolic::reachable_set;

    fn handoff_net() -> Net {
        let mut net = Net::empty();
        let p0 = net.add_place(Place::new("p0", 1));
        let p1 = net.add_place(Place::new("p1", 0));
        let t0 = net.add_transition(Transition::new("t0"));
        net.add_input_arc(p0, t0, 1);
        net.add_output_arc(p1, t0, 1);
        net
    }

    #[test]
    fn builder_encodes_one_constraint_per_preset() {
        let net = handoff_net();
        let model = DeadStateModel::build(&net);
        assert_eq!(model.constraints_len(), 1);
    }

    #[test]
    fn empty_preset_makes_the_program_infeasible() {
        let mut net = handoff_net();
        net.add_transition(Transition::new("source"));
        let model = DeadStateModel::build(&net);
        assert_eq!(model.solve().unwrap(), IpOutcome::Infeasible);
    }

    #[test]
    fn cut_excludes_the_candidate_for_good() {
        let net = handoff_net();
        let mut model = DeadStateModel::build(&net);
        let mut excluded: Vec<Vec<bool>> = Vec::new();

        // Cut away every dead candidate one by one; no candidate may
        // ever come back, and the program must eventually go infeasible.
        loop {
            match model.solve().unwrap() {
                IpOutcome::Infeasible => break,
                IpOutcome::Candidate(bits) => {
                    assert!(!excluded.contains(&bits), "cut candidate returned");
                    model.add_exclusion_cut(&bits);
                    excluded.push(bits);
                }
            }
        }
        // Dead markings of the handoff net: p0 must be empty, p1 free.
        assert_eq!(excluded.len(), 2);
        assert!(excluded.iter().all(|bits| !bits[0]));
    }

    #[test]
    fn both_strategies_find_the_handoff_deadlock() {
        let net = handoff_net();
        let ctx = SymbolicContext::new(&net).unwrap();
        let reach = reachable_set(&net, &ctx);

        let expected = Marking::from_bits(&[false, true]);
        match find_deadlock_iterative(&net, &ctx, &reach, 100).unwrap() {
            DeadlockResult::Found { marking, .. } => assert_eq!(marking, expected),
            other => panic!("expected a deadlock, got {other}"),
        }
        match find_deadlock_filtered(&net, &ctx, &reach).unwrap() {
            DeadlockResult::Found { marking, .. } => assert_eq!(marking, expected),
            other => panic!("expected a deadlock, got {other}"),
        }
    }

    #[test]
    fn budget_exhaustion_is_distinct_from_infeasibility() {
        // A zero budget never reaches the first solve, so the verdict
        // must be the timeout, not "no dead state".
        let net = handoff_net();
        let ctx = SymbolicContext::new(&net).unwrap();
        let reach = reachable_set(&net, &ctx);

        let result = find_deadlock_iterative(&net, &ctx, &reach, 0).unwrap();
        assert_eq!(
            result,
            DeadlockResult::NotFound(NoDeadlockReason::BudgetExhausted { iterations: 0 })
        );
    }

    #[test]
    fn cycle_has_no_deadlock() {
        let mut net = Net::empty();
        let p0 = net.add_place(Place::new("p0", 1));
        let p1 = net.add_place(Place::new("p1", 0));
        for (from, to, id) in [(p0, p1, "t0"), (p1, p0, "t1")] {
            let t = net.add_transition(Transition::new(id));
            net.add_input_arc(from, t, 1);
            net.add_output_arc(to, t, 1);
        }
        let ctx = SymbolicContext::new(&net).unwrap();
        let reach = reachable_set(&net, &ctx);

        let iterative = find_deadlock_iterative(&net, &ctx, &reach, 100).unwrap();
        let filtered = find_deadlock_filtered(&net, &ctx, &reach).unwrap();
        assert!(!iterative.found());
        assert!(!filtered.found());
        // Dead markings exist in {0,1}^2 (the empty marking) but are
        // unreachable, so neither strategy may claim "no dead state".
        assert_eq!(
            iterative,
            DeadlockResult::NotFound(NoDeadlockReason::DeadStatesUnreachable)
        );
        assert_eq!(
            filtered,
            DeadlockResult::NotFound(NoDeadlockReason::DeadStatesUnreachable)
        );
    }
}
