//! Symbolic reachability fixed point ("chaining" order).
//!
//! Every transition contributes a guard (its preset fully occupied), an
//! update (tokens lost from the preset, gained on the postset) and the
//! set of place variables it changes. One pass applies all transitions in
//! a data-flow order and unions each image into the working set
//! immediately, so later transitions of the same pass already see the
//! contributions of earlier ones. The loop stops when a full pass leaves
//! the set unchanged; the result is the least fixed point regardless of
//! the visitation order, which only affects how many passes convergence
//! takes.

use biodivine_lib_bdd::{Bdd, BddVariable};
use itertools::Itertools;
use num_bigint::BigInt;

use crate::net::{Idx, Net, PlaceId, TransitionId};
use crate::symbolic::context::SymbolicContext;

/// The forward-reachable marking set of a net, as a canonical symbolic
/// handle plus its exact size.
pub struct ReachableSet {
    formula: Bdd,
    count: BigInt,
    passes: usize,
}

impl ReachableSet {
    pub fn formula(&self) -> &Bdd {
        &self.formula
    }

    /// Number of reachable markings, counted over all P place variables.
    pub fn count(&self) -> &BigInt {
        &self.count
    }

    /// Full passes the fixed point took, including the final unchanged one.
    pub fn passes(&self) -> usize {
        self.passes
    }
}

pub(crate) struct TransitionRelation {
    pub transition: TransitionId,
    pub guard: Bdd,
    pub update: Bdd,
    pub changed: Vec<BddVariable>,
    /// Lowest preset place index; transitions are chained in this order
    /// so token flow tends to run "downstream" within a single pass.
    chain_rank: usize,
}

pub(crate) fn transition_relations(net: &Net, ctx: &SymbolicContext) -> Vec<TransitionRelation> {
    net.transitions
        .indices()
        .map(|transition| {
            let preset: Vec<PlaceId> = net
                .preset(transition)
                .into_iter()
                .map(|(place, _)| place)
                .collect();
            let postset: Vec<PlaceId> = net
                .postset(transition)
                .into_iter()
                .map(|(place, _)| place)
                .collect();

            let mut guard = ctx.mk_true();
            for &place in &preset {
                guard = guard.and(&ctx.literal(place, true));
            }

            let mut update = ctx.mk_true();
            for &place in &preset {
                if !postset.contains(&place) {
                    update = update.and(&ctx.literal(place, false));
                }
            }
            for &place in &postset {
                update = update.and(&ctx.literal(place, true));
            }

            let changed: Vec<BddVariable> = preset
                .iter()
                .chain(postset.iter())
                .unique()
                .sorted()
                .map(|&place| ctx.var(place))
                .collect();

            let chain_rank = preset
                .iter()
                .map(|place| place.index())
                .min()
                .unwrap_or(usize::MAX);

            TransitionRelation {
                transition,
                guard,
                update,
                changed,
                chain_rank,
            }
        })
        .sorted_by_key(|relation| relation.chain_rank)
        .collect()
}

/// Computes the set of markings reachable from the initial marking.
///
/// `ctx` must have been built from the same net, which also validated
/// the 1-safe domain contract.
pub fn reachable_set(net: &Net, ctx: &SymbolicContext) -> ReachableSet {
    let relations = transition_relations(net, ctx);
    let mut reached = ctx.marking_formula(&net.initial_marking());
    let mut passes = 0;

    loop {
        let previous = reached.clone();
        for relation in &relations {
            let potential = relation.guard.and(&reached);
            if potential.is_false() {
                log::trace!("{} disabled everywhere, skipped", relation.transition);
                continue;
            }
            let successors = potential.exists(&relation.changed).and(&relation.update);
            reached = reached.or(&successors);
        }
        passes += 1;
        log::debug!(
            "pass {passes}: {} BDD nodes in the reachable set",
            reached.size()
        );
        if reached == previous {
            break;
        }
    }

    let count = ctx.count(&reached);
    log::info!("fixed point after {passes} passes, {count} reachable markings");
    ReachableSet {
        formula: reached,
        count,
        passes,
    }
}
