//! Branch-and-bound maximization of a linear cost over a symbolic set.
//!
//! Only the places the set formula actually constrains (its *support*)
//! are branched on; every other place is free and takes 1 exactly when
//! its cost is positive, contributing a fixed amount to every candidate.
//! Branches restrict the formula and are pruned when the restriction is
//! empty or when an optimistic bound cannot beat the incumbent.

use biodivine_lib_bdd::Bdd;
use serde::Serialize;

use crate::error::AnalysisError;
use crate::net::{Idx, Marking};
use crate::symbolic::SymbolicContext;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Optimum {
    pub marking: Marking,
    pub value: i64,
}

/// One open node of the depth-first search. Frames own their partial
/// assignment, so no in-progress candidate is ever shared between
/// branches.
struct Frame {
    level: usize,
    set: Bdd,
    bits: Vec<bool>,
    value: i64,
}

/// Maximizes `cost · marking` over all markings in `set`.
///
/// Returns `None` exactly when the set is empty. Ties are broken by
/// keeping the first candidate found at the best value.
pub fn maximize(
    ctx: &SymbolicContext,
    set: &Bdd,
    cost: &[i64],
) -> Result<Option<Optimum>, AnalysisError> {
    let places = ctx.num_places();
    if cost.len() != places {
        return Err(AnalysisError::CostLength {
            expected: places,
            got: cost.len(),
        });
    }

    if set.is_false() {
        return Ok(None);
    }

    let support = ctx.support_places(set);
    if set.is_true() || support.is_empty() {
        // Unconstrained: occupy exactly the positive-cost places.
        let bits: Vec<bool> = cost.iter().map(|&c| c > 0).collect();
        return Ok(Some(candidate(cost, bits)));
    }

    let supported = {
        let mut mask = vec![false; places];
        for &place in &support {
            mask[place.index()] = true;
        }
        mask
    };

    // Fixed contribution of the free places, and an optimistic suffix sum
    // of the supported ones for the pruning bound.
    let free_positive: i64 = cost
        .iter()
        .enumerate()
        .filter(|&(idx, &c)| !supported[idx] && c > 0)
        .map(|(_, &c)| c)
        .sum();
    let mut remaining_positive = vec![0i64; support.len() + 1];
    for level in (0..support.len()).rev() {
        remaining_positive[level] =
            remaining_positive[level + 1] + cost[support[level].index()].max(0);
    }

    let mut best: Option<Optimum> = None;
    let mut visited = 0usize;
    let mut stack = vec![Frame {
        level: 0,
        set: set.clone(),
        bits: vec![false; places],
        value: 0,
    }];

    while let Some(frame) = stack.pop() {
        visited += 1;
        if frame.set.is_false() {
            continue;
        }
        if let Some(incumbent) = &best {
            let bound = frame.value + remaining_positive[frame.level] + free_positive;
            if bound <= incumbent.value {
                continue;
            }
        }

        if frame.level == support.len() {
            let mut bits = frame.bits;
            for (idx, bit) in bits.iter_mut().enumerate() {
                if !supported[idx] {
                    *bit = cost[idx] > 0;
                }
            }
            let leaf = candidate(cost, bits);
            if best.as_ref().is_none_or(|incumbent| leaf.value > incumbent.value) {
                best = Some(leaf);
            }
            continue;
        }

        let place = support[frame.level];
        let place_cost = cost[place.index()];
        // Try the profitable value first so the incumbent tightens early;
        // push it last, it pops first.
        let preferred = place_cost >= 0;
        for assigned in [!preferred, preferred] {
            let mut bits = frame.bits.clone();
            bits[place.index()] = assigned;
            stack.push(Frame {
                level: frame.level + 1,
                set: frame.set.var_restrict(ctx.var(place), assigned),
                bits,
                value: frame.value + if assigned { place_cost } else { 0 },
            });
        }
    }

    log::debug!(
        "branch-and-bound over {} supported places, {visited} nodes visited",
        support.len()
    );
    Ok(best)
}

fn candidate(cost: &[i64], bits: Vec<bool>) -> Optimum {
    let value = cost
        .iter()
        .zip(&bits)
        .map(|(&c, &bit)| if bit { c } else { 0 })
        .sum();
    Optimum {
        marking: Marking::from_bits(&bits),
        value,
    }
}
