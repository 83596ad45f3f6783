//! The branch-and-bound optimizer against an exhaustive scan of the
//! explicit reachable set, plus a state space too large to scan place
//! assignments naively.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pnsym::analysis::{explicit_reachable, maximize};
use pnsym::net::{Marking, Net, Place, PlaceId, Transition};
use pnsym::symbolic::{reachable_set, SymbolicContext};

fn random_components_net(seed: u64, components: usize, places_per_component: usize) -> Net {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut net = Net::empty();

    for component in 0..components {
        let places: Vec<_> = (0..places_per_component)
            .map(|i| {
                net.add_place(Place::new(
                    format!("c{component}_p{i}"),
                    u64::from(i == 0),
                ))
            })
            .collect();
        let arcs = rng.random_range(places_per_component..2 * places_per_component);
        for arc in 0..arcs {
            let from = places[rng.random_range(0..places.len())];
            let to = places[rng.random_range(0..places.len())];
            if from == to {
                continue;
            }
            let t = net.add_transition(Transition::new(format!("c{component}_t{arc}")));
            net.add_input_arc(from, t, 1);
            net.add_output_arc(to, t, 1);
        }
    }
    net
}

fn scan_value(marking: &Marking, cost: &[i64]) -> i64 {
    marking
        .iter()
        .zip(cost)
        .map(|((_, &tokens), &c)| if tokens > 0 { c } else { 0 })
        .sum()
}

#[test]
fn matches_exhaustive_scan_on_random_nets() {
    let mut rng = StdRng::seed_from_u64(42);
    for seed in 0..15 {
        let net = random_components_net(seed, 2, 4);
        let cost: Vec<i64> = (0..net.places_len())
            .map(|_| rng.random_range(-5..=9))
            .collect();

        let ctx = SymbolicContext::new(&net).unwrap();
        let reach = reachable_set(&net, &ctx);
        let optimum = maximize(&ctx, reach.formula(), &cost).unwrap().unwrap();

        let explicit = explicit_reachable(&net);
        let scan_best = explicit
            .iter()
            .map(|m| scan_value(m, &cost))
            .max()
            .unwrap();

        assert_eq!(
            optimum.value, scan_best,
            "seed {seed}: optimizer found {} but the scan found {scan_best}",
            optimum.value
        );
        assert!(
            explicit.contains(&optimum.marking),
            "seed {seed}: witness {} is not reachable",
            optimum.marking
        );
        assert_eq!(scan_value(&optimum.marking, &cost), optimum.value);
    }
}

#[test]
fn handles_a_state_space_beyond_enumeration_comfort() {
    // 13 independent toggle pairs: 2^13 = 8192 reachable markings. Each
    // pair holds one token on either side; the heavier side is worth 2.
    let pairs = 13;
    let mut net = Net::empty();
    for i in 0..pairs {
        let a = net.add_place(Place::new(format!("a{i}"), 1));
        let b = net.add_place(Place::new(format!("b{i}"), 0));
        let forward = net.add_transition(Transition::new(format!("fwd{i}")));
        net.add_input_arc(a, forward, 1);
        net.add_output_arc(b, forward, 1);
        let back = net.add_transition(Transition::new(format!("back{i}")));
        net.add_input_arc(b, back, 1);
        net.add_output_arc(a, back, 1);
    }

    let ctx = SymbolicContext::new(&net).unwrap();
    let reach = reachable_set(&net, &ctx);
    assert_eq!(reach.count(), &num_bigint::BigInt::from(1u32 << pairs));

    let cost: Vec<i64> = (0..2 * pairs).map(|i| if i % 2 == 0 { 1 } else { 2 }).collect();
    let optimum = maximize(&ctx, reach.formula(), &cost).unwrap().unwrap();

    // Every pair can park its token on the b side.
    assert_eq!(optimum.value, 2 * pairs as i64);
    for i in 0..pairs as u32 {
        assert!(!optimum.marking.bit(PlaceId::new(2 * i)));
        assert!(optimum.marking.bit(PlaceId::new(2 * i + 1)));
    }

    // Under the all-ones cost the token count is invariant: one per pair.
    let ones = vec![1i64; 2 * pairs];
    let flat = maximize(&ctx, reach.formula(), &ones).unwrap().unwrap();
    assert_eq!(flat.value, pairs as i64);
}

#[test]
fn all_ones_cost_counts_tokens() {
    // One token per component, so the token count is constant and every
    // reachable marking is optimal.
    let net = random_components_net(7, 3, 4);
    let ctx = SymbolicContext::new(&net).unwrap();
    let reach = reachable_set(&net, &ctx);

    let cost = vec![1i64; net.places_len()];
    let optimum = maximize(&ctx, reach.formula(), &cost).unwrap().unwrap();
    assert_eq!(optimum.value, 3);
    assert!(explicit_reachable(&net).contains(&optimum.marking));
}
