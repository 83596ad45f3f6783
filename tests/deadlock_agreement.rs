//! Both deadlock-search strategies must agree on the existence verdict,
//! and every witness must be a reachable dead marking.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pnsym::analysis::{
    explicit_reachable, find_deadlock_filtered, find_deadlock_iterative, DeadlockResult,
    NoDeadlockReason,
};
use pnsym::net::{Net, Place, Transition};
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

fn check_agreement(net: &Net) {
    let ctx = SymbolicContext::new(net).unwrap();
    let reach = reachable_set(net, &ctx);

    let iterative = find_deadlock_iterative(net, &ctx, &reach, 10_000).unwrap();
    let filtered = find_deadlock_filtered(net, &ctx, &reach).unwrap();

    assert_eq!(
        iterative.found(),
        filtered.found(),
        "strategies disagree: iterative={iterative}, filtered={filtered}"
    );

    let explicit = explicit_reachable(net);
    for result in [&iterative, &filtered] {
        if let DeadlockResult::Found { marking, .. } = result {
            assert!(
                explicit.contains(marking),
                "witness {marking} is not reachable"
            );
            assert!(net.is_dead(marking), "witness {marking} is not dead");
        }
    }
}

#[test]
fn handoff_deadlock_is_found_by_both_strategies() {
    let mut net = Net::empty();
    let p0 = net.add_place(Place::new("p0", 1));
    let p1 = net.add_place(Place::new("p1", 0));
    let t0 = net.add_transition(Transition::new("t0"));
    net.add_input_arc(p0, t0, 1);
    net.add_output_arc(p1, t0, 1);

    check_agreement(&net);
    let ctx = SymbolicContext::new(&net).unwrap();
    let reach = reachable_set(&net, &ctx);
    assert!(find_deadlock_iterative(&net, &ctx, &reach, 100)
        .unwrap()
        .found());
}

#[test]
fn empty_preset_transition_means_no_dead_state_anywhere() {
    // An always-enabled transition makes the dead-state program
    // infeasible; both strategies must classify this as "no dead state
    // exists", not merely "unreachable".
    let mut net = Net::empty();
    let p0 = net.add_place(Place::new("p0", 0));
    let source = net.add_transition(Transition::new("source"));
    net.add_output_arc(p0, source, 1);

    let ctx = SymbolicContext::new(&net).unwrap();
    let reach = reachable_set(&net, &ctx);

    assert_eq!(
        find_deadlock_iterative(&net, &ctx, &reach, 100).unwrap(),
        DeadlockResult::NotFound(NoDeadlockReason::NoDeadState)
    );
    assert_eq!(
        find_deadlock_filtered(&net, &ctx, &reach).unwrap(),
        DeadlockResult::NotFound(NoDeadlockReason::NoDeadState)
    );
}

#[test]
fn two_token_ring_never_deadlocks() {
    // Two components cycling independently: every reachable marking
    // enables something.
    let mut net = Net::empty();
    for component in 0..2 {
        let places: Vec<_> = (0..3)
            .map(|i| {
                net.add_place(Place::new(
                    format!("c{component}_p{i}"),
                    u64::from(i == 0),
                ))
            })
            .collect();
        for i in 0..3 {
            let t = net.add_transition(Transition::new(format!("c{component}_t{i}")));
            net.add_input_arc(places[i], t, 1);
            net.add_output_arc(places[(i + 1) % 3], t, 1);
        }
    }

    let ctx = SymbolicContext::new(&net).unwrap();
    let reach = reachable_set(&net, &ctx);
    let iterative = find_deadlock_iterative(&net, &ctx, &reach, 10_000).unwrap();
    let filtered = find_deadlock_filtered(&net, &ctx, &reach).unwrap();
    assert!(!iterative.found());
    assert!(!filtered.found());
    check_agreement(&net);
}

#[test]
fn random_nets_agree_on_deadlock_existence() {
    for seed in 0..25 {
        let net = random_components_net(seed, 1, 5);
        check_agreement(&net);
    }
}

#[test]
fn random_product_nets_agree_on_deadlock_existence() {
    for seed in 200..210 {
        let net = random_components_net(seed, 2, 4);
        check_agreement(&net);
    }
}
