//! Explicit-state baseline: breadth-first enumeration of the reachable
//! markings. Exponential in the worst case; used to cross-check the
//! symbolic engine on small nets and for the CLI compare mode.

use std::collections::{HashSet, VecDeque};

use crate::net::{Marking, Net};

pub fn explicit_reachable(net: &Net) -> HashSet<Marking> {
    let initial = net.initial_marking();
    let mut reachable = HashSet::new();
    let mut queue = VecDeque::new();
    reachable.insert(initial.clone());
    queue.push_back(initial);

    while let Some(current) = queue.pop_front() {
        for transition in net.enabled_transitions(&current) {
            if let Ok(next) = net.fire_transition(&current, transition) {
                if reachable.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
    }

    reachable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{Place, Transition};

    #[test]
    fn enumerates_the_handoff_chain() {
        let mut net = Net::empty();
        let p0 = net.add_place(Place::new("p0", 1));
        let p1 = net.add_place(Place::new("p1", 0));
        let p2 = net.add_place(Place::new("p2", 0));
        for (from, to, id) in [(p0, p1, "t0"), (p1, p2, "t1")] {
            let t = net.add_transition(Transition::new(id));
            net.add_input_arc(from, t, 1);
            net.add_output_arc(to, t, 1);
        }

        let reachable = explicit_reachable(&net);
        assert_eq!(reachable.len(), 3);
        assert!(reachable.contains(&Marking::from_bits(&[true, false, false])));
        assert!(reachable.contains(&Marking::from_bits(&[false, true, false])));
        assert!(reachable.contains(&Marking::from_bits(&[false, false, true])));
    }
}
