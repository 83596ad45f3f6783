//! Runtime semantics: enabling, firing and dead-marking checks.

use thiserror::Error;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::incidence::Incidence;
use crate::net::index_vec::{Idx, IndexVec};
use crate::net::structure::{Marking, Place, Transition, Weight};

#[derive(Debug, Error)]
pub enum FireError {
    #[error("transition {0} is out of bounds")]
    OutOfBounds(TransitionId),
    #[error("transition {0} is not enabled under the supplied marking")]
    NotEnabled(TransitionId),
}

/// A place/transition net: places, transitions and the input (`pre`) and
/// output (`post`) incidence matrices. The initial marking lives on the
/// places themselves.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Net {
    pub places: IndexVec<PlaceId, Place>,
    pub transitions: IndexVec<TransitionId, Transition>,
    pub pre: Incidence<Weight>,
    pub post: Incidence<Weight>,
}

impl Net {
    pub fn empty() -> Self {
        Self {
            places: IndexVec::new(),
            transitions: IndexVec::new(),
            pre: Incidence::new(0, 0, 0),
            post: Incidence::new(0, 0, 0),
        }
    }

    pub fn add_place(&mut self, place: Place) -> PlaceId {
        let place_id = self.places.push(place);
        self.pre.push_place_with_default(0);
        self.post.push_place_with_default(0);
        place_id
    }

    pub fn add_transition(&mut self, transition: Transition) -> TransitionId {
        let transition_id = self.transitions.push(transition);
        self.pre.push_transition_with_default(0);
        self.post.push_transition_with_default(0);
        transition_id
    }

    /// Input arc: place -> transition.
    pub fn add_input_arc(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        if weight == 0 {
            return;
        }
        *self.pre.get_mut(place, transition) += weight;
    }

    /// Output arc: transition -> place.
    pub fn add_output_arc(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        if weight == 0 {
            return;
        }
        *self.post.get_mut(place, transition) += weight;
    }

    pub fn places_len(&self) -> usize {
        self.places.len()
    }

    pub fn transitions_len(&self) -> usize {
        self.transitions.len()
    }

    pub fn initial_marking(&self) -> Marking {
        Marking::new(self.places.iter().map(|p| p.tokens).collect())
    }

    /// The places a transition consumes from, with arc weights.
    pub fn preset(&self, transition: TransitionId) -> Vec<(PlaceId, Weight)> {
        self.pre.connected(transition)
    }

    /// The places a transition produces into, with arc weights.
    pub fn postset(&self, transition: TransitionId) -> Vec<(PlaceId, Weight)> {
        self.post.connected(transition)
    }

    pub fn enabled_transitions(&self, marking: &Marking) -> Vec<TransitionId> {
        self.transitions
            .indices()
            .filter(|&transition| self.is_transition_enabled(transition, marking))
            .collect()
    }

    /// A transition with an empty preset is enabled under every marking.
    pub fn is_transition_enabled(&self, transition: TransitionId, marking: &Marking) -> bool {
        if transition.index() >= self.transitions_len() {
            return false;
        }
        self.pre
            .column(transition)
            .all(|(place, &weight)| marking.tokens(place) >= weight)
    }

    /// A marking is dead when it enables no transition.
    pub fn is_dead(&self, marking: &Marking) -> bool {
        self.transitions
            .indices()
            .all(|transition| !self.is_transition_enabled(transition, marking))
    }

    pub fn fire_transition(
        &self,
        marking: &Marking,
        transition: TransitionId,
    ) -> Result<Marking, FireError> {
        if transition.index() >= self.transitions_len() {
            return Err(FireError::OutOfBounds(transition));
        }
        if !self.is_transition_enabled(transition, marking) {
            return Err(FireError::NotEnabled(transition));
        }

        let mut next = marking.clone();
        for (place, weight) in self.preset(transition) {
            let tokens = next.tokens_mut(place);
            // Enabling was checked above, so the subtraction cannot wrap.
            *tokens -= weight;
        }
        for (place, weight) in self.postset(transition) {
            *next.tokens_mut(place) += weight;
        }
        Ok(next)
    }
}

impl Default for Net {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handoff_net() -> (Net, PlaceId, PlaceId, TransitionId) {
        let mut net = Net::empty();
        let p0 = net.add_place(Place::new("p0", 1));
        let p1 = net.add_place(Place::new("p1", 0));
        let t0 = net.add_transition(Transition::new("t0"));
        net.add_input_arc(p0, t0, 1);
        net.add_output_arc(p1, t0, 1);
        (net, p0, p1, t0)
    }

    #[test]
    fn add_place_and_transition_updates_incidence() {
        let (net, p0, p1, t0) = handoff_net();
        assert_eq!(net.places_len(), 2);
        assert_eq!(net.transitions_len(), 1);
        assert_eq!(*net.pre.get(p0, t0), 1);
        assert_eq!(*net.post.get(p1, t0), 1);
        assert_eq!(net.preset(t0), vec![(p0, 1)]);
        assert_eq!(net.postset(t0), vec![(p1, 1)]);
    }

    #[test]
    fn firing_moves_the_token() {
        let (net, p0, p1, t0) = handoff_net();
        let m0 = net.initial_marking();
        assert_eq!(net.enabled_transitions(&m0), vec![t0]);

        let m1 = net.fire_transition(&m0, t0).unwrap();
        assert_eq!(m1.tokens(p0), 0);
        assert_eq!(m1.tokens(p1), 1);

        assert!(net.is_dead(&m1));
        assert!(matches!(
            net.fire_transition(&m1, t0),
            Err(FireError::NotEnabled(_))
        ));
    }

    #[test]
    fn empty_preset_is_always_enabled() {
        let mut net = Net::empty();
        let p0 = net.add_place(Place::new("p0", 0));
        let source = net.add_transition(Transition::new("src"));
        net.add_output_arc(p0, source, 1);

        let m0 = net.initial_marking();
        assert!(net.is_transition_enabled(source, &m0));
        assert!(!net.is_dead(&m0));
        let m1 = net.fire_transition(&m0, source).unwrap();
        assert_eq!(m1.tokens(p0), 1);
    }
}
