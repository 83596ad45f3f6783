//! Static structure elements: places, transitions and markings.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::net::ids::PlaceId;
use crate::net::index_vec::IndexVec;

pub type Weight = u64;

/// A token holder. `id` is the unique identifier from the model file and
/// doubles as the symbolic variable name; `name` is an optional
/// human-readable label.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct Place {
    pub id: String,
    pub name: Option<String>,
    pub tokens: Weight,
}

impl Place {
    pub fn new(id: impl Into<String>, tokens: Weight) -> Self {
        Self {
            id: id.into(),
            name: None,
            tokens,
        }
    }

    pub fn with_name(id: impl Into<String>, name: impl Into<String>, tokens: Weight) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            tokens,
        }
    }
}

/// An atomic state-change rule; its preset and postset live in the net's
/// incidence matrices.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
pub struct Transition {
    pub id: String,
    pub name: Option<String>,
}

impl Transition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }
}

/// An assignment of token counts to all places, i.e. one global state.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marking(pub IndexVec<PlaceId, Weight>);

impl Marking {
    pub fn new(tokens: IndexVec<PlaceId, Weight>) -> Self {
        Self(tokens)
    }

    /// Builds a marking of the 1-safe domain from per-place booleans.
    pub fn from_bits(bits: &[bool]) -> Self {
        Self(bits.iter().map(|&b| Weight::from(b)).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlaceId, &Weight)> {
        self.0.iter_enumerated()
    }

    pub fn tokens(&self, place: PlaceId) -> Weight {
        self.0[place]
    }

    pub fn tokens_mut(&mut self, place: PlaceId) -> &mut Weight {
        &mut self.0[place]
    }

    /// Whether `place` holds a token. Only meaningful on 1-safe markings.
    pub fn bit(&self, place: PlaceId) -> bool {
        self.0[place] > 0
    }

    /// True when every place holds at most one token.
    pub fn is_one_safe(&self) -> bool {
        self.0.iter().all(|&tokens| tokens <= 1)
    }

    pub fn into_inner(self) -> IndexVec<PlaceId, Weight> {
        self.0
    }
}

impl Hash for Marking {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for value in self.0.iter() {
            value.hash(state);
        }
    }
}

impl fmt::Debug for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (place, tokens) in self.iter() {
            if place.raw() > 0 {
                write!(f, ",")?;
            }
            write!(f, "{tokens}")?;
        }
        write!(f, ")")
    }
}
