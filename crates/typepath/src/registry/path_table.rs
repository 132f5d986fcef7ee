//! Path table: best known converter per (from, to) pair.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use crate::converter::SharedConverter;
use crate::types::{Reflect, TypeToken};

/// Key of the path table: an ordered (from, to) pair of types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    from: TypeToken,
    to: TypeToken,
}

impl TypeKey {
    /// Key for converting `from` into `to`.
    #[must_use]
    pub fn new(from: TypeToken, to: TypeToken) -> Self {
        Self { from, to }
    }

    /// Key for converting `A` into `B`.
    #[must_use]
    pub fn of<A: Reflect, B: Reflect>() -> Self {
        Self::new(TypeToken::of::<A>(), TypeToken::of::<B>())
    }

    /// Source type.
    #[must_use]
    pub fn from_type(&self) -> TypeToken {
        self.from
    }

    /// Target type.
    #[must_use]
    pub fn to_type(&self) -> TypeToken {
        self.to
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Outcome of offering a converter for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Offer {
    /// Key was absent
    Added,
    /// Candidate had strictly fewer hops than the stored converter
    Replaced { previous_hops: i64 },
    /// Stored converter is at least as short
    Kept,
}

impl Offer {
    pub(crate) fn changed(self) -> bool {
        !matches!(self, Self::Kept)
    }
}

/// Insertion-ordered map from [`TypeKey`] to the shortest known converter.
///
/// Entries are only ever added or replaced by a strictly shorter converter,
/// never removed. Iteration follows first insertion of each key, which keeps
/// tie-breaking between equally short candidates deterministic.
#[derive(Default)]
pub(crate) struct PathTable {
    paths: HashMap<TypeKey, SharedConverter>,
    order: Vec<TypeKey>,
}

impl PathTable {
    pub(crate) fn get(&self, key: &TypeKey) -> Option<&SharedConverter> {
        self.paths.get(key)
    }

    pub(crate) fn contains(&self, key: &TypeKey) -> bool {
        self.paths.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Store `candidate` if `key` is absent or `candidate` is strictly shorter.
    pub(crate) fn offer(&mut self, key: TypeKey, candidate: SharedConverter) -> Offer {
        match self.paths.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
                self.order.push(key);
                Offer::Added
            }
            Entry::Occupied(mut slot) => {
                let previous_hops = slot.get().hops();
                if Arc::ptr_eq(slot.get(), &candidate) || candidate.hops() >= previous_hops {
                    Offer::Kept
                } else {
                    slot.insert(candidate);
                    Offer::Replaced { previous_hops }
                }
            }
        }
    }

    /// Entries in first-insertion order of their keys.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (TypeKey, &SharedConverter)> + '_ {
        self.order.iter().map(|key| (*key, &self.paths[key]))
    }
}
