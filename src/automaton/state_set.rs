use std::collections::BTreeSet;

use itertools::Itertools;

use crate::{Show, StateIndex};

/// An immutable set of states of some automaton. State sets are used as the colors of states that
/// are produced by the subset construction, two such states are identical if and only if their
/// state sets are equal.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateSet(BTreeSet<StateIndex>);

impl StateSet {
    /// Creates the empty state set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a new set containing the states that are in `self` as well as in `other`.
    pub fn intersection(&self, other: &StateSet) -> StateSet {
        self.0.intersection(&other.0).copied().collect()
    }

    /// Returns a new set containing the states that are in `self` or in `other`.
    pub fn union(&self, other: &StateSet) -> StateSet {
        self.0.union(&other.0).copied().collect()
    }
}

impl std::ops::Deref for StateSet {
    type Target = BTreeSet<StateIndex>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<StateIndex> for StateSet {
    fn from_iter<T: IntoIterator<Item = StateIndex>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StateSet {
    type Item = &'a StateIndex;
    type IntoIter = std::collections::btree_set::Iter<'a, StateIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Debug for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

impl Show for StateSet {
    fn show(&self) -> String {
        format!("{self:?}")
    }
}
