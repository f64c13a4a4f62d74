use std::{collections::BTreeSet, hash::Hash};

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;
/// A map which iterates its entries in insertion order. Transitions are stored in such maps, which
/// makes every traversal of an automaton reproducible.
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A partition groups elements of type `I` into disjoint classes. Classes are kept in the order in
/// which they were created.
#[derive(Debug, Clone)]
pub struct Partition<I: Hash + Eq>(Vec<BTreeSet<I>>);

impl<I: Hash + Eq> std::ops::Deref for Partition<I> {
    type Target = Vec<BTreeSet<I>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, I: Hash + Eq> IntoIterator for &'a Partition<I> {
    type Item = &'a BTreeSet<I>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Hash + Eq> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}
impl<I: Hash + Eq> Eq for Partition<I> {}

impl<I: Hash + Eq + Ord + Copy> Partition<I> {
    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators
    /// which yield elements of type `I`.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect::<BTreeSet<_>>())
                .collect(),
        )
    }

    /// Groups the given `elements` by `equivalent` in a single pass: the first element that has not
    /// been processed yet opens a new class and absorbs every other unprocessed element that is
    /// equivalent to it. `equivalent` is expected to be an equivalence relation.
    pub fn group_by<F>(elements: impl IntoIterator<Item = I>, equivalent: F) -> Self
    where
        F: Fn(&I, &I) -> bool,
    {
        let mut unprocessed: Vec<I> = elements.into_iter().collect();
        let mut classes = Vec::new();
        while !unprocessed.is_empty() {
            let representative = unprocessed.remove(0);
            let (class, rest): (Vec<I>, Vec<I>) = unprocessed
                .into_iter()
                .partition(|other| equivalent(&representative, other));
            classes.push(
                std::iter::once(representative)
                    .chain(class)
                    .collect::<BTreeSet<_>>(),
            );
            unprocessed = rest;
        }
        Self(classes)
    }

    /// Returns the position of the class that contains `element`, if it exists.
    pub fn class_of(&self, element: &I) -> Option<usize> {
        self.0.iter().position(|class| class.contains(element))
    }

    /// Returns the smallest element of the class at position `class`.
    pub fn representative(&self, class: usize) -> Option<I> {
        self.0.get(class).and_then(|c| c.first().copied())
    }
}

impl<I: Hash + Eq + Ord> From<Vec<BTreeSet<I>>> for Partition<I> {
    fn from(value: Vec<BTreeSet<I>>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;

    #[test]
    fn group_by_residue() {
        let partition = Partition::group_by(0..7usize, |a, b| a % 3 == b % 3);
        assert_eq!(partition.size(), 3);
        assert_eq!(partition, Partition::new([vec![0, 3, 6], vec![1, 4], vec![2, 5]]));
        assert_eq!(partition.class_of(&4), Some(1));
        assert_eq!(partition.representative(2), Some(2));
        assert_eq!(partition.class_of(&9), None);
    }
}
