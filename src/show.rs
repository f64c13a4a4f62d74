use std::collections::BTreeSet;

use itertools::Itertools;

use crate::Void;

/// Helper trait which can be used to display states, symbols and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a symbol this is usually the symbol
    /// itself and for a set of states it should be for example `{0, 1, 2}`. This is mainly used
    /// for debugging purposes and for labelling nodes when exporting to DOT.
    fn show(&self) -> String;

    /// Show a collection of the thing, for a collection of states this should be {0, 1, 2, ...}.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(Show::show).join(", "))
    }
}

/// The absence of a color is shown as the empty string, which makes the DOT export fall back to
/// the index of a state.
impl Show for Void {
    fn show(&self) -> String {
        String::new()
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }

    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("\"{}\"", iter.into_iter().join(""))
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show> Show for BTreeSet<S> {
    fn show(&self) -> String {
        format!("{{{}}}", self.iter().map(Show::show).join(", "))
    }
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::{Show, Void};

    #[test]
    fn show_collections() {
        assert_eq!(vec!['a', 'b', 'a'].show(), "\"aba\"");
        assert_eq!(vec![2usize, 0].show(), "{2, 0}");
        assert_eq!(BTreeSet::from([2usize, 0]).show(), "{0, 2}");
        assert_eq!(Void.show(), "");
    }
}
