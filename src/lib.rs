//! Library for building, transforming and minimizing nondeterministic finite automata (NFAs).
//!
//! An [`Automaton`] is a finite collection of states, each of which carries an assignment (we call
//! it the _color_ of the state, uncolored automata use [`Void`]), a set of initial states, a set of
//! accepting states and a transition relation that maps a state and a symbol to a set of successor
//! states. States are indices into an arena owned by the automaton, so two automata can never share
//! a state by accident. The alphabet is generic, any type implementing [`Symbol`] can label
//! transitions.
//!
//! On top of this, the crate provides
//! - the subset construction through [`Automaton::determinize`], which runs concurrently but always
//!   produces the same, canonically numbered result,
//! - the dual automaton through [`Automaton::dual`], which accepts the reversed language,
//! - minimization through [`Automaton::minimized`], an implementation of the Kameda-Weiner algorithm
//!   that yields an NFA with a minimal number of states (and not merely a minimal DFA), as well as
//!   [`Automaton::minimized_dfa`],
//! - language level operations like [`Automaton::union`], [`Automaton::intersect`],
//!   [`Automaton::is_equivalent`] and [`Automaton::contains`].
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::{fmt::Debug, hash::Hash};

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use minfa::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        automaton::{Automaton, AutomatonBuilder, Dottable, Routes, StateIndex, StateSet},
        error::AutomatonError,
        math,
        minimization::{MinimizationConfig, Minimizer},
        worklist::{ConcurrentWorklist, Worklist},
        Color, Show, Symbol, Void,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

mod show;
pub use show::Show;

/// Errors that can be produced when manipulating an automaton.
pub mod error;
pub use error::AutomatonError;

/// Work queues that process every distinct item exactly once.
pub mod worklist;

/// Defines the [`Automaton`] itself together with basic queries and its construction.
pub mod automaton;
pub use automaton::{Automaton, StateIndex, StateSet};

/// Transformations of automata: subset construction, dual automaton and set operations.
pub mod operations;

/// Kameda-Weiner minimization of nondeterministic automata.
pub mod minimization;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;

/// A symbol is anything that can label a transition. Apart from equality and hashing nothing is
/// required, the remaining bounds allow automata to be shared between threads.
pub trait Symbol: Clone + Eq + Hash + Debug + Send + Sync {}

impl<T: Clone + Eq + Hash + Debug + Send + Sync> Symbol for T {}

/// A color is the assignment that a state carries. Colors are never compared by the algorithms in
/// this crate, two states with equal colors are still distinct states.
pub trait Color: Clone + Debug + Send + Sync {}

impl<T: Clone + Debug + Send + Sync> Color for T {}

/// Represents the absence of a color. This is the default assignment of states, it can always be
/// produced from a color by simply forgetting it (see [`Automaton::erase_colors`]).
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Void;

impl Debug for Void {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#")
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// Accepts every non-empty word over `{0, 1}` that does not end in `10`, using three states
    /// with overlapping transitions and self loops.
    pub fn three_state_nfa() -> Automaton<char> {
        Automaton::builder()
            .with_transitions([
                (0, '0', 0),
                (0, '0', 2),
                (0, '1', 1),
                (1, '0', 0),
                (1, '1', 1),
                (1, '1', 2),
                (2, '0', 0),
                (2, '1', 2),
            ])
            .with_initial([0])
            .with_accepting([1, 2])
            .build()
    }

    pub fn single_transition() -> Automaton<char> {
        Automaton::builder()
            .with_transitions([(0, 'A', 1)])
            .with_initial([0])
            .with_accepting([1])
            .build()
    }

    #[test_log::test]
    fn determinize_single_transition() {
        let dfa = single_transition().determinize();
        assert_eq!(dfa.size(), 2);
        assert!(dfa.is_deterministic());

        let start = dfa.initial_states().next().unwrap();
        let outgoing = dfa.transitions_from(start).collect::<Vec<_>>();
        assert_eq!(outgoing.len(), 1);
        let (symbol, targets) = outgoing[0];
        assert_eq!(*symbol, 'A');
        assert_eq!(targets.len(), 1);
        let target = *targets.iter().next().unwrap();
        assert_ne!(target, start);
        assert!(dfa.is_accepting(target));
    }

    #[test_log::test]
    fn minimize_single_transition() {
        let min = single_transition().minimized();
        assert_eq!(min.size(), 2);
        assert_eq!(min.transitions().count(), 1);
        let (from, symbol, to) = min.transitions().next().unwrap();
        assert!(min.is_initial(from));
        assert!(min.is_accepting(to));
        assert_eq!(*symbol, 'A');
        assert!(min.is_equivalent(&single_transition()));
    }

    #[test_log::test]
    fn minimize_three_state_nfa() {
        let nfa = three_state_nfa();
        let min = nfa.minimized();
        assert!(min.size() <= nfa.size());
        assert!(min.is_equivalent(&nfa));
        for word in ["0", "1", "00", "01", "11", "100", "0001", "111"] {
            assert!(min.accepts(word.chars()), "{word} should be accepted");
        }
        for word in ["", "10", "010", "110", "0110"] {
            assert!(!min.accepts(word.chars()), "{word} should be rejected");
        }
        assert_eq!(min.minimized().size(), min.size());
    }

    #[test]
    fn union_of_literals() {
        let ab = Automaton::from_word("ab".chars());
        let ba = Automaton::from_word("ba".chars());
        let union = Automaton::union([&ab, &ba]);

        assert!(union.accepts("ab".chars()));
        assert!(union.accepts("ba".chars()));
        assert!(!union.accepts("aa".chars()));
        assert!(!union.accepts("".chars()));
        assert!(!union.accepts("abba".chars()));

        let overlapping = Automaton::builder()
            .with_transitions([(0, 'a', 1), (1, 'b', 1)])
            .with_initial([0])
            .with_accepting([1])
            .build();
        let union = Automaton::union([&ab, &overlapping]);
        assert!(union.accepts("ab".chars()));
        assert!(union.accepts("abbb".chars()));
        assert!(union.accepts("a".chars()));
        assert!(!union.accepts("ba".chars()));
    }

    #[test_log::test]
    fn intersect_with_itself() {
        let nfa = three_state_nfa();
        let product = Automaton::intersect([&nfa, &nfa]).unwrap();
        assert!(product.is_equivalent(&nfa));
        assert!(nfa.contains(&nfa));
    }
}
