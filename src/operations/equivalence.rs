use std::ops::ControlFlow;

use tracing::trace;

use crate::{
    math::{Bijection, Set},
    prelude::*,
};

impl<S: Symbol, Q: Color> Automaton<S, Q> {
    /// Returns `true` if `self` and `other` accept the same language.
    ///
    /// Both automata are turned into their minimal deterministic automata, which are unique up to
    /// the naming of states. These are then traversed in lock-step from their initial states while
    /// a bijection between the visited states is maintained. The automata are equivalent if every
    /// pair of visited states agrees on acceptance and on the symbols on which a transition exists,
    /// and the successors of every pair are consistent with the bijection.
    pub fn is_equivalent<P: Color>(&self, other: &Automaton<S, P>) -> bool {
        let left = self.minimized_dfa();
        let right = other.minimized_dfa();
        if left.size() != right.size() {
            return false;
        }
        let (Some(left_start), Some(right_start)) =
            (left.initial_states().next(), right.initial_states().next())
        else {
            // both languages are empty, as the sizes agree
            return left.is_empty();
        };

        let mut bijection: Bijection<StateIndex, StateIndex> = Bijection::new();
        bijection.insert(left_start, right_start);

        Worklist::from_seeds([(left_start, right_start)])
            .try_run(|(p, q), worklist| {
                if left.is_accepting(p) != right.is_accepting(q) {
                    trace!("states {p} and {q} disagree on acceptance");
                    return ControlFlow::Break(());
                }
                let symbols: Set<&S> = left.symbols_from(p).collect();
                if symbols != right.symbols_from(q).collect::<Set<&S>>() {
                    trace!("states {p} and {q} have different outgoing symbols");
                    return ControlFlow::Break(());
                }
                for symbol in left.symbols_from(p) {
                    let (Some(p_next), Some(q_next)) = (
                        left.successors(p, symbol).next(),
                        right.successors(q, symbol).next(),
                    ) else {
                        return ControlFlow::Break(());
                    };
                    match (
                        bijection.get_by_left(&p_next),
                        bijection.get_by_right(&q_next),
                    ) {
                        (None, None) => {
                            bijection.insert(p_next, q_next);
                            worklist.push((p_next, q_next));
                        }
                        (Some(&mapped), Some(_)) if mapped == q_next => {}
                        _ => {
                            trace!("successors of {p} and {q} on {symbol:?} are inconsistent");
                            return ControlFlow::Break(());
                        }
                    }
                }
                ControlFlow::Continue(())
            })
            .is_continue()
    }

    /// Returns `true` if every word accepted by `other` is also accepted by `self`, which is the
    /// case if intersecting both languages yields the language of `other`.
    ///
    /// # Example
    /// ```
    /// use minfa::prelude::*;
    ///
    /// let a_star = Automaton::builder()
    ///     .with_transitions([(0, 'a', 0)])
    ///     .with_initial([0])
    ///     .with_accepting([0])
    ///     .build();
    /// let aa = Automaton::from_word("aa".chars());
    /// assert!(a_star.contains(&aa));
    /// assert!(!aa.contains(&a_star));
    /// ```
    pub fn contains<P: Color>(&self, other: &Automaton<S, P>) -> bool {
        let (left, right) = (self.erase_colors(), other.erase_colors());
        Automaton::intersect([&left, &right]).is_ok_and(|both| both.is_equivalent(&right))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn ends_in_b() -> Automaton<char> {
        Automaton::builder()
            .with_transitions([(0, 'a', 0), (0, 'b', 0), (0, 'b', 1)])
            .with_initial([0])
            .with_accepting([1])
            .build()
    }

    #[test_log::test]
    fn equivalent_automata_of_different_shape() {
        // two deterministic copies of the same language with a redundant state
        let dfa = Automaton::builder()
            .with_transitions([
                (0, 'a', 0),
                (0, 'b', 1),
                (1, 'a', 2),
                (1, 'b', 1),
                (2, 'a', 0),
                (2, 'b', 1),
            ])
            .with_initial([0])
            .with_accepting([1])
            .build();
        let nfa = ends_in_b();
        assert!(nfa.is_equivalent(&dfa));
        assert!(dfa.is_equivalent(&nfa));
        assert!(nfa.is_equivalent(&nfa.determinize()));
    }

    #[test]
    fn inequivalent_automata() {
        let nfa = ends_in_b();
        let ends_in_a = Automaton::builder()
            .with_transitions([(0, 'a', 0), (0, 'b', 0), (0, 'a', 1)])
            .with_initial([0])
            .with_accepting([1])
            .build();
        assert!(!nfa.is_equivalent(&ends_in_a));
        assert!(!nfa.is_equivalent(&Automaton::literal('b')));
        assert!(!nfa.is_equivalent(&Automaton::<char>::new()));
    }

    #[test]
    fn empty_languages_are_equivalent() {
        let without_accepting = Automaton::builder()
            .with_transitions([(0, 'a', 1)])
            .with_initial([0])
            .build();
        assert!(without_accepting.is_equivalent(&Automaton::<char>::new()));
    }

    #[test_log::test]
    fn containment() {
        let nfa = ends_in_b();
        assert!(nfa.contains(&Automaton::from_word("aab".chars())));
        assert!(nfa.contains(&nfa));
        assert!(!nfa.contains(&Automaton::from_word("aba".chars())));
        assert!(!Automaton::literal('b').contains(&nfa));
        // everything contains the empty language
        assert!(Automaton::literal('b').contains(&Automaton::<char>::new()));
    }
}
