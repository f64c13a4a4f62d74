use crate::prelude::*;

impl<S: Symbol, Q: Clone> Automaton<S, Q> {
    /// Builds an automaton that accepts every word that is accepted by one of the given automata.
    /// The states of all automata are placed side by side, so the states of the second automaton
    /// are shifted by the size of the first one and so on. States of different automata are never
    /// merged, even if they carry the same color.
    ///
    /// # Example
    /// ```
    /// use minfa::prelude::*;
    ///
    /// let a = Automaton::literal('a');
    /// let bc = Automaton::from_word("bc".chars());
    /// let union = Automaton::union([&a, &bc]);
    /// assert_eq!(union.size(), a.size() + bc.size());
    /// assert!(union.accepts("a".chars()));
    /// assert!(union.accepts("bc".chars()));
    /// assert!(!union.accepts("abc".chars()));
    /// ```
    pub fn union<'a, I>(automata: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
        S: 'a,
        Q: 'a,
    {
        let mut union = Self::new();
        for automaton in automata {
            let offset = union.size();
            union.extend_states(automaton.state_colors().cloned());
            for (from, symbol, to) in automaton.transitions() {
                union
                    .add_transition(from + offset, symbol.clone(), to + offset)
                    .expect("states are shifted into the allocated range");
            }
            for q in automaton.initial_states() {
                union
                    .add_initial(q + offset)
                    .expect("states are shifted into the allocated range");
            }
            for q in automaton.accepting_states() {
                union
                    .add_accepting(q + offset)
                    .expect("states are shifted into the allocated range");
            }
        }
        union
    }
}
