use crate::{Automaton, StateIndex, Symbol, Void};

/// Helper struct for the construction of uncolored automata. It stores a list of transitions
/// together with the initial and accepting states. When [built](AutomatonBuilder::build), the
/// automaton has exactly as many states as necessary to contain every mentioned index.
///
/// # Example
///
/// We want to create an automaton with two states 0 and 1 over the symbols `'a'` and `'b'`, that
/// accepts all words ending in `'b'`:
/// ```
/// use minfa::prelude::*;
///
/// let nfa = Automaton::builder()
///     .with_transitions([(0, 'a', 0), (0, 'b', 0), (0, 'b', 1)])
///     .with_initial([0])
///     .with_accepting([1])
///     .build();
/// assert_eq!(nfa.size(), 2);
/// assert!(nfa.accepts("aab".chars()));
/// assert!(!nfa.accepts("aba".chars()));
/// ```
#[derive(Debug, Clone)]
pub struct AutomatonBuilder<S> {
    transitions: Vec<(StateIndex, S, StateIndex)>,
    initial: Vec<StateIndex>,
    accepting: Vec<StateIndex>,
    states: usize,
}

impl<S> Default for AutomatonBuilder<S> {
    fn default() -> Self {
        Self {
            transitions: vec![],
            initial: vec![],
            accepting: vec![],
            states: 0,
        }
    }
}

impl<S: Symbol> AutomatonBuilder<S> {
    /// Adds the given transitions, which are triples `(from, symbol, to)`.
    pub fn with_transitions<I>(mut self, transitions: I) -> Self
    where
        I: IntoIterator<Item = (StateIndex, S, StateIndex)>,
    {
        self.transitions.extend(transitions);
        self
    }

    /// Marks the given states as initial.
    pub fn with_initial<I: IntoIterator<Item = StateIndex>>(mut self, states: I) -> Self {
        self.initial.extend(states);
        self
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I: IntoIterator<Item = StateIndex>>(mut self, states: I) -> Self {
        self.accepting.extend(states);
        self
    }

    /// Ensures that the built automaton has at least `count` states, which is useful for states
    /// that are not mentioned anywhere else.
    pub fn with_states(mut self, count: usize) -> Self {
        self.states = self.states.max(count);
        self
    }

    /// Builds the automaton.
    pub fn build(self) -> Automaton<S, Void> {
        let size = self
            .transitions
            .iter()
            .flat_map(|(from, _, to)| [*from, *to])
            .chain(self.initial.iter().copied())
            .chain(self.accepting.iter().copied())
            .map(|q| q + 1)
            .max()
            .unwrap_or(0)
            .max(self.states);

        let mut automaton = Automaton::with_capacity(size);
        automaton.extend_states(std::iter::repeat(Void).take(size));
        for (from, on, to) in self.transitions {
            automaton
                .add_transition(from, on, to)
                .expect("every state is allocated before transitions are added");
        }
        automaton
            .set_initial_states(self.initial)
            .expect("every state is allocated before it is marked initial");
        automaton
            .set_accepting_states(self.accepting)
            .expect("every state is allocated before it is marked accepting");
        automaton
    }
}
