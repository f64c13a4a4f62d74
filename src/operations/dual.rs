use crate::prelude::*;

impl<S: Symbol, Q: Clone> Automaton<S, Q> {
    /// Builds the dual automaton, in which the roles of initial and accepting states are swapped and
    /// every transition is reversed. The states and their colors remain the same. The dual accepts
    /// precisely the reversals of the words that `self` accepts.
    ///
    /// # Example
    /// ```
    /// use minfa::prelude::*;
    ///
    /// let nfa = Automaton::from_word("abc".chars());
    /// let dual = nfa.dual();
    /// assert!(dual.accepts("cba".chars()));
    /// assert!(!dual.accepts("abc".chars()));
    /// ```
    pub fn dual(&self) -> Self {
        let mut dual = Self::with_capacity(self.size());
        dual.extend_states(self.state_colors().cloned());
        for (from, symbol, to) in self.transitions() {
            dual.add_transition(to, symbol.clone(), from)
                .expect("the dual has the same states");
        }
        dual.set_initial_states(self.accepting_states())
            .expect("the dual has the same states");
        dual.set_accepting_states(self.initial_states())
            .expect("the dual has the same states");
        dual
    }
}
