use std::collections::BTreeSet;

use tracing::trace;

use crate::{math::Map, prelude::*};

impl<S: Symbol, Q: Color> Automaton<S, Q> {
    /// Returns the states that can be reached from some initial state.
    pub fn reachable_states(&self) -> BTreeSet<StateIndex> {
        Worklist::from_seeds(self.initial_states())
            .run(|q, worklist| worklist.push_all(self.successor_states(q)))
            .into_iter()
            .collect()
    }

    /// Returns the states from which some accepting state can be reached.
    pub fn coreachable_states(&self) -> BTreeSet<StateIndex> {
        let mut predecessors: Map<StateIndex, Vec<StateIndex>> = Map::default();
        for (from, _, to) in self.transitions() {
            predecessors.entry(to).or_default().push(from);
        }
        Worklist::from_seeds(self.accepting_states())
            .run(|q, worklist| {
                if let Some(sources) = predecessors.get(&q) {
                    worklist.push_all(sources.iter().copied());
                }
            })
            .into_iter()
            .collect()
    }

    /// Removes all states that are not reachable from an initial state or from which no accepting
    /// state can be reached. The remaining states are re-indexed but keep their relative order.
    pub fn trim(&self) -> Self {
        let reachable = self.reachable_states();
        let useful: BTreeSet<_> = self
            .coreachable_states()
            .intersection(&reachable)
            .copied()
            .collect();
        trace!("trimming keeps {} of {} states", useful.len(), self.size());
        self.restrict_to(&useful)
    }

    /// Returns `true` if every state is reachable and can reach an accepting state.
    pub fn is_trim(&self) -> bool {
        let reachable = self.reachable_states();
        reachable.len() == self.size() && self.coreachable_states().len() == self.size()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::prelude::*;

    #[test]
    fn trimming() {
        // 3 is unreachable, 4 is a sink from which nothing is accepted
        let nfa = Automaton::builder()
            .with_transitions([
                (0, 'a', 1),
                (1, 'b', 2),
                (3, 'a', 2),
                (1, 'a', 4),
                (4, 'a', 4),
            ])
            .with_initial([0])
            .with_accepting([2])
            .build();
        assert_eq!(nfa.reachable_states(), BTreeSet::from([0, 1, 2, 4]));
        assert_eq!(nfa.coreachable_states(), BTreeSet::from([0, 1, 2, 3]));
        assert!(!nfa.is_trim());

        let trimmed = nfa.trim();
        assert_eq!(trimmed.size(), 3);
        assert!(trimmed.is_trim());
        assert_eq!(trimmed.transition_count(), 2);
        assert!(trimmed.accepts("ab".chars()));
    }

    #[test]
    fn trimming_empty_language() {
        let nfa = Automaton::builder()
            .with_transitions([(0, 'a', 1)])
            .with_initial([0])
            .build();
        assert!(nfa.trim().is_empty());
    }
}
