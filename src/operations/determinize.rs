use dashmap::DashMap;
use fxhash::FxBuildHasher;
use itertools::Itertools;
use rayon::prelude::*;
use tracing::debug;

use crate::{operations::Exploration, prelude::*};

impl<S: Symbol, Q: Color> Automaton<S, Q> {
    /// Performs the subset construction and returns a deterministic automaton that accepts the same
    /// language. Every state of the result is colored with the set of states of `self` that it
    /// represents, a state is accepting if its set contains an accepting state of `self`. Only
    /// non-empty sets are produced as successors, so the result is partial. The start state is the
    /// set of all initial states, it is always present even if that set is empty.
    ///
    /// Newly discovered sets are expanded concurrently on the rayon thread pool, but the states of
    /// the result are numbered in breadth first order from the start state (which has index 0),
    /// visiting symbols in the order in which they first appear. Hence determinizing the same
    /// automaton twice always produces the same result.
    ///
    /// # Example
    /// ```
    /// use minfa::prelude::*;
    ///
    /// let nfa = Automaton::builder()
    ///     .with_transitions([(0, 'a', 0), (0, 'a', 1), (0, 'b', 0), (1, 'b', 2)])
    ///     .with_initial([0])
    ///     .with_accepting([2])
    ///     .build();
    /// let dfa = nfa.determinize();
    /// assert!(dfa.is_deterministic());
    /// assert_eq!(dfa.size(), 3);
    /// assert_eq!(dfa.state_color(0), Some(&StateSet::from_iter([0])));
    /// assert!(dfa.accepts("bab".chars()));
    /// ```
    pub fn determinize(&self) -> Automaton<S, StateSet> {
        let start: StateSet = self.initial_states().collect();
        let edges: DashMap<StateSet, Vec<(S, StateSet)>, FxBuildHasher> =
            DashMap::with_hasher(FxBuildHasher::default());

        let discovered = ConcurrentWorklist::new().run([start.clone()], |set: &StateSet| {
            let symbols = set
                .iter()
                .flat_map(|&q| self.symbols_from(q))
                .unique()
                .cloned()
                .collect_vec();
            let outgoing: Vec<(S, StateSet)> = symbols
                .into_par_iter()
                .map(|symbol| {
                    let successors = self.successor_set(set.iter().copied(), &symbol);
                    (symbol, successors)
                })
                .filter(|(_, successors)| !successors.is_empty())
                .collect();
            let next = outgoing.iter().map(|(_, target)| target.clone()).collect();
            edges.insert(set.clone(), outgoing);
            next
        });

        let exploration = Exploration::new(start, |set| {
            edges
                .get(set)
                .map(|outgoing| outgoing.value().clone())
                .unwrap_or_default()
        });
        debug_assert_eq!(exploration.states().len(), discovered.len());
        debug!(
            "subset construction produced {} states from {}",
            discovered.len(),
            self.size()
        );

        exploration.into_automaton(
            |set| set.clone(),
            |set| set.iter().any(|&q| self.is_accepting(q)),
        )
    }
}
