use crate::{math::Set, prelude::*};

/// Iterator over the simple routes between two states of an [`Automaton`]. A route is the sequence
/// of states that is visited, it starts with the origin and ends with the target, and no state
/// occurs twice except for the origin reappearing at the end of a cycle.
///
/// The routes are enumerated lazily by a depth-first search that keeps track of the states on the
/// current path, which bounds the length of a route by the number of states. Cloning the iterator
/// or calling [`Automaton::routes`] again restarts the enumeration, separate iterators never
/// interfere with each other.
pub struct Routes<'a, S, Q> {
    automaton: &'a Automaton<S, Q>,
    target: StateIndex,
    floor: StateIndex,
    path: Vec<StateIndex>,
    on_path: Set<StateIndex>,
    pending: Vec<std::vec::IntoIter<StateIndex>>,
}

impl<S, Q> Clone for Routes<'_, S, Q> {
    fn clone(&self) -> Self {
        Self {
            automaton: self.automaton,
            target: self.target,
            floor: self.floor,
            path: self.path.clone(),
            on_path: self.on_path.clone(),
            pending: self.pending.clone(),
        }
    }
}

impl<'a, S: Symbol, Q> Routes<'a, S, Q> {
    fn new(
        automaton: &'a Automaton<S, Q>,
        origin: StateIndex,
        target: StateIndex,
        floor: StateIndex,
    ) -> Self {
        let (path, pending) = if automaton.contains_state(origin) {
            (
                vec![origin],
                vec![automaton.successor_states(origin).into_iter()],
            )
        } else {
            (vec![], vec![])
        };
        Self {
            automaton,
            target,
            floor,
            on_path: path.iter().copied().collect(),
            path,
            pending,
        }
    }
}

impl<S: Symbol, Q> Iterator for Routes<'_, S, Q> {
    type Item = Vec<StateIndex>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(next) = self.pending.last_mut()?.next() else {
                self.pending.pop();
                if let Some(q) = self.path.pop() {
                    self.on_path.remove(&q);
                }
                continue;
            };

            if next == self.target {
                let mut route = self.path.clone();
                route.push(next);
                return Some(route);
            }
            if next < self.floor || self.on_path.contains(&next) {
                continue;
            }
            self.path.push(next);
            self.on_path.insert(next);
            self.pending
                .push(self.automaton.successor_states(next).into_iter());
        }
    }
}

impl<S: Symbol, Q> Automaton<S, Q> {
    /// Enumerates all simple routes from `origin` to `target`. If both are the same state, the
    /// enumerated routes are the cycles through that state.
    ///
    /// # Example
    /// ```
    /// use minfa::prelude::*;
    ///
    /// let nfa = Automaton::builder()
    ///     .with_transitions([(0, 'a', 1), (1, 'a', 2), (0, 'b', 2), (2, 'a', 0)])
    ///     .build();
    /// let routes = nfa.routes(0, 2).collect::<Vec<_>>();
    /// assert_eq!(routes, vec![vec![0, 1, 2], vec![0, 2]]);
    /// ```
    pub fn routes(&self, origin: StateIndex, target: StateIndex) -> Routes<'_, S, Q> {
        Routes::new(self, origin, target, 0)
    }

    /// Enumerates every simple cycle of the automaton exactly once. Each cycle is reported starting
    /// (and ending) at its smallest state.
    pub fn cycles(&self) -> impl Iterator<Item = Vec<StateIndex>> + Clone + '_ {
        self.state_indices()
            .flat_map(move |q| Routes::new(self, q, q, q))
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn cyclic() -> Automaton<char> {
        Automaton::builder()
            .with_transitions([
                (0, 'a', 1),
                (1, 'a', 0),
                (1, 'b', 2),
                (2, 'a', 2),
                (2, 'b', 0),
            ])
            .with_initial([0])
            .with_accepting([2])
            .build()
    }

    #[test]
    fn routes_terminate_on_cycles() {
        let nfa = cyclic();
        assert_eq!(nfa.routes(0, 2).collect::<Vec<_>>(), vec![vec![0, 1, 2]]);
        assert_eq!(nfa.routes(2, 1).collect::<Vec<_>>(), vec![vec![2, 0, 1]]);
        assert_eq!(nfa.routes(0, 9).count(), 0);
        assert_eq!(nfa.routes(9, 0).count(), 0);
    }

    #[test]
    fn cycles_are_enumerated_once() {
        let nfa = cyclic();
        let cycles = nfa.cycles().collect::<Vec<_>>();
        assert_eq!(cycles, vec![vec![0, 1, 0], vec![0, 1, 2, 0], vec![2, 2]]);

        // the enumeration can be restarted and yields the same result
        let again = nfa.cycles();
        assert_eq!(again.clone().count(), 3);
        assert_eq!(again.collect::<Vec<_>>(), cycles);
    }
}
