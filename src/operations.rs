use std::hash::Hash;

use crate::{math::Map, prelude::*};

mod determinize;

mod dual;

mod union;

mod intersection;

mod equivalence;

/// The outcome of exploring the states of some automaton construction in breadth first order,
/// starting from a single state. Explored states are numbered in the order in which they are first
/// discovered, so the start state always receives index 0 and two explorations along the same
/// successor lists produce the same numbering.
#[derive(Debug, Clone)]
pub(crate) struct Exploration<T, S> {
    states: Vec<T>,
    transitions: Vec<(StateIndex, S, StateIndex)>,
}

impl<T: Clone + Eq + Hash, S: Symbol> Exploration<T, S> {
    /// Explores everything that is reachable from `start`, `successors` returns the outgoing
    /// transitions of a state in the order in which they should be numbered.
    pub(crate) fn new<F, I>(start: T, mut successors: F) -> Self
    where
        F: FnMut(&T) -> I,
        I: IntoIterator<Item = (S, T)>,
    {
        let mut index: Map<T, StateIndex> = Map::default();
        index.insert(start.clone(), 0);
        let mut states = vec![];
        let mut transitions = vec![];

        Worklist::from_seeds([start]).run(|state, worklist| {
            let source = states.len();
            for (symbol, target) in successors(&state) {
                let position = match index.get(&target) {
                    Some(&position) => position,
                    None => {
                        let position = index.len();
                        index.insert(target.clone(), position);
                        worklist.push(target);
                        position
                    }
                };
                transitions.push((source, symbol, position));
            }
            states.push(state);
        });

        Self {
            states,
            transitions,
        }
    }

    /// The explored states, indexed by the number they received.
    pub(crate) fn states(&self) -> &[T] {
        &self.states
    }

    /// Turns the exploration into an automaton whose only initial state is the start state. Each
    /// state is colored through `color` and is accepting if `accepting` holds for it.
    pub(crate) fn into_automaton<Q, C, A>(self, mut color: C, accepting: A) -> Automaton<S, Q>
    where
        C: FnMut(&T) -> Q,
        A: Fn(&T) -> bool,
    {
        let mut automaton = Automaton::with_capacity(self.states.len());
        let accepting_states = self
            .states
            .iter()
            .enumerate()
            .filter(|(_, state)| accepting(state))
            .map(|(q, _)| q)
            .collect::<Vec<_>>();
        automaton.extend_states(self.states.iter().map(&mut color));

        for (from, symbol, to) in self.transitions {
            automaton
                .add_transition(from, symbol, to)
                .expect("explored transitions only refer to explored states");
        }
        automaton
            .add_initial(0)
            .expect("the start state is always explored");
        automaton
            .set_accepting_states(accepting_states)
            .expect("accepting states are explored states");
        automaton
    }
}
