use std::{borrow::Borrow, collections::BTreeSet, fmt::Debug, ops::Range};

use itertools::Itertools;

use crate::{
    math::{Map, OrderedMap},
    AutomatonError, Symbol, Void,
};

mod state_set;
pub use state_set::StateSet;

mod builder;
pub use builder::AutomatonBuilder;

mod reachable;

mod routes;
pub use routes::Routes;

mod dot;
pub use dot::Dottable;

/// States of an [`Automaton`] are identified by their position in the arena of the automaton.
pub type StateIndex = usize;

/// A nondeterministic finite automaton over symbols of type `S`, where every state carries a color
/// of type `Q`.
///
/// The states live in an arena, a state is created through [`Automaton::add_state`] and is from then
/// on referred to by its [`StateIndex`]. Every state has an insertion ordered map from symbols to the
/// set of its successors, so iterating over the transitions of an automaton is reproducible.
/// Reading the successors for a symbol that has no transition yields nothing and does not modify
/// the automaton.
///
/// # Example
/// ```
/// use minfa::prelude::*;
///
/// let mut nfa: Automaton<char> = Automaton::new();
/// let q0 = nfa.add_state(Void);
/// let q1 = nfa.add_state(Void);
/// nfa.add_transition(q0, 'a', q0).unwrap();
/// nfa.add_transition(q0, 'a', q1).unwrap();
/// nfa.add_initial(q0).unwrap();
/// nfa.add_accepting(q1).unwrap();
///
/// assert!(nfa.accepts("aaa".chars()));
/// assert!(!nfa.accepts("".chars()));
/// assert!(!nfa.is_deterministic());
/// ```
#[derive(Clone)]
pub struct Automaton<S, Q = Void> {
    colors: Vec<Q>,
    initial: BTreeSet<StateIndex>,
    accepting: BTreeSet<StateIndex>,
    edges: Vec<OrderedMap<S, BTreeSet<StateIndex>>>,
}

impl<S, Q> Default for Automaton<S, Q> {
    fn default() -> Self {
        Self {
            colors: vec![],
            initial: BTreeSet::new(),
            accepting: BTreeSet::new(),
            edges: vec![],
        }
    }
}

impl<S: Symbol> Automaton<S, Void> {
    /// Returns a builder, which is the most convenient way of constructing an uncolored automaton
    /// from a list of transitions.
    pub fn builder() -> AutomatonBuilder<S> {
        AutomatonBuilder::default()
    }

    /// Creates an automaton which accepts precisely the word consisting of the single `symbol`.
    pub fn literal(symbol: S) -> Self {
        Self::from_word([symbol])
    }

    /// Creates an automaton which accepts precisely the given `word`. For the empty word, this is a
    /// single state that is both initial and accepting.
    pub fn from_word<W: IntoIterator<Item = S>>(word: W) -> Self {
        let mut automaton = Self::new();
        let mut current = automaton.add_state(Void);
        automaton.initial.insert(current);
        for symbol in word {
            let next = automaton.add_state(Void);
            automaton.edges[current]
                .entry(symbol)
                .or_default()
                .insert(next);
            current = next;
        }
        automaton.accepting.insert(current);
        automaton
    }
}

impl<S: Symbol, Q> Automaton<S, Q> {
    /// Creates an automaton without any states.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an automaton without any states that has space for `capacity` states.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            colors: Vec::with_capacity(capacity),
            initial: BTreeSet::new(),
            accepting: BTreeSet::new(),
            edges: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new state with the given `color` and returns its index.
    pub fn add_state(&mut self, color: Q) -> StateIndex {
        let id = self.colors.len();
        self.colors.push(color);
        self.edges.push(OrderedMap::default());
        id
    }

    /// Adds one state for each of the given colors, returns the range of the created indices.
    pub fn extend_states<I: IntoIterator<Item = Q>>(&mut self, colors: I) -> Range<StateIndex> {
        let start = self.colors.len();
        for color in colors {
            self.add_state(color);
        }
        start..self.colors.len()
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if the automaton does not have any state.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Iterates over the indices of all states.
    pub fn state_indices(&self) -> Range<StateIndex> {
        0..self.colors.len()
    }

    /// Returns `true` if `state` refers to a state of `self`.
    pub fn contains_state(&self, state: StateIndex) -> bool {
        state < self.colors.len()
    }

    /// Returns the color of the given `state`, or `None` if the state does not exist.
    pub fn state_color(&self, state: StateIndex) -> Option<&Q> {
        self.colors.get(state)
    }

    /// Iterates over the colors of all states, in the order of their indices.
    pub fn state_colors(&self) -> impl Iterator<Item = &Q> + '_ {
        self.colors.iter()
    }

    fn known(&self, state: StateIndex) -> Result<StateIndex, AutomatonError> {
        if self.contains_state(state) {
            Ok(state)
        } else {
            Err(AutomatonError::UnknownState(state))
        }
    }

    /// Marks `state` as initial. Returns whether it was not initial before.
    pub fn add_initial(&mut self, state: StateIndex) -> Result<bool, AutomatonError> {
        let state = self.known(state)?;
        Ok(self.initial.insert(state))
    }

    /// Replaces the set of initial states. If any of the given states does not exist, an error is
    /// returned and the initial states remain unchanged.
    pub fn set_initial_states<I>(&mut self, states: I) -> Result<(), AutomatonError>
    where
        I: IntoIterator<Item = StateIndex>,
    {
        self.initial = states
            .into_iter()
            .map(|q| self.known(q))
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    /// Marks `state` as accepting. Returns whether it was not accepting before.
    pub fn add_accepting(&mut self, state: StateIndex) -> Result<bool, AutomatonError> {
        let state = self.known(state)?;
        Ok(self.accepting.insert(state))
    }

    /// Replaces the set of accepting states. If any of the given states does not exist, an error
    /// is returned and the accepting states remain unchanged.
    pub fn set_accepting_states<I>(&mut self, states: I) -> Result<(), AutomatonError>
    where
        I: IntoIterator<Item = StateIndex>,
    {
        self.accepting = states
            .into_iter()
            .map(|q| self.known(q))
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    /// Iterates over the initial states in ascending order.
    pub fn initial_states(&self) -> impl Iterator<Item = StateIndex> + Clone + '_ {
        self.initial.iter().copied()
    }

    /// Iterates over the accepting states in ascending order.
    pub fn accepting_states(&self) -> impl Iterator<Item = StateIndex> + Clone + '_ {
        self.accepting.iter().copied()
    }

    /// Returns `true` if `state` is initial.
    pub fn is_initial(&self, state: StateIndex) -> bool {
        self.initial.contains(&state)
    }

    /// Returns `true` if `state` is accepting.
    pub fn is_accepting(&self, state: StateIndex) -> bool {
        self.accepting.contains(&state)
    }

    /// Inserts a transition from `from` to `to` on the symbol `on`. Returns whether the transition
    /// is new, or an error if one of the states does not exist.
    pub fn add_transition(
        &mut self,
        from: StateIndex,
        on: S,
        to: StateIndex,
    ) -> Result<bool, AutomatonError> {
        let from = self.known(from)?;
        let to = self.known(to)?;
        Ok(self.edges[from].entry(on).or_default().insert(to))
    }

    /// Iterates over all transitions as triples `(from, symbol, to)`, ordered by source state.
    pub fn transitions(&self) -> impl Iterator<Item = (StateIndex, &S, StateIndex)> + '_ {
        self.edges.iter().enumerate().flat_map(|(source, map)| {
            map.iter()
                .flat_map(move |(sym, targets)| targets.iter().map(move |&t| (source, sym, t)))
        })
    }

    /// The total number of transitions.
    pub fn transition_count(&self) -> usize {
        self.edges
            .iter()
            .flat_map(|map| map.values())
            .map(|targets| targets.len())
            .sum()
    }

    /// Iterates over the symbols on which `state` has a transition together with the respective set
    /// of successors.
    pub fn transitions_from(
        &self,
        state: StateIndex,
    ) -> impl Iterator<Item = (&S, &BTreeSet<StateIndex>)> + '_ {
        self.edges.get(state).into_iter().flat_map(|map| map.iter())
    }

    /// Iterates over the symbols on which `state` has a transition.
    pub fn symbols_from(&self, state: StateIndex) -> impl Iterator<Item = &S> + '_ {
        self.edges.get(state).into_iter().flat_map(|map| map.keys())
    }

    /// Iterates over the successors of `state` on the symbol `on`.
    pub fn successors(&self, state: StateIndex, on: &S) -> impl Iterator<Item = StateIndex> + '_ {
        self.edges
            .get(state)
            .and_then(|map| map.get(on))
            .into_iter()
            .flatten()
            .copied()
    }

    /// Collects the successors of all given `states` on the symbol `on`.
    pub fn successor_set<I>(&self, states: I, on: &S) -> StateSet
    where
        I: IntoIterator<Item = StateIndex>,
    {
        states
            .into_iter()
            .flat_map(|q| self.successors(q, on))
            .collect()
    }

    /// Returns the states that can be reached from `state` with a single transition, regardless of
    /// the symbol. Every state appears once, in the order in which it is first encountered.
    pub fn successor_states(&self, state: StateIndex) -> Vec<StateIndex> {
        self.transitions_from(state)
            .flat_map(|(_, targets)| targets.iter().copied())
            .unique()
            .collect()
    }

    /// Returns the distinct symbols that appear on some transition, in the order of their first
    /// appearance.
    pub fn alphabet(&self) -> Vec<S> {
        self.edges
            .iter()
            .flat_map(|map| map.keys())
            .unique()
            .cloned()
            .collect()
    }

    /// Extends the transition function to words: returns the set of states that can be reached from
    /// any of the given `states` by reading `word`.
    pub fn reached_states_from<I, W>(&self, states: I, word: W) -> StateSet
    where
        I: IntoIterator<Item = StateIndex>,
        W: IntoIterator,
        W::Item: Borrow<S>,
    {
        word.into_iter()
            .fold(states.into_iter().collect(), |current: StateSet, symbol| {
                self.successor_set(current.iter().copied(), symbol.borrow())
            })
    }

    /// Returns `true` if `word` leads from some initial state to some accepting state.
    pub fn accepts<W>(&self, word: W) -> bool
    where
        W: IntoIterator,
        W::Item: Borrow<S>,
    {
        self.reached_states_from(self.initial_states(), word)
            .iter()
            .any(|&q| self.is_accepting(q))
    }

    /// Returns `true` if there is at most one initial state and every state has at most one
    /// successor for each symbol.
    pub fn is_deterministic(&self) -> bool {
        self.initial.len() <= 1
            && self
                .edges
                .iter()
                .flat_map(|map| map.values())
                .all(|targets| targets.len() <= 1)
    }

    /// Produces a new automaton with the same structure, where each state is colored with the
    /// result of applying `f` to its index and its old color.
    pub fn map_colors<R, F>(&self, mut f: F) -> Automaton<S, R>
    where
        F: FnMut(StateIndex, &Q) -> R,
    {
        Automaton {
            colors: self
                .colors
                .iter()
                .enumerate()
                .map(|(q, color)| f(q, color))
                .collect(),
            initial: self.initial.clone(),
            accepting: self.accepting.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Forgets the colors of all states.
    pub fn erase_colors(&self) -> Automaton<S, Void> {
        self.map_colors(|_, _| Void)
    }

    /// Colors every state with a fresh integer id, which is simply its index.
    pub fn number_states(&self) -> Automaton<S, usize> {
        self.map_colors(|q, _| q)
    }

    /// Builds the sub-automaton that consists only of the states in `keep`. States are re-indexed
    /// in ascending order of their old index, transitions leading outside of `keep` are dropped.
    pub fn restrict_to(&self, keep: &BTreeSet<StateIndex>) -> Self
    where
        Q: Clone,
    {
        let index: Map<StateIndex, StateIndex> = keep
            .iter()
            .filter(|q| self.contains_state(**q))
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();

        let mut out = Self::with_capacity(index.len());
        for &old in keep.iter().filter(|q| index.contains_key(q)) {
            out.add_state(self.colors[old].clone());
        }
        out.initial = self
            .initial
            .iter()
            .filter_map(|q| index.get(q).copied())
            .collect();
        out.accepting = self
            .accepting
            .iter()
            .filter_map(|q| index.get(q).copied())
            .collect();
        for (old, sym, target) in self.transitions() {
            if let (Some(&from), Some(&to)) = (index.get(&old), index.get(&target)) {
                out.edges[from].entry(sym.clone()).or_default().insert(to);
            }
        }
        out
    }

    /// Returns a string representation of the transition table of the automaton. Initial states
    /// are marked with `->`, accepting states with `*`.
    pub fn build_transition_table(&self) -> String
    where
        Q: Debug,
    {
        let alphabet = self.alphabet();
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(alphabet.iter().map(|s| format!("{:?}", s))),
        );
        for q in self.state_indices() {
            let marker = match (self.is_initial(q), self.is_accepting(q)) {
                (true, true) => "->*",
                (true, false) => "->",
                (false, true) => "*",
                (false, false) => "",
            };
            let mut row = vec![format!("{marker}{q}[{:?}]", self.colors[q])];
            for sym in &alphabet {
                let targets = self.successors(q, sym).collect_vec();
                if targets.is_empty() {
                    row.push("-".to_string());
                } else {
                    row.push(targets.iter().join(", "));
                }
            }
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl<S: Symbol, Q: Debug> Debug for Automaton<S, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.build_transition_table())
    }
}
