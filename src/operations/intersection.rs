use tracing::debug;

use crate::{operations::Exploration, prelude::*};

impl<S: Symbol, Q: Color> Automaton<S, Q> {
    /// Builds an automaton that accepts precisely the words accepted by all of the given automata.
    ///
    /// Every automaton is first turned into its minimal deterministic automaton, then the product of
    /// these is explored starting from the tuple of their initial states. A tuple has a transition
    /// on a symbol if every component has one, and it is accepting if every component is accepting.
    /// The product is trimmed and its states are colored with fresh ids. If one of the languages is
    /// empty, so is the result.
    ///
    /// Returns [`AutomatonError::NoAutomata`] if no automaton is given.
    ///
    /// # Example
    /// ```
    /// use minfa::prelude::*;
    ///
    /// // words over {a, b} that contain an a, and words over {a, b} that end in b
    /// let some_a = Automaton::builder()
    ///     .with_transitions([(0, 'a', 1), (0, 'b', 0), (1, 'a', 1), (1, 'b', 1)])
    ///     .with_initial([0])
    ///     .with_accepting([1])
    ///     .build();
    /// let ends_in_b = Automaton::builder()
    ///     .with_transitions([(0, 'a', 0), (0, 'b', 0), (0, 'b', 1)])
    ///     .with_initial([0])
    ///     .with_accepting([1])
    ///     .build();
    ///
    /// let both = Automaton::intersect([&some_a, &ends_in_b]).unwrap();
    /// assert!(both.accepts("ab".chars()));
    /// assert!(!both.accepts("bb".chars()));
    /// assert!(!both.accepts("ba".chars()));
    /// ```
    pub fn intersect<'a, I>(automata: I) -> Result<Automaton<S, usize>, AutomatonError>
    where
        I: IntoIterator<Item = &'a Self>,
        S: 'a,
        Q: 'a,
    {
        let dfas: Vec<Automaton<S, usize>> =
            automata.into_iter().map(|a| a.minimized_dfa()).collect();
        let Some((first, rest)) = dfas.split_first() else {
            return Err(AutomatonError::NoAutomata);
        };

        // a minimal automaton without initial state accepts nothing
        let Some(start) = dfas
            .iter()
            .map(|dfa| dfa.initial_states().next())
            .collect::<Option<Vec<StateIndex>>>()
        else {
            return Ok(Automaton::new());
        };

        let product = Exploration::new(start, |tuple: &Vec<StateIndex>| {
            first
                .symbols_from(tuple[0])
                .filter_map(|symbol| {
                    let successors = std::iter::once(first)
                        .chain(rest)
                        .zip(tuple)
                        .map(|(dfa, &q)| dfa.successors(q, symbol).next())
                        .collect::<Option<Vec<_>>>()?;
                    Some((symbol.clone(), successors))
                })
                .collect::<Vec<_>>()
        })
        .into_automaton(
            |_| Void,
            |tuple| {
                dfas.iter()
                    .zip(tuple)
                    .all(|(dfa, &q)| dfa.is_accepting(q))
            },
        );

        let trimmed = product.trim();
        debug!(
            "intersection of {} automata has {} states, {} after trimming",
            dfas.len(),
            product.size(),
            trimmed.size()
        );
        Ok(trimmed.number_states())
    }
}
