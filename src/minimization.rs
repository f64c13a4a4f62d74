use tracing::debug;

use crate::prelude::*;

mod state_map;
pub use state_map::StateMap;

mod reduction;
pub use reduction::{ElementaryMatrix, ReducedMatrix, Reduction};

mod grid;
pub use grid::{bounded_prime_grids, prime_grids, Grid};

mod cover;
pub use cover::{Cover, CoverSearch};

mod legitimacy;
pub use legitimacy::Candidate;

/// Settings that influence the minimization of an automaton.
///
/// # Example
/// ```
/// use minfa::prelude::*;
///
/// let config = MinimizationConfig::default()
///     .with_grid_budget(1_000)
///     .with_cover_budget(10_000);
/// let nfa = Automaton::from_word("abc".chars());
/// assert_eq!(nfa.minimized_with(&config).size(), 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinimizationConfig {
    /// The maximal number of prime grids. If the reduced matrix has more, no cover is searched and
    /// the minimization settles for the smaller of the minimal deterministic automaton and the
    /// trimmed input. No limit is imposed if this is `None`.
    pub grid_budget: Option<usize>,
    /// The maximal number of steps of the cover search, each of which places one grid into a
    /// partial cover. Exhausting the budget leads to the same result as exhausting the grid budget.
    /// No limit is imposed if this is `None`.
    pub cover_budget: Option<usize>,
}

impl MinimizationConfig {
    /// Limits the number of prime grids to `budget`.
    pub fn with_grid_budget(mut self, budget: usize) -> Self {
        self.grid_budget = Some(budget);
        self
    }

    /// Limits the number of steps of the cover search to `budget`.
    pub fn with_cover_budget(mut self, budget: usize) -> Self {
        self.cover_budget = Some(budget);
        self
    }
}

/// Computes a nondeterministic automaton with a minimal number of states for the language of a
/// given automaton, following the algorithm of Kameda and Weiner.
///
/// The automaton is trimmed, then its state map is computed and reduced. The rows of the reduced
/// matrix are the states of the minimal deterministic automaton. Covers of the reduced matrix by
/// prime grids are enumerated by increasing size, and for each the intersection rule yields a
/// candidate automaton with one state per grid. The first candidate that accepts the right language
/// is the result. If no cover with fewer grids than the minimal deterministic automaton (or the
/// trimmed input) has states passes, the smaller of the two is returned instead. All states of the
/// result are colored with their index.
///
/// The number of prime grids and covers can be exponential in the size of the matrix, both can be
/// limited through a [`MinimizationConfig`].
#[derive(Clone)]
pub struct Minimizer<'a, S, Q> {
    automaton: &'a Automaton<S, Q>,
    config: MinimizationConfig,
}

impl<'a, S: Symbol, Q: Color> Minimizer<'a, S, Q> {
    /// Prepares the minimization of `automaton` with the given `config`.
    pub fn new(automaton: &'a Automaton<S, Q>, config: MinimizationConfig) -> Self {
        Self { automaton, config }
    }

    /// Computes the minimal deterministic automaton. It is empty if the language is empty.
    pub fn minimal_dfa(&self) -> Automaton<S, usize> {
        let trimmed = self.automaton.trim();
        if trimmed.is_empty() {
            return Automaton::new();
        }
        Reduction::new(&StateMap::new(&trimmed)).into_dfa()
    }

    /// Computes a minimal nondeterministic automaton. It is empty if the language is empty.
    pub fn run(&self) -> Automaton<S, usize> {
        let trimmed = self.automaton.trim();
        if trimmed.is_empty() {
            debug!("the language is empty");
            return Automaton::new();
        }

        let state_map = StateMap::new(&trimmed);
        debug!(
            "state map has {} rows and {} columns",
            state_map.rows(),
            state_map.columns()
        );
        let reduction = Reduction::new(&state_map);
        let rows = reduction.matrix().rows();
        let bound = rows.min(trimmed.size());

        let found = if bound > 1 {
            self.search(&reduction, bound)
        } else {
            None
        };

        match found {
            Some(minimal) => {
                debug!(
                    "minimized {} states to {}",
                    self.automaton.size(),
                    minimal.size()
                );
                minimal
            }
            None if rows <= trimmed.size() => {
                debug!("falling back to the minimal deterministic automaton with {rows} states");
                reduction.into_dfa()
            }
            None => {
                debug!(
                    "falling back to the trimmed automaton with {} states",
                    trimmed.size()
                );
                trimmed.number_states()
            }
        }
    }
}

impl<S: Symbol, Q: Color> Minimizer<'_, S, Q> {
    fn search(&self, reduction: &Reduction<S>, bound: usize) -> Option<Automaton<S, usize>> {
        let grids = bounded_prime_grids(reduction.matrix(), self.config.grid_budget)?;
        debug!(
            "searching covers of size below {bound} among {} prime grids",
            grids.len()
        );
        CoverSearch::new(reduction.matrix(), &grids)
            .with_budget(self.config.cover_budget)
            .find(bound, |cover| {
                Candidate::new(cover, reduction).into_legitimate()
            })
    }
}

impl<S: Symbol, Q: Color> Automaton<S, Q> {
    /// Computes an automaton with a minimal number of states that accepts the same language, see
    /// [`Minimizer`] for details. The result never has more states than `self`.
    ///
    /// # Example
    /// ```
    /// use minfa::prelude::*;
    ///
    /// // words over {a, b} whose second to last symbol is an a
    /// let nfa = Automaton::builder()
    ///     .with_transitions([(0, 'a', 0), (0, 'b', 0), (0, 'a', 1), (1, 'a', 2), (1, 'b', 2)])
    ///     .with_initial([0])
    ///     .with_accepting([2])
    ///     .build();
    /// assert_eq!(nfa.minimized_dfa().size(), 4);
    ///
    /// let min = nfa.minimized();
    /// assert_eq!(min.size(), 3);
    /// assert!(min.is_equivalent(&nfa));
    /// ```
    pub fn minimized(&self) -> Automaton<S, usize> {
        self.minimized_with(&MinimizationConfig::default())
    }

    /// Works like [`Self::minimized`], but uses the given `config`.
    pub fn minimized_with(&self, config: &MinimizationConfig) -> Automaton<S, usize> {
        Minimizer::new(self, *config).run()
    }

    /// Computes the minimal deterministic automaton for the language of `self`, which is partial:
    /// there are no states from which nothing is accepted. The initial state has index 0, and the
    /// result is empty if the language is empty.
    pub fn minimized_dfa(&self) -> Automaton<S, usize> {
        Minimizer::new(self, MinimizationConfig::default()).minimal_dfa()
    }
}
