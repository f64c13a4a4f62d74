use std::ops::ControlFlow;

use bit_set::BitSet;
use tracing::trace;

use super::{Cover, Reduction};
use crate::prelude::*;

/// The automaton that the intersection rule derives from a [`Cover`] of a reduced matrix. It has
/// one state per grid of the cover, state `i` corresponds to the grid at position `i`.
///
/// A grid is initial if it contains the first row and accepting if it contains the first column.
/// From a grid, the successors on a symbol are the grids that contain the successor of every row of
/// the grid in the minimal deterministic automaton, if one of these rows has no successor there is
/// no transition.
pub struct Candidate<'a, S> {
    cover: &'a Cover,
    reduction: &'a Reduction<S>,
    nfa: Automaton<S>,
}

impl<'a, S: Symbol> Candidate<'a, S> {
    /// Applies the intersection rule to `cover`, which should cover the matrix of `reduction`.
    pub fn new(cover: &'a Cover, reduction: &'a Reduction<S>) -> Self {
        let dfa = reduction.dfa();
        let mut nfa = Automaton::with_capacity(cover.len());
        nfa.extend_states(std::iter::repeat(Void).take(cover.len()));

        for (g, grid) in cover.grids().iter().enumerate() {
            let Some(first) = grid.rows().iter().next() else {
                continue;
            };
            for symbol in dfa.symbols_from(first) {
                let successors = grid.rows().iter().try_fold(None, |acc: Option<BitSet>, r| {
                    let target = dfa.successors(r, symbol).next()?;
                    let mut assigned = cover.containing_row(target);
                    if let Some(acc) = acc {
                        assigned.intersect_with(&acc);
                    }
                    Some(Some(assigned))
                });
                let Some(Some(targets)) = successors else {
                    continue;
                };
                for h in &targets {
                    nfa.add_transition(g, symbol.clone(), h)
                        .expect("grids are states of the candidate");
                }
            }
        }

        let matrix = reduction.matrix();
        if matrix.rows() > 0 {
            nfa.set_initial_states(&cover.containing_row(0))
                .expect("grids are states of the candidate");
        }
        if matrix.columns() > 0 {
            nfa.set_accepting_states(&cover.containing_column(0))
                .expect("grids are states of the candidate");
        }

        Self {
            cover,
            reduction,
            nfa,
        }
    }

    /// The automaton built by the intersection rule.
    pub fn nfa(&self) -> &Automaton<S> {
        &self.nfa
    }

    /// Decides whether the candidate accepts the language of the minimal deterministic automaton.
    ///
    /// The subset construction of the candidate is walked in lock-step with the deterministic
    /// automaton, considering only live subsets, i.e. those from which an accepting subset can be
    /// reached. For every pair of visited states both must agree on acceptance, they must have a
    /// (live) successor on precisely the same symbols, and the columns of the grids in the subset
    /// must include every true column of the row.
    pub fn is_legitimate(&self) -> bool {
        let dfa = self.reduction.dfa();
        let matrix = self.reduction.matrix();
        let subsets = self.nfa.determinize();
        let live = subsets.coreachable_states();
        let live_successor = |c: StateIndex, symbol: &S| {
            subsets
                .successors(c, symbol)
                .next()
                .filter(|q| live.contains(q))
        };

        let outcome = Worklist::from_seeds([(0, 0)]).try_run(|(d, c), worklist| {
            if dfa.is_accepting(d) != subsets.is_accepting(c) {
                trace!("row {d} and subset {c} disagree on acceptance");
                return ControlFlow::Break(());
            }

            let mut spanned = BitSet::new();
            for &g in subsets.state_color(c).into_iter().flatten() {
                spanned.union_with(self.cover.grids()[g].columns());
            }
            if !spanned.is_superset(matrix.row(d)) {
                trace!("the grids of subset {c} do not span row {d}");
                return ControlFlow::Break(());
            }

            for symbol in dfa.symbols_from(d) {
                let next = dfa
                    .successors(d, symbol)
                    .next()
                    .expect("a symbol leaving a state has a successor");
                let Some(c_next) = live_successor(c, symbol) else {
                    trace!("subset {c} misses a live successor of row {d} on {symbol:?}");
                    return ControlFlow::Break(());
                };
                worklist.push((next, c_next));
            }
            for symbol in subsets.symbols_from(c) {
                if live_successor(c, symbol).is_some() && dfa.successors(d, symbol).next().is_none()
                {
                    trace!("subset {c} has a live successor on {symbol:?} that row {d} lacks");
                    return ControlFlow::Break(());
                }
            }
            ControlFlow::Continue(())
        });
        outcome.is_continue()
    }

    /// Returns the trimmed candidate with states colored by fresh ids if it is legitimate.
    pub fn into_legitimate(self) -> Option<Automaton<S, usize>> {
        self.is_legitimate()
            .then(|| self.nfa.trim().number_states())
    }
}

#[cfg(test)]
mod tests {
    use super::Candidate;
    use crate::minimization::{prime_grids, Cover, CoverSearch, Reduction, StateMap};
    use crate::prelude::*;

    #[test_log::test]
    fn intersection_rule_on_three_state_nfa() {
        let nfa = crate::tests::three_state_nfa().trim();
        let reduction = Reduction::new(&StateMap::new(&nfa));
        let matrix = reduction.matrix();
        let grids = prime_grids(matrix);

        // every legitimate candidate accepts the language of the input
        let mut legitimate = 0;
        for first in 0..grids.len() {
            for second in first + 1..grids.len() {
                let cover = Cover::new(vec![grids[first].clone(), grids[second].clone()]);
                if !cover.covers(matrix) {
                    continue;
                }
                if let Some(min) = Candidate::new(&cover, &reduction).into_legitimate() {
                    legitimate += 1;
                    assert!(min.is_equivalent(&nfa));
                    assert!(min.size() <= 2);
                }
            }
        }
        assert!(legitimate > 0);
    }

    #[test]
    fn incomplete_cover_is_rejected() {
        let nfa = Automaton::from_word("ab".chars());
        let reduction = Reduction::new(&StateMap::new(&nfa));
        let grids = prime_grids(reduction.matrix());
        assert_eq!(grids.len(), 3);

        // the grid of the last row is missing, so nothing is accepted
        let cover = Cover::new(grids[..2].to_vec());
        assert!(!cover.covers(reduction.matrix()));
        let candidate = Candidate::new(&cover, &reduction);
        assert_eq!(candidate.nfa().size(), 2);
        assert_eq!(candidate.nfa().transition_count(), 1);
        assert!(!candidate.is_legitimate());

        let cover = Cover::new(grids);
        let minimal = Candidate::new(&cover, &reduction).into_legitimate().unwrap();
        assert_eq!(minimal.size(), 3);
        assert!(minimal.accepts("ab".chars()));
    }

    #[test_log::test]
    fn covers_with_wrong_language_are_skipped() {
        let nfa = Automaton::builder()
            .with_transitions([
                (0, 'a', 2),
                (0, 'a', 4),
                (0, 'b', 1),
                (1, 'a', 3),
                (1, 'b', 1),
                (2, 'a', 0),
                (2, 'b', 1),
                (3, 'a', 0),
                (3, 'a', 2),
                (3, 'b', 3),
                (4, 'a', 0),
                (4, 'a', 4),
                (4, 'b', 2),
            ])
            .with_initial([3])
            .with_accepting([0, 1])
            .build();
        let reduction = Reduction::new(&StateMap::new(&nfa.trim()));
        assert_eq!(reduction.matrix().rows(), 7);
        let grids = prime_grids(reduction.matrix());

        let mut rejected = 0;
        let minimal = CoverSearch::new(reduction.matrix(), &grids)
            .find(5, |cover| {
                let candidate = Candidate::new(cover, &reduction);
                if !candidate.is_legitimate() {
                    rejected += 1;
                    assert!(!candidate.nfa().trim().is_equivalent(&nfa));
                }
                candidate.into_legitimate()
            })
            .unwrap();
        assert!(rejected > 0);
        assert_eq!(minimal.size(), 4);
        assert!(minimal.is_equivalent(&nfa));
        assert_eq!(nfa.minimized().size(), 4);
    }
}
