use std::ops::ControlFlow;

use bit_set::BitSet;
use tracing::{debug, trace, warn};

use super::{Grid, ReducedMatrix};

/// A cover is a list of grids such that every true cell of a [`ReducedMatrix`] lies in at least
/// one of them. Grids are referred to by their position in the cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover(Vec<Grid>);

impl Cover {
    /// Creates a cover from the given grids, whether they actually cover a matrix is not checked.
    pub fn new(grids: Vec<Grid>) -> Self {
        Self(grids)
    }

    /// The grids of the cover.
    pub fn grids(&self) -> &[Grid] {
        &self.0
    }

    /// The number of grids.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the cover does not contain any grid.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The positions of all grids that contain the given `row`.
    pub fn containing_row(&self, row: usize) -> BitSet {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, grid)| grid.contains_row(row))
            .map(|(i, _)| i)
            .collect()
    }

    /// The positions of all grids that contain the given `column`.
    pub fn containing_column(&self, column: usize) -> BitSet {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, grid)| grid.contains_column(column))
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns `true` if every true cell of `matrix` lies in some grid.
    pub fn covers(&self, matrix: &ReducedMatrix) -> bool {
        matrix
            .true_cells()
            .all(|(r, c)| self.0.iter().any(|g| g.contains_row(r) && g.contains_column(c)))
    }
}

enum Stop<T> {
    Found(T),
    BudgetExhausted,
}

/// Enumerates covers of a [`ReducedMatrix`] by prime grids in order of increasing size.
///
/// The grids of a cover of size `k` are chosen with strictly increasing positions in the list of
/// prime grids. A partial choice is abandoned as soon as the grids that may still be added can not
/// cover the cells that are left uncovered, or if fewer grids remain than are needed to reach
/// size `k`. Every complete cover is handed to a check, the search stops at the first cover that
/// passes it. Optionally, the work is limited by a budget on the number of steps, where a step
/// places one grid into a partial cover.
pub struct CoverSearch<'a> {
    grids: &'a [Grid],
    cells: Vec<BitSet>,
    suffixes: Vec<BitSet>,
    target: BitSet,
    budget: Option<usize>,
    steps: usize,
    examined: usize,
}

impl<'a> CoverSearch<'a> {
    /// Prepares a search for covers of `matrix` by the given `grids`.
    pub fn new(matrix: &ReducedMatrix, grids: &'a [Grid]) -> Self {
        let position = |(r, c): (usize, usize)| r * matrix.columns() + c;
        let cells: Vec<BitSet> = grids
            .iter()
            .map(|grid| grid.cells().map(position).collect())
            .collect();

        // suffixes[i] is the union of the cells of all grids from position i onwards
        let mut suffixes = vec![BitSet::new(); grids.len() + 1];
        for i in (0..grids.len()).rev() {
            let mut union = suffixes[i + 1].clone();
            union.union_with(&cells[i]);
            suffixes[i] = union;
        }

        Self {
            grids,
            cells,
            suffixes,
            target: matrix.true_cells().map(position).collect(),
            budget: None,
            steps: 0,
            examined: 0,
        }
    }

    /// Limits the number of steps of the search, `None` means no limit.
    pub fn with_budget(mut self, budget: Option<usize>) -> Self {
        self.budget = budget;
        self
    }

    /// The number of complete covers that have been handed to a check so far.
    pub fn examined(&self) -> usize {
        self.examined
    }

    /// The number of grids that have been placed into a partial cover so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Tries cover sizes `1, 2, ...` up to (excluding) `bound` and returns the result of the first
    /// cover for which `check` produces a value. Returns `None` if no such cover of size smaller than
    /// `bound` exists, or if the budget was exhausted before one was found.
    pub fn find<T, F>(&mut self, bound: usize, mut check: F) -> Option<T>
    where
        F: FnMut(&Cover) -> Option<T>,
    {
        for size in 1..bound.min(self.grids.len() + 1) {
            trace!("searching for covers with {size} grids");
            let mut chosen = Vec::with_capacity(size);
            match self.extend(size, 0, &mut chosen, &BitSet::new(), &mut check) {
                ControlFlow::Continue(()) => continue,
                ControlFlow::Break(Stop::Found(found)) => {
                    debug!(
                        "found a cover with {size} grids after examining {} covers",
                        self.examined
                    );
                    return Some(found);
                }
                ControlFlow::Break(Stop::BudgetExhausted) => {
                    warn!(
                        "cover budget exhausted after {} steps and {} covers, no cover with fewer than {size} grids passed",
                        self.steps, self.examined
                    );
                    return None;
                }
            }
        }
        debug!(
            "no cover with fewer than {bound} grids passed after examining {} covers",
            self.examined
        );
        None
    }

    fn extend<T, F>(
        &mut self,
        size: usize,
        from: usize,
        chosen: &mut Vec<usize>,
        covered: &BitSet,
        check: &mut F,
    ) -> ControlFlow<Stop<T>>
    where
        F: FnMut(&Cover) -> Option<T>,
    {
        if chosen.len() == size {
            if !covered.is_superset(&self.target) {
                return ControlFlow::Continue(());
            }
            self.examined += 1;
            let cover = Cover::new(chosen.iter().map(|&i| self.grids[i].clone()).collect());
            trace!("examining cover {:?}", cover);
            return match check(&cover) {
                Some(found) => ControlFlow::Break(Stop::Found(found)),
                None => ControlFlow::Continue(()),
            };
        }

        let missing = size - chosen.len();
        for i in from..self.grids.len() {
            if self.grids.len() - i < missing {
                break;
            }
            let mut reachable = covered.clone();
            reachable.union_with(&self.suffixes[i]);
            // the suffixes only shrink, so no later position can complete the cover either
            if !reachable.is_superset(&self.target) {
                break;
            }
            if self.budget.is_some_and(|budget| self.steps >= budget) {
                return ControlFlow::Break(Stop::BudgetExhausted);
            }
            self.steps += 1;

            let mut next = covered.clone();
            next.union_with(&self.cells[i]);
            chosen.push(i);
            self.extend(size, i + 1, chosen, &next, check)?;
            chosen.pop();
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Cover, CoverSearch};
    use crate::minimization::{prime_grids, Grid, ReducedMatrix};

    fn staircase() -> ReducedMatrix {
        // 1 1 0
        // 1 1 1
        // 0 1 1
        ReducedMatrix::from_rows(3, [vec![0, 1], vec![0, 1, 2], vec![1, 2]])
    }

    #[test]
    fn smallest_cover_first() {
        let matrix = staircase();
        let grids = prime_grids(&matrix);
        let mut sizes = vec![];
        let found = CoverSearch::new(&matrix, &grids).find(4, |cover| {
            assert!(cover.covers(&matrix));
            sizes.push(cover.len());
            Some(cover.clone())
        });
        let cover = found.unwrap();
        assert_eq!(cover.len(), 2);
        assert_eq!(sizes, vec![2]);
        assert!(cover.grids().contains(&Grid::new([0, 1], [0, 1])));
        assert!(cover.grids().contains(&Grid::new([1, 2], [1, 2])));
    }

    #[test]
    fn every_cover_below_the_bound_is_examined() {
        let matrix = staircase();
        let grids = prime_grids(&matrix);
        let mut search = CoverSearch::new(&matrix, &grids);
        let mut covers: Vec<Cover> = vec![];
        let found: Option<()> = search.find(4, |cover| {
            covers.push(cover.clone());
            None
        });
        assert!(found.is_none());
        // one cover of size 2, and every choice of three grids that contains both of its grids
        assert_eq!(covers.iter().filter(|c| c.len() == 2).count(), 1);
        assert_eq!(covers.iter().filter(|c| c.len() == 3).count(), 2);
        assert_eq!(search.examined(), 3);
    }

    #[test]
    fn budget_limits_steps() {
        let matrix = staircase();
        let grids = prime_grids(&matrix);

        // the only single grid that is placed does not cover the matrix
        let mut search = CoverSearch::new(&matrix, &grids).with_budget(Some(1));
        let found = search.find(4, |cover| Some(cover.clone()));
        assert!(found.is_none());
        assert_eq!(search.steps(), 1);
        assert_eq!(search.examined(), 0);

        let mut search = CoverSearch::new(&matrix, &grids).with_budget(Some(0));
        assert!(search.find(4, |cover| Some(cover.clone())).is_none());
        assert_eq!(search.steps(), 0);

        // one step for the single grid, four for the pairs up to the first cover
        let mut search = CoverSearch::new(&matrix, &grids).with_budget(Some(5));
        let cover = search.find(4, |cover| Some(cover.clone())).unwrap();
        assert_eq!(cover.len(), 2);
        assert_eq!(search.steps(), 5);
    }

    #[test]
    fn budget_bounds_searches_without_complete_covers() {
        // a diagonal needs one grid per row, so no cover below the bound exists
        let matrix = ReducedMatrix::from_rows(12, (0..12).map(|r| [r]));
        let grids = prime_grids(&matrix);
        assert_eq!(grids.len(), 12);

        let mut unbounded = CoverSearch::new(&matrix, &grids);
        let found: Option<()> = unbounded.find(12, |_| None);
        assert!(found.is_none());
        assert_eq!(unbounded.examined(), 0);

        let mut bounded = CoverSearch::new(&matrix, &grids).with_budget(Some(5));
        let found: Option<()> = bounded.find(12, |_| None);
        assert!(found.is_none());
        assert_eq!(bounded.steps(), 5);
        assert!(bounded.steps() < unbounded.steps());
    }

    #[test]
    fn containing_rows_and_columns() {
        let cover = Cover::new(vec![Grid::new([0, 1], [0, 1]), Grid::new([1, 2], [1, 2])]);
        assert_eq!(cover.containing_row(1).iter().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(cover.containing_row(2).iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(cover.containing_column(0).iter().collect::<Vec<_>>(), vec![0]);
        assert!(cover.covers(&staircase()));
        assert!(!Cover::new(vec![Grid::new([0, 1], [0, 1])]).covers(&staircase()));
    }
}
