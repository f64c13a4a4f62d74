use std::{fmt::Debug, ops::ControlFlow};

use bit_set::BitSet;
use itertools::Itertools;
use tracing::{debug, warn};

use super::ReducedMatrix;
use crate::prelude::*;

/// A grid is a set of rows together with a set of columns of a [`ReducedMatrix`], such that every
/// cell in the intersection of a row and a column of the grid is true. A grid is prime if it can
/// not be extended by another row or column.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Grid {
    rows: BitSet,
    columns: BitSet,
}

impl Grid {
    /// Creates a grid from the given rows and columns.
    pub fn new<R, C>(rows: R, columns: C) -> Self
    where
        R: IntoIterator<Item = usize>,
        C: IntoIterator<Item = usize>,
    {
        Self {
            rows: rows.into_iter().collect(),
            columns: columns.into_iter().collect(),
        }
    }

    /// The largest grid whose columns include `columns`. Its rows are all rows that are true in
    /// every one of `columns`, its columns are all columns that are true in every one of these
    /// rows. Such a grid is always prime. Returns `None` if no row is true in all of `columns`.
    pub fn spanned_by(matrix: &ReducedMatrix, columns: &BitSet) -> Option<Self> {
        let rows: BitSet = (0..matrix.rows())
            .filter(|&r| matrix.row(r).is_superset(columns))
            .collect();
        let mut spanned = rows.iter().map(|r| matrix.row(r).clone());
        let mut common = spanned.next()?;
        for row in spanned {
            common.intersect_with(&row);
        }
        Some(Self {
            rows,
            columns: common,
        })
    }

    /// The rows of the grid.
    pub fn rows(&self) -> &BitSet {
        &self.rows
    }

    /// The columns of the grid.
    pub fn columns(&self) -> &BitSet {
        &self.columns
    }

    /// Returns `true` if the grid contains the given `row`.
    pub fn contains_row(&self, row: usize) -> bool {
        self.rows.contains(row)
    }

    /// Returns `true` if the grid contains the given `column`.
    pub fn contains_column(&self, column: usize) -> bool {
        self.columns.contains(column)
    }

    /// Iterates over all cells of the grid as pairs of row and column.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .flat_map(move |r| self.columns.iter().map(move |c| (r, c)))
    }
}

impl Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}]x[{}]",
            self.rows.iter().join(", "),
            self.columns.iter().join(", ")
        )
    }
}

/// Computes all prime grids of the given matrix, sorted and without duplicates.
pub fn prime_grids(matrix: &ReducedMatrix) -> Vec<Grid> {
    // without a budget the enumeration always completes
    bounded_prime_grids(matrix, None).unwrap_or_default()
}

/// Computes all prime grids of the given matrix, sorted and without duplicates, or `None` if there
/// are more than `budget` of them.
///
/// Each column spans a prime grid through [`Grid::spanned_by`]. A prime grid is extended by adding
/// one of its missing columns and taking the grid that this larger set of columns spans, which is
/// prime again unless no row is left. Every prime grid is reached in this way from the grid of
/// any of its columns, and only prime grids are ever stored.
pub fn bounded_prime_grids(matrix: &ReducedMatrix, budget: Option<usize>) -> Option<Vec<Grid>> {
    let seeds = (0..matrix.columns())
        .filter_map(|c| Grid::spanned_by(matrix, &BitSet::from_iter([c])))
        .collect_vec();

    let outcome = Worklist::from_seeds(seeds).try_run(|grid, worklist| {
        if budget.is_some_and(|budget| worklist.seen() > budget) {
            return ControlFlow::Break(worklist.seen());
        }
        for c in (0..matrix.columns()).filter(|&c| !grid.contains_column(c)) {
            let mut columns = grid.columns().clone();
            columns.insert(c);
            if let Some(extension) = Grid::spanned_by(matrix, &columns) {
                worklist.push(extension);
            }
        }
        ControlFlow::Continue(())
    });

    match outcome {
        ControlFlow::Continue(seen) => {
            let mut primes = seen.into_iter().collect_vec();
            primes.sort();
            debug!(
                "found {} prime grids of a {}x{} matrix",
                primes.len(),
                matrix.rows(),
                matrix.columns()
            );
            Some(primes)
        }
        ControlFlow::Break(seen) => {
            warn!("grid budget exhausted after finding {seen} prime grids");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use bit_set::BitSet;

    use super::{bounded_prime_grids, prime_grids, Grid};
    use crate::minimization::ReducedMatrix;

    fn is_prime(grid: &Grid, matrix: &ReducedMatrix) -> bool {
        let extends_by_row = (0..matrix.rows())
            .filter(|&r| !grid.contains_row(r))
            .any(|r| grid.columns().iter().all(|c| matrix.get(r, c)));
        let extends_by_column = (0..matrix.columns())
            .filter(|&c| !grid.contains_column(c))
            .any(|c| grid.rows().iter().all(|r| matrix.get(r, c)));
        grid.cells().all(|(r, c)| matrix.get(r, c)) && !extends_by_row && !extends_by_column
    }

    #[test]
    fn grid_cells() {
        let grid = Grid::new([0, 2], [1, 3]);
        assert_eq!(
            grid.cells().collect::<Vec<_>>(),
            vec![(0, 1), (0, 3), (2, 1), (2, 3)]
        );
        assert_eq!(format!("{:?}", grid), "[0, 2]x[1, 3]");
    }

    #[test]
    fn spanning_columns() {
        let matrix = ReducedMatrix::from_rows(3, [vec![0, 1], vec![0, 1, 2], vec![1, 2]]);
        assert_eq!(
            Grid::spanned_by(&matrix, &BitSet::from_iter([0])),
            Some(Grid::new([0, 1], [0, 1]))
        );
        assert_eq!(
            Grid::spanned_by(&matrix, &BitSet::from_iter([0, 2])),
            Some(Grid::new([1], [0, 1, 2]))
        );
        let sparse = ReducedMatrix::from_rows(2, [vec![0], vec![1]]);
        assert_eq!(Grid::spanned_by(&sparse, &BitSet::from_iter([0, 1])), None);
    }

    #[test]
    fn prime_grids_of_small_matrix() {
        // 1 1 0
        // 1 1 1
        // 0 1 1
        let matrix = ReducedMatrix::from_rows(3, [vec![0, 1], vec![0, 1, 2], vec![1, 2]]);
        let primes = prime_grids(&matrix);
        let mut expected = vec![
            Grid::new([0, 1], [0, 1]),
            Grid::new([1, 2], [1, 2]),
            Grid::new([0, 1, 2], [1]),
            Grid::new([1], [0, 1, 2]),
        ];
        expected.sort();
        assert_eq!(primes, expected);
        assert!(primes.iter().all(|grid| is_prime(grid, &matrix)));
    }

    #[test]
    fn full_matrix_has_one_prime_grid() {
        let matrix = ReducedMatrix::from_rows(24, (0..24).map(|_| 0..24));
        assert_eq!(prime_grids(&matrix), vec![Grid::new(0..24, 0..24)]);
    }

    #[test_log::test]
    fn dense_matrix_only_stores_prime_grids() {
        // 300 of 400 cells are true, the all-true sub-rectangles are far too many to enumerate
        let matrix = ReducedMatrix::from_rows(
            20,
            (0..20).map(|r| (0..20).filter(move |c| (r + 2 * c) % 4 != 0)),
        );
        assert_eq!(matrix.true_cells().count(), 300);
        let primes = prime_grids(&matrix);
        assert_eq!(primes.len(), 3);
        assert!(primes.iter().all(|grid| is_prime(grid, &matrix)));
        assert!(matrix
            .true_cells()
            .all(|(r, c)| primes.iter().any(|g| g.contains_row(r) && g.contains_column(c))));
    }

    #[test]
    fn budget_limits_prime_grids() {
        let matrix = ReducedMatrix::from_rows(3, [vec![0, 1], vec![0, 1, 2], vec![1, 2]]);
        assert_eq!(bounded_prime_grids(&matrix, Some(3)), None);
        assert_eq!(bounded_prime_grids(&matrix, Some(4)).map(|g| g.len()), Some(4));
        assert_eq!(bounded_prime_grids(&matrix, Some(0)), None);
    }
}
