use bit_set::BitSet;
use itertools::Itertools;
use owo_colors::OwoColorize;
use tracing::debug;

use super::StateMap;
use crate::{math::Partition, prelude::*};

/// The boolean matrix that records which cells of a [`StateMap`] are non-empty. Each row is
/// stored as the set of its true columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementaryMatrix {
    rows: Vec<BitSet>,
    columns: usize,
}

impl ElementaryMatrix {
    /// Extracts the elementary matrix of a state map.
    pub fn new<S: Symbol>(state_map: &StateMap<S>) -> Self {
        let rows = (0..state_map.rows())
            .map(|r| {
                (0..state_map.columns())
                    .filter(|&c| !state_map.cell(r, c).is_empty())
                    .collect()
            })
            .collect();
        Self {
            rows,
            columns: state_map.columns(),
        }
    }

    /// Groups identical rows and identical columns. Classes are ordered by their smallest member,
    /// so the first row class contains row 0 and the first column class contains column 0.
    pub fn classes(&self) -> (Partition<usize>, Partition<usize>) {
        let column_vectors: Vec<BitSet> = (0..self.columns)
            .map(|c| {
                self.rows
                    .iter()
                    .positions(|row| row.contains(c))
                    .collect()
            })
            .collect();
        (
            Partition::group_by(0..self.rows.len(), |a, b| self.rows[*a] == self.rows[*b]),
            Partition::group_by(0..self.columns, |a, b| {
                column_vectors[*a] == column_vectors[*b]
            }),
        )
    }
}

/// The elementary matrix after identical rows and identical columns have been merged. Every cell
/// additionally carries the union of all states of the state map cells in its block.
#[derive(Clone, PartialEq, Eq)]
pub struct ReducedMatrix {
    rows: Vec<BitSet>,
    columns: usize,
    cells: Vec<Vec<StateSet>>,
}

impl ReducedMatrix {
    /// Merges the given classes of rows and columns of a state map. The classes are expected to
    /// group identical rows and columns of its elementary matrix.
    pub fn new<S: Symbol>(
        state_map: &StateMap<S>,
        row_classes: &Partition<usize>,
        column_classes: &Partition<usize>,
    ) -> Self {
        let cells = row_classes
            .iter()
            .map(|rows| {
                column_classes
                    .iter()
                    .map(|columns| {
                        rows.iter()
                            .cartesian_product(columns.iter())
                            .fold(StateSet::empty(), |acc, (&r, &c)| {
                                acc.union(state_map.cell(r, c))
                            })
                    })
                    .collect_vec()
            })
            .collect_vec();
        let rows = cells
            .iter()
            .map(|row| row.iter().positions(|cell| !cell.is_empty()).collect())
            .collect();
        Self {
            rows,
            columns: column_classes.size(),
            cells,
        }
    }

    /// Creates a matrix with the given number of `columns` directly from the true columns of
    /// each row. All cells are left without states.
    pub fn from_rows<R, I>(columns: usize, rows: R) -> Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = usize>,
    {
        let rows: Vec<BitSet> = rows
            .into_iter()
            .map(|row| row.into_iter().filter(|&c| c < columns).collect())
            .collect();
        let cells = vec![vec![StateSet::empty(); columns]; rows.len()];
        Self {
            rows,
            columns,
            cells,
        }
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// The number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Returns `true` if the cell at the given position is true, positions out of bounds are false.
    pub fn get(&self, row: usize, column: usize) -> bool {
        self.rows.get(row).is_some_and(|r| r.contains(column))
    }

    /// The true columns of the given `row`.
    ///
    /// # Panics
    /// If the row does not exist.
    pub fn row(&self, row: usize) -> &BitSet {
        &self.rows[row]
    }

    /// The union of the states in the block at the given position.
    ///
    /// # Panics
    /// If the position is out of bounds.
    pub fn cell(&self, row: usize, column: usize) -> &StateSet {
        &self.cells[row][column]
    }

    /// Iterates over the positions of all true cells, row by row.
    pub fn true_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().map(move |c| (r, c)))
    }

    /// Renders the matrix as a table, true cells show their states.
    pub fn build_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once(String::new()).chain((0..self.columns).map(|c| c.blue().to_string())),
        );
        for (r, cells) in self.cells.iter().enumerate() {
            builder.push_record(std::iter::once(r.blue().to_string()).chain(
                cells.iter().enumerate().map(|(c, cell)| {
                    if self.get(r, c) {
                        cell.show().bold().to_string()
                    } else {
                        "-".dimmed().to_string()
                    }
                }),
            ));
        }
        builder
            .build()
            .with(tabled::settings::Style::ascii())
            .to_string()
    }
}

impl std::fmt::Debug for ReducedMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.build_table())
    }
}

/// The result of reducing the state map of a trim automaton. Besides the [`ReducedMatrix`], it
/// contains the minimal deterministic automaton of the language, whose states are precisely the
/// rows of the reduced matrix. State `i` of the automaton is colored with `i`, state 0 is initial
/// and a state is accepting if its row is true in column 0.
#[derive(Clone)]
pub struct Reduction<S> {
    matrix: ReducedMatrix,
    dfa: Automaton<S, usize>,
}

impl<S: Symbol> Reduction<S> {
    /// Reduces the given state map. The automaton from which the state map was computed should be
    /// trim, as otherwise rows may be false everywhere.
    pub fn new(state_map: &StateMap<S>) -> Self {
        let elementary = ElementaryMatrix::new(state_map);
        let (row_classes, column_classes) = elementary.classes();
        let matrix = ReducedMatrix::new(state_map, &row_classes, &column_classes);

        let forward = state_map.forward();
        let mut dfa = Automaton::with_capacity(row_classes.size());
        dfa.extend_states(0..row_classes.size());
        for class in 0..row_classes.size() {
            let representative = row_classes
                .representative(class)
                .expect("classes of a partition are not empty");
            for (symbol, targets) in forward.transitions_from(representative) {
                for target in targets {
                    let target_class = row_classes
                        .class_of(target)
                        .expect("every row belongs to a class");
                    dfa.add_transition(class, symbol.clone(), target_class)
                        .expect("classes are states of the reduced automaton");
                }
            }
            if matrix.get(class, 0) {
                dfa.add_accepting(class)
                    .expect("classes are states of the reduced automaton");
            }
        }
        if !dfa.is_empty() {
            dfa.add_initial(0)
                .expect("the class of row 0 is a state of the reduced automaton");
        }

        debug!(
            "reduced the {}x{} state map to a {}x{} matrix",
            state_map.rows(),
            state_map.columns(),
            matrix.rows(),
            matrix.columns()
        );
        Self { matrix, dfa }
    }

    /// The reduced matrix.
    pub fn matrix(&self) -> &ReducedMatrix {
        &self.matrix
    }

    /// The minimal deterministic automaton whose states are the rows of the reduced matrix.
    pub fn dfa(&self) -> &Automaton<S, usize> {
        &self.dfa
    }

    /// Consumes the reduction and returns its minimal deterministic automaton.
    pub fn into_dfa(self) -> Automaton<S, usize> {
        self.dfa
    }
}

impl<S: Symbol> std::fmt::Debug for Reduction<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:?}", self.matrix)?;
        write!(f, "{:?}", self.dfa)
    }
}

#[cfg(test)]
mod tests {
    use super::{ElementaryMatrix, Reduction};
    use crate::{math::Partition, minimization::StateMap, prelude::*};

    #[test_log::test]
    fn reduction_of_redundant_dfa() {
        // words over {a, b} ending in b, state 2 duplicates state 0
        let dfa = Automaton::builder()
            .with_transitions([
                (0, 'a', 0),
                (0, 'b', 1),
                (1, 'a', 2),
                (1, 'b', 1),
                (2, 'a', 0),
                (2, 'b', 1),
            ])
            .with_initial([0])
            .with_accepting([1])
            .build();
        let map = StateMap::new(&dfa);
        assert_eq!(map.rows(), 3);

        let elementary = ElementaryMatrix::new(&map);
        let (rows, _) = elementary.classes();
        assert_eq!(rows, Partition::new([vec![0, 2], vec![1]]));

        let reduction = Reduction::new(&map);
        assert_eq!(reduction.matrix().rows(), 2);
        let min = reduction.dfa();
        assert_eq!(min.size(), 2);
        assert!(min.is_deterministic());
        assert_eq!(min.initial_states().collect::<Vec<_>>(), vec![0]);
        assert_eq!(min.accepting_states().collect::<Vec<_>>(), vec![1]);
        for word in ["b", "ab", "abab", "bbb"] {
            assert!(min.accepts(word.chars()));
        }
        for word in ["", "a", "ba", "bba"] {
            assert!(!min.accepts(word.chars()));
        }
    }

    #[test]
    fn reduced_cells_hold_states() {
        let nfa = crate::tests::three_state_nfa();
        let map = StateMap::new(&nfa);
        let reduction = Reduction::new(&map);
        let matrix = reduction.matrix();
        for (r, c) in matrix.true_cells() {
            assert!(!matrix.cell(r, c).is_empty());
        }
        // the empty word is rejected
        assert!(!matrix.get(0, 0));
        assert_eq!(
            matrix.true_cells().count(),
            (0..matrix.rows()).map(|r| matrix.row(r).len()).sum::<usize>()
        );
    }
}
