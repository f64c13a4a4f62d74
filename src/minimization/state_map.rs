use owo_colors::OwoColorize;

use crate::prelude::*;

/// The state map of an automaton relates the states of its subset construction (the rows) to the
/// states of the subset construction of its dual (the columns). Each cell holds the intersection
/// of the two state sets. Row 0 is the initial state of the forward construction, column 0 is the
/// initial state of the backward construction, i.e. the set of accepting states.
///
/// A cell is non-empty if and only if the row accepts some word whose reversal leads to the
/// column in the dual, so two rows with the same non-empty cells accept the same language.
#[derive(Clone)]
pub struct StateMap<S> {
    forward: Automaton<S, StateSet>,
    backward: Automaton<S, StateSet>,
    cells: Vec<Vec<StateSet>>,
}

impl<S: Symbol> StateMap<S> {
    /// Computes the state map of `automaton`.
    pub fn new<Q: Color>(automaton: &Automaton<S, Q>) -> Self {
        let forward = automaton.determinize();
        let backward = automaton.dual().determinize();
        let cells = forward
            .state_colors()
            .map(|row| {
                backward
                    .state_colors()
                    .map(|column| row.intersection(column))
                    .collect()
            })
            .collect();
        Self {
            forward,
            backward,
            cells,
        }
    }

    /// The subset construction of the automaton, its states are the rows.
    pub fn forward(&self) -> &Automaton<S, StateSet> {
        &self.forward
    }

    /// The subset construction of the dual automaton, its states are the columns.
    pub fn backward(&self) -> &Automaton<S, StateSet> {
        &self.backward
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// The number of columns.
    pub fn columns(&self) -> usize {
        self.backward.size()
    }

    /// Returns the cell at the given position.
    ///
    /// # Panics
    /// If the position is out of bounds.
    pub fn cell(&self, row: usize, column: usize) -> &StateSet {
        &self.cells[row][column]
    }

    /// Renders the state map as a table, non-empty cells are highlighted.
    pub fn build_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once(String::new()).chain(
                self.backward
                    .state_colors()
                    .map(|column| column.show().blue().to_string()),
            ),
        );
        for (row, cells) in self.forward.state_colors().zip(&self.cells) {
            builder.push_record(std::iter::once(row.show().blue().to_string()).chain(
                cells.iter().map(|cell| {
                    if cell.is_empty() {
                        cell.show().dimmed().to_string()
                    } else {
                        cell.show().bold().to_string()
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

impl<S: Symbol> std::fmt::Debug for StateMap<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.build_table())
    }
}
