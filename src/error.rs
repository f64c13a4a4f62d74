use thiserror::Error;

use crate::StateIndex;

/// The ways in which manipulating an [`crate::Automaton`] can fail. Operations returning this error
/// leave the automaton untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// A state index was given that does not refer to a state of the automaton.
    #[error("state {0} does not exist in the automaton")]
    UnknownState(StateIndex),
    /// An operation that combines automata was called without any automaton.
    #[error("at least one automaton is required")]
    NoAutomata,
}

/// The ways in which rendering an automaton through graphviz can fail.
#[cfg(feature = "graphviz")]
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing the DOT source or starting the `dot` executable failed.
    #[error("could not run dot: {0}")]
    Io(#[from] std::io::Error),
    /// The `dot` executable ran but reported a failure.
    #[error("dot exited with {status}: {stderr}")]
    Dot {
        /// The exit status of `dot`.
        status: std::process::ExitStatus,
        /// Whatever `dot` wrote to its standard error.
        stderr: String,
    },
}
