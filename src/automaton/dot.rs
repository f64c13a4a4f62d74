use itertools::Itertools;

use crate::prelude::*;
#[cfg(feature = "graphviz")]
use crate::error::RenderError;

fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Export of an object into the DOT format of graphviz.
pub trait Dottable {
    /// The name of the digraph, defaults to `"A"`.
    fn dot_name(&self) -> Option<String> {
        None
    }

    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    fn dot_representation(&self) -> String;

    /// Renders the graph as a PNG image into the file at `path`. The DOT source is written to a
    /// temporary file which is handed to a locally installed `dot` executable, its error output is
    /// reported in [`RenderError::Dot`] if it fails. Only available with the `graphviz` feature.
    #[cfg(feature = "graphviz")]
    fn render_to_file_name<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), RenderError> {
        use std::io::Write;

        let mut source = tempfile::Builder::new().suffix(".dot").tempfile()?;
        source.write_all(self.dot_representation().as_bytes())?;
        source.flush()?;
        tracing::trace!(
            "rendering {} to {}",
            source.path().display(),
            path.as_ref().display()
        );

        let output = std::process::Command::new("dot")
            .arg("-Tpng")
            .arg("-o")
            .arg(path.as_ref())
            .arg(source.path())
            .stderr(std::process::Stdio::piped())
            .output()?;
        if output.status.success() {
            Ok(())
        } else {
            Err(RenderError::Dot {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl<S: Symbol + Show, Q: Show> Automaton<S, Q> {
    fn dot_state_ident(&self, idx: StateIndex) -> String {
        format!("q{idx}")
    }

    /// A state is labelled by its color, or by its index if the color shows as nothing.
    fn dot_state_label(&self, idx: StateIndex) -> String {
        let label = self
            .state_color(idx)
            .map(|color| color.show())
            .unwrap_or_default();
        if label.is_empty() {
            idx.to_string()
        } else {
            escape_label(&label)
        }
    }

    fn dot_node_group<I>(&self, shape: &str, states: I) -> String
    where
        I: IntoIterator<Item = StateIndex>,
    {
        let nodes = states
            .into_iter()
            .map(|q| {
                format!(
                    "{} [label = \"{}\"];",
                    self.dot_state_ident(q),
                    self.dot_state_label(q)
                )
            })
            .join(" ");
        format!("node [shape = {shape}]; {nodes}")
    }
}

impl<S: Symbol + Show, Q: Show> Dottable for Automaton<S, Q> {
    fn dot_representation(&self) -> String {
        let header = [
            format!(
                "digraph {} {{",
                self.dot_name().unwrap_or_else(|| "A".to_string())
            ),
            "rankdir = LR;".to_string(),
        ];

        let start_markers = format!(
            "node [shape = point]; {}",
            self.initial_states()
                .map(|q| format!("init{q};"))
                .join(" ")
        );
        let (accepting, ordinary): (Vec<_>, Vec<_>) =
            self.state_indices().partition(|&q| self.is_accepting(q));
        let groups = [
            start_markers,
            self.dot_node_group("doublecircle", accepting),
            self.dot_node_group("circle", ordinary),
        ];

        let start_edges = self
            .initial_states()
            .map(|q| format!("init{q} -> {};", self.dot_state_ident(q)));
        let transitions = self.transitions().map(|(from, sym, to)| {
            format!(
                "{} -> {} [label = \"{}\"];",
                self.dot_state_ident(from),
                self.dot_state_ident(to),
                escape_label(&sym.show())
            )
        });

        header
            .into_iter()
            .chain(groups)
            .chain(start_edges)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn dot_lines() {
        let nfa = Automaton::builder()
            .with_transitions([(0, 'a', 1), (1, '"', 1)])
            .with_initial([0])
            .with_accepting([1])
            .build();
        let dot = nfa.dot_representation();
        let lines = dot.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "digraph A {",
                "rankdir = LR;",
                "node [shape = point]; init0;",
                "node [shape = doublecircle]; q1 [label = \"1\"];",
                "node [shape = circle]; q0 [label = \"0\"];",
                "init0 -> q0;",
                "q0 -> q1 [label = \"a\"];",
                "q1 -> q1 [label = \"\\\"\"];",
                "}",
            ]
        );
    }

    #[test]
    fn dot_labels_use_colors() {
        let dfa = Automaton::literal('a').determinize();
        let dot = dfa.dot_representation();
        assert!(dot.contains("q0 [label = \"{0}\"];"));
        assert!(dot.contains("q1 [label = \"{1}\"];"));
    }

    #[test]
    #[cfg(feature = "graphviz")]
    fn rendering_reports_failures() {
        use crate::error::RenderError;

        let dir = tempfile::tempdir().unwrap();
        let min = Automaton::from_word("abc".chars()).minimized();

        let target = dir.path().join("minimized.png");
        match min.render_to_file_name(&target) {
            Ok(()) => assert!(target.exists()),
            // no graphviz installation
            Err(RenderError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            Err(e) => panic!("rendering failed: {e}"),
        }

        let unwritable = dir.path().join("missing").join("minimized.png");
        match min.render_to_file_name(&unwritable) {
            Ok(()) => panic!("dot can not write into a missing directory"),
            Err(RenderError::Dot { status, .. }) => assert!(!status.success()),
            Err(RenderError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        }
    }
}
