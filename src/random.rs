use crate::prelude::*;

/// Draws a random automaton with `size` states over the given `symbols`. Every possible transition
/// `(p, a, q)` is inserted independently with probability `density`. Each state is initial with
/// probability 0.3 and accepting with probability 0.3, if no state was drawn to be initial, state 0
/// becomes initial. The result may contain unreachable states and may accept no word at all.
pub fn generate_random_nfa<S: Symbol>(
    rng: &mut fastrand::Rng,
    size: usize,
    symbols: &[S],
    density: f64,
) -> Automaton<S> {
    let mut nfa = Automaton::with_capacity(size);
    nfa.extend_states(std::iter::repeat(Void).take(size));
    for p in 0..size {
        for symbol in symbols {
            for q in 0..size {
                if rng.f64() < density {
                    nfa.add_transition(p, symbol.clone(), q)
                        .expect("only existing states are connected");
                }
            }
        }
    }

    let initial = (0..size).filter(|_| rng.f64() < 0.3).collect::<Vec<_>>();
    let accepting = (0..size).filter(|_| rng.f64() < 0.3).collect::<Vec<_>>();
    if initial.is_empty() && size > 0 {
        nfa.add_initial(0).expect("state 0 exists");
    } else {
        nfa.set_initial_states(initial)
            .expect("only existing states are initial");
    }
    nfa.set_accepting_states(accepting)
        .expect("only existing states are accepting");
    nfa
}

/// Draws a word over `symbols` whose length is uniformly distributed in `0..=max_len`.
pub fn generate_random_word<S: Symbol>(
    rng: &mut fastrand::Rng,
    symbols: &[S],
    max_len: usize,
) -> Vec<S> {
    if symbols.is_empty() {
        return vec![];
    }
    let len = rng.usize(0..=max_len);
    (0..len)
        .map(|_| symbols[rng.usize(..symbols.len())].clone())
        .collect()
}
