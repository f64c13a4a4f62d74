use std::{collections::VecDeque, hash::Hash, ops::ControlFlow};

use dashmap::DashSet;
use tracing::trace;

use crate::math::Set;

/// A queue that processes every distinct item exactly once. Pushing an item that has been pushed
/// before (even if it has already been processed) is a no-op, so the queue can be used to saturate
/// a graph whose nodes are discovered while processing other nodes.
///
/// # Example
/// ```
/// use minfa::prelude::*;
///
/// let mut visited = vec![];
/// Worklist::from_seeds([1u32]).run(|n, worklist| {
///     visited.push(n);
///     worklist.push((n * 2) % 7);
///     worklist.push((n * 3) % 7);
/// });
/// assert_eq!(visited, vec![1, 2, 3, 4, 6, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct Worklist<T> {
    queue: VecDeque<T>,
    seen: Set<T>,
}

impl<T: Clone + Eq + Hash> Default for Worklist<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> Worklist<T> {
    /// Creates an empty worklist.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            seen: Set::default(),
        }
    }

    /// Creates a worklist that initially contains the given (deduplicated) items.
    pub fn from_seeds<I: IntoIterator<Item = T>>(seeds: I) -> Self {
        let mut worklist = Self::new();
        worklist.push_all(seeds);
        worklist
    }

    /// Schedules `item` for processing if it has never been pushed before. Returns `true` if the
    /// item is new.
    pub fn push(&mut self, item: T) -> bool {
        if self.seen.insert(item.clone()) {
            self.queue.push_back(item);
            true
        } else {
            false
        }
    }

    /// Pushes every element of the given iterator.
    pub fn push_all<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.push(item);
        }
    }

    /// Removes the next item that awaits processing.
    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    /// Returns `true` if no item awaits processing.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The number of distinct items that have been pushed so far.
    pub fn seen(&self) -> usize {
        self.seen.len()
    }

    /// Processes items in the order in which they were first pushed until the queue runs dry.
    /// The callback may schedule further items. Returns the set of all items that were seen.
    pub fn run<F>(mut self, mut process: F) -> Set<T>
    where
        F: FnMut(T, &mut Self),
    {
        while let Some(item) = self.pop() {
            process(item, &mut self);
        }
        self.seen
    }

    /// Works like [`Self::run`], but the callback may stop the processing early by returning
    /// [`ControlFlow::Break`]. If every item was processed, the set of all seen items is returned.
    pub fn try_run<B, F>(mut self, mut process: F) -> ControlFlow<B, Set<T>>
    where
        F: FnMut(T, &mut Self) -> ControlFlow<B>,
    {
        while let Some(item) = self.pop() {
            process(item, &mut self)?;
        }
        ControlFlow::Continue(self.seen)
    }
}

/// The concurrent counterpart of [`Worklist`]. Every distinct item is handed to its own task on
/// the rayon thread pool, and the items returned by processing it are scheduled as child tasks.
/// [`ConcurrentWorklist::run`] only returns once all tasks have completed.
///
/// Deduplication happens through an atomic insert into a concurrent set, so an item that is
/// discovered by several tasks at the same time is still processed exactly once.
#[derive(Debug)]
pub struct ConcurrentWorklist<T: Eq + Hash> {
    seen: DashSet<T, fxhash::FxBuildHasher>,
}

impl<T: Clone + Eq + Hash + Send + Sync> Default for ConcurrentWorklist<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash + Send + Sync> ConcurrentWorklist<T> {
    /// Creates a new concurrent worklist which has not seen any item.
    pub fn new() -> Self {
        Self {
            seen: DashSet::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }

    /// Processes the `seeds` and everything they (transitively) schedule. The `process` callback
    /// receives an item and returns the items that should be processed next. Returns the set of
    /// all items that were processed.
    pub fn run<I, F>(self, seeds: I, process: F) -> Set<T>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Vec<T> + Sync,
    {
        let seeds: Vec<T> = seeds.into_iter().collect();
        rayon::scope(|scope| {
            for seed in seeds {
                self.schedule(scope, seed, &process);
            }
        });
        trace!("concurrent worklist processed {} items", self.seen.len());
        self.seen.into_iter().collect()
    }

    fn schedule<'s, F>(&'s self, scope: &rayon::Scope<'s>, item: T, process: &'s F)
    where
        F: Fn(&T) -> Vec<T> + Sync,
    {
        if !self.seen.insert(item.clone()) {
            return;
        }
        scope.spawn(move |scope| {
            for next in process(&item) {
                self.schedule(scope, next, process);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::{
        ops::ControlFlow,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::{ConcurrentWorklist, Worklist};

    #[test]
    fn items_are_processed_once() {
        let mut processed = vec![];
        let seen = Worklist::from_seeds([0, 0, 1]).run(|n: usize, worklist| {
            processed.push(n);
            worklist.push_all([(n + 1) % 4, (n + 2) % 4]);
        });
        assert_eq!(processed, vec![0, 1, 2, 3]);
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn early_exit() {
        let outcome = Worklist::from_seeds([1usize]).try_run(|n, worklist| {
            if n > 10 {
                return ControlFlow::Break(n);
            }
            worklist.push(n * 3);
            ControlFlow::Continue(())
        });
        assert_eq!(outcome, ControlFlow::Break(27));
    }

    #[test_log::test]
    fn concurrent_saturation() {
        let calls = AtomicUsize::new(0);
        let seen = ConcurrentWorklist::new().run([0usize, 5], |&n| {
            calls.fetch_add(1, Ordering::SeqCst);
            // every number reaches every other number through several paths
            vec![(n + 1) % 100, (n + 7) % 100, (n * 3) % 100]
        });
        assert_eq!(seen.len(), 100);
        assert_eq!(calls.load(Ordering::SeqCst), 100);
    }
}
