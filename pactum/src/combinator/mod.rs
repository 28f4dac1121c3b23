//! Aggregation of several futures into one.
//!
//! Every combinator is an associated function of [`Future`]:
//! [`all`](Future::all), [`race`](Future::race),
//! [`all_settled`](Future::all_settled) and [`any`](Future::any).
//!
//! Inputs are anything implementing [`IntoResolution`], so plain `Ok(value)`
//! and `Err(error)` items can be mixed with futures; they behave as already
//! settled futures. Results are always reported in input order, whatever
//! the settlement order was.

mod all;
mod all_settled;
mod any;
mod race;

use crate::future::{Future, IntoResolution, Reason};

use std::mem;

use tracing::trace;

/// Lifts every input into a future.
fn inputs<T, E, I>(kind: &'static str, items: I) -> Vec<Future<T, E>>
where
    T: Clone + 'static,
    E: Reason,
    I: IntoIterator,
    I::Item: IntoResolution<T, E>,
{
    let inputs: Vec<_> = items.into_iter().map(Future::from_resolution).collect();
    trace!(combinator = kind, inputs = inputs.len(), "combinator created");
    inputs
}

/// Per-input results, collected in input order.
pub(crate) struct Slots<R> {
    items: Vec<Option<R>>,
    remaining: usize,
}

impl<R> Slots<R> {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            items: (0..len).map(|_| None).collect(),
            remaining: len,
        }
    }

    /// Stores the result of input `index`.
    ///
    /// Returns every result, in input order, once the last missing one
    /// arrives. A slot is only ever filled once.
    pub(crate) fn fill(&mut self, index: usize, item: R) -> Option<Vec<R>> {
        let slot = self.items.get_mut(index)?;

        if slot.is_some() {
            return None;
        }

        *slot = Some(item);
        self.remaining -= 1;

        if self.remaining > 0 {
            return None;
        }

        Some(mem::take(&mut self.items).into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Slots;

    #[test]
    fn slots_complete_in_input_order() {
        let mut slots = Slots::new(3);

        assert_eq!(slots.fill(2, "c"), None);
        assert_eq!(slots.fill(0, "a"), None);
        assert_eq!(slots.fill(0, "again"), None);
        assert_eq!(slots.fill(1, "b"), Some(vec!["a", "b", "c"]));
        assert_eq!(slots.fill(1, "late"), None);
    }
}
