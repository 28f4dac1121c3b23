use super::{Slots, inputs};
use crate::future::{Future, IntoResolution, Reason};

use std::cell::RefCell;
use std::rc::Rc;

impl<T: Clone + 'static, E: Reason> Future<T, E> {
    /// Waits for every input to settle, whatever the outcome.
    ///
    /// Fulfills with one `Result` per input, in input order. Never rejects.
    /// An empty input fulfills with an empty vector.
    pub fn all_settled<I>(items: I) -> Future<Vec<Result<T, E>>, E>
    where
        I: IntoIterator,
        I::Item: IntoResolution<T, E>,
    {
        let inputs = inputs("all_settled", items);
        let (output, resolver) = Future::with_resolvers();

        if inputs.is_empty() {
            resolver.fulfill(Vec::new());
            return output;
        }

        let slots = Rc::new(RefCell::new(Slots::new(inputs.len())));

        for (index, input) in inputs.into_iter().enumerate() {
            let slots = slots.clone();
            let resolver = resolver.clone();

            input.subscribe(move |outcome| {
                let complete = slots.borrow_mut().fill(index, outcome);

                if let Some(outcomes) = complete {
                    resolver.fulfill(outcomes);
                }
            });
        }

        output
    }
}
