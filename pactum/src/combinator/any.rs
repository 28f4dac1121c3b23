use super::{Slots, inputs};
use crate::error::AggregateError;
use crate::future::{Future, IntoResolution, Reason};

use std::cell::RefCell;
use std::rc::Rc;

impl<T: Clone + 'static, E: Reason> Future<T, E> {
    /// Fulfills like the first input to fulfill.
    ///
    /// Rejects with an [`AggregateError`] holding every error, in input
    /// order, once all inputs have rejected. An empty input rejects right
    /// away with an empty `AggregateError`.
    pub fn any<I>(items: I) -> Future<T, AggregateError<E>>
    where
        I: IntoIterator,
        I::Item: IntoResolution<T, E>,
    {
        let inputs = inputs("any", items);
        let (output, resolver) = Future::with_resolvers();

        if inputs.is_empty() {
            resolver.reject(AggregateError { errors: Vec::new() });
            return output;
        }

        let slots = Rc::new(RefCell::new(Slots::new(inputs.len())));

        for (index, input) in inputs.into_iter().enumerate() {
            let slots = slots.clone();
            let resolver = resolver.clone();

            input.subscribe(move |outcome| match outcome {
                Ok(value) => resolver.fulfill(value),
                Err(error) => {
                    let complete = slots.borrow_mut().fill(index, error);

                    if let Some(errors) = complete {
                        resolver.reject(AggregateError { errors });
                    }
                }
            });
        }

        output
    }
}
