use super::{Slots, inputs};
use crate::future::{Future, IntoResolution, Reason};

use std::cell::RefCell;
use std::rc::Rc;

impl<T: Clone + 'static, E: Reason> Future<T, E> {
    /// Waits for every input to fulfill.
    ///
    /// Fulfills with all values in input order. Rejects with the first
    /// rejection to occur; later outcomes are ignored. An empty input
    /// fulfills with an empty vector.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let sum = Future::all([Ok(1), Ok(2), Ok(3)])
    ///     .then(|values: Vec<i32>| Ok(values.iter().sum::<i32>()));
    /// ```
    pub fn all<I>(items: I) -> Future<Vec<T>, E>
    where
        I: IntoIterator,
        I::Item: IntoResolution<T, E>,
    {
        let inputs = inputs("all", items);
        let (output, resolver) = Future::with_resolvers();

        if inputs.is_empty() {
            resolver.fulfill(Vec::new());
            return output;
        }

        let slots = Rc::new(RefCell::new(Slots::new(inputs.len())));

        for (index, input) in inputs.into_iter().enumerate() {
            let slots = slots.clone();
            let resolver = resolver.clone();

            input.subscribe(move |outcome| match outcome {
                Ok(value) => {
                    let complete = slots.borrow_mut().fill(index, value);

                    if let Some(values) = complete {
                        resolver.fulfill(values);
                    }
                }
                Err(error) => resolver.reject(error),
            });
        }

        output
    }
}
