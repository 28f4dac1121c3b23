use super::inputs;
use crate::future::{Future, IntoResolution, Reason};

impl<T: Clone + 'static, E: Reason> Future<T, E> {
    /// Settles like the first input to settle.
    ///
    /// Later outcomes are ignored. An empty input never settles; waiting on
    /// it ends with [`Error::Stalled`](crate::Error::Stalled) once nothing
    /// else is left to run.
    pub fn race<I>(items: I) -> Future<T, E>
    where
        I: IntoIterator,
        I::Item: IntoResolution<T, E>,
    {
        let (output, resolver) = Future::with_resolvers();

        for input in inputs("race", items) {
            let resolver = resolver.clone();
            input.subscribe(move |outcome| resolver.settle(outcome));
        }

        output
    }
}
