use super::set_timeout;
use crate::future::{Future, Reason};

use std::time::Duration;

/// Creates a future that is fulfilled with `()` after `duration`.
///
/// # Panics
///
/// Panics if called outside the context of a runtime.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// sleep::<String>(Duration::from_millis(10)).then(|()| Ok("done"));
/// ```
pub fn sleep<E: Reason>(duration: Duration) -> Future<(), E> {
    resolve_after(duration, ())
}

/// Creates a future that is fulfilled with `value` after `duration`.
///
/// # Panics
///
/// Panics if called outside the context of a runtime.
pub fn resolve_after<T, E>(duration: Duration, value: T) -> Future<T, E>
where
    T: Clone + 'static,
    E: Reason,
{
    Future::new(move |resolver| {
        set_timeout(duration, move || resolver.fulfill(value));
        Ok(())
    })
}

/// Creates a future that is rejected with `error` after `duration`.
///
/// # Panics
///
/// Panics if called outside the context of a runtime.
pub fn reject_after<T, E>(duration: Duration, error: E) -> Future<T, E>
where
    T: Clone + 'static,
    E: Reason,
{
    Future::new(move |resolver| {
        set_timeout(duration, move || resolver.reject(error));
        Ok(())
    })
}
