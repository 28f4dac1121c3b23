use super::{clear_timer, set_timeout};
use crate::error::Elapsed;
use crate::future::{Future, Reason};

use std::time::Duration;

/// Bounds how long `future` may stay pending.
///
/// The returned future settles like `future` if it settles within
/// `duration`, and is rejected with [`Elapsed`] otherwise. The timer is
/// cleared as soon as either side wins. `future` itself keeps running; a
/// late settlement is simply ignored.
///
/// # Panics
///
/// Panics if called outside the context of a runtime.
///
/// # Examples
///
/// ```rust,ignore
/// use pactum::Error;
/// use std::time::Duration;
///
/// let bounded = timeout(Duration::from_secs(1), fetch_config());
/// bounded.catch(|error: Error| { /* Error::Elapsed on timeout */ });
/// ```
pub fn timeout<T, E>(duration: Duration, future: Future<T, E>) -> Future<T, E>
where
    T: Clone + 'static,
    E: Reason + From<Elapsed>,
{
    let (deadline, resolver) = Future::with_resolvers();
    let timer = set_timeout(duration, move || resolver.reject(E::from(Elapsed)));

    Future::race([future, deadline]).finally(move || {
        clear_timer(timer);
        Ok::<(), E>(())
    })
}
