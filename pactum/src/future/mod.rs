//! The deferred-value primitive.
//!
//! A [`Future`] is a value that is not known yet. It starts pending, settles
//! exactly once (fulfilled with a value or rejected with an error), and
//! drives the reactions registered on it with [`then`](Future::then),
//! [`catch`](Future::catch) and [`finally`](Future::finally).
//!
//! Reactions never run inside the call that registers them: they are handed
//! to the [`Scheduler`](crate::runtime::Scheduler) and run later, in
//! registration order.

pub(crate) mod core;

mod resolution;
mod resolver;
mod state;

pub use resolution::{IntoResolution, Reason, Resolution};
pub use resolver::Resolver;
pub use state::{FutureId, State};

use self::core::Core;
use crate::error::{Error, Panicked};
use crate::runtime::context;
use crate::runtime::scheduler::Scheduler;

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::warn;

/// A callback handed to legacy callback-style APIs by
/// [`Future::from_callback`].
pub type Callback<T, E> = Box<dyn FnOnce(Result<T, E>)>;

/// Boxed fulfillment handler accepted by [`Future::then_with`].
pub type OnFulfilled<T, E> = Box<dyn FnOnce(T) -> Resolution<T, E>>;

/// Boxed rejection handler accepted by [`Future::then_with`].
pub type OnRejected<T, E> = Box<dyn FnOnce(E) -> Resolution<T, E>>;

/// A deferred value.
///
/// `Future` is a cheap handle: cloning it shares the same underlying value.
/// It is single-threaded (`!Send`) and bound to the scheduler that was
/// current when it was created; futures derived from it through
/// `then`/`catch`/`finally` inherit that scheduler.
///
/// # Examples
///
/// ```rust,ignore
/// use pactum::{Future, RuntimeBuilder};
///
/// let runtime = RuntimeBuilder::new().build();
/// let result = runtime.block_on(|| {
///     Future::<i32, String>::resolve(1)
///         .then(|v| Ok(v + 1))
///         .then(|v| Ok(v * 10))
/// });
///
/// assert_eq!(result, Ok(Ok(20)));
/// ```
pub struct Future<T, E> {
    pub(crate) core: Rc<RefCell<Core<T, E>>>,
}

impl<T, E> Clone for Future<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T: Clone + 'static, E: Reason> Future<T, E> {
    /// Creates a future and runs `producer` synchronously, exactly once.
    ///
    /// The producer receives the future's [`Resolver`]. If it returns
    /// `Err(error)`, the future is rejected with `error`, unless the
    /// producer already resolved it. A panic inside the producer is caught
    /// and rejects the future with [`Panicked`].
    ///
    /// # Panics
    ///
    /// Panics if called outside the context of a runtime or scheduler.
    pub fn new<P>(producer: P) -> Self
    where
        P: FnOnce(Resolver<T, E>) -> Result<(), E>,
    {
        let (future, resolver) = Self::with_resolvers();
        let producer_resolver = resolver.clone();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| producer(producer_resolver)))
            .unwrap_or_else(|payload| Err(E::from(caught(payload))));

        if let Err(error) = outcome {
            resolver.reject(error);
        }

        future
    }

    /// Creates a pending future together with its resolver.
    ///
    /// # Panics
    ///
    /// Panics if called outside the context of a runtime or scheduler.
    pub fn with_resolvers() -> (Self, Resolver<T, E>) {
        Self::pending_on(context::current_scheduler())
    }

    /// Creates a pending future bound to an explicit scheduler.
    pub(crate) fn pending_on(scheduler: Rc<dyn Scheduler>) -> (Self, Resolver<T, E>) {
        let core = Rc::new(RefCell::new(Core::new(scheduler)));
        let resolver = Resolver::new(core.clone());

        (Self { core }, resolver)
    }

    /// Creates a future that is already fulfilled with `value`.
    pub fn resolve(value: T) -> Self {
        Self::from_resolution(Ok(value))
    }

    /// Creates a future that is already rejected with `error`.
    pub fn reject(error: E) -> Self {
        Self::from_resolution(Err(error))
    }

    /// Lifts anything convertible into a [`Resolution`] into a future.
    ///
    /// A future is returned unchanged; values and errors become settled
    /// futures.
    pub fn from_resolution(resolution: impl IntoResolution<T, E>) -> Self {
        match resolution.into_resolution() {
            Resolution::Future(future) => future,
            other => {
                let (future, resolver) = Self::with_resolvers();
                resolver.resolve(other);
                future
            }
        }
    }

    /// Adapts a callback-style API.
    ///
    /// `start` receives a one-shot callback; calling it with `Ok(value)` or
    /// `Err(error)` settles the returned future. A panic inside `start`
    /// rejects it with [`Panicked`], unless the callback already ran.
    ///
    /// ```rust,ignore
    /// let loaded = Future::from_callback(|done| load_script("app.js", done));
    /// ```
    pub fn from_callback<F>(start: F) -> Self
    where
        F: FnOnce(Callback<T, E>),
    {
        let (future, resolver) = Self::with_resolvers();
        let callback_resolver = resolver.clone();
        let started = panic::catch_unwind(AssertUnwindSafe(|| {
            start(Box::new(move |outcome| callback_resolver.settle(outcome)))
        }));

        if let Err(payload) = started {
            resolver.reject(E::from(caught(payload)));
        }

        future
    }

    /// Registers a fulfillment handler.
    ///
    /// The returned child future is settled by whatever `on_fulfilled`
    /// returns. If this future rejects, the child is rejected with the same
    /// error and `on_fulfilled` never runs.
    pub fn then<U, F, R>(&self, on_fulfilled: F) -> Future<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> R + 'static,
        R: IntoResolution<U, E>,
    {
        self.react(move |outcome| match outcome {
            Ok(value) => on_fulfilled(value).into_resolution(),
            Err(error) => Resolution::Error(error),
        })
    }

    /// Registers both a fulfillment and a rejection handler.
    ///
    /// Exactly one of them runs. An error returned by `on_fulfilled` is not
    /// seen by `on_rejected`; it rejects the child.
    pub fn then_else<U, F, G, R, S>(&self, on_fulfilled: F, on_rejected: G) -> Future<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> R + 'static,
        G: FnOnce(E) -> S + 'static,
        R: IntoResolution<U, E>,
        S: IntoResolution<U, E>,
    {
        self.react(move |outcome| match outcome {
            Ok(value) => on_fulfilled(value).into_resolution(),
            Err(error) => on_rejected(error).into_resolution(),
        })
    }

    /// Registers optional handlers.
    ///
    /// A missing handler passes the outcome through to the child unchanged.
    /// With both handlers missing the child simply mirrors this future.
    pub fn then_with(
        &self,
        on_fulfilled: Option<OnFulfilled<T, E>>,
        on_rejected: Option<OnRejected<T, E>>,
    ) -> Future<T, E> {
        self.react(move |outcome| match (outcome, on_fulfilled, on_rejected) {
            (Ok(value), Some(handler), _) => handler(value),
            (Ok(value), None, _) => Resolution::Value(value),
            (Err(error), _, Some(handler)) => handler(error),
            (Err(error), _, None) => Resolution::Error(error),
        })
    }

    /// Registers a rejection handler.
    ///
    /// A fulfilled value passes through untouched. A handler returning
    /// `Ok` recovers the chain.
    pub fn catch<F, R>(&self, on_rejected: F) -> Future<T, E>
    where
        F: FnOnce(E) -> R + 'static,
        R: IntoResolution<T, E>,
    {
        self.react(move |outcome| match outcome {
            Ok(value) => Resolution::Value(value),
            Err(error) => on_rejected(error).into_resolution(),
        })
    }

    /// Registers a cleanup handler that runs on either outcome.
    ///
    /// The original value or error reaches the child unchanged, except:
    /// - an `Err` returned by `on_settled` replaces the outcome,
    /// - a future returned by `on_settled` delays the child until it
    ///   settles; its value is discarded, its error replaces the outcome.
    pub fn finally<U, F, R>(&self, on_settled: F) -> Future<T, E>
    where
        U: Clone + 'static,
        F: FnOnce() -> R + 'static,
        R: IntoResolution<U, E>,
    {
        self.react(move |outcome| match on_settled().into_resolution() {
            Resolution::Value(_) => outcome.into_resolution(),
            Resolution::Error(error) => Resolution::Error(error),
            Resolution::Future(delay) => Resolution::Future(delay.then(move |_| outcome)),
        })
    }

    /// Returns the identifier of this future.
    pub fn id(&self) -> FutureId {
        self.core.borrow().id
    }

    /// Returns the current state.
    pub fn state(&self) -> State {
        self.core.borrow().state()
    }

    pub fn is_settled(&self) -> bool {
        self.state().is_settled()
    }

    /// Returns a copy of the outcome, or `None` while pending.
    pub fn peek(&self) -> Option<Result<T, E>> {
        self.core.borrow().outcome().cloned()
    }

    /// Drives the current runtime until this future settles.
    ///
    /// Microtasks and timers queued on the runtime keep running in their
    /// usual order while waiting. A future being waited on counts as
    /// handled: its rejection is returned, not reported as unhandled.
    ///
    /// # Errors
    ///
    /// - [`Error::NoRuntime`] if no [`Runtime`](crate::Runtime) is current,
    /// - [`Error::Reentrant`] if called from a reaction or timer callback,
    /// - [`Error::Stalled`] if the runtime went idle first,
    /// - [`Error::BudgetExhausted`] if a turn exceeded the microtask budget.
    pub fn wait(&self) -> Result<Result<T, E>, Error> {
        let runtime = context::current_runtime().ok_or(Error::NoRuntime)?;

        if runtime.is_busy() {
            return Err(Error::Reentrant);
        }

        self.core.borrow().mark_handled();

        runtime.drive_until(|| self.is_settled())?;

        self.peek().ok_or(Error::Stalled)
    }

    /// Attaches a raw reaction.
    pub(crate) fn subscribe(&self, reaction: impl FnOnce(Result<T, E>) + 'static) {
        Core::subscribe(&self.core, Box::new(reaction));
    }

    /// Creates a child future settled by `handler` once this one settles.
    ///
    /// A panicking handler rejects the child with [`Panicked`].
    fn react<U, H>(&self, handler: H) -> Future<U, E>
    where
        U: Clone + 'static,
        H: FnOnce(Result<T, E>) -> Resolution<U, E> + 'static,
    {
        let scheduler = self.core.borrow().scheduler.clone();
        let (child, resolver) = Future::pending_on(scheduler);

        self.subscribe(move |outcome| {
            let resolution = panic::catch_unwind(AssertUnwindSafe(|| handler(outcome)))
                .unwrap_or_else(|payload| Resolution::Error(E::from(caught(payload))));

            resolver.resolve(resolution);
        });

        child
    }
}

fn caught(payload: Box<dyn Any + Send>) -> Panicked {
    let panicked = Panicked::from_payload(payload);
    warn!(message = %panicked.message, "callback panicked, rejecting its future");
    panicked
}

impl<T, E> fmt::Debug for Future<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();

        f.debug_struct("Future")
            .field("id", &core.id)
            .field("state", &core.state())
            .finish()
    }
}
