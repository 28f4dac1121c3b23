use super::Future;
use super::core::Core;
use super::resolution::{IntoResolution, Reason, Resolution};
use crate::error::CycleError;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::debug;

/// The settlement capability of a [`Future`].
///
/// A resolver is handed to producers by [`Future::new`] and returned by
/// [`Future::with_resolvers`]. It can be cloned freely; all clones share the
/// same "first call wins" guard.
///
/// Once any clone has resolved the future, every later call on any clone is
/// silently ignored. This includes the case where the future was resolved
/// with another, still pending future: the resolver is locked to that
/// future's outcome.
pub struct Resolver<T, E> {
    core: Rc<RefCell<Core<T, E>>>,
    resolved: Rc<Cell<bool>>,
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            resolved: self.resolved.clone(),
        }
    }
}

impl<T: Clone + 'static, E: Reason> Resolver<T, E> {
    pub(crate) fn new(core: Rc<RefCell<Core<T, E>>>) -> Self {
        Self {
            core,
            resolved: Rc::new(Cell::new(false)),
        }
    }

    /// Fulfills the future with `value`.
    pub fn fulfill(&self, value: T) {
        self.resolve(Resolution::Value(value));
    }

    /// Rejects the future with `error`.
    pub fn reject(&self, error: E) {
        self.resolve(Resolution::Error(error));
    }

    /// Fulfills on `Ok`, rejects on `Err`.
    pub fn settle(&self, outcome: Result<T, E>) {
        self.resolve(outcome);
    }

    /// Resolves the future with anything convertible into a [`Resolution`].
    ///
    /// Resolving with another future makes this one adopt its eventual
    /// outcome. Resolving a future with itself rejects it with a
    /// [`CycleError`].
    pub fn resolve(&self, resolution: impl IntoResolution<T, E>) {
        if self.resolved.replace(true) {
            return;
        }

        match resolution.into_resolution() {
            Resolution::Value(value) => {
                Core::settle(&self.core, Ok(value));
            }
            Resolution::Error(error) => {
                Core::settle(&self.core, Err(error));
            }
            Resolution::Future(inner) => self.adopt(inner),
        }
    }

    /// Returns `true` once any clone of this resolver has been used.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get()
    }

    /// Returns the future this resolver settles.
    pub fn future(&self) -> Future<T, E> {
        Future {
            core: self.core.clone(),
        }
    }

    fn adopt(&self, inner: Future<T, E>) {
        if Rc::ptr_eq(&inner.core, &self.core) {
            debug!(future = %self.core.borrow().id, "future resolved with itself");
            Core::settle(&self.core, Err(E::from(CycleError)));
            return;
        }

        debug!(
            future = %self.core.borrow().id,
            adopted = %inner.id(),
            "future adopting another future"
        );

        let core = self.core.clone();
        Core::subscribe(
            &inner.core,
            Box::new(move |outcome| {
                Core::settle(&core, outcome);
            }),
        );
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("future", &self.core.borrow().id)
            .field("resolved", &self.resolved.get())
            .finish()
    }
}
