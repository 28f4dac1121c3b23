use super::Future;
use crate::error::{CycleError, Panicked};

use std::fmt;

/// Requirements on a rejection reason.
///
/// Reasons are cloned into every reaction, rendered with `Debug` for
/// diagnostics, and must be able to express a [`CycleError`] and a
/// [`Panicked`] callback.
///
/// Implemented automatically; `String`, `&'static str`, [`Error`](crate::Error)
/// and [`AggregateError`](crate::AggregateError) qualify out of the box.
pub trait Reason: Clone + fmt::Debug + From<CycleError> + From<Panicked> + 'static {}

impl<E> Reason for E where
    E: Clone + fmt::Debug + From<CycleError> + From<Panicked> + 'static
{
}

/// What a future gets resolved with.
///
/// This is the tagged form of everything a producer or a reaction can hand
/// back: a plain value, an error, or another future to adopt.
#[derive(Debug)]
pub enum Resolution<T, E> {
    Value(T),
    Error(E),
    Future(Future<T, E>),
}

impl<T, E> Resolution<T, E> {
    /// Returns `true` when the resolution defers to another future.
    pub fn is_future(&self) -> bool {
        matches!(self, Resolution::Future(_))
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Resolution::Value(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Resolution::Error(_))
    }
}

/// Conversion into a [`Resolution`].
///
/// Callbacks passed to [`then`](Future::then), [`catch`](Future::catch) and
/// friends return any type implementing this trait:
///
/// - `Result<T, E>`: `Ok` fulfills, `Err` rejects,
/// - `Future<T, E>`: the child adopts that future's outcome,
/// - `Resolution<T, E>`: used as is.
pub trait IntoResolution<T, E> {
    fn into_resolution(self) -> Resolution<T, E>;
}

impl<T, E> IntoResolution<T, E> for Resolution<T, E> {
    fn into_resolution(self) -> Resolution<T, E> {
        self
    }
}

impl<T, E> IntoResolution<T, E> for Result<T, E> {
    fn into_resolution(self) -> Resolution<T, E> {
        match self {
            Ok(value) => Resolution::Value(value),
            Err(error) => Resolution::Error(error),
        }
    }
}

impl<T, E> IntoResolution<T, E> for Future<T, E> {
    fn into_resolution(self) -> Resolution<T, E> {
        Resolution::Future(self)
    }
}
