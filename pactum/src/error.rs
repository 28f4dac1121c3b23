use std::any::Any;

use thiserror::Error;

/// Errors produced by the runtime itself.
///
/// `Error` also implements [`Reason`](crate::Reason), so it can be used
/// directly as the rejection type of a [`Future`](crate::Future).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The event loop ran out of microtasks and timers while the awaited
    /// future was still pending.
    #[error("event loop went idle while the future was still pending")]
    Stalled,

    /// A single turn ran more microtasks than the configured budget.
    #[error("microtask budget of {limit} exhausted in a single turn")]
    BudgetExhausted { limit: usize },

    /// The event loop was driven from inside one of its own callbacks.
    #[error("event loop cannot be driven from inside a reaction or timer callback")]
    Reentrant,

    /// The current thread has no runtime installed.
    #[error("no runtime is installed on the current thread")]
    NoRuntime,

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error(transparent)]
    Elapsed(#[from] Elapsed),

    #[error(transparent)]
    Panicked(#[from] Panicked),

    /// A free-form rejection reason.
    #[error("{0}")]
    Rejected(String),
}

/// A future was resolved with itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("chaining cycle detected: a future cannot be resolved with itself")]
pub struct CycleError;

/// The deadline of a [`timeout`](crate::time::timeout) passed before the
/// inner future settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline has elapsed")]
pub struct Elapsed;

/// A producer or reaction panicked.
///
/// The panic is caught at the callback boundary and the future the callback
/// was settling is rejected with this error instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("callback panicked: {message}")]
pub struct Panicked {
    /// The panic message, when the payload was a string.
    pub message: String,
}

impl Panicked {
    pub(crate) fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_owned()
        };

        Self { message }
    }
}

/// Every input of [`Future::any`](crate::Future::any) was rejected.
///
/// The errors are kept in input order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("all {} futures were rejected", .errors.len())]
pub struct AggregateError<E> {
    pub errors: Vec<E>,
}

/// An environment override could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: expected {expected}, got {value:?}")]
    InvalidValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

const CYCLE_MESSAGE: &str = "chaining cycle detected: a future cannot be resolved with itself";
const ELAPSED_MESSAGE: &str = "deadline has elapsed";
const PANICKED_MESSAGE: &str = "callback panicked";

impl From<CycleError> for String {
    fn from(_: CycleError) -> Self {
        CYCLE_MESSAGE.to_owned()
    }
}

impl From<CycleError> for &'static str {
    fn from(_: CycleError) -> Self {
        CYCLE_MESSAGE
    }
}

impl<E: From<CycleError>> From<CycleError> for AggregateError<E> {
    fn from(err: CycleError) -> Self {
        Self {
            errors: vec![E::from(err)],
        }
    }
}

impl From<Elapsed> for String {
    fn from(_: Elapsed) -> Self {
        ELAPSED_MESSAGE.to_owned()
    }
}

impl From<Elapsed> for &'static str {
    fn from(_: Elapsed) -> Self {
        ELAPSED_MESSAGE
    }
}

impl From<Panicked> for String {
    fn from(err: Panicked) -> Self {
        err.to_string()
    }
}

/// The panic message is dropped: a `&'static str` cannot borrow it.
impl From<Panicked> for &'static str {
    fn from(_: Panicked) -> Self {
        PANICKED_MESSAGE
    }
}

impl<E: From<Panicked>> From<Panicked> for AggregateError<E> {
    fn from(err: Panicked) -> Self {
        Self {
            errors: vec![E::from(err)],
        }
    }
}

impl From<String> for Error {
    fn from(reason: String) -> Self {
        Error::Rejected(reason)
    }
}

impl From<&str> for Error {
    fn from(reason: &str) -> Self {
        Error::Rejected(reason.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_is_shared_by_string_reasons() {
        let owned: String = CycleError.into();
        let borrowed: &'static str = CycleError.into();

        assert_eq!(owned, CycleError.to_string());
        assert_eq!(borrowed, CycleError.to_string());
    }

    #[test]
    fn panic_payloads_keep_string_messages() {
        let borrowed = Panicked::from_payload(Box::new("index out of bounds"));
        let owned = Panicked::from_payload(Box::new(String::from("bad state")));
        let opaque = Panicked::from_payload(Box::new(7_u32));

        assert_eq!(borrowed.message, "index out of bounds");
        assert_eq!(owned.to_string(), "callback panicked: bad state");
        assert_eq!(opaque.message, "unknown panic");

        let reason: String = owned.into();
        assert_eq!(reason, "callback panicked: bad state");
    }

    #[test]
    fn aggregate_error_reports_count() {
        let err = AggregateError {
            errors: vec!["a", "b", "c"],
        };

        assert_eq!(err.to_string(), "all 3 futures were rejected");
    }

    #[test]
    fn runtime_errors_wrap_reasons() {
        assert_eq!(Error::from(CycleError), Error::Cycle(CycleError));
        assert_eq!(Error::from("boom"), Error::Rejected("boom".into()));
        assert_eq!(Error::from(Elapsed).to_string(), "deadline has elapsed");
    }
}
