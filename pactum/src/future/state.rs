use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of process-unique future identifiers.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Observable lifecycle state of a [`Future`](crate::Future).
///
/// A future starts `Pending` and moves to exactly one of the two terminal
/// states. Once terminal, the state never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Not settled yet. Reactions registered now are queued.
    Pending,

    /// Settled with a value.
    Fulfilled,

    /// Settled with an error.
    Rejected,
}

impl State {
    /// Returns `true` for both terminal states.
    pub fn is_settled(self) -> bool {
        !matches!(self, State::Pending)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Pending => f.write_str("pending"),
            State::Fulfilled => f.write_str("fulfilled"),
            State::Rejected => f.write_str("rejected"),
        }
    }
}

/// Identifier of a future, unique for the lifetime of the process.
///
/// Identifiers are what diagnostics (logs, unhandled rejection events)
/// use to refer to a future without holding on to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FutureId(u64);

impl FutureId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw numeric identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FutureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "future#{}", self.0)
    }
}
