//! Unhandled rejection reporting.
//!
//! A future that is rejected while nothing listens to it, and that still
//! has no reaction attached once the scheduler has drained its queued work,
//! produces an [`UnhandledRejection`] event. Events go to every hook
//! registered with [`on_unhandled_rejection`] and, unless disabled in the
//! [`RuntimeBuilder`](crate::RuntimeBuilder), to the `tracing` log.
//!
//! Hooks are process-wide. They are registered and removed explicitly.

use crate::future::FutureId;

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

type Hook = Arc<dyn Fn(&UnhandledRejection) + Send + Sync>;

/// Registered hooks, in registration order.
static HOOKS: Mutex<Vec<(HookId, Hook)>> = Mutex::new(Vec::new());

static NEXT_HOOK: AtomicU64 = AtomicU64::new(1);

/// A rejection that was never observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnhandledRejection {
    /// The rejected future.
    pub future: FutureId,

    /// `Debug` rendering of the rejection reason.
    pub reason: String,
}

/// Handle returned by [`on_unhandled_rejection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// Registers a process-wide unhandled rejection listener.
///
/// The listener is called once per unhandled rejection, on the thread
/// running the event loop that detected it. Keep the returned id to remove
/// the listener with [`remove_unhandled_rejection_hook`].
pub fn on_unhandled_rejection<F>(listener: F) -> HookId
where
    F: Fn(&UnhandledRejection) + Send + Sync + 'static,
{
    let id = HookId(NEXT_HOOK.fetch_add(1, Ordering::Relaxed));

    HOOKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push((id, Arc::new(listener)));

    id
}

/// Removes a listener. Returns `false` if it was already removed.
pub fn remove_unhandled_rejection_hook(id: HookId) -> bool {
    let mut hooks = HOOKS.lock().unwrap_or_else(PoisonError::into_inner);
    let before = hooks.len();
    hooks.retain(|(hook, _)| *hook != id);

    hooks.len() != before
}

/// A rejection waiting to be checked once the current work drains.
///
/// Created when a future is rejected with no reaction attached, and handed
/// to [`Scheduler::track_rejection`](crate::runtime::Scheduler::track_rejection).
/// Attaching a reaction to the future later flips [`is_handled`](Self::is_handled).
pub struct PendingRejection {
    event: UnhandledRejection,
    handled: Rc<Cell<bool>>,
}

impl PendingRejection {
    pub(crate) fn new(future: FutureId, reason: String, handled: Rc<Cell<bool>>) -> Self {
        Self {
            event: UnhandledRejection { future, reason },
            handled,
        }
    }

    pub fn future(&self) -> FutureId {
        self.event.future
    }

    /// Returns `true` once any reaction was attached to the future.
    pub fn is_handled(&self) -> bool {
        self.handled.get()
    }

    /// Reports the rejection if it is still unhandled.
    ///
    /// Returns `true` if an event was emitted.
    pub fn report(self) -> bool {
        self.report_with(true)
    }

    pub(crate) fn report_with(self, log: bool) -> bool {
        if self.is_handled() {
            return false;
        }

        if log {
            warn!(
                future = %self.event.future,
                reason = %self.event.reason,
                "unhandled rejection"
            );
        }

        dispatch(&self.event);
        true
    }
}

/// Calls every registered hook with `event`.
///
/// The hook list is copied first so listeners may register or remove
/// hooks themselves.
fn dispatch(event: &UnhandledRejection) {
    let hooks: Vec<Hook> = HOOKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .map(|(_, hook)| hook.clone())
        .collect();

    for hook in hooks {
        hook(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handled_rejections_are_not_reported() {
        let handled = Rc::new(Cell::new(false));
        let rejection = PendingRejection::new(FutureId::next(), "\"boom\"".into(), handled.clone());

        handled.set(true);

        assert!(!rejection.report_with(false));
    }

    #[test]
    fn hooks_receive_events_until_removed() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let future = FutureId::next();

        let hook = on_unhandled_rejection(move |event| {
            if event.future == future {
                sink.lock().unwrap().push(event.reason.clone());
            }
        });

        let report = || PendingRejection::new(future, "x".into(), Rc::new(Cell::new(false)));

        assert!(report().report_with(false));
        assert!(remove_unhandled_rejection_hook(hook));
        assert!(!remove_unhandled_rejection_hook(hook));
        assert!(report().report_with(false));

        assert_eq!(*seen.lock().unwrap(), vec!["x".to_string()]);
    }
}
