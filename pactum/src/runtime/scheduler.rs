use crate::rejection::PendingRejection;

/// A unit of deferred work.
pub type Microtask = Box<dyn FnOnce()>;

/// The "run this later" service futures rely on.
///
/// Implementations must honour two rules:
/// - a task never runs inside the `enqueue` call that submitted it,
/// - tasks run in the order they were enqueued.
///
/// [`Runtime`](crate::Runtime) is the implementation shipped with the crate.
/// Any other scheduler can be installed with [`enter`](super::enter).
pub trait Scheduler {
    /// Queues `task` to run after everything already queued.
    fn enqueue(&self, task: Microtask);

    /// Takes a rejection nobody was listening to when it happened.
    ///
    /// The scheduler should report it only if it is still unhandled once
    /// the currently queued work has run. The default implementation
    /// queues the check as a regular task.
    ///
    /// That check is queued when the future settles, so it only sees the
    /// work queued before it. A handler attached by a task enqueued later
    /// in the same batch arrives too late, and the rejection is reported
    /// anyway. Schedulers that know when a batch ends should override this
    /// and check once the queue is empty, as [`Runtime`](crate::Runtime)
    /// does.
    fn track_rejection(&self, rejection: PendingRejection) {
        self.enqueue(Box::new(move || {
            rejection.report();
        }));
    }
}
