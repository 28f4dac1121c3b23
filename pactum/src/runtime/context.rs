use super::core::Shared;
use super::scheduler::Scheduler;

use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    /// Scheduler used by futures created on this thread.
    ///
    /// Set while inside [`enter`] or a [`Runtime`](crate::Runtime) call, so
    /// that constructors like [`Future::resolve`](crate::Future::resolve) do
    /// not need a scheduler argument.
    static CURRENT_SCHEDULER: RefCell<Option<Rc<dyn Scheduler>>> =
        const { RefCell::new(None) };

    /// Event loop that can be driven from this thread.
    ///
    /// Only set by a [`Runtime`](crate::Runtime); a custom scheduler
    /// installed with [`enter`] clears it.
    static CURRENT_RUNTIME: RefCell<Option<Rc<Shared>>> =
        const { RefCell::new(None) };
}

/// Restores the previous context when dropped, even while unwinding.
struct ContextGuard {
    scheduler: Option<Rc<dyn Scheduler>>,
    runtime: Option<Rc<Shared>>,
}

impl ContextGuard {
    fn install(scheduler: Rc<dyn Scheduler>, runtime: Option<Rc<Shared>>) -> Self {
        Self {
            scheduler: CURRENT_SCHEDULER.with(|s| s.replace(Some(scheduler))),
            runtime: CURRENT_RUNTIME.with(|r| r.replace(runtime)),
        }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_RUNTIME.with(|r| r.replace(self.runtime.take()));
        CURRENT_SCHEDULER.with(|s| s.replace(self.scheduler.take()));
    }
}

/// Runs `f` with `scheduler` as the current scheduler.
///
/// Futures created inside `f` (and every future derived from them) hand
/// their reactions to `scheduler`. Running those reactions is up to the
/// caller; [`Future::wait`](crate::Future::wait) is not available here.
///
/// # Examples
///
/// ```rust,ignore
/// struct Manual(MicrotaskQueue);
///
/// impl Scheduler for Manual {
///     fn enqueue(&self, task: Microtask) {
///         self.0.push(task);
///     }
/// }
///
/// let scheduler = Rc::new(Manual::default());
/// let future = pactum::runtime::enter(scheduler.clone(), || {
///     Future::<i32, String>::resolve(1).then(|v| Ok(v + 1))
/// });
/// ```
pub fn enter<R>(scheduler: Rc<dyn Scheduler>, f: impl FnOnce() -> R) -> R {
    let _guard = ContextGuard::install(scheduler, None);
    f()
}

/// Installs a runtime as both the current scheduler and the current loop.
pub(crate) fn enter_runtime<R>(shared: Rc<Shared>, f: impl FnOnce() -> R) -> R {
    let _guard = ContextGuard::install(shared.clone(), Some(shared));
    f()
}

/// Returns the current scheduler.
///
/// # Panics
///
/// Panics if no scheduler is installed on this thread.
pub(crate) fn current_scheduler() -> Rc<dyn Scheduler> {
    CURRENT_SCHEDULER.with(|s| {
        s.borrow()
            .clone()
            .expect("futures must be created within the context of a runtime")
    })
}

pub(crate) fn current_runtime() -> Option<Rc<Shared>> {
    CURRENT_RUNTIME.with(|r| r.borrow().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::scheduler::Microtask;

    struct Discard;

    impl Scheduler for Discard {
        fn enqueue(&self, _task: Microtask) {}
    }

    #[test]
    fn context_is_restored_after_enter() {
        let scheduler: Rc<dyn Scheduler> = Rc::new(Discard);

        enter(scheduler.clone(), || {
            assert!(Rc::ptr_eq(&current_scheduler(), &scheduler));
            assert!(current_runtime().is_none());
        });

        assert!(CURRENT_SCHEDULER.with(|s| s.borrow().is_none()));
    }

    #[test]
    fn nested_enter_restores_outer_scheduler() {
        let outer: Rc<dyn Scheduler> = Rc::new(Discard);
        let inner: Rc<dyn Scheduler> = Rc::new(Discard);

        enter(outer.clone(), || {
            enter(inner.clone(), || {
                assert!(Rc::ptr_eq(&current_scheduler(), &inner));
            });

            assert!(Rc::ptr_eq(&current_scheduler(), &outer));
        });
    }

    #[test]
    #[should_panic(expected = "within the context of a runtime")]
    fn current_scheduler_panics_outside_a_context() {
        let _ = current_scheduler();
    }
}
