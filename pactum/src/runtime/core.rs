use super::builder::Config;
use super::context;
use super::queue::MicrotaskQueue;
use super::scheduler::{Microtask, Scheduler};
use super::timer::{TimerQueue, TimerTask};
use crate::error::Error;
use crate::future::{Future, Reason};
use crate::rejection::PendingRejection;
use crate::time::TimerId;

use std::cell::{Cell, RefCell};
use std::mem;
use std::rc::Rc;
use std::thread;
use std::time::Instant;

use tracing::{trace, warn};

/// The main runtime handle.
///
/// `Runtime` is a single-threaded event loop:
/// - a FIFO microtask queue running future reactions,
/// - a timer queue running [`time`](crate::time) callbacks as macrotasks,
/// - unhandled rejection tracking, checked each time the microtask queue
///   drains.
///
/// Each turn drains every microtask, reports rejections that are still
/// unhandled, then runs the earliest due timer, sleeping the thread until
/// its deadline if needed.
///
/// Dropping the runtime discards every queued microtask and timer.
pub struct Runtime {
    shared: Rc<Shared>,
}

impl Runtime {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            shared: Rc::new(Shared::new(config)),
        }
    }

    /// Runs `f` with this runtime as the current one.
    ///
    /// Futures and timers created inside `f` are bound to this runtime.
    /// Nothing is driven: reactions stay queued until
    /// [`block_on`](Self::block_on), [`run`](Self::run) or
    /// [`Future::wait`] runs them.
    pub fn enter<R>(&self, f: impl FnOnce() -> R) -> R {
        context::enter_runtime(self.shared.clone(), f)
    }

    /// Builds a future inside the runtime and drives the loop until it
    /// settles.
    ///
    /// # Errors
    ///
    /// - [`Error::Stalled`] if no queued work can settle the future,
    /// - [`Error::BudgetExhausted`] if a turn ran too many microtasks,
    /// - [`Error::Reentrant`] if called from one of this runtime's callbacks.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let runtime = RuntimeBuilder::new().build();
    /// let result = runtime.block_on(|| Future::<i32, String>::resolve(42));
    ///
    /// assert_eq!(result, Ok(Ok(42)));
    /// ```
    pub fn block_on<T, E, F>(&self, f: F) -> Result<Result<T, E>, Error>
    where
        T: Clone + 'static,
        E: Reason,
        F: FnOnce() -> Future<T, E>,
    {
        self.enter(|| f().wait())
    }

    /// Runs `f` inside the runtime, then drives the loop until no
    /// microtask or timer is left.
    ///
    /// # Errors
    ///
    /// Same as [`block_on`](Self::block_on), except that going idle is the
    /// normal way to finish.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> Result<R, Error> {
        self.enter(|| {
            let out = f();
            self.shared.drive_until(|| false)?;
            Ok(out)
        })
    }

    /// Number of microtasks waiting to run.
    pub fn pending_microtasks(&self) -> usize {
        self.shared.microtasks.len()
    }

    /// Number of timers that have not fired or been cleared.
    pub fn pending_timers(&self) -> usize {
        self.shared.timers.borrow().len()
    }
}

impl Drop for Runtime {
    /// Discards queued work.
    ///
    /// Queued reactions hold futures, which hold the runtime; dropping them
    /// here breaks that cycle.
    fn drop(&mut self) {
        self.shared.shutdown();
    }
}

/// State shared between a [`Runtime`] and the futures bound to it.
pub(crate) struct Shared {
    microtasks: MicrotaskQueue,
    timers: RefCell<TimerQueue>,
    rejections: RefCell<Vec<PendingRejection>>,

    /// Set while one of this runtime's callbacks is running.
    in_callback: Cell<bool>,

    config: Config,
}

impl Shared {
    fn new(config: Config) -> Self {
        Self {
            microtasks: MicrotaskQueue::new(),
            timers: RefCell::new(TimerQueue::new()),
            rejections: RefCell::new(Vec::new()),
            in_callback: Cell::new(false),
            config,
        }
    }

    /// Drives the loop until `done` returns `true` or nothing is left to run.
    ///
    /// `done` is checked after every microtask drain, so a settled future
    /// always has its own reactions run before this returns.
    pub(crate) fn drive_until(&self, done: impl Fn() -> bool) -> Result<(), Error> {
        if self.is_busy() {
            return Err(Error::Reentrant);
        }

        loop {
            self.drain_microtasks()?;

            if done() || !self.run_next_timer() {
                return Ok(());
            }
        }
    }

    pub(crate) fn add_timer(&self, deadline: Instant, task: TimerTask) -> TimerId {
        let id = self.timers.borrow_mut().insert(deadline, task);
        trace!(timer = %id, "timer scheduled");
        id
    }

    pub(crate) fn cancel_timer(&self, id: TimerId) -> bool {
        let cancelled = self.timers.borrow_mut().cancel(id);

        if cancelled {
            trace!(timer = %id, "timer cleared");
        }

        cancelled
    }

    /// Runs microtasks until the queue is empty, reporting unhandled
    /// rejections each time it drains.
    fn drain_microtasks(&self) -> Result<(), Error> {
        let limit = self.config.max_microtasks_per_turn;
        let mut ran = 0;

        loop {
            while !self.microtasks.is_empty() {
                if ran >= limit {
                    warn!(limit, "microtask budget exhausted");
                    return Err(Error::BudgetExhausted { limit });
                }

                let Some(task) = self.microtasks.pop() else {
                    break;
                };

                ran += 1;
                self.run_callback(task);
            }

            self.report_rejections();

            if self.microtasks.is_empty() {
                if ran > 0 {
                    trace!(ran, "microtask queue drained");
                }

                return Ok(());
            }
        }
    }

    fn report_rejections(&self) {
        let pending = mem::take(&mut *self.rejections.borrow_mut());

        for rejection in pending {
            rejection.report_with(self.config.log_unhandled_rejections);
        }
    }

    /// Runs the earliest timer, waiting for its deadline if needed.
    ///
    /// Returns `false` if no timer is left.
    fn run_next_timer(&self) -> bool {
        let Some(deadline) = self.timers.borrow_mut().next_deadline() else {
            return false;
        };

        let now = Instant::now();
        if deadline > now {
            let wait = deadline - now;
            trace!(?wait, "sleeping until next timer");
            thread::sleep(wait);
        }

        let due = self.timers.borrow_mut().pop_due(Instant::now());
        let Some((id, task)) = due else {
            return true;
        };

        trace!(timer = %id, "timer fired");

        match task {
            TimerTask::Once(callback) => self.run_callback(callback),
            TimerTask::Repeat {
                mut callback,
                period,
            } => {
                self.run_callback(|| callback());
                self.timers.borrow_mut().restore(id, callback, period);
            }
        }

        true
    }

    /// Whether one of this runtime's callbacks is running.
    pub(crate) fn is_busy(&self) -> bool {
        self.in_callback.get()
    }

    fn run_callback(&self, callback: impl FnOnce()) {
        let _guard = CallbackGuard::enter(&self.in_callback);
        callback();
    }

    fn shutdown(&self) {
        let dropped = self.microtasks.clear();

        let mut timers = self.timers.borrow_mut();
        let pending_timers = timers.len();
        timers.clear();
        drop(timers);

        self.rejections.borrow_mut().clear();

        if dropped > 0 || pending_timers > 0 {
            trace!(
                microtasks = dropped,
                timers = pending_timers,
                "runtime dropped with queued work"
            );
        }
    }
}

impl Scheduler for Shared {
    fn enqueue(&self, task: Microtask) {
        self.microtasks.push(task);
    }

    /// Defers the check until the microtask queue drains.
    fn track_rejection(&self, rejection: PendingRejection) {
        self.rejections.borrow_mut().push(rejection);
    }
}

/// Marks a runtime as busy running one of its callbacks.
struct CallbackGuard<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl<'a> CallbackGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        Self {
            previous: flag.replace(true),
            flag,
        }
    }
}

impl Drop for CallbackGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}
