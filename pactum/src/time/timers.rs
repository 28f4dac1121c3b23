use crate::runtime::context;
use crate::runtime::core::Shared;
use crate::runtime::timer::TimerTask;

use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Identifier of a timer created by [`set_timeout`] or [`set_interval`].
///
/// Timeouts and intervals share the same id space, so either kind can be
/// cleared with [`clear_timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId {
    key: usize,
    generation: u64,
}

impl TimerId {
    pub(crate) fn new(key: usize, generation: u64) -> Self {
        Self { key, generation }
    }

    pub(crate) fn key(self) -> usize {
        self.key
    }

    pub(crate) fn generation(self) -> u64 {
        self.generation
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.generation)
    }
}

/// Runs `callback` once, after at least `delay`.
///
/// # Panics
///
/// Panics if called outside the context of a runtime.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// set_timeout(Duration::from_millis(100), || println!("later"));
/// ```
pub fn set_timeout<F>(delay: Duration, callback: F) -> TimerId
where
    F: FnOnce() + 'static,
{
    current().add_timer(Instant::now() + delay, TimerTask::Once(Box::new(callback)))
}

/// Runs `callback` every `period` until the timer is cleared.
///
/// The next run is scheduled `period` after the previous one finished.
/// An interval keeps the runtime busy: [`Runtime::run`](crate::Runtime::run)
/// does not return while one is active.
///
/// # Panics
///
/// Panics if called outside the context of a runtime.
pub fn set_interval<F>(period: Duration, callback: F) -> TimerId
where
    F: FnMut() + 'static,
{
    current().add_timer(
        Instant::now() + period,
        TimerTask::Repeat {
            callback: Box::new(callback),
            period,
        },
    )
}

/// Clears a timer of the current runtime.
///
/// Clearing a timer that already fired, was already cleared, or belongs to
/// no runtime is a no-op returning `false`. An interval may clear itself
/// from its own callback.
pub fn clear_timer(id: TimerId) -> bool {
    context::current_runtime().is_some_and(|runtime| runtime.cancel_timer(id))
}

fn current() -> Rc<Shared> {
    context::current_runtime().expect("timers must be created within the context of a runtime")
}
