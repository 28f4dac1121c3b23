//! Timers and timer-backed futures.
//!
//! Timers run as macrotasks on the current [`Runtime`](crate::Runtime): the
//! earliest due timer runs once the microtask queue is empty, and the queue
//! is drained again before the next timer. Timers sharing a deadline run in
//! the order they were scheduled.
//!
//! This module provides:
//! - [`set_timeout`], [`set_interval`] and [`clear_timer`] for raw callbacks,
//! - [`sleep`], [`resolve_after`] and [`reject_after`] for futures settled
//!   by a timer,
//! - [`timeout`] for bounding how long a future may stay pending.

mod sleep;
mod timeout;
mod timers;

#[doc(inline)]
pub use sleep::{reject_after, resolve_after, sleep};

#[doc(inline)]
pub use timeout::timeout;

#[doc(inline)]
pub use timers::{TimerId, clear_timer, set_interval, set_timeout};
