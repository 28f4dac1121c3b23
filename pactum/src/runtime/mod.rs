//! The event loop.
//!
//! This module contains the [`Scheduler`] contract that futures rely on and
//! the [`Runtime`], the single-threaded event loop implementing it.
//!
//! It is responsible for:
//! - running reactions in FIFO order, never inside the call that queued them,
//! - running timers once the microtask queue is empty,
//! - reporting rejections that nobody handled,
//! - tracking the current runtime or scheduler of each thread.
//!
//! Most users only build a runtime with [`RuntimeBuilder`](crate::RuntimeBuilder)
//! and call [`Runtime::block_on`] or [`Runtime::run`]. A custom scheduler can
//! be installed with [`enter`].

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod core;
pub(crate) mod queue;
pub(crate) mod scheduler;
pub(crate) mod timer;

pub use self::core::Runtime;
pub use builder::{
    DEFAULT_MAX_MICROTASKS_PER_TURN, ENV_LOG_UNHANDLED_REJECTIONS, ENV_MAX_MICROTASKS_PER_TURN,
    RuntimeBuilder,
};
pub use context::enter;
pub use scheduler::{Microtask, Scheduler};
