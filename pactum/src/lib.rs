//! # Pactum
//!
//! **Pactum** is a single-threaded deferred-value engine for Rust: a
//! [`Future<T, E>`] is a value that is not known yet, settles exactly once,
//! and drives the computations chained on it.
//!
//! `pactum::Future` is not [`std::future::Future`]. Nothing is polled;
//! reactions registered with [`then`](Future::then),
//! [`catch`](Future::catch) and [`finally`](Future::finally) are queued on a
//! [`Scheduler`](runtime::Scheduler) and run later, in order.
//!
//! The crate provides:
//!
//! - **Futures** with chaining, error propagation, flattening of returned
//!   futures and cycle detection
//! - **Combinators**: [`all`](Future::all), [`race`](Future::race),
//!   [`all_settled`](Future::all_settled) and [`any`](Future::any)
//! - An **event loop**, [`Runtime`], with a FIFO microtask queue and timers
//! - **Unhandled rejection** reporting through [`on_unhandled_rejection`]
//! - **Ergonomic macros**: `#[pactum::main]` and `#[pactum::test]`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pactum::Future;
//!
//! #[pactum::main]
//! fn main() {
//!     Future::<i32, String>::resolve(1)
//!         .then(|v| Ok(v + 1))
//!         .then(|v| Ok(v * 10))
//!         .then(|v| {
//!             println!("{v}");
//!             Ok(())
//!         });
//! }
//! ```
//!
//! ## Modules
//!
//! - [`runtime`]: the event loop and the scheduler contract
//! - [`time`]: timers, sleep and timeout

mod combinator;
mod error;
mod future;
mod rejection;
mod utils;

pub mod runtime;
pub mod time;

pub use error::{AggregateError, ConfigError, CycleError, Elapsed, Error, Panicked};
pub use future::{
    Callback, Future, FutureId, IntoResolution, OnFulfilled, OnRejected, Reason, Resolution,
    Resolver, State,
};
pub use rejection::{
    HookId, PendingRejection, UnhandledRejection, on_unhandled_rejection,
    remove_unhandled_rejection_hook,
};
pub use runtime::{Runtime, RuntimeBuilder};

pub use pactum_macros::*;
