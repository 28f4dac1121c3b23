use pactum::time::{reject_after, resolve_after};
use pactum::{Future, RuntimeBuilder};

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[test]
fn test_finally_passes_value_through() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        Future::<i32, String>::resolve(5)
            .finally(|| Ok::<(), String>(()))
            .then(|v| Ok(v))
    });

    assert_eq!(result, Ok(Ok(5)));
}

#[test]
fn test_finally_passes_error_through() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        Future::<String, String>::reject("kept".into())
            .finally(|| Ok::<(), String>(()))
            .catch(|e| Ok(e))
    });

    assert_eq!(result, Ok(Ok("kept".to_string())));
}

#[test]
fn test_finally_return_value_is_discarded() {
    let rt = RuntimeBuilder::new().build();

    let result =
        rt.block_on(|| Future::<i32, String>::resolve(1).finally(|| Ok::<i32, String>(99)));

    assert_eq!(result, Ok(Ok(1)));
}

#[test]
fn test_finally_runs_on_both_outcomes() {
    let rt = RuntimeBuilder::new().build();
    let runs = Rc::new(Cell::new(0));

    let counter = runs.clone();
    let fulfilled = rt.block_on(|| {
        Future::<i32, String>::resolve(1).finally(move || {
            counter.set(counter.get() + 1);
            Ok::<(), String>(())
        })
    });

    let counter = runs.clone();
    let rejected = rt.block_on(|| {
        Future::<i32, String>::reject("r".into()).finally(move || {
            counter.set(counter.get() + 1);
            Ok::<(), String>(())
        })
    });

    assert_eq!(fulfilled, Ok(Ok(1)));
    assert_eq!(rejected, Ok(Err("r".to_string())));
    assert_eq!(runs.get(), 2);
}

#[test]
fn test_finally_error_replaces_outcome() {
    let rt = RuntimeBuilder::new().build();

    let from_value = rt.block_on(|| {
        Future::<i32, String>::resolve(1).finally(|| Err::<(), String>("cleanup".into()))
    });
    let from_error = rt.block_on(|| {
        Future::<i32, String>::reject("original".into())
            .finally(|| Err::<(), String>("cleanup".into()))
    });

    assert_eq!(from_value, Ok(Err("cleanup".to_string())));
    assert_eq!(from_error, Ok(Err("cleanup".to_string())));
}

#[test]
fn test_finally_future_delays_settlement() {
    let rt = RuntimeBuilder::new().build();
    let start = Instant::now();

    let result = rt.block_on(|| {
        Future::<i32, String>::resolve(7)
            .finally(|| resolve_after::<&str, String>(Duration::from_millis(30), "discarded"))
    });

    assert_eq!(result, Ok(Ok(7)));
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[test]
fn test_finally_future_rejection_replaces_outcome() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        Future::<i32, String>::resolve(7)
            .finally(|| reject_after::<(), String>(Duration::from_millis(5), "late failure".into()))
    });

    assert_eq!(result, Ok(Err("late failure".to_string())));
}
