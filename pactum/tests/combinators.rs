use pactum::time::{reject_after, resolve_after};
use pactum::{AggregateError, Error, Future, Resolution, RuntimeBuilder};

use std::time::Duration;

#[test]
fn test_all_collects_values_in_input_order() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        let (f1, r1) = Future::<i32, String>::with_resolvers();
        let (f2, r2) = Future::<i32, String>::with_resolvers();
        let (f3, r3) = Future::<i32, String>::with_resolvers();

        let all = Future::all([f1, f2, f3]);

        r3.fulfill(3);
        r2.fulfill(2);
        r1.fulfill(1);

        all
    });

    assert_eq!(result, Ok(Ok(vec![1, 2, 3])));
}

#[test]
fn test_all_rejects_with_first_rejection() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        Future::all([
            Future::<i32, String>::resolve(1),
            Future::resolve(2),
            Future::reject("x".into()),
        ])
    });

    assert_eq!(result, Ok(Err("x".to_string())));
}

#[test]
fn test_all_short_circuits_on_rejection() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        let rejected = Future::<i32, String>::reject("first".into());
        let (never, _resolver) = Future::<i32, String>::with_resolvers();

        Future::all([rejected, never])
    });

    assert_eq!(result, Ok(Err("first".to_string())));
}

#[test]
fn test_all_of_nothing_is_empty() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| Future::<i32, String>::all(Vec::<Future<i32, String>>::new()));

    assert_eq!(result, Ok(Ok(Vec::new())));
}

#[test]
fn test_all_accepts_plain_values() {
    let rt = RuntimeBuilder::new().build();

    let results = rt.block_on(|| Future::<i32, String>::all([Ok(1), Ok(2)]));
    let mixed = rt.block_on(|| {
        Future::<i32, String>::all(vec![
            Resolution::Value(1),
            Resolution::Future(resolve_after(Duration::from_millis(5), 2)),
            Resolution::Value(3),
        ])
    });

    assert_eq!(results, Ok(Ok(vec![1, 2])));
    assert_eq!(mixed, Ok(Ok(vec![1, 2, 3])));
}

#[test]
fn test_race_settles_with_first_outcome() {
    let rt = RuntimeBuilder::new().build();

    let fulfilled = rt.block_on(|| {
        Future::race([
            resolve_after::<&str, String>(Duration::from_millis(40), "slow"),
            resolve_after(Duration::from_millis(5), "fast"),
        ])
    });

    let rejected = rt.block_on(|| {
        Future::race([
            resolve_after::<&str, String>(Duration::from_millis(40), "slow"),
            reject_after(Duration::from_millis(5), "failed".to_string()),
        ])
    });

    assert_eq!(fulfilled, Ok(Ok("fast")));
    assert_eq!(rejected, Ok(Err("failed".to_string())));
}

#[test]
fn test_race_of_nothing_never_settles() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| Future::<i32, String>::race(Vec::<Future<i32, String>>::new()));

    assert_eq!(result, Err(Error::Stalled));
}

#[test]
fn test_all_settled_never_rejects() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        Future::<i32, String>::all_settled(vec![
            Resolution::Future(Future::resolve(1)),
            Resolution::Error("no".into()),
            Resolution::Future(reject_after(Duration::from_millis(5), "later".into())),
            Resolution::Value(4),
        ])
    });

    assert_eq!(
        result,
        Ok(Ok(vec![
            Ok(1),
            Err("no".to_string()),
            Err("later".to_string()),
            Ok(4)
        ]))
    );
}

#[test]
fn test_all_settled_of_nothing_is_empty() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| Future::<i32, String>::all_settled(Vec::<Result<i32, String>>::new()));

    assert_eq!(result, Ok(Ok(Vec::new())));
}

#[test]
fn test_any_takes_first_fulfillment() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        Future::any([
            Future::<i32, String>::reject("a".into()),
            resolve_after(Duration::from_millis(10), 2),
            resolve_after(Duration::from_millis(40), 3),
        ])
    });

    assert_eq!(result, Ok(Ok(2)));
}

#[test]
fn test_any_aggregates_errors_in_input_order() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        Future::any([
            reject_after::<i32, String>(Duration::from_millis(20), "first".into()),
            Future::reject("second".into()),
        ])
    });

    assert_eq!(
        result,
        Ok(Err(AggregateError {
            errors: vec!["first".to_string(), "second".to_string()]
        }))
    );
}

#[test]
fn test_any_of_nothing_rejects() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| Future::<i32, String>::any(Vec::<Future<i32, String>>::new()));

    assert_eq!(result, Ok(Err(AggregateError { errors: Vec::new() })));
}
