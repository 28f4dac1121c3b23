use pactum::{CycleError, Future, Resolution, RuntimeBuilder, State};

use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_then_chain_transforms_value() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        Future::<i32, String>::resolve(1)
            .then(|v| Ok(v + 1))
            .then(|v| Ok(v * 10))
    });

    assert_eq!(result, Ok(Ok(20)));
}

#[test]
fn test_then_changes_value_type() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        Future::<i32, String>::resolve(7)
            .then(|v| Ok(format!("n={v}")))
            .then(|s| Ok(s.len()))
    });

    assert_eq!(result, Ok(Ok(3)));
}

#[pactum::test]
fn test_reactions_never_run_synchronously() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let future = Future::<i32, String>::resolve(1);

    assert_eq!(future.state(), State::Fulfilled);

    let sink = log.clone();
    let child = future.then(move |v| {
        sink.borrow_mut().push(format!("reaction {v}"));
        Ok(())
    });

    log.borrow_mut().push("after then".to_string());
    assert_eq!(child.state(), State::Pending);

    child.wait().unwrap().unwrap();

    assert_eq!(*log.borrow(), vec!["after then", "reaction 1"]);
}

#[pactum::test]
fn test_reactions_run_in_registration_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (future, resolver) = Future::<i32, String>::with_resolvers();

    for name in ["a", "b", "c"] {
        let sink = log.clone();
        future.then(move |_| {
            sink.borrow_mut().push(name);
            Ok(())
        });
    }

    resolver.fulfill(1);

    // Registered after settlement: still queued behind the first three.
    let sink = log.clone();
    future
        .then(move |_| {
            sink.borrow_mut().push("d");
            Ok(())
        })
        .wait()
        .unwrap()
        .unwrap();

    assert_eq!(*log.borrow(), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_returned_future_is_adopted() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        Future::<i32, String>::resolve(2)
            .then(|v| Future::<i32, String>::resolve(v).then(|w| Ok(w * 21)))
    });

    assert_eq!(result, Ok(Ok(42)));
}

#[test]
fn test_adoption_flattens_arbitrary_depth() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        let mut future = Future::<u32, String>::resolve(0);

        for _ in 0..50 {
            let inner = future;
            future = Future::new(move |resolver| {
                resolver.resolve(inner.then(|v| Ok(v + 1)));
                Ok(())
            });
        }

        future
    });

    assert_eq!(result, Ok(Ok(50)));
}

#[test]
fn test_adopted_rejection_reaches_child() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        Future::<i32, String>::resolve(1).then(|_| Future::<i32, String>::reject("inner".into()))
    });

    assert_eq!(result, Ok(Err("inner".to_string())));
}

#[test]
fn test_resolver_locked_by_pending_future() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        let (inner, inner_resolver) = Future::<i32, String>::with_resolvers();
        let (outer, outer_resolver) = Future::<i32, String>::with_resolvers();

        outer_resolver.resolve(inner);
        assert!(outer_resolver.is_resolved());

        outer_resolver.fulfill(1);
        outer_resolver.reject("ignored".into());
        assert_eq!(outer.state(), State::Pending);

        inner_resolver.fulfill(2);
        outer
    });

    assert_eq!(result, Ok(Ok(2)));
}

#[test]
fn test_resolving_with_itself_is_a_cycle() {
    let rt = RuntimeBuilder::new().build();

    let result = rt.block_on(|| {
        let (future, resolver) = Future::<i32, String>::with_resolvers();
        resolver.resolve(future.clone());
        future
    });

    assert_eq!(result, Ok(Err(String::from(CycleError))));
}

#[test]
fn test_reaction_returning_its_own_child_is_a_cycle() {
    let rt = RuntimeBuilder::new().build();
    let slot: Rc<RefCell<Option<Future<i32, pactum::Error>>>> = Rc::new(RefCell::new(None));

    let result = rt.block_on(|| {
        let inner = slot.clone();
        let child = Future::<i32, pactum::Error>::resolve(1).then(move |_| {
            match inner.borrow().clone() {
                Some(child) => Resolution::Future(child),
                None => Resolution::Error("child missing".into()),
            }
        });

        *slot.borrow_mut() = Some(child.clone());
        child
    });

    assert_eq!(result, Ok(Err(pactum::Error::Cycle(CycleError))));
    slot.borrow_mut().take();
}

#[pactum::test]
fn test_resolution_tags_are_explicit() {
    let future = Future::<i32, String>::resolve(1);

    assert!(Resolution::Future(future.clone()).is_future());
    assert!(Resolution::<i32, String>::Value(1).is_value());
    assert!(Resolution::<i32, String>::Error("e".into()).is_error());

    let value = future
        .then(|v| {
            if v > 0 {
                Resolution::Value(v)
            } else {
                Resolution::Error("negative".to_string())
            }
        })
        .wait();

    assert_eq!(value, Ok(Ok(1)));
}

#[pactum::test]
fn test_clones_share_the_same_future() {
    let (future, resolver) = Future::<i32, String>::with_resolvers();
    let copy = future.clone();

    assert_eq!(future.id(), copy.id());

    resolver.fulfill(5);

    assert_eq!(copy.peek(), Some(Ok(5)));
    assert!(copy.is_settled());
}
