use super::resolution::Reason;
use super::state::{FutureId, State};
use crate::rejection::PendingRejection;
use crate::runtime::scheduler::Scheduler;

use std::cell::{Cell, RefCell};
use std::mem;
use std::rc::Rc;

use tracing::{debug, trace};

/// A callback waiting for the outcome of a future.
///
/// Every reaction owns whatever it needs to drive its child future, so the
/// core never has to know about children.
pub(crate) type Reaction<T, E> = Box<dyn FnOnce(Result<T, E>)>;

/// Shared state behind a [`Future`](crate::Future) handle.
///
/// The core coordinates the lifecycle of a single deferred value:
/// - the outcome, absent while pending and immutable once stored,
/// - the reactions registered while pending, in registration order,
/// - whether any reaction was ever attached (for unhandled rejection tracking),
/// - the scheduler used to run reactions.
pub(crate) struct Core<T, E> {
    /// Identifier used by diagnostics.
    pub(crate) id: FutureId,

    /// `None` while pending.
    outcome: Option<Result<T, E>>,

    /// Reactions waiting for settlement.
    reactions: Vec<Reaction<T, E>>,

    /// Set as soon as a reaction is attached. Shared with any pending
    /// rejection record so the scheduler can check it later.
    handled: Rc<Cell<bool>>,

    /// Scheduler every reaction of this future runs on.
    pub(crate) scheduler: Rc<dyn Scheduler>,
}

impl<T, E> Core<T, E> {
    pub(crate) fn state(&self) -> State {
        match self.outcome {
            None => State::Pending,
            Some(Ok(_)) => State::Fulfilled,
            Some(Err(_)) => State::Rejected,
        }
    }

    pub(crate) fn outcome(&self) -> Option<&Result<T, E>> {
        self.outcome.as_ref()
    }

    /// Marks the outcome as observed without attaching a reaction.
    pub(crate) fn mark_handled(&self) {
        self.handled.set(true);
    }
}

impl<T: Clone + 'static, E: Reason> Core<T, E> {
    /// Creates a pending core bound to `scheduler`.
    pub(crate) fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        let id = FutureId::next();
        trace!(future = %id, "future created");

        Self {
            id,
            outcome: None,
            reactions: Vec::new(),
            handled: Rc::new(Cell::new(false)),
            scheduler,
        }
    }

    /// Performs the one-time transition out of `Pending`.
    ///
    /// Every reaction registered so far is handed to the scheduler, in
    /// registration order. A rejection nobody listens to yet is reported to
    /// the scheduler as a pending unhandled rejection.
    ///
    /// Returns `false` if the core was already settled; the outcome is then
    /// dropped and nothing happens.
    pub(crate) fn settle(this: &RefCell<Self>, outcome: Result<T, E>) -> bool {
        let (reactions, scheduler, rejection) = {
            let mut core = this.borrow_mut();

            if core.outcome.is_some() {
                return false;
            }

            let rejection = match &outcome {
                Ok(_) => {
                    debug!(future = %core.id, "future fulfilled");
                    None
                }
                Err(reason) => {
                    debug!(future = %core.id, ?reason, "future rejected");
                    (!core.handled.get()).then(|| {
                        PendingRejection::new(core.id, format!("{reason:?}"), core.handled.clone())
                    })
                }
            };

            core.outcome = Some(outcome.clone());

            (
                mem::take(&mut core.reactions),
                core.scheduler.clone(),
                rejection,
            )
        };

        if let Some(rejection) = rejection {
            scheduler.track_rejection(rejection);
        }

        for reaction in reactions {
            let outcome = outcome.clone();
            scheduler.enqueue(Box::new(move || reaction(outcome)));
        }

        true
    }

    /// Registers a reaction.
    ///
    /// A pending core queues it; a settled core schedules it right away.
    /// The reaction never runs inside this call.
    pub(crate) fn subscribe(this: &RefCell<Self>, reaction: Reaction<T, E>) {
        let mut core = this.borrow_mut();
        core.handled.set(true);

        let Some(outcome) = core.outcome.clone() else {
            core.reactions.push(reaction);
            return;
        };

        let scheduler = core.scheduler.clone();
        drop(core);

        scheduler.enqueue(Box::new(move || reaction(outcome)));
    }
}
