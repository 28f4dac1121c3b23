use super::scheduler::Microtask;

use std::cell::RefCell;
use std::collections::VecDeque;

/// The runtime's microtask queue.
///
/// Tasks are pushed to the back and popped from the front (strict FIFO).
/// The queue is never borrowed while a task runs, so tasks may enqueue
/// more tasks.
pub(crate) struct MicrotaskQueue {
    inner: RefCell<VecDeque<Microtask>>,
}

impl MicrotaskQueue {
    pub(crate) fn new() -> Self {
        Self {
            inner: RefCell::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, task: Microtask) {
        self.inner.borrow_mut().push_back(task);
    }

    /// Pops the oldest task, or `None` if the queue is empty.
    pub(crate) fn pop(&self) -> Option<Microtask> {
        self.inner.borrow_mut().pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Removes every queued task without running it.
    pub(crate) fn clear(&self) -> usize {
        let drained = std::mem::take(&mut *self.inner.borrow_mut());
        drained.len()
    }
}
