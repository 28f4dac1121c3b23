use crate::time::TimerId;
use crate::utils::Slab;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// Work attached to a timer.
pub(crate) enum TimerTask {
    /// Runs once, then the timer is gone.
    Once(Box<dyn FnOnce()>),

    /// Runs every `period` until cleared.
    Repeat {
        callback: Box<dyn FnMut()>,
        period: Duration,
    },
}

/// An entry in the timer heap.
///
/// Entries are ordered by deadline, then by the order in which they were
/// scheduled, so timers sharing a deadline fire first-in first-out.
struct TimerEntry {
    deadline: Instant,
    order: u64,
    id: TimerId,
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.order == other.order
    }
}

impl Ord for TimerEntry {
    /// Reversed so that `BinaryHeap<TimerEntry>` pops the earliest entry.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A slot in the timer slab.
///
/// `task` is `None` while a repeating timer's callback is running.
struct Slot {
    generation: u64,
    task: Option<TimerTask>,
}

/// Pending timers of a runtime.
///
/// Heap entries may outlive their timer: clearing a timer only frees its
/// slot, and stale entries are skipped when they reach the top of the heap.
pub(crate) struct TimerQueue {
    heap: BinaryHeap<TimerEntry>,
    slots: Slab<Slot>,
    next_order: u64,
}

impl TimerQueue {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            slots: Slab::new(16),
            next_order: 0,
        }
    }

    /// Schedules `task` to run at `deadline`.
    pub(crate) fn insert(&mut self, deadline: Instant, task: TimerTask) -> TimerId {
        let generation = self.bump();
        let key = self.slots.insert(Slot {
            generation,
            task: Some(task),
        });
        let id = TimerId::new(key, generation);

        self.push(deadline, id);
        id
    }

    /// Clears a timer. Returns `false` if it already fired or was cleared.
    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        if !self.is_live(id) {
            return false;
        }

        self.slots.remove(id.key()).is_some()
    }

    /// Returns the earliest deadline among live timers.
    pub(crate) fn next_deadline(&mut self) -> Option<Instant> {
        self.discard_stale();
        self.heap.peek().map(|entry| entry.deadline)
    }

    /// Takes the earliest timer if its deadline is at or before `now`.
    ///
    /// One-shot timers are removed. Repeating timers keep their slot and
    /// must be handed back with [`restore`](Self::restore) after running.
    pub(crate) fn pop_due(&mut self, now: Instant) -> Option<(TimerId, TimerTask)> {
        self.discard_stale();

        if self.heap.peek()?.deadline > now {
            return None;
        }

        let entry = self.heap.pop()?;
        let id = entry.id;
        let slot = self.slots.get_mut(id.key())?;
        let task = slot.task.take()?;

        if matches!(task, TimerTask::Once(_)) {
            self.slots.remove(id.key());
        }

        Some((id, task))
    }

    /// Reschedules a repeating timer after its callback ran.
    ///
    /// Dropped if the timer was cleared while running.
    pub(crate) fn restore(&mut self, id: TimerId, callback: Box<dyn FnMut()>, period: Duration) {
        if !self.is_live(id) {
            return;
        }

        if let Some(slot) = self.slots.get_mut(id.key()) {
            slot.task = Some(TimerTask::Repeat { callback, period });
        }

        self.push(Instant::now() + period, id);
    }

    /// Number of live timers.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Drops every timer without running it.
    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    fn push(&mut self, deadline: Instant, id: TimerId) {
        let order = self.bump();
        self.heap.push(TimerEntry {
            deadline,
            order,
            id,
        });
    }

    fn bump(&mut self) -> u64 {
        let value = self.next_order;
        self.next_order += 1;
        value
    }

    fn is_live(&self, id: TimerId) -> bool {
        self.slots
            .get(id.key())
            .is_some_and(|slot| slot.generation == id.generation())
    }

    fn discard_stale(&mut self) {
        while let Some(entry) = self.heap.peek() {
            if self.is_live(entry.id) {
                return;
            }

            self.heap.pop();
        }
    }
}
