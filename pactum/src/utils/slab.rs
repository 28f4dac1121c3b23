/// A simple slab allocator.
///
/// A `Slab` stores values in a contiguous array and returns small indices
/// that are reused after removal. The runtime uses it to store timer
/// callbacks, keyed by the index carried in a [`TimerId`](crate::time::TimerId).
///
/// Because indices are reused, callers that hand indices out must pair them
/// with a generation of their own to detect stale handles.
pub(crate) struct Slab<T> {
    /// Storage for items; `None` marks a free slot.
    items: Vec<Option<T>>,
    /// Stack of free indices that can be reused.
    free: Vec<usize>,
    /// Number of occupied slots.
    len: usize,
}

impl<T> Slab<T> {
    /// Creates a slab with `size` free slots.
    pub(crate) fn new(size: usize) -> Self {
        Self {
            items: (0..size).map(|_| None).collect(),
            free: (0..size).rev().collect(),
            len: 0,
        }
    }

    /// Inserts a value and returns its index.
    ///
    /// Free slots are reused first; otherwise the slab doubles in size.
    pub(crate) fn insert(&mut self, item: T) -> usize {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let len = self.items.len();
                let new_len = if len == 0 { 1 } else { 2 * len };

                self.items.extend((len..new_len).map(|_| None));
                self.free.extend(((len + 1)..new_len).rev());

                len
            }
        };

        self.items[index] = Some(item);
        self.len += 1;

        index
    }

    /// Removes and returns the value at `index`, if any.
    pub(crate) fn remove(&mut self, index: usize) -> Option<T> {
        let item = self.items.get_mut(index)?.take()?;

        self.free.push(index);
        self.len -= 1;

        Some(item)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)?.as_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Removes every value, keeping the allocated slots.
    pub(crate) fn clear(&mut self) {
        for item in &mut self.items {
            *item = None;
        }

        self.free = (0..self.items.len()).rev().collect();
        self.len = 0;
    }
}
