//! Unsynchronized circular store with automatic growth.

use tracing::debug;

/// Circular slot storage addressed by a read and a write cursor.
///
/// `read_idx == write_idx` is the only emptiness test. The store never lets
/// a write make it full: when the write cursor catches up with the read
/// cursor the slots are reallocated before `push` returns, so at least one
/// slot is always unused.
pub(crate) struct Store<T> {
    slots: Vec<Option<T>>,
    read_idx: usize,
    write_idx: usize,
    initial_capacity: usize,
    growth_threshold: usize,
}

fn empty_slots<T>(capacity: usize) -> Vec<Option<T>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    slots
}

/// Doubles small stores, grows large ones by a quarter.
pub(crate) fn next_capacity(capacity: usize, growth_threshold: usize) -> usize {
    let next = if capacity < growth_threshold {
        capacity.saturating_mul(2)
    } else {
        capacity.saturating_add(capacity / 4)
    };
    next.max(capacity + 1)
}

impl<T> Store<T> {
    /// `initial_capacity` must already be normalized (>= 2).
    pub(crate) fn new(initial_capacity: usize, growth_threshold: usize) -> Self {
        debug_assert!(initial_capacity >= 2);
        Store {
            slots: empty_slots(initial_capacity),
            read_idx: 0,
            write_idx: 0,
            initial_capacity,
            growth_threshold,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.read_idx == self.write_idx
    }

    /// Number of unread elements.
    pub(crate) fn len(&self) -> usize {
        if self.write_idx >= self.read_idx {
            self.write_idx - self.read_idx
        } else {
            self.capacity() - self.read_idx + self.write_idx
        }
    }

    /// Appends `value`, growing first if the write would collide with
    /// unread data.
    pub(crate) fn push(&mut self, value: T) {
        self.slots[self.write_idx] = Some(value);
        self.write_idx += 1;
        if self.write_idx == self.capacity() {
            self.write_idx = 0;
        }

        if self.write_idx == self.read_idx {
            self.grow();
        }
    }

    /// Removes and returns the oldest element.
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let value = self.slots[self.read_idx].take();
        self.read_idx += 1;
        if self.read_idx == self.capacity() {
            self.read_idx = 0;
        }
        value
    }

    /// Returns the oldest element without removing it.
    pub(crate) fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.read_idx].as_ref()
    }

    /// Reallocates a larger store. Only called when every slot is occupied,
    /// i.e. the write cursor has just wrapped onto the read cursor.
    fn grow(&mut self) {
        let old_capacity = self.capacity();
        let new_capacity = next_capacity(old_capacity, self.growth_threshold);

        // Oldest segment [read_idx, cap) first, then the wrapped [0, read_idx).
        let mut head = std::mem::take(&mut self.slots);
        let tail = head.split_off(self.read_idx);

        let mut slots = Vec::with_capacity(new_capacity);
        slots.extend(tail);
        slots.extend(head);
        slots.resize_with(new_capacity, || None);

        self.slots = slots;
        self.read_idx = 0;
        self.write_idx = old_capacity;

        debug!(old_capacity, new_capacity, "ringbuf: grow");
    }

    /// Drops every unread element and rewinds both cursors, keeping the
    /// current capacity. Returns how many elements were discarded.
    pub(crate) fn clear(&mut self) -> usize {
        let discarded = self.len();
        for slot in &mut self.slots {
            *slot = None;
        }
        self.read_idx = 0;
        self.write_idx = 0;
        discarded
    }

    /// Drops everything and reallocates at the initial capacity.
    pub(crate) fn reset(&mut self) {
        self.slots = empty_slots(self.initial_capacity);
        self.read_idx = 0;
        self.write_idx = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: usize) -> Store<i32> {
        Store::new(capacity, 1024)
    }

    #[test]
    fn test_next_capacity() {
        assert_eq!(next_capacity(2, 1024), 4);
        assert_eq!(next_capacity(512, 1024), 1024);
        assert_eq!(next_capacity(1023, 1024), 2046);
        assert_eq!(next_capacity(1024, 1024), 1280);
        assert_eq!(next_capacity(1280, 1024), 1600);
        // A tiny threshold must still make progress.
        assert_eq!(next_capacity(2, 1), 3);
        assert_eq!(next_capacity(3, 1), 4);
    }

    #[test]
    fn test_push_pop_fifo() {
        let mut s = store(4);
        s.push(1);
        s.push(2);
        s.push(3);
        assert_eq!(s.len(), 3);
        assert_eq!(s.capacity(), 4);

        assert_eq!(s.pop(), Some(1));
        assert_eq!(s.pop(), Some(2));
        assert_eq!(s.pop(), Some(3));
        assert_eq!(s.pop(), None);
        assert!(s.is_empty());
    }

    #[test]
    fn test_grow_on_collision() {
        let mut s = store(2);
        s.push(1);
        assert_eq!(s.capacity(), 2);
        s.push(2);

        assert_eq!(s.capacity(), 4);
        assert_eq!(s.len(), 2);
        assert_eq!(s.read_idx, 0);
        assert_eq!(s.write_idx, 2);
        assert_eq!(s.pop(), Some(1));
        assert_eq!(s.pop(), Some(2));
    }

    #[test]
    fn test_grow_preserves_order_when_wrapped() {
        let mut s = store(4);
        s.push(1);
        s.push(2);
        s.push(3);
        assert_eq!(s.pop(), Some(1));
        assert_eq!(s.pop(), Some(2));

        // read_idx = 2; these wrap around to slots 3, 0, 1 and then collide.
        s.push(4);
        s.push(5);
        assert_eq!(s.capacity(), 4);
        s.push(6);
        assert_eq!(s.capacity(), 8);
        assert_eq!(s.len(), 4);
        assert_eq!(s.read_idx, 0);
        assert_eq!(s.write_idx, 4);

        let drained: Vec<_> = std::iter::from_fn(|| s.pop()).collect();
        assert_eq!(drained, vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_len_wrapped() {
        let mut s = store(4);
        s.push(1);
        s.push(2);
        s.push(3);
        s.pop();
        s.pop();
        s.push(4);
        s.push(5);
        // write_idx (1) < read_idx (2)
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_never_full() {
        let mut s = store(3);
        for i in 0..100 {
            s.push(i);
            assert!(!s.is_empty());
            assert!(s.len() < s.capacity());
            assert_eq!(s.len(), (i + 1) as usize);
        }
    }

    #[test]
    fn test_peek() {
        let mut s = store(4);
        assert_eq!(s.peek(), None);
        s.push(7);
        s.push(8);
        assert_eq!(s.peek(), Some(&7));
        assert_eq!(s.len(), 2);
        s.pop();
        assert_eq!(s.peek(), Some(&8));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut s = store(2);
        for i in 0..5 {
            s.push(i);
        }
        let capacity = s.capacity();
        assert_eq!(s.clear(), 5);
        assert!(s.is_empty());
        assert_eq!(s.capacity(), capacity);
        assert!(s.slots.iter().all(Option::is_none));
    }

    #[test]
    fn test_reset_restores_initial_capacity() {
        let mut s = store(3);
        for i in 0..50 {
            s.push(i);
        }
        assert!(s.capacity() > 3);

        s.reset();
        assert_eq!(s.capacity(), 3);
        assert_eq!(s.initial_capacity(), 3);
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn test_quarter_growth_past_threshold() {
        let mut s: Store<usize> = Store::new(4, 8);
        for i in 0..8 {
            s.push(i);
        }
        // 4 -> 8 at the 4th write, 8 -> 10 at the 8th.
        assert_eq!(s.capacity(), 10);
        assert_eq!(s.len(), 8);
        let drained: Vec<_> = std::iter::from_fn(|| s.pop()).collect();
        assert_eq!(drained, (0..8).collect::<Vec<_>>());
    }
}
