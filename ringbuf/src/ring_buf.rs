//! Thread-safe auto-growing ring buffer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::config::{Config, MIN_CAPACITY};
use crate::error::RingBufError;
use crate::store::Store;

const RUNNING: u32 = 0;
const CLOSED: u32 = 1;

/// A thread-safe ring buffer that grows instead of rejecting writes.
///
/// `RingBuf<T>` behaves like an unbounded channel: writers never block,
/// and readers can block in [`wait_read`](Self::wait_read) until an element
/// arrives or the buffer is closed. Cloning the handle shares the same
/// buffer.
///
/// # Semantics
///
/// - **Write**: Never blocks; the store grows when it would otherwise
///   overwrite unread data. Dropped silently after close.
/// - **Read**: `wait_read` blocks while empty and open; `pop` and `peek`
///   never block and report [`RingBufError::Empty`].
/// - **Close**: One-way. Discards any unread elements and wakes every
///   blocked reader.
///
/// # Example
///
/// ```
/// use giztoy_ringbuf::RingBuf;
/// use std::thread;
///
/// let buf = RingBuf::<u32>::new(16);
/// let producer_buf = buf.clone();
///
/// let producer = thread::spawn(move || {
///     for i in 0..10 {
///         producer_buf.write(i);
///     }
/// });
///
/// let mut received = Vec::new();
/// while received.len() < 10 {
///     match buf.wait_read() {
///         Some(v) => received.push(v),
///         None => break,
///     }
/// }
/// producer.join().unwrap();
/// buf.close();
///
/// assert_eq!(received, (0..10).collect::<Vec<_>>());
/// assert_eq!(buf.wait_read(), None);
/// ```
pub struct RingBuf<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    store: Mutex<Store<T>>,
    readable: Condvar,
    state: AtomicU32,
}

impl<T> Clone for RingBuf<T> {
    fn clone(&self) -> Self {
        RingBuf {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for RingBuf<T> {
    fn default() -> Self {
        Self::from_normalized(Config::default())
    }
}

impl<T> RingBuf<T> {
    /// Creates a new RingBuf with the specified initial capacity.
    ///
    /// A capacity of 1 is upgraded to 2.
    ///
    /// # Panics
    ///
    /// Panics if `initial_capacity` is 0. Use [`with_config`](Self::with_config)
    /// to get an error instead.
    pub fn new(initial_capacity: usize) -> Self {
        assert!(
            initial_capacity > 0,
            "initial capacity must be greater than 0"
        );
        Self::from_normalized(Config {
            initial_capacity: initial_capacity.max(MIN_CAPACITY),
            ..Config::default()
        })
    }

    /// Creates a new RingBuf from a configuration.
    pub fn with_config(config: Config) -> Result<Self, RingBufError> {
        Ok(Self::from_normalized(config.normalized()?))
    }

    fn from_normalized(config: Config) -> Self {
        RingBuf {
            inner: Arc::new(Inner {
                store: Mutex::new(Store::new(
                    config.initial_capacity,
                    config.growth_threshold,
                )),
                readable: Condvar::new(),
                state: AtomicU32::new(RUNNING),
            }),
        }
    }

    /// Appends an element, growing the buffer if needed.
    ///
    /// Never blocks. After [`close`](Self::close) the value is dropped
    /// without any signal; use [`try_write`](Self::try_write) to observe that.
    pub fn write(&self, value: T) {
        let _ = self.try_write(value);
    }

    /// Appends an element, returning [`RingBufError::Closed`] if the buffer
    /// has been closed.
    pub fn try_write(&self, value: T) -> Result<(), RingBufError> {
        if self.is_closed() {
            return Err(RingBufError::Closed);
        }

        let mut store = self.inner.store.lock();
        // Close may have won the race between the check above and the lock.
        if self.is_closed() {
            return Err(RingBufError::Closed);
        }
        store.push(value);
        self.inner.readable.notify_one();
        Ok(())
    }

    /// Removes and returns the oldest element without blocking.
    pub fn pop(&self) -> Result<T, RingBufError> {
        let mut store = self.inner.store.lock();
        store.pop().ok_or(RingBufError::Empty)
    }

    /// Removes and returns the oldest element, blocking while the buffer is
    /// empty and open.
    ///
    /// Returns `None` once the buffer is closed; closing discards unread
    /// elements, so `None` is returned even if data was pending at close.
    pub fn wait_read(&self) -> Option<T> {
        let mut store = self.inner.store.lock();
        while store.is_empty() && !self.is_closed() {
            self.inner.readable.wait(&mut store);
            trace!("ringbuf: reader woken");
        }
        store.pop()
    }

    /// Returns a blocking iterator that yields elements until the buffer is
    /// closed.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { buf: self }
    }

    /// Returns the number of unread elements.
    pub fn len(&self) -> usize {
        self.inner.store.lock().len()
    }

    /// Returns the current number of slots, including growth.
    pub fn capacity(&self) -> usize {
        self.inner.store.lock().capacity()
    }

    /// Returns the capacity the buffer was created with (after the 1 → 2
    /// upgrade). [`reset`](Self::reset) restores this capacity.
    pub fn initial_capacity(&self) -> usize {
        self.inner.store.lock().initial_capacity()
    }

    /// Returns true if there are no unread elements.
    pub fn is_empty(&self) -> bool {
        self.inner.store.lock().is_empty()
    }

    /// Returns true once [`close`](Self::close) has been called.
    ///
    /// Lock-free; safe to poll from any thread.
    pub fn is_closed(&self) -> bool {
        self.inner.state.load(Ordering::Acquire) == CLOSED
    }

    /// Discards all elements and shrinks back to the initial capacity.
    ///
    /// This does not change the closed state of the buffer.
    pub fn reset(&self) {
        let mut store = self.inner.store.lock();
        store.reset();
        debug!(capacity = store.capacity(), "ringbuf: reset");
    }

    /// Closes the buffer.
    ///
    /// Unread elements are discarded, later writes are dropped and every
    /// blocked reader returns `None`. Idempotent: returns `true` only for
    /// the call that performed the transition.
    pub fn close(&self) -> bool {
        loop {
            match self.inner.state.compare_exchange_weak(
                RUNNING,
                CLOSED,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(CLOSED) => return false,
                // Spurious failure of the weak exchange; retry.
                Err(_) => continue,
            }
        }

        let mut store = self.inner.store.lock();
        let discarded = store.clear();
        self.inner.readable.notify_all();
        debug!(discarded, "ringbuf: closed");
        true
    }
}

impl<T: Clone> RingBuf<T> {
    /// Returns a copy of the oldest element without removing it.
    pub fn peek(&self) -> Result<T, RingBufError> {
        let store = self.inner.store.lock();
        store.peek().cloned().ok_or(RingBufError::Empty)
    }
}

/// Blocking iterator returned by [`RingBuf::iter`].
pub struct Iter<'a, T> {
    buf: &'a RingBuf<T>,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.buf.wait_read()
    }
}

impl<'a, T> IntoIterator for &'a RingBuf<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
