//! Thread-safe auto-growing ring buffer.
//!
//! [`RingBuf<T>`] is a circular buffer that never rejects or blocks a write:
//! when the write cursor would catch up with unread data, the buffer
//! reallocates and keeps going. Readers may block until data arrives or the
//! buffer is closed, which makes it usable as an unbounded channel with a
//! non-blocking producer.
//!
//! ```
//! use giztoy_ringbuf::RingBuf;
//!
//! let buf = RingBuf::<i32>::new(2);
//! buf.write(1);
//! buf.write(2); // grows to 4 slots
//!
//! assert_eq!(buf.len(), 2);
//! assert_eq!(buf.capacity(), 4);
//! assert_eq!(buf.pop(), Ok(1));
//! assert_eq!(buf.pop(), Ok(2));
//! ```
//!
//! # Growth
//!
//! The store doubles while it is smaller than the growth threshold
//! (1024 slots by default) and grows by 25% after that. Growth keeps the
//! unread elements in order, oldest first.
//!
//! # Closing
//!
//! [`RingBuf::close`] is one-way and destructive: unread elements are
//! discarded, later writes are dropped, and every reader blocked in
//! [`RingBuf::wait_read`] returns `None`. Producers that need to drain the
//! buffer should wait for it to become empty before closing.
//!
//! ```
//! use giztoy_ringbuf::RingBuf;
//!
//! let buf = RingBuf::<i32>::new(4);
//! buf.write(1);
//! buf.write(2);
//! buf.write(3);
//! buf.close();
//!
//! assert_eq!(buf.wait_read(), None);
//! ```
//!
//! # Thread Safety
//!
//! `RingBuf<T>` is `Send + Sync` for `T: Send`, and `Clone` shares the
//! underlying buffer via `Arc`.

mod config;
mod error;
mod ring_buf;
mod store;

pub use config::{Config, DEFAULT_GROWTH_THRESHOLD, DEFAULT_INITIAL_CAPACITY, MIN_CAPACITY};
pub use error::RingBufError;
pub use ring_buf::{Iter, RingBuf};
