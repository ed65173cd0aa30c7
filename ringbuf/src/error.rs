//! Error types for ring buffer operations.

use thiserror::Error;

/// Ring buffer operation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingBufError {
    /// No unread element is available (`pop` / `peek`).
    #[error("ringbuf: empty")]
    Empty,

    /// The buffer has been closed; the written value was dropped.
    #[error("ringbuf: closed")]
    Closed,

    /// The initial capacity must be greater than zero.
    #[error("ringbuf: initial capacity must be greater than zero, got {0}")]
    InvalidCapacity(usize),

    /// The growth threshold must be greater than zero.
    #[error("ringbuf: growth threshold must be greater than zero, got {0}")]
    InvalidThreshold(usize),
}
