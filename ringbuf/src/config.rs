//! Ring buffer configuration.

use serde::{Deserialize, Serialize};

use crate::error::RingBufError;

/// Default number of slots a buffer starts with.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Capacity below which the store doubles on growth. At or above it the
/// store grows by a quarter of its size instead.
pub const DEFAULT_GROWTH_THRESHOLD: usize = 1024;

/// Smallest usable capacity. A store of one slot would be full and empty at
/// the same time.
pub const MIN_CAPACITY: usize = 2;

/// Configuration for a [`RingBuf`](crate::RingBuf).
///
/// Missing fields fall back to their defaults when deserialized, so the
/// struct can be embedded in a larger YAML or JSON document:
///
/// ```
/// use giztoy_ringbuf::Config;
///
/// let cfg: Config = serde_json::from_str(r#"{"initial_capacity": 64}"#).unwrap();
/// assert_eq!(cfg.initial_capacity, 64);
/// assert_eq!(cfg.growth_threshold, 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of slots allocated on construction and restored by `reset`.
    /// A value of 1 is upgraded to 2.
    pub initial_capacity: usize,

    /// Doubling stops once the capacity reaches this many slots.
    /// Default: 1024.
    pub growth_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth_threshold: DEFAULT_GROWTH_THRESHOLD,
        }
    }
}

impl Config {
    /// Creates a configuration with the given initial capacity and the
    /// default growth threshold.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Config {
            initial_capacity,
            ..Config::default()
        }
    }

    /// Checks that the configuration can build a buffer.
    pub fn validate(&self) -> Result<(), RingBufError> {
        if self.initial_capacity == 0 {
            return Err(RingBufError::InvalidCapacity(self.initial_capacity));
        }
        if self.growth_threshold == 0 {
            return Err(RingBufError::InvalidThreshold(self.growth_threshold));
        }
        Ok(())
    }

    /// Returns a validated copy with the minimum capacity applied.
    pub fn normalized(self) -> Result<Self, RingBufError> {
        self.validate()?;
        Ok(Config {
            initial_capacity: self.initial_capacity.max(MIN_CAPACITY),
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let cfg = Config::default();
        assert_eq!(cfg.initial_capacity, 16);
        assert_eq!(cfg.growth_threshold, 1024);
    }

    #[test]
    fn test_normalized_upgrades_one_to_two() {
        let cfg = Config::with_capacity(1).normalized().unwrap();
        assert_eq!(cfg.initial_capacity, 2);

        let cfg = Config::with_capacity(7).normalized().unwrap();
        assert_eq!(cfg.initial_capacity, 7);
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert_eq!(
            Config::with_capacity(0).validate(),
            Err(RingBufError::InvalidCapacity(0))
        );

        let cfg = Config {
            initial_capacity: 4,
            growth_threshold: 0,
        };
        assert_eq!(cfg.normalized(), Err(RingBufError::InvalidThreshold(0)));
    }

    #[test]
    fn test_deserialize_partial() {
        let cfg: Config = serde_json::from_str(r#"{"growth_threshold": 64}"#).unwrap();
        assert_eq!(cfg.initial_capacity, DEFAULT_INITIAL_CAPACITY);
        assert_eq!(cfg.growth_threshold, 64);

        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
    }
}
