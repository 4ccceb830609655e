//! Message and error identifiers.

use std::sync::atomic::{AtomicU64, Ordering};

use super::MessageId;

/// Generates strictly increasing message ids.
///
/// Ids are seeded from wall-clock milliseconds so they stay meaningful as a
/// rough creation time, but never repeat or go backwards even when many are
/// requested within the same millisecond.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: AtomicU64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator whose ids are all greater than `floor`.
    ///
    /// Used after reloading a history so new ids sort after persisted ones.
    pub fn starting_after(floor: MessageId) -> Self {
        Self {
            last: AtomicU64::new(floor),
        }
    }

    /// Returns the next id: `max(now_ms, last + 1)`.
    pub fn next_id(&self) -> MessageId {
        let now = now_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }

    /// Raises the floor so later ids exceed `id`.
    pub fn observe(&self, id: MessageId) {
        self.last.fetch_max(id, Ordering::AcqRel);
    }
}

fn now_millis() -> MessageId {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

/// A fresh id for a failed translation entry.
pub fn new_error_id() -> String {
    format!("error-{}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_strictly_increasing() {
        let generator = MessageIdGenerator::new();
        let ids: Vec<_> = (0..1000).map(|_| generator.next_id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_starting_after_future_floor() {
        let floor = now_millis() + 1_000_000;
        let generator = MessageIdGenerator::starting_after(floor);
        assert_eq!(generator.next_id(), floor + 1);

        generator.observe(floor + 50);
        assert_eq!(generator.next_id(), floor + 51);
    }

    #[test]
    fn test_exhausted_floor_does_not_overflow() {
        let generator = MessageIdGenerator::starting_after(u64::MAX);
        assert_eq!(generator.next_id(), u64::MAX);
    }

    #[test]
    fn test_error_ids_are_unique() {
        assert_ne!(new_error_id(), new_error_id());
        assert!(new_error_id().starts_with("error-"));
    }
}
