//! Simulated round-trip latency for the in-memory store.

use std::time::Duration;

/// Per-operation artificial delay applied before the store touches its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    /// Delay for `get_all`.
    pub get_all: Duration,
    /// Delay for `get_by_id`.
    pub get_by_id: Duration,
    /// Delay for `create`.
    pub create: Duration,
    /// Delay for `update`.
    pub update: Duration,
    /// Delay for `delete`.
    pub delete: Duration,
    /// Delay for `bulk_delete`.
    pub bulk_delete: Duration,
    /// Extra delay for `mark_complete`/`mark_incomplete`, paid before the inner update.
    pub mark: Duration,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            get_all: Duration::from_millis(300),
            get_by_id: Duration::from_millis(200),
            create: Duration::from_millis(400),
            update: Duration::from_millis(300),
            delete: Duration::from_millis(250),
            bulk_delete: Duration::from_millis(400),
            mark: Duration::from_millis(200),
        }
    }
}

impl LatencyProfile {
    /// No artificial delay at all.
    #[must_use]
    pub const fn none() -> Self {
        Self::uniform(Duration::ZERO)
    }

    /// Same delay for every operation.
    #[must_use]
    pub const fn uniform(delay: Duration) -> Self {
        Self {
            get_all: delay,
            get_by_id: delay,
            create: delay,
            update: delay,
            delete: delay,
            bulk_delete: delay,
            mark: delay,
        }
    }

    /// Returns true when no operation is delayed.
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::none()
    }
}

pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
