//! Time source port.

use chrono::{DateTime, Utc};

/// Source of the current time, injected so expiry can be tested.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use chrono::TimeDelta;
    use parking_lot::Mutex;

    /// Manually advanced clock for testing.
    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        /// Creates clock frozen at `start`.
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(start),
            }
        }

        /// Creates clock frozen at the current wall time.
        pub fn starting_now() -> Self {
            Self::new(Utc::now())
        }

        /// Moves the clock forward.
        pub fn advance(&self, delta: TimeDelta) {
            let mut now = self.now.lock();
            *now += delta;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock()
        }
    }
}
