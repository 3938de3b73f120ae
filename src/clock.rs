//! Injectable time source.

use chrono::{DateTime, Utc};

/// Supplies "now" to TTL, expiry and retention decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::ManualClock;

#[cfg(any(test, feature = "mock"))]
mod mock {
    use chrono::{DateTime, Duration, Utc};
    use parking_lot::RwLock;

    use super::Clock;

    /// Clock that only moves when told to.
    #[derive(Debug)]
    pub struct ManualClock {
        now: RwLock<DateTime<Utc>>,
    }

    impl ManualClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self {
                now: RwLock::new(now),
            }
        }

        pub fn set(&self, now: DateTime<Utc>) {
            *self.now.write() = now;
        }

        pub fn advance(&self, by: Duration) {
            *self.now.write() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.read()
        }
    }
}
