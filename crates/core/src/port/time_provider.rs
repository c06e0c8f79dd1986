// Time Provider Port (for testability)

use chrono::{DateTime, SecondsFormat, Utc};

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Current UTC time
    fn now(&self) -> DateTime<Utc>;

    /// Nanosecond-resolution timestamp folded into job id seeds
    fn now_seed(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use chrono::Duration;
    use std::sync::Mutex;

    /// Clock that advances by a fixed step on every read
    pub struct SteppingTimeProvider {
        current: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingTimeProvider {
        pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                current: Mutex::new(start),
                step,
            }
        }
    }

    impl TimeProvider for SteppingTimeProvider {
        fn now(&self) -> DateTime<Utc> {
            let mut current = self.current.lock().unwrap();
            let now = *current;
            *current = now + self.step;
            now
        }
    }
}
