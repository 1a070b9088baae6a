//! Session inactivity tracking
//!
//! One tracker per signed-in session. It only does the deadline
//! arithmetic; whoever owns it decides what happens on expiry.

use chrono::{DateTime, Duration, Utc};

/// Idle time after which a session is signed out
pub const DEFAULT_INACTIVITY_TIMEOUT_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InactivityTracker {
    timeout: Duration,
    last_activity: DateTime<Utc>,
}

impl InactivityTracker {
    pub fn new(timeout: Duration, now: DateTime<Utc>) -> Self {
        Self {
            timeout,
            last_activity: now,
        }
    }

    pub fn with_default_timeout(now: DateTime<Utc>) -> Self {
        Self::new(Duration::minutes(DEFAULT_INACTIVITY_TIMEOUT_MINUTES), now)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Push the deadline out. Out-of-order timestamps are ignored.
    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        if now > self.last_activity {
            self.last_activity = now;
        }
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.last_activity + self.timeout
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline()
    }

    /// Time left before expiry, zero once expired
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        let left = self.deadline() - now;
        if left < Duration::zero() {
            Duration::zero()
        } else {
            left
        }
    }
}
