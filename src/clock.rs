//! Time source used for cookie expiry.
//!
//! Everything in this crate that needs "now" (the `Max-Age` attribute and
//! [`Cookie::is_expired`](crate::cookies::Cookie::is_expired)) reads it through
//! the [`Clock`] trait, so tests can pin the current time with a [`FixedClock`].

use std::sync::Arc;
use time::OffsetDateTime;

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> OffsetDateTime;
}

/// A handle to a type-erased clock, shared between parsers.
pub type ClockHandle = Arc<dyn Clock + Send + Sync>;

/// Wall clock, in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn handle() -> ClockHandle {
        Arc::new(SystemClock)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl FixedClock {
    pub fn handle(now: OffsetDateTime) -> ClockHandle {
        Arc::new(FixedClock(now))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}
