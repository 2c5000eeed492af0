//! The engine's notion of "now".

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Source of the reference instant and the zone whose calendar anchors
/// relative and periodic expressions.
///
/// The engine has no per-call timezone parameter; it asks the clock. A
/// caller that wants "today" interpreted inside a service timezone hands in
/// a clock whose [`zone`](ReferenceClock::zone) reports that timezone.
pub trait ReferenceClock {
    fn now_utc(&self) -> DateTime<Utc>;

    fn zone(&self) -> Tz;

    /// "Now" on the wall clock of [`zone`](ReferenceClock::zone).
    fn now_local(&self) -> DateTime<Tz> {
        self.now_utc().with_timezone(&self.zone())
    }
}

/// A clock pinned to a fixed instant and zone, for deterministic parsing.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    zone: Tz,
}

impl FixedClock {
    #[must_use]
    pub fn new(now: DateTime<Utc>, zone: Tz) -> Self {
        Self { now, zone }
    }
}

impl ReferenceClock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now
    }

    fn zone(&self) -> Tz {
        self.zone
    }
}
