//! The parsing context: which timezone "now" is currently evaluated in.
//!
//! The expression engine constructs its reference instant through a clock,
//! not a parameter, so making a parse timezone-aware means redirecting what
//! that clock reports for the duration of the call. The redirection is a
//! thread-local cell with scoped, panic-safe restoration; it is never a
//! process-global, so concurrent callers cannot observe each other's
//! context.

use std::cell::Cell;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use koyomi_core::settings;
use koyomi_parse::ReferenceClock;

thread_local! {
    static ACTIVE_ZONE: Cell<Option<Tz>> = const { Cell::new(None) };
}

/// The timezone a parse started right now would be interpreted in: the
/// innermost [`with_zone`] override, or the system timezone at rest.
#[must_use]
pub fn active_zone() -> Tz {
    ACTIVE_ZONE.with(Cell::get).unwrap_or_else(settings::system_tz)
}

struct RestoreZone(Option<Tz>);

impl Drop for RestoreZone {
    fn drop(&mut self) {
        ACTIVE_ZONE.with(|cell| cell.set(self.0));
    }
}

/// ## Summary
/// Runs `f` with the active zone switched to `zone`, restoring the
/// previous value afterwards — also when `f` returns early through an
/// error or unwinds. Nested calls restore to the immediately enclosing
/// zone, strictly last-switched first-restored.
pub fn with_zone<T>(zone: Tz, f: impl FnOnce() -> T) -> T {
    let previous = ACTIVE_ZONE.with(|cell| cell.replace(Some(zone)));
    let _restore = RestoreZone(previous);
    f()
}

/// The engine clock: real time, zone taken from the active context.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextClock;

impl ReferenceClock for ContextClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn zone(&self) -> Tz {
        active_zone()
    }
}
