//! Date expression engine: relative, periodic, and literal forms.
//!
//! Resolves free-text date expressions ("1 hour ago", "today", 「明日」,
//! "2024-01-15 10:30") to absolute instants. The engine never reads the
//! machine clock or a global timezone itself: every resolution is anchored
//! on a caller-supplied [`ReferenceClock`], which supplies both "now" and
//! the zone whose calendar defines day boundaries. That seam is what lets
//! the caller redirect "now" into an arbitrary service timezone.

pub mod clock;
pub mod error;
pub mod expr;

pub use clock::{FixedClock, ReferenceClock};
pub use error::{ParseError, ParseResult};
pub use expr::locale::Locale;
pub use expr::{parse, zoned_midnight};
