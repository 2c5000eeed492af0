//! Service-timezone-aware date creation.
//!
//! Applications often serve a business that lives in one timezone from
//! machines configured for another. This crate makes date creation aware of
//! both: every call resolves against either the process-wide *system*
//! timezone or a configurable *service* timezone, and relative or periodic
//! expressions ("1 hour ago", "today", 「明日」) are interpreted inside the
//! chosen zone's calendar — "today" under `Pacific/Enderbury` and under
//! `Pacific/Niue` are legitimately different calendar days.
//!
//! The result is a [`ZonedStamp`]: an absolute instant that remembers its
//! bound timezone for wall-clock field access and calendar arithmetic while
//! comparing purely on the instant, so stamps bound to different zones
//! order and compare correctly.
//!
//! ```
//! use koyomi::{CreateOptions, LocalizationOverride, create_date, create_date_with};
//! use koyomi::{set_default_localization, set_use_service_timezone_by_default};
//!
//! # fn main() -> Result<(), koyomi::DateError> {
//! set_default_localization(
//!     &LocalizationOverride::default()
//!         .locale("ja")
//!         .timezone("Asia/Tokyo"),
//! );
//! set_use_service_timezone_by_default(true);
//!
//! // Interpreted on Tokyo's calendar, bound to Tokyo.
//! let today = create_date("今日")?;
//! assert_eq!(today.offset_minutes(), -540);
//!
//! // The same instant can be viewed from any zone without changing
//! // identity.
//! let in_gmt = today.rebind("GMT")?;
//! assert_eq!(today, in_gmt);
//!
//! // Per-call overrides win over the defaults.
//! let niue_now = create_date_with(
//!     koyomi::DateInput::Now,
//!     &CreateOptions::service().timezone("Pacific/Niue"),
//! )?;
//! assert_eq!(niue_now.offset_minutes(), 660);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod factory;
pub mod stamp;

pub use error::{DateError, DateResult};
pub use factory::{CreateOptions, DateInput, create_date, create_date_localized, create_date_with};
pub use stamp::ZonedStamp;

pub use koyomi_core::config::{KoyomiConfig, load_config};
pub use koyomi_core::error::CoreError;
pub use koyomi_core::settings::{
    LocalizationOverride, set_default_localization, set_system_timezone,
    set_use_service_timezone_by_default,
};
pub use koyomi_parse::{Locale, ParseError};
