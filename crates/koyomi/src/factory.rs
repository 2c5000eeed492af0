//! Date creation: input normalization, localization resolution, and the
//! service/system timezone branch.

use std::time::SystemTime;

use chrono::{DateTime, Utc};

use koyomi_core::error::CoreError;
use koyomi_core::registry;
use koyomi_core::settings::{self, LocalizationOverride};
use koyomi_parse::Locale;

use crate::context::{self, ContextClock};
use crate::error::DateResult;
use crate::stamp::ZonedStamp;

/// Normalized creation input.
///
/// Replaces the source interface's runtime argument sniffing with an
/// explicit union; the `From` conversions keep call sites as convenient.
/// Absolute variants bypass the expression engine entirely.
#[derive(Debug, Clone, Default)]
pub enum DateInput {
    /// The current instant.
    #[default]
    Now,
    /// An epoch-milliseconds timestamp.
    Epoch(i64),
    /// An existing absolute instant.
    Instant(DateTime<Utc>),
    /// An existing bound instant; its epoch value is taken, its binding is
    /// not (the new stamp's zone is resolved from settings and options).
    Stamp(ZonedStamp),
    /// A free-text date expression for the engine.
    Expression(String),
}

impl From<i64> for DateInput {
    fn from(epoch_ms: i64) -> Self {
        Self::Epoch(epoch_ms)
    }
}

impl From<&str> for DateInput {
    fn from(expression: &str) -> Self {
        Self::Expression(expression.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(expression: String) -> Self {
        Self::Expression(expression)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Instant(instant)
    }
}

impl From<SystemTime> for DateInput {
    fn from(time: SystemTime) -> Self {
        Self::Instant(time.into())
    }
}

impl From<ZonedStamp> for DateInput {
    fn from(stamp: ZonedStamp) -> Self {
        Self::Stamp(stamp)
    }
}

impl From<&ZonedStamp> for DateInput {
    fn from(stamp: &ZonedStamp) -> Self {
        Self::Stamp(stamp.clone())
    }
}

/// Per-call creation options: a partial localization override and the
/// service-timezone switch. Both default to the process-wide settings.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub localization: LocalizationOverride,
    pub service_timezone: Option<bool>,
}

impl CreateOptions {
    /// Options requesting service-timezone interpretation.
    #[must_use]
    pub fn service() -> Self {
        Self {
            service_timezone: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn use_service_timezone(mut self, flag: bool) -> Self {
        self.service_timezone = Some(flag);
        self
    }

    #[must_use]
    pub fn timezone(mut self, zone: &str) -> Self {
        self.localization.timezone = Some(zone.to_owned());
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: &str) -> Self {
        self.localization.locale = Some(locale.to_owned());
        self
    }
}

/// ## Summary
/// Creates a timezone-bound instant with the process-wide defaults.
///
/// ## Errors
/// See [`create_date_localized`].
pub fn create_date(input: impl Into<DateInput>) -> DateResult<ZonedStamp> {
    create(input.into(), None, &CreateOptions::default())
}

/// ## Summary
/// Creates a timezone-bound instant with per-call options.
///
/// ## Errors
/// See [`create_date_localized`].
pub fn create_date_with(
    input: impl Into<DateInput>,
    options: &CreateOptions,
) -> DateResult<ZonedStamp> {
    create(input.into(), None, options)
}

/// ## Summary
/// Creates a timezone-bound instant with an explicit per-call locale,
/// which overrides any locale carried in `options`.
///
/// ## Errors
/// `CoreError::InvalidOption` for an unsupported locale tag,
/// `CoreError::UnknownZone` for an unknown timezone identifier (checked
/// before any parsing, also for absolute inputs), `ParseError` for a
/// malformed expression, `CoreError::OutOfRangeTimestamp` for an
/// unrepresentable epoch value. The parsing context is restored on every
/// path.
pub fn create_date_localized(
    input: impl Into<DateInput>,
    locale: &str,
    options: &CreateOptions,
) -> DateResult<ZonedStamp> {
    create(input.into(), Some(locale), options)
}

fn create(
    input: DateInput,
    explicit_locale: Option<&str>,
    options: &CreateOptions,
) -> DateResult<ZonedStamp> {
    let resolved = settings::resolve(&options.localization, options.service_timezone);

    let locale_tag = explicit_locale.unwrap_or(&resolved.locale);
    let locale = Locale::from_tag(locale_tag)
        .ok_or_else(|| CoreError::InvalidOption(format!("unsupported locale: {locale_tag}")))?;

    // The binding zone is resolved up front so an unknown service timezone
    // fails identically for absolute and expression inputs.
    let binding = if resolved.use_service {
        registry::bind(&resolved.timezone)?
    } else {
        registry::bind(&settings::system_timezone())?
    };

    let instant = match input {
        DateInput::Now => Utc::now(),
        DateInput::Epoch(epoch_ms) => DateTime::from_timestamp_millis(epoch_ms)
            .ok_or(CoreError::OutOfRangeTimestamp(epoch_ms))?,
        DateInput::Instant(instant) => instant,
        DateInput::Stamp(stamp) => stamp.instant(),
        DateInput::Expression(expression) => {
            tracing::debug!(
                expression = %expression,
                locale = %locale,
                zone = binding.id(),
                service = resolved.use_service,
                "parsing date expression"
            );
            if resolved.use_service {
                context::with_zone(binding.tz(), || {
                    koyomi_parse::parse(&expression, locale, &ContextClock)
                })?
            } else {
                // The context already rests on the system timezone.
                koyomi_parse::parse(&expression, locale, &ContextClock)?
            }
        }
    };

    Ok(ZonedStamp::from_parts(instant, binding))
}
