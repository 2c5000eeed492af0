//! The timezone-bound instant.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, Duration, Months, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::de;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use koyomi_core::error::CoreError;
use koyomi_core::registry::{self, ZoneBinding};
use koyomi_parse::{Locale, zoned_midnight};

use crate::context::{self, ContextClock};
use crate::error::DateResult;

/// An absolute instant bound to a timezone.
///
/// The instant is the identity: equality, ordering, and hashing ignore the
/// bound zone entirely, so stamps bound to different zones compare by the
/// moment they name. The zone governs wall-clock field access, calendar
/// arithmetic, and re-parsing, and is fixed at construction — every
/// "mutating" operation returns a new stamp.
#[derive(Debug, Clone)]
pub struct ZonedStamp {
    instant: DateTime<Utc>,
    binding: Arc<ZoneBinding>,
}

impl ZonedStamp {
    pub(crate) fn from_parts(instant: DateTime<Utc>, binding: Arc<ZoneBinding>) -> Self {
        Self { instant, binding }
    }

    /// ## Summary
    /// Binds an epoch-milliseconds instant to `zone`.
    ///
    /// ## Errors
    /// `CoreError::UnknownZone` for an unknown identifier,
    /// `CoreError::OutOfRangeTimestamp` for an epoch value outside the
    /// representable range.
    pub fn from_epoch_ms(epoch_ms: i64, zone: &str) -> DateResult<Self> {
        let binding = registry::bind(zone)?;
        let instant = DateTime::from_timestamp_millis(epoch_ms)
            .ok_or(CoreError::OutOfRangeTimestamp(epoch_ms))?;
        Ok(Self::from_parts(instant, binding))
    }

    /// ## Summary
    /// Binds an existing instant to `zone`.
    ///
    /// ## Errors
    /// `CoreError::UnknownZone` for an unknown identifier.
    pub fn from_instant(instant: DateTime<Utc>, zone: &str) -> DateResult<Self> {
        Ok(Self::from_parts(instant, registry::bind(zone)?))
    }

    #[must_use]
    pub fn epoch_ms(&self) -> i64 {
        self.instant.timestamp_millis()
    }

    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// The identifier of the bound timezone.
    #[must_use]
    pub fn zone_id(&self) -> &str {
        self.binding.id()
    }

    #[must_use]
    pub fn tz(&self) -> Tz {
        self.binding.tz()
    }

    /// The instant on the bound zone's wall clock.
    #[must_use]
    pub fn to_datetime(&self) -> DateTime<Tz> {
        self.instant.with_timezone(&self.binding.tz())
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.to_datetime().year()
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.to_datetime().month()
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.to_datetime().day()
    }

    #[must_use]
    pub fn hour(&self) -> u32 {
        self.to_datetime().hour()
    }

    #[must_use]
    pub fn minute(&self) -> u32 {
        self.to_datetime().minute()
    }

    #[must_use]
    pub fn second(&self) -> u32 {
        self.to_datetime().second()
    }

    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.to_datetime().weekday()
    }

    /// The bound zone's offset at this instant, in minutes, UTC minus local
    /// wall clock (Asia/Tokyo is `-540`).
    #[must_use]
    pub fn offset_minutes(&self) -> i32 {
        self.binding.offset_minutes_at(self.epoch_ms())
    }

    /// ## Summary
    /// Shifts by whole calendar days on the bound zone's wall clock, so
    /// crossing a daylight saving transition keeps the local time of day.
    ///
    /// ## Errors
    /// `CoreError::OutOfRangeTimestamp` if the result is unrepresentable.
    pub fn add_days(&self, days: i64) -> DateResult<Self> {
        let local = self.to_datetime();
        let magnitude = Days::new(days.unsigned_abs());
        let shifted = if days >= 0 {
            local.checked_add_days(magnitude)
        } else {
            local.checked_sub_days(magnitude)
        }
        .ok_or(CoreError::OutOfRangeTimestamp(self.epoch_ms()))?;
        Ok(Self::from_parts(
            shifted.with_timezone(&Utc),
            Arc::clone(&self.binding),
        ))
    }

    /// ## Summary
    /// Shifts by calendar months on the bound zone's wall clock, clamping
    /// the day of month where needed (January 31st plus one month is the
    /// end of February).
    ///
    /// ## Errors
    /// `CoreError::OutOfRangeTimestamp` if the result is unrepresentable.
    pub fn add_months(&self, months: i32) -> DateResult<Self> {
        let local = self.to_datetime();
        let magnitude = Months::new(months.unsigned_abs());
        let shifted = if months >= 0 {
            local.checked_add_months(magnitude)
        } else {
            local.checked_sub_months(magnitude)
        }
        .ok_or(CoreError::OutOfRangeTimestamp(self.epoch_ms()))?;
        Ok(Self::from_parts(
            shifted.with_timezone(&Utc),
            Arc::clone(&self.binding),
        ))
    }

    /// ## Summary
    /// Shifts by an absolute number of hours.
    ///
    /// ## Errors
    /// `CoreError::OutOfRangeTimestamp` if the result is unrepresentable.
    pub fn add_hours(&self, hours: i64) -> DateResult<Self> {
        self.shift(Duration::try_hours(hours))
    }

    /// ## Summary
    /// Shifts by an absolute number of minutes.
    ///
    /// ## Errors
    /// `CoreError::OutOfRangeTimestamp` if the result is unrepresentable.
    pub fn add_minutes(&self, minutes: i64) -> DateResult<Self> {
        self.shift(Duration::try_minutes(minutes))
    }

    /// ## Summary
    /// Shifts by an absolute number of seconds.
    ///
    /// ## Errors
    /// `CoreError::OutOfRangeTimestamp` if the result is unrepresentable.
    pub fn add_seconds(&self, seconds: i64) -> DateResult<Self> {
        self.shift(Duration::try_seconds(seconds))
    }

    fn shift(&self, delta: Option<Duration>) -> DateResult<Self> {
        let shifted = delta
            .and_then(|delta| self.instant.checked_add_signed(delta))
            .ok_or(CoreError::OutOfRangeTimestamp(self.epoch_ms()))?;
        Ok(Self::from_parts(shifted, Arc::clone(&self.binding)))
    }

    /// ## Summary
    /// The start of this instant's calendar day in the bound zone.
    ///
    /// ## Errors
    /// Passes through the engine's resolution failure if the day has no
    /// valid first instant.
    pub fn start_of_day(&self) -> DateResult<Self> {
        let instant = zoned_midnight(self.to_datetime().date_naive(), self.tz())?;
        Ok(Self::from_parts(instant, Arc::clone(&self.binding)))
    }

    /// ## Summary
    /// Re-parses an expression under the *bound* zone, keeping the binding.
    /// A periodic expression like 「明日」 resolves against this stamp's
    /// zone's calendar, whatever the system or service defaults currently
    /// say.
    ///
    /// ## Errors
    /// Passes through `ParseError` from the engine.
    pub fn reinterpret(&self, expression: &str, locale: Locale) -> DateResult<Self> {
        let instant = context::with_zone(self.tz(), || {
            koyomi_parse::parse(expression, locale, &ContextClock)
        })?;
        Ok(Self::from_parts(instant, Arc::clone(&self.binding)))
    }

    /// ## Summary
    /// The same instant bound to a different zone.
    ///
    /// ## Errors
    /// `CoreError::UnknownZone` for an unknown identifier.
    pub fn rebind(&self, zone: &str) -> DateResult<Self> {
        Ok(Self::from_parts(self.instant, registry::bind(zone)?))
    }

    /// Whether this instant is within `tolerance_ms` of an epoch value.
    #[must_use]
    pub fn matches_epoch(&self, epoch_ms: i64, tolerance_ms: i64) -> bool {
        (self.epoch_ms() - epoch_ms).abs() <= tolerance_ms
    }

    /// Whether two stamps are within `tolerance_ms` of each other,
    /// regardless of their bound zones.
    #[must_use]
    pub fn is_close(&self, other: &Self, tolerance_ms: i64) -> bool {
        self.matches_epoch(other.epoch_ms(), tolerance_ms)
    }
}

// The bound zone is deliberately excluded from identity.
impl PartialEq for ZonedStamp {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for ZonedStamp {}

impl PartialOrd for ZonedStamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ZonedStamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl Hash for ZonedStamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instant.hash(state);
    }
}

impl fmt::Display for ZonedStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]",
            self.to_datetime().format("%Y-%m-%d %H:%M:%S %:z"),
            self.binding.id()
        )
    }
}

impl Serialize for ZonedStamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ZonedStamp", 2)?;
        state.serialize_field("epoch_ms", &self.epoch_ms())?;
        state.serialize_field("timezone", self.zone_id())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for ZonedStamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Repr {
            epoch_ms: i64,
            timezone: String,
        }

        let repr = Repr::deserialize(deserializer)?;
        Self::from_epoch_ms(repr.epoch_ms, &repr.timezone).map_err(de::Error::custom)
    }
}
