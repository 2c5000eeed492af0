//! Literal date and date-time forms.
//!
//! Forms carrying an explicit offset are absolute on their own; naive forms
//! are wall-clock readings in the clock's zone, which keeps a literal like
//! "2024-01-15 10:30" consistent with how relative expressions are
//! interpreted.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::locale::Locale;
use super::relative::zoned_midnight;
use crate::clock::ReferenceClock;
use crate::error::{ParseError, ParseResult};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Attempts to resolve `expr` as a literal form. `Ok(None)` means the
/// expression matches none of the known formats.
pub(crate) fn parse_absolute(
    expr: &str,
    locale: Locale,
    clock: &dyn ReferenceClock,
) -> ParseResult<Option<DateTime<Utc>>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(expr) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(expr, format) {
            return resolve_local(expr, naive, clock).map(Some);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(expr, format) {
            return zoned_midnight(date, clock.zone()).map(Some);
        }
    }

    if locale == Locale::Ja {
        if let Ok(naive) = NaiveDateTime::parse_from_str(expr, "%Y年%m月%d日 %H時%M分") {
            return resolve_local(expr, naive, clock).map(Some);
        }
        if let Ok(date) = NaiveDate::parse_from_str(expr, "%Y年%m月%d日") {
            return zoned_midnight(date, clock.zone()).map(Some);
        }
    }

    Ok(None)
}

/// Maps a naive wall-clock reading into the clock's zone. A reading inside
/// a daylight saving gap shifts forward one hour (lenient); a reading
/// inside a fold takes the earlier instant.
fn resolve_local(
    expr: &str,
    naive: NaiveDateTime,
    clock: &dyn ReferenceClock,
) -> ParseResult<DateTime<Utc>> {
    let tz = clock.zone();
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let shifted = naive
                .checked_add_signed(Duration::hours(1))
                .ok_or_else(|| ParseError::OutOfRange(expr.to_owned()))?;
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                    Ok(dt.with_timezone(&Utc))
                }
                LocalResult::None => Err(ParseError::InvalidDate(format!(
                    "nonexistent local time {naive} in {tz}"
                ))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono_tz::Tz;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn clock(zone: Tz) -> FixedClock {
        FixedClock::new(utc(2024, 6, 15, 18, 0, 0), zone)
    }

    fn parse_ok(expr: &str, locale: Locale, clock: &FixedClock) -> DateTime<Utc> {
        parse_absolute(expr, locale, clock)
            .expect("expression should resolve")
            .expect("expression should match")
    }

    #[test]
    fn rfc3339_ignores_the_clock_zone() {
        let instant = parse_ok("2024-01-15T10:00:00+09:00", Locale::En, &clock(Tz::GMT));
        assert_eq!(instant, utc(2024, 1, 15, 1, 0, 0));
    }

    #[test]
    fn naive_datetime_reads_the_clock_zone_wall_clock() {
        let instant = parse_ok("2024-01-15 10:30:00", Locale::En, &clock(Tz::Asia__Tokyo));
        assert_eq!(instant, utc(2024, 1, 15, 1, 30, 0));

        let instant = parse_ok("2024-01-15 10:30", Locale::En, &clock(Tz::GMT));
        assert_eq!(instant, utc(2024, 1, 15, 10, 30, 0));
    }

    #[test]
    fn naive_date_is_midnight_in_the_clock_zone() {
        let instant = parse_ok("2024-01-15", Locale::En, &clock(Tz::Asia__Tokyo));
        assert_eq!(instant, utc(2024, 1, 14, 15, 0, 0));

        let instant = parse_ok("2024/01/15", Locale::En, &clock(Tz::GMT));
        assert_eq!(instant, utc(2024, 1, 15, 0, 0, 0));
    }

    #[test]
    fn ja_date_literals() {
        let instant = parse_ok("2024年1月15日", Locale::Ja, &clock(Tz::Asia__Tokyo));
        assert_eq!(instant, utc(2024, 1, 14, 15, 0, 0));

        let instant = parse_ok("2024年1月15日 10時30分", Locale::Ja, &clock(Tz::Asia__Tokyo));
        assert_eq!(instant, utc(2024, 1, 15, 1, 30, 0));

        // Not recognized outside the ja locale.
        assert!(
            parse_absolute("2024年1月15日", Locale::En, &clock(Tz::GMT))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn gap_reading_shifts_forward_one_hour() {
        // 02:30 never happened in New York on 2024-03-10.
        let instant = parse_ok("2024-03-10 02:30:00", Locale::En, &clock(Tz::America__New_York));
        assert_eq!(instant, utc(2024, 3, 10, 7, 30, 0));
    }

    #[test]
    fn unknown_literal_falls_through() {
        assert!(
            parse_absolute("not a date", Locale::En, &clock(Tz::GMT))
                .unwrap()
                .is_none()
        );
    }
}
