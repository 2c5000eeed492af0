//! Relative and periodic expression resolution.
//!
//! Relative offsets ("1 hour ago", 「三日後」) are anchored on the clock's
//! "now". Periodic anchors ("today", 「明日」) resolve to local midnight of
//! the target calendar day in the clock's zone, which is the whole point of
//! the reference-clock seam: the same literal can legitimately land up to a
//! day apart under different zones.

use chrono::{DateTime, Duration, LocalResult, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::locale::{Locale, Unit};
use crate::clock::ReferenceClock;
use crate::error::{ParseError, ParseResult};

/// Attempts to resolve `expr` as a relative or periodic expression.
/// `Ok(None)` means the expression is not relative in this locale.
pub(crate) fn parse_relative(
    expr: &str,
    locale: Locale,
    clock: &dyn ReferenceClock,
) -> ParseResult<Option<DateTime<Utc>>> {
    let lowered = expr.to_lowercase();
    let keywords = locale.keywords();

    if keywords.now.contains(&lowered.as_str()) {
        return Ok(Some(clock.now_utc()));
    }
    if keywords.today.contains(&lowered.as_str()) {
        return day_start(clock, 0).map(Some);
    }
    if keywords.tomorrow.contains(&lowered.as_str()) {
        return day_start(clock, 1).map(Some);
    }
    if keywords.yesterday.contains(&lowered.as_str()) {
        return day_start(clock, -1).map(Some);
    }

    match locale {
        Locale::En => parse_offset_en(&lowered, clock),
        Locale::Ja => parse_offset_ja(expr, clock),
    }
}

/// `in N <unit>` / `N <unit> ago` / `N <unit> from now`, with `a`, `an`,
/// and `one` accepted as counts.
fn parse_offset_en(
    lowered: &str,
    clock: &dyn ReferenceClock,
) -> ParseResult<Option<DateTime<Utc>>> {
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    let (count_token, unit_token, sign) = match tokens.as_slice() {
        ["in", count, unit] => (*count, *unit, 1),
        [count, unit, "ago"] => (*count, *unit, -1),
        [count, unit, "from", "now"] => (*count, *unit, 1),
        _ => return Ok(None),
    };

    let Some(count) = parse_count_en(count_token) else {
        return Ok(None);
    };
    let Some(unit) = unit_from_en(unit_token) else {
        return Ok(None);
    };

    apply_offset(lowered, clock, unit, sign * count).map(Some)
}

/// `<N><unit>前` / `<N><unit>後`, with ASCII or kanji counts.
fn parse_offset_ja(expr: &str, clock: &dyn ReferenceClock) -> ParseResult<Option<DateTime<Utc>>> {
    let (body, sign) = if let Some(body) = expr.strip_suffix('前') {
        (body, -1)
    } else if let Some(body) = expr.strip_suffix('後') {
        (body, 1)
    } else {
        return Ok(None);
    };

    for (suffix, unit) in Locale::Ja.units() {
        if let Some(count_str) = body.strip_suffix(suffix) {
            let Some(count) = parse_count_ja(count_str) else {
                return Ok(None);
            };
            return apply_offset(expr, clock, *unit, sign * count).map(Some);
        }
    }

    Ok(None)
}

fn unit_from_en(word: &str) -> Option<Unit> {
    let singular = word.strip_suffix('s').unwrap_or(word);
    Locale::En
        .units()
        .iter()
        .find(|(name, _)| *name == singular)
        .map(|(_, unit)| *unit)
}

fn parse_count_en(token: &str) -> Option<i64> {
    match token {
        "a" | "an" | "one" => Some(1),
        _ => token.parse().ok(),
    }
}

fn parse_count_ja(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    if s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok();
    }
    kanji_number(s)
}

fn kanji_digit(c: char) -> Option<i64> {
    match c {
        '一' => Some(1),
        '二' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

/// Positional kanji numerals up to 99: 一, 十, 十五, 三十, 二十三.
fn kanji_number(s: &str) -> Option<i64> {
    let chars: Vec<char> = s.chars().collect();
    if let Some(pos) = chars.iter().position(|&c| c == '十') {
        let tens = match pos {
            0 => 1,
            1 => kanji_digit(chars[0])?,
            _ => return None,
        };
        let ones = match chars.len() - pos - 1 {
            0 => 0,
            1 => kanji_digit(chars[pos + 1])?,
            _ => return None,
        };
        Some(tens * 10 + ones)
    } else if chars.len() == 1 {
        kanji_digit(chars[0])
    } else {
        None
    }
}

/// Shifts "now" by a signed amount of `unit`. Sub-month units are absolute
/// durations; months and years are calendar arithmetic on the zone's wall
/// clock, so "1 month ago" from March 31st clamps to the end of February.
fn apply_offset(
    expr: &str,
    clock: &dyn ReferenceClock,
    unit: Unit,
    amount: i64,
) -> ParseResult<DateTime<Utc>> {
    let out_of_range = || ParseError::OutOfRange(expr.to_owned());

    match unit {
        Unit::Month | Unit::Year => {
            let months = if unit == Unit::Year {
                amount.checked_mul(12).ok_or_else(out_of_range)?
            } else {
                amount
            };
            let magnitude = u32::try_from(months.unsigned_abs()).map_err(|_e| out_of_range())?;
            let local = clock.now_local();
            let shifted = if months >= 0 {
                local.checked_add_months(Months::new(magnitude))
            } else {
                local.checked_sub_months(Months::new(magnitude))
            }
            .ok_or_else(out_of_range)?;
            Ok(shifted.with_timezone(&Utc))
        }
        _ => {
            let delta = fixed_delta(unit, amount).ok_or_else(out_of_range)?;
            clock
                .now_utc()
                .checked_add_signed(delta)
                .ok_or_else(out_of_range)
        }
    }
}

fn fixed_delta(unit: Unit, amount: i64) -> Option<Duration> {
    match unit {
        Unit::Second => Duration::try_seconds(amount),
        Unit::Minute => Duration::try_minutes(amount),
        Unit::Hour => Duration::try_hours(amount),
        Unit::Day => Duration::try_days(amount),
        Unit::Week => Duration::try_weeks(amount),
        Unit::Month | Unit::Year => None,
    }
}

/// Start of the calendar day `day_offset` days from the clock's current
/// local date, in the clock's zone.
fn day_start(clock: &dyn ReferenceClock, day_offset: i64) -> ParseResult<DateTime<Utc>> {
    let out_of_range = || ParseError::OutOfRange(format!("{day_offset} days"));
    let delta = Duration::try_days(day_offset).ok_or_else(out_of_range)?;
    let target = clock
        .now_local()
        .date_naive()
        .checked_add_signed(delta)
        .ok_or_else(out_of_range)?;
    zoned_midnight(target, clock.zone())
}

/// ## Summary
/// The first instant of `date` on the wall clock of `tz`.
///
/// Zones whose daylight saving transition lands on midnight need care: on a
/// gap the search shifts forward in half-hour steps until a valid local
/// time appears, and on a fold the earlier instant wins.
///
/// ## Errors
/// Returns `ParseError::InvalidDate` if no valid local time exists within
/// the first three hours of the day (no real zone comes close).
pub fn zoned_midnight(date: NaiveDate, tz: Tz) -> ParseResult<DateTime<Utc>> {
    for half_hours in 0..=6 {
        let Some(naive) = date
            .and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::minutes(30 * half_hours))
        else {
            break;
        };
        match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => return Ok(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => return Ok(earliest.with_timezone(&Utc)),
            LocalResult::None => {}
        }
    }
    Err(ParseError::InvalidDate(format!(
        "no valid local time at start of {date} in {tz}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn parse_ok(expr: &str, locale: Locale, clock: &FixedClock) -> DateTime<Utc> {
        parse_relative(expr, locale, clock)
            .expect("expression should resolve")
            .expect("expression should match")
    }

    #[test]
    fn en_anchors() {
        let clock = FixedClock::new(utc(2024, 6, 15, 18, 0, 0), Tz::GMT);

        assert_eq!(parse_ok("now", Locale::En, &clock), utc(2024, 6, 15, 18, 0, 0));
        assert_eq!(parse_ok("today", Locale::En, &clock), utc(2024, 6, 15, 0, 0, 0));
        assert_eq!(parse_ok("Tomorrow", Locale::En, &clock), utc(2024, 6, 16, 0, 0, 0));
        assert_eq!(parse_ok("yesterday", Locale::En, &clock), utc(2024, 6, 14, 0, 0, 0));
    }

    #[test]
    fn en_fixed_offsets() {
        let clock = FixedClock::new(utc(2024, 6, 15, 18, 0, 0), Tz::GMT);

        assert_eq!(parse_ok("1 hour ago", Locale::En, &clock), utc(2024, 6, 15, 17, 0, 0));
        assert_eq!(parse_ok("in 2 weeks", Locale::En, &clock), utc(2024, 6, 29, 18, 0, 0));
        assert_eq!(parse_ok("3 days ago", Locale::En, &clock), utc(2024, 6, 12, 18, 0, 0));
        assert_eq!(
            parse_ok("30 minutes from now", Locale::En, &clock),
            utc(2024, 6, 15, 18, 30, 0)
        );
        assert_eq!(parse_ok("in a week", Locale::En, &clock), utc(2024, 6, 22, 18, 0, 0));
    }

    #[test]
    fn en_calendar_offsets_use_local_wall_clock() {
        // Tokyo local is 2024-03-31 07:00; one month back clamps to Feb 29.
        let clock = FixedClock::new(utc(2024, 3, 30, 22, 0, 0), Tz::Asia__Tokyo);

        assert_eq!(
            parse_ok("a month ago", Locale::En, &clock),
            utc(2024, 2, 28, 22, 0, 0)
        );
        assert_eq!(
            parse_ok("one year from now", Locale::En, &clock),
            utc(2025, 3, 30, 22, 0, 0)
        );
    }

    #[test]
    fn ja_anchors_follow_the_clock_zone() {
        // Tokyo local is 2024-06-16 03:00, one calendar day ahead of UTC.
        let clock = FixedClock::new(utc(2024, 6, 15, 18, 0, 0), Tz::Asia__Tokyo);

        assert_eq!(parse_ok("今", Locale::Ja, &clock), utc(2024, 6, 15, 18, 0, 0));
        assert_eq!(parse_ok("今日", Locale::Ja, &clock), utc(2024, 6, 15, 15, 0, 0));
        assert_eq!(parse_ok("明日", Locale::Ja, &clock), utc(2024, 6, 16, 15, 0, 0));
        assert_eq!(parse_ok("昨日", Locale::Ja, &clock), utc(2024, 6, 14, 15, 0, 0));
    }

    #[test]
    fn ja_offsets() {
        let clock = FixedClock::new(utc(2024, 6, 15, 18, 0, 0), Tz::GMT);

        assert_eq!(parse_ok("一時間前", Locale::Ja, &clock), utc(2024, 6, 15, 17, 0, 0));
        assert_eq!(parse_ok("30分後", Locale::Ja, &clock), utc(2024, 6, 15, 18, 30, 0));
        assert_eq!(parse_ok("二週間前", Locale::Ja, &clock), utc(2024, 6, 1, 18, 0, 0));
        assert_eq!(parse_ok("十日後", Locale::Ja, &clock), utc(2024, 6, 25, 18, 0, 0));
        assert_eq!(parse_ok("二十三日後", Locale::Ja, &clock), utc(2024, 7, 8, 18, 0, 0));
    }

    #[test]
    fn ja_calendar_offsets() {
        let clock = FixedClock::new(utc(2024, 3, 30, 22, 0, 0), Tz::Asia__Tokyo);

        assert_eq!(parse_ok("一ヶ月前", Locale::Ja, &clock), utc(2024, 2, 28, 22, 0, 0));
        assert_eq!(parse_ok("1か月後", Locale::Ja, &clock), utc(2024, 4, 29, 22, 0, 0));
    }

    #[test]
    fn ja_non_expressions_fall_through() {
        let clock = FixedClock::new(utc(2024, 6, 15, 18, 0, 0), Tz::GMT);

        // Ends in 前 but has no counter unit.
        assert!(parse_relative("午前", Locale::Ja, &clock).unwrap().is_none());
        assert!(parse_relative("駅前", Locale::Ja, &clock).unwrap().is_none());
    }

    #[test]
    fn keywords_are_per_locale() {
        let clock = FixedClock::new(utc(2024, 6, 15, 18, 0, 0), Tz::GMT);

        assert!(parse_relative("今日", Locale::En, &clock).unwrap().is_none());
        assert!(parse_relative("today", Locale::Ja, &clock).unwrap().is_none());
    }

    // Zones at +13:00 and -11:00 keep local times exactly 24 hours apart,
    // so their calendar dates differ at every instant and each zone's local
    // midnight is the same UTC instant: "today" coincides in epoch while
    // the wall-clock date labels differ by one day.
    #[test]
    fn periodic_resolution_at_extreme_offsets() {
        let now = utc(2024, 6, 15, 18, 0, 0);
        let enderbury = FixedClock::new(now, Tz::Pacific__Enderbury);
        let niue = FixedClock::new(now, Tz::Pacific__Niue);

        let today_east = parse_ok("today", Locale::En, &enderbury);
        let today_west = parse_ok("today", Locale::En, &niue);
        let tomorrow_west = parse_ok("tomorrow", Locale::En, &niue);

        assert_eq!(today_east, utc(2024, 6, 15, 11, 0, 0));
        assert_eq!(today_east, today_west);
        assert_eq!(tomorrow_west - today_east, Duration::hours(24));

        // The +13 zone's "today" carries the same date label as the -11
        // zone's "tomorrow".
        let east_label = today_east.with_timezone(&Tz::Pacific__Enderbury).date_naive();
        let west_label = tomorrow_west.with_timezone(&Tz::Pacific__Niue).date_naive();
        assert_eq!(east_label, west_label);
    }

    #[test]
    fn periodic_resolution_diverges_from_utc_day() {
        // After 11:00 UTC the +13 zone has rolled into the next date.
        let late = FixedClock::new(utc(2024, 6, 15, 18, 0, 0), Tz::Pacific__Enderbury);
        let gmt_late = FixedClock::new(utc(2024, 6, 15, 18, 0, 0), Tz::GMT);
        assert_eq!(
            parse_ok("today", Locale::En, &late) - parse_ok("today", Locale::En, &gmt_late),
            Duration::hours(11)
        );

        // Before 11:00 UTC both zones agree on the date; +13 midnight is
        // then 13 hours behind UTC midnight.
        let early = FixedClock::new(utc(2024, 6, 15, 6, 0, 0), Tz::Pacific__Enderbury);
        let gmt_early = FixedClock::new(utc(2024, 6, 15, 6, 0, 0), Tz::GMT);
        assert_eq!(
            parse_ok("today", Locale::En, &early) - parse_ok("today", Locale::En, &gmt_early),
            Duration::hours(-13)
        );
    }

    #[test]
    fn zoned_midnight_shifts_forward_through_dst_gap() {
        // Brazil's 2017 DST start skipped midnight of October 15th; the day
        // began at 01:00 local (-02:00).
        let instant = zoned_midnight(
            NaiveDate::from_ymd_opt(2017, 10, 15).unwrap(),
            Tz::America__Sao_Paulo,
        )
        .expect("should resolve");
        assert_eq!(instant, utc(2017, 10, 15, 3, 0, 0));
    }

    #[test]
    fn zoned_midnight_takes_earlier_instant_on_fold() {
        // Havana's 2024 DST end repeated the 00:00-01:00 hour of November
        // 3rd; the earlier (-04:00) midnight wins.
        let instant = zoned_midnight(
            NaiveDate::from_ymd_opt(2024, 11, 3).unwrap(),
            Tz::America__Havana,
        )
        .expect("should resolve");
        assert_eq!(instant, utc(2024, 11, 3, 4, 0, 0));
    }
}
