//! Expression dispatch: relative and periodic forms first, then literals.

pub mod locale;

mod absolute;
mod relative;

use chrono::{DateTime, Utc};

pub use relative::zoned_midnight;

use crate::clock::ReferenceClock;
use crate::error::{ParseError, ParseResult};
use locale::Locale;

/// ## Summary
/// Resolves a date expression to an absolute instant, anchored on the
/// clock's "now" and interpreted against the clock's zone.
///
/// ## Errors
/// Returns `ParseError::UnrecognizedExpression` if the expression matches
/// no known form in the locale, and passes through resolution failures
/// (invalid dates, out-of-range arithmetic) from the matched form.
pub fn parse(
    expression: &str,
    locale: Locale,
    clock: &dyn ReferenceClock,
) -> ParseResult<DateTime<Utc>> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(ParseError::UnrecognizedExpression(expression.to_owned()));
    }

    tracing::trace!(expression = trimmed, locale = %locale, zone = %clock.zone(), "parsing date expression");

    if let Some(instant) = relative::parse_relative(trimmed, locale, clock)? {
        return Ok(instant);
    }
    if let Some(instant) = absolute::parse_absolute(trimmed, locale, clock)? {
        return Ok(instant);
    }

    Err(ParseError::UnrecognizedExpression(trimmed.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::TimeZone;
    use chrono_tz::Tz;

    #[test]
    fn dispatch_prefers_relative_forms() {
        let clock = FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 18, 0, 0).unwrap(),
            Tz::GMT,
        );

        assert_eq!(
            parse("today", Locale::En, &clock).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse("  2024-06-01  ", Locale::En, &clock).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn unrecognized_expressions_keep_the_input() {
        let clock = FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 15, 18, 0, 0).unwrap(),
            Tz::GMT,
        );

        let err = parse("garbage!!!", Locale::En, &clock).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnrecognizedExpression(input) if input == "garbage!!!"
        ));

        let err = parse("   ", Locale::En, &clock).unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedExpression(_)));
    }
}
