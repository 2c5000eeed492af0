//! Supported locales and their expression keyword tables.

use std::fmt;

/// Locale an expression is interpreted in. Selects the keyword tables for
/// anchors ("today", 「明日」), units, and relative markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    En,
    Ja,
}

impl Locale {
    /// Resolves a locale tag ("en", "ja", "en-US", "ja_JP") to a supported
    /// locale. Matching is case-insensitive on the primary subtag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next().unwrap_or(tag);
        match primary.to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "ja" => Some(Self::Ja),
            _ => None,
        }
    }

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ja => "ja",
        }
    }

    pub(crate) const fn keywords(self) -> &'static KeywordTable {
        match self {
            Self::En => &EN_KEYWORDS,
            Self::Ja => &JA_KEYWORDS,
        }
    }

    pub(crate) const fn units(self) -> &'static [(&'static str, Unit)] {
        match self {
            Self::En => EN_UNITS,
            Self::Ja => JA_UNITS,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Anchor keywords for one locale.
pub(crate) struct KeywordTable {
    pub(crate) now: &'static [&'static str],
    pub(crate) today: &'static [&'static str],
    pub(crate) tomorrow: &'static [&'static str],
    pub(crate) yesterday: &'static [&'static str],
}

pub(crate) static EN_KEYWORDS: KeywordTable = KeywordTable {
    now: &["now"],
    today: &["today"],
    tomorrow: &["tomorrow"],
    yesterday: &["yesterday"],
};

pub(crate) static JA_KEYWORDS: KeywordTable = KeywordTable {
    now: &["今", "いま", "現在"],
    today: &["今日", "きょう", "本日"],
    tomorrow: &["明日", "あした", "あす"],
    yesterday: &["昨日", "きのう"],
};

/// A relative-expression unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// English unit names, singular; plurals are handled by stripping a
/// trailing `s` before lookup.
pub(crate) const EN_UNITS: &[(&str, Unit)] = &[
    ("second", Unit::Second),
    ("minute", Unit::Minute),
    ("hour", Unit::Hour),
    ("day", Unit::Day),
    ("week", Unit::Week),
    ("month", Unit::Month),
    ("year", Unit::Year),
];

/// Japanese counter suffixes, longest first so 時間 wins over 時 and 週間
/// over 週.
pub(crate) const JA_UNITS: &[(&str, Unit)] = &[
    ("時間", Unit::Hour),
    ("週間", Unit::Week),
    ("ヶ月", Unit::Month),
    ("か月", Unit::Month),
    ("カ月", Unit::Month),
    ("ケ月", Unit::Month),
    ("箇月", Unit::Month),
    ("秒", Unit::Second),
    ("分", Unit::Minute),
    ("日", Unit::Day),
    ("週", Unit::Week),
    ("年", Unit::Year),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_tag_matches_primary_subtag() {
        assert_eq!(Locale::from_tag("en"), Some(Locale::En));
        assert_eq!(Locale::from_tag("EN"), Some(Locale::En));
        assert_eq!(Locale::from_tag("en-US"), Some(Locale::En));
        assert_eq!(Locale::from_tag("ja_JP"), Some(Locale::Ja));
        assert_eq!(Locale::from_tag("fr"), None);
        assert_eq!(Locale::from_tag(""), None);
    }
}
