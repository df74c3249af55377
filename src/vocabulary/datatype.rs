//! Primitive data types accepted as property ranges.
//!
//! The nine types are a fixed contract: they are never read from the raw
//! vocabulary. Declaration order runs from the most restrictive (`Boolean`)
//! to the least restrictive (`Text`) and is the fallback order used during
//! validation.
//!
//! | Type | Format hint | Pattern |
//! |------|-------------|---------|
//! | `Boolean` | `True / False` | `True` or `False`, case-sensitive |
//! | `Integer` | | optional sign, digits |
//! | `Float` | | optional sign, decimal point, exponent |
//! | `Number` | | optional sign, digits |
//! | `Date` | ISO 8601 | shared ISO 8601 pattern |
//! | `Time` | ISO 8601 | shared ISO 8601 pattern |
//! | `DateTime` | ISO 8601 | shared ISO 8601 pattern |
//! | `URL` | `http://www.website.com` | `http://` or `https://` prefix |
//! | `Text` | | none (always valid) |

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ISO 8601 Pattern
// ============================================================================
//
// `Date`, `Time` and `DateTime` share one permissive pattern. It accepts
// calendar (`2013-01-15`), week (`2013-W03-2`) and ordinal (`2013-015`)
// dates, in extended or basic form, optionally followed by a time of day
// and a zone designator. The date separator is either always `-` or always
// absent, and the time separator either always `:` or always absent; each
// variant is spelled out as its own alternative.

macro_rules! iso_fraction {
    () => {
        r"(?:[.,][0-9]+)"
    };
}

macro_rules! iso_zone {
    () => {
        r"(?:[zZ]|[+-](?:[01][0-9]|2[0-3]):?(?:[0-5][0-9])?)"
    };
}

macro_rules! iso_hour {
    () => {
        r"(?:[01][0-9]|2[0-3])"
    };
}

macro_rules! iso_month {
    () => {
        r"(?:0[1-9]|1[0-2])"
    };
}

macro_rules! iso_day {
    () => {
        r"(?:[12][0-9]|0[1-9]|3[01])"
    };
}

macro_rules! iso_week {
    () => {
        r"W(?:[0-4][0-9]|5[0-2])(?:-?[1-7])?"
    };
}

macro_rules! iso_ordinal {
    () => {
        r"(?:00[1-9]|0[1-9][0-9]|[12][0-9]{2}|3(?:[0-5][0-9]|6[1-6]))"
    };
}

/// Time of day following the `T` (or whitespace) designator.
macro_rules! iso_clock {
    () => {
        concat!(
            "(?:",
            // hours only, or midnight as 24:00
            "(?:", iso_hour!(), "|24:?00)", iso_fraction!(), "?",
            // hh:mm[:ss]
            "|", iso_hour!(), ":[0-5][0-9](?:", iso_fraction!(), "|:[0-5][0-9]", iso_fraction!(), "?)?",
            // hhmm[ss]
            "|", iso_hour!(), "[0-5][0-9](?:", iso_fraction!(), "?[0-5][0-9]", iso_fraction!(), "?|", iso_fraction!(), ")?",
            ")?",
            iso_zone!(),
            "?"
        )
    };
}

const ISO_8601_PATTERN: &str = concat!(
    r"^[+-]?[0-9]{4}(?:",
    // extended: 2013-01-15, 2013-W03-2, 2013-015
    "-(?:", iso_month!(), "(?:-", iso_day!(), ")?|", iso_week!(), "|", iso_ordinal!(), ")",
    r"(?:[T\s]", iso_clock!(), ")?",
    // basic: 20130115, 2013W032, 2013015
    "|(?:", iso_month!(), iso_day!(), "|", iso_week!(), "|", iso_ordinal!(), ")",
    r"(?:[T\s]", iso_clock!(), ")?",
    // basic year and month only when a time follows: 201301T10
    "|", iso_month!(), "T", iso_clock!(),
    ")?$"
);

// ============================================================================
// Data Types
// ============================================================================

/// A primitive data type, ordered from most to least restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Integer,
    Float,
    Number,
    Date,
    Time,
    DateTime,
    #[serde(rename = "URL")]
    Url,
    Text,
}

impl DataType {
    /// All data types in canonical (most to least restrictive) order.
    pub const ALL: [DataType; 9] = [
        DataType::Boolean,
        DataType::Integer,
        DataType::Float,
        DataType::Number,
        DataType::Date,
        DataType::Time,
        DataType::DateTime,
        DataType::Url,
        DataType::Text,
    ];

    /// Canonical vocabulary name, as used in property ranges.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Number => "Number",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::DateTime => "DateTime",
            Self::Url => "URL",
            Self::Text => "Text",
        }
    }

    /// Resolve a canonical vocabulary name. Matching is exact.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|data_type| data_type.name() == name)
    }

    /// Human-readable label for editor UIs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Integer => "Integer number",
            Self::Float => "Floating point number",
            Self::Number => "Number",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::DateTime => "Date with time",
            Self::Url => "URL",
            Self::Text => "Text",
        }
    }

    /// Display-only format hint.
    pub const fn format(self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some("True / False"),
            Self::Date | Self::Time | Self::DateTime => Some("ISO 8601"),
            Self::Url => Some("http://www.website.com"),
            Self::Integer | Self::Float | Self::Number | Self::Text => None,
        }
    }

    /// Validation pattern. `None` means every value is accepted.
    ///
    /// The same strings are handed to client-side validators, so they only
    /// use syntax shared by common regex engines (no look-around, no
    /// back-references).
    pub const fn pattern(self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some(r"^(True|False)$"),
            Self::Integer | Self::Number => Some(r"^[-+]?[0-9]+$"),
            Self::Float => Some(r"^[-+]?[0-9]*\.?[0-9]+([eE][-+]?[0-9]+)?$"),
            Self::Date | Self::Time | Self::DateTime => Some(ISO_8601_PATTERN),
            Self::Url => Some(r"^https?://.+"),
            Self::Text => None,
        }
    }

    /// Position in the canonical order.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn iso(value: &str) -> bool {
        Regex::new(ISO_8601_PATTERN).unwrap().is_match(value)
    }

    #[test]
    fn test_canonical_order() {
        for pair in DataType::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].index() + 1, pair[1].index());
        }
        assert_eq!(DataType::ALL.first(), Some(&DataType::Boolean));
        assert_eq!(DataType::ALL.last(), Some(&DataType::Text));
    }

    #[test]
    fn test_name_round_trip() {
        for data_type in DataType::ALL {
            assert_eq!(DataType::from_name(data_type.name()), Some(data_type));
        }
        assert_eq!(DataType::from_name("URL"), Some(DataType::Url));
        assert_eq!(DataType::from_name("Url"), None);
        assert_eq!(DataType::from_name("text"), None);
        assert_eq!(DataType::from_name("Distance"), None);
    }

    #[test]
    fn test_serde_uses_vocabulary_names() {
        let json = serde_json::to_string(&DataType::Url).unwrap();
        assert_eq!(json, "\"URL\"");
        let parsed: DataType = serde_json::from_str("\"DateTime\"").unwrap();
        assert_eq!(parsed, DataType::DateTime);
    }

    #[test]
    fn test_only_text_has_no_pattern() {
        for data_type in DataType::ALL {
            assert_eq!(data_type.pattern().is_none(), data_type == DataType::Text);
        }
    }

    #[test]
    fn test_all_patterns_compile() {
        for data_type in DataType::ALL {
            if let Some(pattern) = data_type.pattern() {
                assert!(Regex::new(pattern).is_ok(), "{data_type} pattern");
            }
        }
    }

    #[test]
    fn test_date_types_share_pattern() {
        assert_eq!(DataType::Date.pattern(), DataType::Time.pattern());
        assert_eq!(DataType::Date.pattern(), DataType::DateTime.pattern());
    }

    #[test]
    fn test_iso_calendar_dates() {
        assert!(iso("2013"));
        assert!(iso("2013-01"));
        assert!(iso("2013-01-15"));
        assert!(iso("20130115"));
        assert!(iso("+2013-01-15"));
        assert!(iso("-0044-03-15"));
        assert!(!iso("2013-13-01"));
        assert!(!iso("2013-01-32"));
        assert!(!iso("15/01/2013"));
        assert!(!iso("13-01-15"));
    }

    #[test]
    fn test_iso_week_and_ordinal_dates() {
        assert!(iso("2013-W03"));
        assert!(iso("2013-W03-2"));
        assert!(iso("2013W032"));
        assert!(iso("2013-015"));
        assert!(iso("2013015"));
        assert!(iso("2012-366"));
        assert!(!iso("2013-W53"));
        assert!(!iso("2013-367"));
    }

    #[test]
    fn test_iso_mixed_date_separators_rejected() {
        assert!(!iso("2013-0115"));
        assert!(!iso("201301-15"));
    }

    #[test]
    fn test_iso_basic_year_month_needs_time() {
        assert!(!iso("201301"));
        assert!(!iso("201301 10:30"));
        assert!(iso("201301T10"));
    }

    #[test]
    fn test_iso_date_times() {
        assert!(iso("2013-01-15T10:30:00Z"));
        assert!(iso("2013-01-15T10:30:00+02:00"));
        assert!(iso("2013-01-15T10:30:00.123-0500"));
        assert!(iso("2013-01-15 10:30"));
        assert!(iso("2013-01-15T10"));
        assert!(iso("2013-01-15T24:00"));
        assert!(iso("20130115T103000Z"));
        assert!(iso("2013-01-15T10:30,5"));
        assert!(!iso("2013-01-15T25:00"));
        assert!(!iso("2013-01-15T10:60"));
        assert!(!iso("2013-01-15T10:30:00 UTC"));
    }

    #[test]
    fn test_iso_seconds_need_minutes_with_same_separator() {
        assert!(!iso("2013-01-15T10:3000"));
        assert!(!iso("2013-01-15T1030:00"));
        assert!(!iso("2013-01-15T24:00:00"));
    }

    #[test]
    fn test_format_hints() {
        assert_eq!(DataType::Boolean.format(), Some("True / False"));
        assert_eq!(DataType::DateTime.format(), Some("ISO 8601"));
        assert_eq!(DataType::Integer.format(), None);
        assert_eq!(DataType::Url.label(), "URL");
    }
}
