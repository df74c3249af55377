//! Property value validation.
//!
//! A value is valid for a property when it matches the pattern of any data
//! type in the property's ranges. Ranges are tried in declared order, most
//! restrictive first, and the first match is reported back:
//!
//! ```text
//! ranges = [Integer, Text]
//!
//! "42"            ──► Integer ✓                     → valid, Integer
//! "not-a-number"  ──► Integer ✗ ──► Text ✓          → valid, Text
//! ```
//!
//! Blank values are always valid: they stand for "unset".

mod submission;

pub use submission::{
    EditorSubmission, FieldError, MetadataSink, SavePlan, TYPE_FIELD, TYPE_META_KEY,
    data_meta_key, property_from_meta_key,
};

use regex::Regex;

use crate::error::{Result, SchemaError};
use crate::vocabulary::{DataType, PropertyDefinition};

/// Outcome of validating one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    /// The first range type whose pattern matched. `None` for blank values
    /// and rejected values.
    pub matched_type: Option<DataType>,
}

impl ValidationResult {
    const BLANK: Self = Self {
        valid: true,
        matched_type: None,
    };

    const REJECTED: Self = Self {
        valid: false,
        matched_type: None,
    };

    const fn matched(data_type: DataType) -> Self {
        Self {
            valid: true,
            matched_type: Some(data_type),
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Compiled patterns for every [`DataType`].
///
/// Built once per vocabulary store; a broken pattern surfaces at build time
/// rather than on every validation.
#[derive(Debug, Clone)]
pub struct Validator {
    patterns: Vec<Option<Regex>>,
}

impl Validator {
    pub fn new() -> Result<Self> {
        let patterns = DataType::ALL
            .into_iter()
            .map(|data_type| {
                data_type
                    .pattern()
                    .map(Regex::new)
                    .transpose()
                    .map_err(|source| SchemaError::InvalidPattern { data_type, source })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Whether `value` matches the pattern of `data_type`.
    pub fn matches(&self, data_type: DataType, value: &str) -> bool {
        match self.patterns.get(data_type.index()) {
            Some(Some(pattern)) => pattern.is_match(value),
            _ => true,
        }
    }

    /// Validate `value` against the ranges of `property`.
    pub fn validate(&self, value: &str, property: &PropertyDefinition) -> ValidationResult {
        if value.trim().is_empty() {
            return ValidationResult::BLANK;
        }

        property
            .ranges
            .iter()
            .copied()
            .find(|&data_type| self.matches(data_type, value))
            .map_or(ValidationResult::REJECTED, ValidationResult::matched)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::SmallVec;

    fn property(ranges: &[DataType]) -> PropertyDefinition {
        PropertyDefinition {
            name: "test".into(),
            comment: String::new(),
            comment_text: String::new(),
            ranges: SmallVec::from_slice(ranges),
        }
    }

    fn validator() -> Validator {
        Validator::new().unwrap()
    }

    #[test]
    fn test_boolean_literal() {
        let result = validator().validate("True", &property(&[DataType::Boolean, DataType::Text]));
        assert_eq!(result, ValidationResult::matched(DataType::Boolean));
    }

    #[test]
    fn test_boolean_is_case_sensitive() {
        let v = validator();
        let boolean = property(&[DataType::Boolean]);
        assert!(v.validate("False", &boolean).valid);
        for value in ["true", "false", "1", "0", "TRUE", "True "] {
            assert!(!v.validate(value, &boolean).valid, "{value:?}");
        }
    }

    #[test]
    fn test_fallback_to_text() {
        let result = validator().validate(
            "not-a-number",
            &property(&[DataType::Integer, DataType::Text]),
        );
        assert_eq!(result, ValidationResult::matched(DataType::Text));
    }

    #[test]
    fn test_first_match_wins() {
        let v = validator();
        let numeric = property(&[DataType::Integer, DataType::Float, DataType::Text]);
        assert_eq!(v.validate("42", &numeric).matched_type, Some(DataType::Integer));
        assert_eq!(v.validate("4.2", &numeric).matched_type, Some(DataType::Float));
        assert_eq!(v.validate("4,2", &numeric).matched_type, Some(DataType::Text));
    }

    #[test]
    fn test_whitespace_is_always_valid() {
        let v = validator();
        for data_type in [DataType::Boolean, DataType::Integer, DataType::Url] {
            for value in ["   ", "\t", " \n ", ""] {
                let result = v.validate(value, &property(&[data_type]));
                assert_eq!(result, ValidationResult::BLANK);
            }
        }
    }

    #[test]
    fn test_rejected_value() {
        let result = validator().validate("twelve", &property(&[DataType::Integer]));
        assert_eq!(result, ValidationResult::REJECTED);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_numeric_patterns() {
        let v = validator();
        assert!(v.matches(DataType::Integer, "-12"));
        assert!(v.matches(DataType::Integer, "+7"));
        assert!(!v.matches(DataType::Integer, "1.5"));
        assert!(v.matches(DataType::Number, "2013"));
        assert!(!v.matches(DataType::Number, "2e3"));
        assert!(v.matches(DataType::Float, "1.5"));
        assert!(v.matches(DataType::Float, ".5"));
        assert!(v.matches(DataType::Float, "-6.02e23"));
        assert!(v.matches(DataType::Float, "42"));
        assert!(!v.matches(DataType::Float, "1."));
        assert!(!v.matches(DataType::Float, "e10"));
    }

    #[test]
    fn test_url_pattern() {
        let v = validator();
        assert!(v.matches(DataType::Url, "http://example.com"));
        assert!(v.matches(DataType::Url, "https://example.com/a?b=c"));
        assert!(!v.matches(DataType::Url, "https://"));
        assert!(!v.matches(DataType::Url, "ftp://example.com"));
        assert!(!v.matches(DataType::Url, "example.com"));
    }

    #[test]
    fn test_date_types() {
        let v = validator();
        let date = property(&[DataType::Date]);
        assert_eq!(v.validate("2013-01-15", &date).matched_type, Some(DataType::Date));
        assert!(v.validate("2013-01-15T10:30:00Z", &date).valid);
        assert!(!v.validate("January 15th", &date).valid);
    }

    #[test]
    fn test_text_accepts_anything() {
        let v = validator();
        assert!(v.matches(DataType::Text, ""));
        assert!(v.matches(DataType::Text, "<b>anything</b>"));
    }
}
