//! Editor save path.
//!
//! An editor form posts one content type field and one field per property:
//!
//! ```text
//! schema-content-type = Product
//! schema-data-name    = Widget
//! schema-data-price   = 12.50
//! ```
//!
//! [`EditorSubmission::plan`] turns it into a [`SavePlan`]: values to store,
//! stored values to delete, and values rejected field by field. Rejected
//! values never reach the sink; their previously stored value is kept.

use std::collections::BTreeSet;
use std::fmt;

use crate::metadata::MetadataRecord;
use crate::vocabulary::{DataType, VocabularyStore};

/// Form field carrying the content type.
pub const TYPE_FIELD: &str = "schema-content-type";

/// Prefix of form fields carrying property values.
const DATA_FIELD_PREFIX: &str = "schema-data-";

/// Stored key of the content type.
pub const TYPE_META_KEY: &str = "_schematype";

/// Prefix of stored property keys.
const DATA_META_PREFIX: &str = "_schemadata_";

/// Stored key of a property value.
pub fn data_meta_key(property: &str) -> String {
    format!("{DATA_META_PREFIX}{property}")
}

/// Property name of a stored key, if it is a property key.
pub fn property_from_meta_key(key: &str) -> Option<&str> {
    key.strip_prefix(DATA_META_PREFIX)
        .filter(|property| !property.is_empty())
}

// ============================================================================
// Submission
// ============================================================================

/// Raw editor form content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSubmission {
    pub content_type: Option<String>,
    /// Property values in form order.
    pub values: Vec<(String, String)>,
}

/// A submitted value that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub property: String,
    pub value: String,
    /// Accepted data types of the property.
    pub expected: Vec<DataType>,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a valid value for {} (expected ", self.value, self.property)?;
        for (i, data_type) in self.expected.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            f.write_str(data_type.label())?;
            if let Some(format) = data_type.format() {
                write!(f, " [{format}]")?;
            }
        }
        f.write_str(")")
    }
}

impl std::error::Error for FieldError {}

impl EditorSubmission {
    /// Read the schema fields of a posted form; other fields are ignored.
    pub fn from_form<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut submission = Self::default();
        for (name, value) in fields {
            let name = name.as_ref();
            if name == TYPE_FIELD {
                submission.content_type = Some(value.into());
            } else if let Some(property) = name
                .strip_prefix(DATA_FIELD_PREFIX)
                .filter(|property| !property.is_empty())
            {
                submission.values.push((property.to_owned(), value.into()));
            }
        }
        submission
    }

    /// Validate the submission against `store`.
    ///
    /// `stored` names the properties currently persisted for the item.
    pub fn plan(&self, stored: &BTreeSet<String>, store: &VocabularyStore) -> SavePlan {
        let content_type = self
            .content_type
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_owned();

        let mut upserts: Vec<(String, String)> = Vec::new();
        let mut rejected = Vec::new();

        for (property, value) in &self.values {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            if store.validate(property, value).is_valid() {
                match upserts.iter_mut().find(|(name, _)| name == property) {
                    Some((_, slot)) => *slot = value.to_owned(),
                    None => upserts.push((property.clone(), value.to_owned())),
                }
            } else {
                let expected = store
                    .property(property)
                    .map(|definition| definition.ranges.to_vec())
                    .unwrap_or_else(|| vec![DataType::Text]);
                rejected.push(FieldError {
                    property: property.clone(),
                    value: value.to_owned(),
                    expected,
                });
            }
        }

        let deletions = stored
            .iter()
            .filter(|name| {
                !upserts.iter().any(|(property, _)| property == *name)
                    && !rejected.iter().any(|error| &error.property == *name)
            })
            .cloned()
            .collect();

        SavePlan {
            content_type,
            upserts,
            deletions,
            rejected,
        }
    }
}

// ============================================================================
// Save Plan
// ============================================================================

/// Storage for editor-entered metadata of one item.
pub trait MetadataSink {
    type Error;

    /// Store the content type; an empty name clears it.
    fn save_type(&mut self, content_type: &str) -> Result<(), Self::Error>;

    fn save_property(&mut self, property: &str, value: &str) -> Result<(), Self::Error>;

    fn delete_property(&mut self, property: &str) -> Result<(), Self::Error>;
}

/// Validated outcome of an editor submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavePlan {
    /// Trimmed content type; empty when none was chosen.
    pub content_type: String,
    /// Valid, non-empty values in form order.
    pub upserts: Vec<(String, String)>,
    /// Stored properties to remove.
    pub deletions: Vec<String>,
    /// Values refused by validation.
    pub rejected: Vec<FieldError>,
}

impl SavePlan {
    /// Whether every submitted value was accepted.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Write the plan to `sink`: type, then values, then deletions.
    pub fn apply<S: MetadataSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        sink.save_type(&self.content_type)?;
        for (property, value) in &self.upserts {
            sink.save_property(property, value)?;
        }
        for property in &self.deletions {
            sink.delete_property(property)?;
        }
        Ok(())
    }

    /// Mirror the plan onto an in-memory record.
    ///
    /// The record ends up as it would be rebuilt from the sink: an empty
    /// type and deleted properties fall back to their derived values.
    pub fn apply_to_record(&self, record: &mut MetadataRecord) {
        if self.content_type.is_empty() {
            record.revert_type();
        } else {
            record.set_content_type(self.content_type.as_str());
        }
        for (property, value) in &self.upserts {
            record.set_user_defined(property.as_str(), value.as_str());
        }
        for property in &self.deletions {
            record.revert(property);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::sources::{ContentItem, ContentKind, from_content};
    use crate::vocabulary::fixtures;
    use std::collections::BTreeMap;

    /// Sink backed by a meta map, as a host would store it.
    #[derive(Default)]
    struct MetaSink {
        meta: BTreeMap<String, String>,
    }

    impl MetadataSink for MetaSink {
        type Error = std::convert::Infallible;

        fn save_type(&mut self, content_type: &str) -> Result<(), Self::Error> {
            self.meta.insert(TYPE_META_KEY.into(), content_type.into());
            Ok(())
        }

        fn save_property(&mut self, property: &str, value: &str) -> Result<(), Self::Error> {
            self.meta.insert(data_meta_key(property), value.into());
            Ok(())
        }

        fn delete_property(&mut self, property: &str) -> Result<(), Self::Error> {
            self.meta.remove(&data_meta_key(property));
            Ok(())
        }
    }

    fn names(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    #[test]
    fn test_meta_keys() {
        assert_eq!(data_meta_key("name"), "_schemadata_name");
        assert_eq!(property_from_meta_key("_schemadata_name"), Some("name"));
        assert_eq!(property_from_meta_key("_schemadata_"), None);
        assert_eq!(property_from_meta_key(TYPE_META_KEY), None);
    }

    #[test]
    fn test_from_form_ignores_other_fields() {
        let submission = EditorSubmission::from_form([
            ("action", "editpost"),
            (TYPE_FIELD, " Product "),
            ("schema-data-name", "Widget"),
            ("schema-data-", "nameless"),
            ("schema-data-price", "12"),
        ]);
        assert_eq!(submission.content_type.as_deref(), Some(" Product "));
        assert_eq!(
            submission.values,
            [("name".to_owned(), "Widget".to_owned()), ("price".to_owned(), "12".to_owned())]
        );
    }

    #[test]
    fn test_plan_accepts_rejects_and_deletes() {
        let store = fixtures::store();
        let submission = EditorSubmission::from_form([
            (TYPE_FIELD, " Product "),
            ("schema-data-name", "  Widget "),
            ("schema-data-isFamilyFriendly", "yes"),
            ("schema-data-description", "   "),
            ("schema-data-customNote", "free text"),
        ]);
        let plan = submission.plan(&names(&["description", "isFamilyFriendly", "url"]), &store);

        assert_eq!(plan.content_type, "Product");
        assert_eq!(
            plan.upserts,
            [
                ("name".to_owned(), "Widget".to_owned()),
                ("customNote".to_owned(), "free text".to_owned()),
            ]
        );
        // isFamilyFriendly was rejected and keeps its stored value.
        assert_eq!(plan.deletions, ["description", "url"]);
        assert!(!plan.is_clean());
        assert_eq!(plan.rejected.len(), 1);
        assert_eq!(plan.rejected[0].property, "isFamilyFriendly");
        assert_eq!(plan.rejected[0].expected, [DataType::Boolean]);
    }

    #[test]
    fn test_field_error_message() {
        let error = FieldError {
            property: "price".into(),
            value: "cheap".into(),
            expected: vec![DataType::Number, DataType::Url],
        };
        assert_eq!(
            error.to_string(),
            "`cheap` is not a valid value for price (expected Number or URL [http://www.website.com])"
        );
    }

    #[test]
    fn test_apply_to_sink() {
        let store = fixtures::store();
        let mut sink = MetaSink::default();
        sink.meta.insert(data_meta_key("url"), "http://old.example.com".into());

        let submission = EditorSubmission::from_form([
            (TYPE_FIELD, "Article"),
            ("schema-data-wordCount", "250"),
        ]);
        let stored = names(&["url"]);
        submission.plan(&stored, &store).apply(&mut sink).unwrap();

        assert_eq!(sink.meta.get(TYPE_META_KEY).map(String::as_str), Some("Article"));
        assert_eq!(sink.meta.get("_schemadata_wordCount").map(String::as_str), Some("250"));
        assert!(!sink.meta.contains_key("_schemadata_url"));
    }

    #[test]
    fn test_apply_to_record() {
        let store = fixtures::store();
        let mut record = MetadataRecord::with_type("Article");
        record.set("name", "Derived");
        record.mark_standard_from_current();
        record.set_user_defined("headline", "Old headline");

        let submission = EditorSubmission::from_form([
            (TYPE_FIELD, ""),
            ("schema-data-name", "Chosen"),
        ]);
        let plan = submission.plan(record.user_defined_properties(), &store);
        plan.apply_to_record(&mut record);

        assert_eq!(record.content_type(), Some("Article"));
        assert_eq!(record.get("name"), Some("Chosen"));
        assert!(record.is_override("name"));
        assert_eq!(record.get("headline"), None);
    }

    #[test]
    fn test_record_mirror_matches_rebuilt_record() {
        let store = fixtures::store();
        let mut sink = MetaSink::default();
        sink.meta.insert(TYPE_META_KEY.into(), "Product".into());
        sink.meta.insert(data_meta_key("name"), "Chosen".into());

        let mut item = ContentItem::new(ContentKind::Post, "Derived title", "http://example.com/p");
        item.meta = sink.meta.clone().into_iter().collect();
        let mut record = from_content(&item);
        assert_eq!(record.content_type(), Some("Product"));
        assert_eq!(record.get("name"), Some("Chosen"));

        let submission = EditorSubmission::from_form([(TYPE_FIELD, ""), ("schema-data-name", "")]);
        let plan = submission.plan(record.user_defined_properties(), &store);
        plan.apply(&mut sink).unwrap();
        plan.apply_to_record(&mut record);

        item.meta = sink.meta.into_iter().collect();
        let rebuilt = from_content(&item);
        assert_eq!(record.get("name"), Some("Derived title"));
        assert_eq!(record.content_type(), Some("Article"));
        assert_eq!(record, rebuilt);
    }

    #[test]
    fn test_repeated_field_keeps_last_value() {
        let store = fixtures::store();
        let submission = EditorSubmission::from_form([
            ("schema-data-wordCount", "1"),
            ("schema-data-wordCount", "2"),
        ]);
        let plan = submission.plan(&BTreeSet::new(), &store);
        assert_eq!(plan.upserts, [("wordCount".to_owned(), "2".to_owned())]);
        assert_eq!(plan.content_type, "");
    }
}
