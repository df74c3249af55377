//! Schema.org microdata projection.

use crate::metadata::MetadataRecord;
use crate::vocabulary::VocabularyStore;

/// Property values valid for the record's content type, in record order.
///
/// Empty values are skipped. A type unknown to `store` has no valid
/// properties, so nothing is emitted for it.
pub fn to_schema_attributes<'r>(
    record: &'r MetadataRecord,
    store: &VocabularyStore,
) -> Vec<(&'r str, &'r str)> {
    let Ok(content_type) = record.resolve_type(store) else {
        return Vec::new();
    };

    record
        .iter()
        .filter(|(name, value)| !value.is_empty() && content_type.has_property(name))
        .collect()
}

/// `itemtype` URL of the record, e.g. `http://schema.org/Article`.
///
/// Custom type names are kept as given.
pub fn item_type_url(record: &MetadataRecord, base: &str) -> Option<String> {
    record
        .content_type()
        .map(|content_type| format!("{base}{content_type}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::fixtures;

    #[test]
    fn test_filters_to_type_properties() {
        let store = fixtures::store();
        let mut record = MetadataRecord::with_type("Product");
        record.set("name", "Widget");
        record.set("unrelatedField", "x");

        assert_eq!(to_schema_attributes(&record, &store), [("name", "Widget")]);
    }

    #[test]
    fn test_keeps_record_order_and_skips_empty() {
        let store = fixtures::store();
        let mut record = MetadataRecord::with_type("Article");
        record.set("url", "http://example.com");
        record.set("name", "");
        record.set("wordCount", "0");
        record.set("author", "Jane");

        assert_eq!(
            to_schema_attributes(&record, &store),
            [("url", "http://example.com"), ("wordCount", "0"), ("author", "Jane")]
        );
    }

    #[test]
    fn test_unknown_type_emits_nothing() {
        let store = fixtures::store();
        let mut record = MetadataRecord::with_type("Recipe");
        record.set("name", "Soup");
        assert!(to_schema_attributes(&record, &store).is_empty());

        let mut untyped = MetadataRecord::new();
        untyped.set("name", "Soup");
        assert!(to_schema_attributes(&untyped, &store).is_empty());
    }

    #[test]
    fn test_item_type_url() {
        let base = "http://schema.org/";
        assert_eq!(
            item_type_url(&MetadataRecord::with_type("Article"), base).as_deref(),
            Some("http://schema.org/Article")
        );
        assert_eq!(item_type_url(&MetadataRecord::new(), base), None);
    }
}
