//! Open Graph projection.
//!
//! | OG property | Source properties, first non-empty wins |
//! |-------------|------------------------------------------|
//! | `og:title` | `name` |
//! | `og:url` | `url` |
//! | `og:description` | `description` |
//! | `og:image` | `image`, `thumbnailUrl` |
//! | `og:updated_time` | `dateModified` |
//!
//! `og:type` always comes first and is derived from the content type.

use crate::metadata::MetadataRecord;

/// OG property and the Schema.org properties it is taken from.
pub const PROPERTY_MAPPING: &[(&str, &[&str])] = &[
    ("og:title", &["name"]),
    ("og:url", &["url"]),
    ("og:description", &["description"]),
    ("og:image", &["image", "thumbnailUrl"]),
    ("og:updated_time", &["dateModified"]),
];

/// Content type name to OG type.
pub const TYPE_MAPPING: &[(&str, &str)] = &[
    ("Article", "article"),
    ("Book", "books.book"),
    ("LocalBusiness", "business.business"),
    ("Organization", "business.business"),
    ("Person", "profile"),
    ("Product", "product"),
];

/// OG type of anything not in [`TYPE_MAPPING`].
pub const DEFAULT_OG_TYPE: &str = "website";

/// OG type for a content type name.
pub fn og_type(content_type: Option<&str>) -> &'static str {
    content_type
        .and_then(|name| {
            TYPE_MAPPING
                .iter()
                .find(|(schema_type, _)| *schema_type == name)
        })
        .map_or(DEFAULT_OG_TYPE, |&(_, og)| og)
}

/// `og:type` followed by every mapped property with a value.
pub fn to_open_graph_attributes(record: &MetadataRecord) -> Vec<(&'static str, &str)> {
    let mut attributes = vec![("og:type", og_type(record.content_type()))];

    for &(og_property, sources) in PROPERTY_MAPPING {
        let value = sources
            .iter()
            .filter_map(|source| record.get(source))
            .find(|value| !value.is_empty());
        if let Some(value) = value {
            attributes.push((og_property, value));
        }
    }
    attributes
}

/// Custom tags attached through `og_` fields.
pub fn custom_open_graph_attributes(record: &MetadataRecord) -> Vec<(&str, &str)> {
    record
        .open_graph_fields()
        .filter(|(_, value)| !value.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_mapping_skips_empty() {
        let mut record = MetadataRecord::with_type("Article");
        record.set("name", "Hello");
        record.set("url", "");
        record.set("description", "World");

        assert_eq!(
            to_open_graph_attributes(&record),
            [
                ("og:type", "article"),
                ("og:title", "Hello"),
                ("og:description", "World"),
            ]
        );
    }

    #[test]
    fn test_image_falls_back_to_thumbnail() {
        let mut record = MetadataRecord::with_type("Product");
        record.set("image", "");
        record.set("thumbnailUrl", "http://example.com/t.png");
        record.set("dateModified", "2013-01-15T10:30:00Z");

        assert_eq!(
            to_open_graph_attributes(&record),
            [
                ("og:type", "product"),
                ("og:image", "http://example.com/t.png"),
                ("og:updated_time", "2013-01-15T10:30:00Z"),
            ]
        );
    }

    #[test]
    fn test_output_follows_mapping_order() {
        let mut record = MetadataRecord::with_type("Person");
        record.set("dateModified", "2013");
        record.set("url", "http://jane.example.com");
        record.set("name", "Jane");

        let properties: Vec<_> = to_open_graph_attributes(&record)
            .into_iter()
            .map(|(property, _)| property)
            .collect();
        assert_eq!(properties, ["og:type", "og:title", "og:url", "og:updated_time"]);
    }

    #[test]
    fn test_og_type_table() {
        assert_eq!(og_type(Some("Book")), "books.book");
        assert_eq!(og_type(Some("LocalBusiness")), "business.business");
        assert_eq!(og_type(Some("Organization")), "business.business");
        assert_eq!(og_type(Some("Blog")), "website");
        assert_eq!(og_type(Some("MyCustomThing")), "website");
        assert_eq!(og_type(None), "website");
    }

    #[test]
    fn test_custom_fields() {
        let mut record = MetadataRecord::new();
        record.add_custom_field("og_locale", "fr_FR");
        record.add_custom_field("og_audio", "");

        assert_eq!(custom_open_graph_attributes(&record), [("locale", "fr_FR")]);
    }
}
