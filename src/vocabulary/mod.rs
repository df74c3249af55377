//! Schema.org vocabulary: content types, properties and data types.
//!
//! # Architecture
//!
//! ```text
//! VocabularySource ──► RawVocabulary ──► VocabularyStore::load()
//!   (file / pinned)      (all.json)            │
//!                                              ▼
//!                                     VocabularySnapshot ◄──► SnapshotCache
//!                                     (types, properties)     (memory / file)
//!                                              │
//!                                              ▼
//!                                      VocabularyHandle (shared, lazy)
//! ```
//!
//! A store is immutable once built. Consumers hold it behind an `Arc`
//! handed out by [`VocabularyHandle`], or build one directly.

mod allow;
pub mod cache;
mod datatype;
mod handle;
mod raw;

pub use allow::AllowList;
pub use cache::{FileCache, MemoryCache, NoCache, SnapshotCache};
pub use datatype::DataType;
pub use handle::VocabularyHandle;
pub use raw::{FileSource, RawProperty, RawType, RawVocabulary, StaticSource, VocabularySource};

use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::collections::BTreeMap;

use crate::error::{Result, SchemaError};
use crate::log;
use crate::validate::{ValidationResult, Validator};

/// Version of the serialized snapshot layout. Part of every cache fingerprint.
pub const SNAPSHOT_VERSION: u32 = 1;

// ============================================================================
// Definitions
// ============================================================================

/// A property and the data types its values may take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    /// Rich (HTML) description.
    pub comment: String,
    /// Plain-text description.
    pub comment_text: String,
    /// Accepted data types in canonical order. Never empty.
    pub ranges: SmallVec<[DataType; 4]>,
}

impl PropertyDefinition {
    /// A free-text property.
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            comment_text: String::new(),
            ranges: smallvec![DataType::Text],
        }
    }

    fn from_raw(name: &str, raw: &RawProperty) -> Self {
        let mut ranges: SmallVec<[DataType; 4]> = DataType::ALL
            .into_iter()
            .filter(|data_type| raw.ranges.iter().any(|range| range == data_type.name()))
            .collect();
        if ranges.is_empty() {
            ranges.push(DataType::Text);
        }

        Self {
            name: name.to_owned(),
            comment: raw.comment.clone().unwrap_or_default(),
            comment_text: raw.comment_plain.clone().unwrap_or_default(),
            ranges,
        }
    }

    /// Most restrictive accepted type; drives the editor widget.
    pub fn primary_type(&self) -> DataType {
        self.ranges.first().copied().unwrap_or(DataType::Text)
    }

    /// Least restrictive accepted type.
    pub fn fallback_type(&self) -> DataType {
        self.ranges.last().copied().unwrap_or(DataType::Text)
    }
}

/// A content type and the properties applicable to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    pub name: String,
    pub label: String,
    /// Property names, sorted by byte value.
    pub properties: Vec<String>,
}

impl ContentType {
    pub fn has_property(&self, name: &str) -> bool {
        self.properties
            .binary_search_by(|property| property.as_str().cmp(name))
            .is_ok()
    }
}

/// Serializable content of a [`VocabularyStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularySnapshot {
    pub version: u32,
    /// Fingerprint of the allow-list the snapshot was built with.
    pub fingerprint: String,
    pub types: BTreeMap<String, ContentType>,
    pub properties: BTreeMap<String, PropertyDefinition>,
}

impl VocabularySnapshot {
    /// Check the invariants every built store upholds:
    ///
    /// - property ranges are non-empty, canonical and free of duplicates
    /// - type properties are sorted by byte value and each one is defined
    pub fn check(&self) -> Result<()> {
        for (name, property) in &self.properties {
            if property.ranges.is_empty() {
                return Err(SchemaError::InvalidSnapshot(format!(
                    "property `{name}` has no ranges"
                )));
            }
            if !property.ranges.windows(2).all(|pair| pair[0] < pair[1]) {
                return Err(SchemaError::InvalidSnapshot(format!(
                    "ranges of property `{name}` are not in canonical order"
                )));
            }
        }

        for (name, content_type) in &self.types {
            let sorted = content_type
                .properties
                .windows(2)
                .all(|pair| pair[0].as_bytes() < pair[1].as_bytes());
            if !sorted {
                return Err(SchemaError::InvalidSnapshot(format!(
                    "properties of type `{name}` are not sorted"
                )));
            }
            if let Some(missing) = content_type
                .properties
                .iter()
                .find(|property| !self.properties.contains_key(property.as_str()))
            {
                return Err(SchemaError::InvalidSnapshot(format!(
                    "type `{name}` links undefined property `{missing}`"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Store
// ============================================================================

/// Immutable, read-only vocabulary.
#[derive(Debug, Clone)]
pub struct VocabularyStore {
    snapshot: VocabularySnapshot,
    validator: Validator,
}

impl VocabularyStore {
    /// Build a store from a raw document, keeping the types named by `allow`.
    ///
    /// - property ranges are reduced to the primitive [`DataType`]s, in
    ///   canonical order, defaulting to `[Text]`
    /// - allowed names missing from the document are skipped
    /// - a type only links properties that exist in the property set
    pub fn load(raw: &RawVocabulary, allow: &AllowList) -> Result<Self> {
        if raw.is_empty() {
            return Err(SchemaError::VocabularyUnavailable(
                "vocabulary document declares no types and no properties".into(),
            ));
        }
        let validator = Validator::new()?;

        let properties: BTreeMap<String, PropertyDefinition> = raw
            .properties
            .iter()
            .map(|(name, raw)| (name.clone(), PropertyDefinition::from_raw(name, raw)))
            .collect();

        let names: Vec<&str> = if allow.is_empty() {
            raw.types.keys().map(String::as_str).collect()
        } else {
            allow.iter().collect()
        };

        let mut types = BTreeMap::new();
        for name in names {
            let Some(raw_type) = raw.types.get(name) else {
                continue;
            };

            let mut linked: Vec<String> = raw_type
                .properties
                .iter()
                .filter(|property| properties.contains_key(property.as_str()))
                .cloned()
                .collect();
            linked.sort_unstable();
            linked.dedup();

            let label = raw_type
                .label
                .clone()
                .filter(|label| !label.is_empty())
                .unwrap_or_else(|| name.to_owned());

            types.insert(
                name.to_owned(),
                ContentType {
                    name: name.to_owned(),
                    label,
                    properties: linked,
                },
            );
        }

        log!("vocab"; "built {} content types and {} properties", types.len(), properties.len());

        Ok(Self {
            snapshot: VocabularySnapshot {
                version: SNAPSHOT_VERSION,
                fingerprint: allow.fingerprint(),
                types,
                properties,
            },
            validator,
        })
    }

    /// Build through `cache`, fetching from `source` only on a miss.
    ///
    /// An inconsistent cached snapshot is invalidated and rebuilt. A failed
    /// cache write is logged and otherwise ignored.
    pub fn load_cached(
        source: &dyn VocabularySource,
        allow: &AllowList,
        cache: &dyn SnapshotCache,
    ) -> Result<Self> {
        let fingerprint = allow.fingerprint();
        if let Some(snapshot) = cache.load(&fingerprint) {
            match Self::from_snapshot(snapshot) {
                Ok(store) => {
                    log!("cache"; "vocabulary {fingerprint} served from cache");
                    return Ok(store);
                }
                Err(err) => {
                    log!("cache"; "discarding vocabulary {fingerprint}: {err}");
                    if let Err(err) = cache.invalidate(&fingerprint) {
                        log!("cache"; "could not invalidate vocabulary {fingerprint}: {err}");
                    }
                }
            }
        }

        log!("vocab"; "loading vocabulary from {}", source.describe());
        let raw = source.fetch()?;
        let store = Self::load(&raw, allow)?;

        if let Err(err) = cache.store(store.snapshot()) {
            log!("cache"; "could not store vocabulary {fingerprint}: {err}");
        }
        Ok(store)
    }

    /// Restore a store from a previously exported snapshot.
    ///
    /// Snapshots failing [`VocabularySnapshot::check`] are refused.
    pub fn from_snapshot(snapshot: VocabularySnapshot) -> Result<Self> {
        snapshot.check()?;
        Ok(Self {
            snapshot,
            validator: Validator::new()?,
        })
    }

    /// A store without types or properties. Data types stay available.
    pub fn empty(allow: &AllowList) -> Result<Self> {
        Self::from_snapshot(VocabularySnapshot {
            version: SNAPSHOT_VERSION,
            fingerprint: allow.fingerprint(),
            types: BTreeMap::new(),
            properties: BTreeMap::new(),
        })
    }

    pub fn snapshot(&self) -> &VocabularySnapshot {
        &self.snapshot
    }

    pub fn fingerprint(&self) -> &str {
        &self.snapshot.fingerprint
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.types.is_empty() && self.snapshot.properties.is_empty()
    }

    /// Content types keyed by name, sorted by byte value.
    pub fn content_types(&self) -> &BTreeMap<String, ContentType> {
        &self.snapshot.types
    }

    /// Property definitions keyed by name.
    pub fn properties(&self) -> &BTreeMap<String, PropertyDefinition> {
        &self.snapshot.properties
    }

    /// The primitive data types, most restrictive first.
    pub fn data_types(&self) -> &'static [DataType] {
        &DataType::ALL
    }

    pub fn content_type(&self, name: &str) -> Option<&ContentType> {
        self.snapshot.types.get(name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.snapshot.properties.get(name)
    }

    /// Property names of a content type; empty for unknown types.
    pub fn properties_for_type(&self, name: &str) -> &[String] {
        self.content_type(name)
            .map(|content_type| content_type.properties.as_slice())
            .unwrap_or_default()
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validate a value for a property by name.
    ///
    /// Property names missing from the store are treated as free text.
    pub fn validate(&self, property: &str, value: &str) -> ValidationResult {
        match self.property(property) {
            Some(definition) => self.validator.validate(value, definition),
            None => self
                .validator
                .validate(value, &PropertyDefinition::text(property)),
        }
    }
}

// ============================================================================
// Test Fixtures
// ============================================================================

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A trimmed-down `all.json`.
    pub const VOCABULARY_JSON: &str = r#"{
        "types": {
            "Article": {
                "label": "Article",
                "properties": ["name", "description", "url", "image", "thumbnailUrl",
                               "dateModified", "author", "headline", "wordCount", "unlinkedProperty"]
            },
            "Blog": { "label": "Blog", "properties": ["name", "description", "url", "image"] },
            "Book": { "label": "Book", "properties": ["name", "author", "isbn", "numberOfPages"] },
            "ImageObject": {
                "label": "Image Object",
                "properties": ["name", "description", "url", "image", "thumbnailUrl",
                               "width", "height", "dateModified", "author"]
            },
            "Person": { "label": "Person", "properties": ["name", "description", "url", "image", "email"] },
            "Product": {
                "label": "Product",
                "properties": ["url", "name", "description", "image", "isFamilyFriendly", "price"]
            },
            "Recipe": { "label": "Recipe", "properties": ["name", "cookTime"] },
            "Thing": { "label": "", "properties": ["name", "description", "url", "image"] }
        },
        "properties": {
            "author": { "comment": "The author", "comment_plain": "The author", "ranges": ["Person", "Organization"] },
            "cookTime": { "comment": "Cook time", "comment_plain": "Cook time", "ranges": ["Duration"] },
            "dateModified": { "comment": "Last change", "comment_plain": "Last change", "ranges": ["Date"] },
            "description": { "comment": "A <b>short</b> description", "comment_plain": "A short description", "ranges": ["Text"] },
            "email": { "comment": "Email address", "comment_plain": "Email address", "ranges": ["Text"] },
            "headline": { "comment": "Headline", "comment_plain": "Headline", "ranges": ["Text"] },
            "height": { "comment": "Height", "comment_plain": "Height", "ranges": ["Distance", "QuantitativeValue"] },
            "image": { "comment": "Image URL", "comment_plain": "Image URL", "ranges": ["URL", "ImageObject"] },
            "isFamilyFriendly": { "comment": "Family friendly", "comment_plain": "Family friendly", "ranges": ["Boolean"] },
            "isbn": { "comment": "ISBN", "comment_plain": "ISBN", "ranges": ["Text"] },
            "name": { "comment": "The name", "comment_plain": "The name", "ranges": ["Text"] },
            "numberOfPages": { "comment": "Pages", "comment_plain": "Pages", "ranges": ["Integer"] },
            "price": { "comment": "Price", "comment_plain": "Price", "ranges": ["Text", "Number", "Number"] },
            "thumbnailUrl": { "comment": "Thumbnail", "comment_plain": "Thumbnail", "ranges": ["URL"] },
            "url": { "comment": "URL", "comment_plain": "URL", "ranges": ["URL"] },
            "width": { "comment": "Width", "comment_plain": "Width", "ranges": ["Distance", "QuantitativeValue"] },
            "wordCount": { "comment": "Words", "comment_plain": "Words", "ranges": ["Integer"] }
        }
    }"#;

    pub const ALLOWED_TYPES: &str =
        "Article, Blog, WebPage, Book, ImageObject, Person, Product, Thing";

    pub fn raw() -> RawVocabulary {
        RawVocabulary::from_json(VOCABULARY_JSON).unwrap()
    }

    pub fn allow_list() -> AllowList {
        AllowList::parse(ALLOWED_TYPES)
    }

    pub fn store() -> VocabularyStore {
        VocabularyStore::load(&raw(), &allow_list()).unwrap()
    }
}

// ============================================================================
// Tests
// ============================================================================
