//! Per-request metadata records.
//!
//! A [`MetadataRecord`] pairs a content type name with property values.
//! Values come from two places, and the record remembers which:
//!
//! | Set | Meaning |
//! |-----|---------|
//! | standard | derived from the content item, settings or context |
//! | user-defined | entered through the editor; overrides a standard value of the same name |
//!
//! Derived values and the derived type are remembered separately, so
//! [`MetadataRecord::revert`] and [`MetadataRecord::revert_type`] bring them
//! back once an override is dropped.
//!
//! Records are built by [`sources`] (or from a [`MetadataInput`] document),
//! mutated by validated editor input, and projected by [`crate::output`].

pub mod sources;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Result, SchemaError};
use crate::vocabulary::{ContentType, VocabularyStore};

/// Prefix of custom fields carrying extra Open Graph tags.
const OPEN_GRAPH_FIELD_PREFIX: &str = "og_";

// ============================================================================
// Record
// ============================================================================

/// Content type plus property values for one page.
///
/// Values keep the order in which they were first set; replacing a value
/// keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    content_type: Option<String>,
    derived_type: Option<String>,
    data: Vec<(String, String)>,
    derived: Vec<(String, String)>,
    standard: BTreeSet<String>,
    user_defined: BTreeSet<String>,
    open_graph: Vec<(String, String)>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record of `content_type` with no values yet.
    pub fn with_type(content_type: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.set_content_type(content_type);
        record
    }

    /// Type name, possibly unknown to the vocabulary.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Set the type name. Blank names clear the type.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        let content_type = content_type.into();
        self.content_type = (!content_type.trim().is_empty()).then_some(content_type);
    }

    /// Set the type derived from the source. It becomes the current type.
    pub fn set_standard_type(&mut self, content_type: impl Into<String>) {
        self.set_content_type(content_type);
        self.derived_type = self.content_type.clone();
    }

    /// Type derived from the source, before any override.
    pub fn standard_type(&self) -> Option<&str> {
        self.derived_type.as_deref()
    }

    /// Drop a type override, restoring the derived type.
    pub fn revert_type(&mut self) {
        self.content_type = self.derived_type.clone();
    }

    /// Resolve the type against `store`.
    pub fn resolve_type<'s>(&self, store: &'s VocabularyStore) -> Result<&'s ContentType> {
        let name = self.content_type.as_deref().unwrap_or_default();
        store
            .content_type(name)
            .ok_or_else(|| SchemaError::UnknownContentType(name.to_owned()))
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.data
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    /// Set a value, replacing any previous one in place.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.data.iter_mut().find(|(name, _)| *name == property) {
            Some((_, slot)) => *slot = value,
            None => self.data.push((property, value)),
        }
    }

    /// Set a value and mark it user-defined.
    pub fn set_user_defined(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        self.user_defined.insert(property.clone());
        self.set(property, value);
    }

    /// Set a derived value and mark it standard.
    pub fn set_standard(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        self.remember_derived(&property, &value);
        self.standard.insert(property.clone());
        self.set(property, value);
    }

    /// Derived value of a property, whether or not it is overridden.
    pub fn standard_value(&self, property: &str) -> Option<&str> {
        self.derived
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Remove a value together with its derived value. The property stops
    /// being user-defined; a standard property stays standard.
    pub fn remove(&mut self, property: &str) -> Option<String> {
        self.user_defined.remove(property);
        self.derived.retain(|(name, _)| name != property);
        let index = self.data.iter().position(|(name, _)| name == property)?;
        Some(self.data.remove(index).1)
    }

    /// Drop a user-defined value. A derived value takes its place again;
    /// without one the property is removed. Returns the dropped value.
    pub fn revert(&mut self, property: &str) -> Option<String> {
        self.user_defined.remove(property);
        let previous = self.get(property).map(str::to_owned);
        match self.standard_value(property).map(str::to_owned) {
            Some(derived) => self.set(property, derived),
            None => self.data.retain(|(name, _)| name != property),
        }
        previous
    }

    fn remember_derived(&mut self, property: &str, value: &str) {
        match self.derived.iter_mut().find(|(name, _)| name == property) {
            Some((_, slot)) => value.clone_into(slot),
            None => self.derived.push((property.to_owned(), value.to_owned())),
        }
    }

    /// Values in record order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Mark every property currently set as standard, and the current
    /// type as the derived one. User-defined values are not taken as derived.
    pub fn mark_standard_from_current(&mut self) {
        self.derived_type = self.content_type.clone();
        let names: Vec<String> = self.data.iter().map(|(name, _)| name.clone()).collect();
        for name in names {
            self.mark_standard(name);
        }
    }

    /// Mark a property standard. Its current value is taken as derived
    /// unless it is user-defined.
    pub fn mark_standard(&mut self, property: impl Into<String>) {
        let property = property.into();
        if !self.is_user_defined(&property)
            && let Some(value) = self.get(&property).map(str::to_owned)
        {
            self.remember_derived(&property, &value);
        }
        self.standard.insert(property);
    }

    pub fn standard_properties(&self) -> &BTreeSet<String> {
        &self.standard
    }

    pub fn user_defined_properties(&self) -> &BTreeSet<String> {
        &self.user_defined
    }

    pub fn is_standard(&self, property: &str) -> bool {
        self.standard.contains(property)
    }

    pub fn is_user_defined(&self, property: &str) -> bool {
        self.user_defined.contains(property)
    }

    /// Whether a user-defined value replaces a derived one.
    pub fn is_override(&self, property: &str) -> bool {
        self.is_standard(property) && self.is_user_defined(property)
    }

    /// User-defined values in record order, for pre-filling an editor.
    pub fn editor_rows(&self) -> Vec<(&str, &str)> {
        self.iter()
            .filter(|(name, _)| self.is_user_defined(name))
            .collect()
    }

    /// Reset to an empty, untyped record.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // ------------------------------------------------------------------------
    // Custom Open Graph fields
    // ------------------------------------------------------------------------

    /// Attach a custom field when named `og_<property>` (prefix matched
    /// case-insensitively). Returns whether the field was taken.
    pub fn add_custom_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        let Some(prefix) = name.get(..OPEN_GRAPH_FIELD_PREFIX.len()) else {
            return false;
        };
        let property = &name[OPEN_GRAPH_FIELD_PREFIX.len()..];
        if !prefix.eq_ignore_ascii_case(OPEN_GRAPH_FIELD_PREFIX) || property.is_empty() {
            return false;
        }
        self.open_graph.push((property.to_owned(), value.into()));
        true
    }

    /// Custom Open Graph tags in insertion order.
    pub fn open_graph_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.open_graph
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

// ============================================================================
// Input Document
// ============================================================================

/// External description of a record, as supplied by a metadata provider.
///
/// ```json
/// {
///   "type": "Article",
///   "data": { "name": "Hello", "wordCount": 250 },
///   "standardPropertyNames": ["name"],
///   "userDefinedPropertyNames": ["wordCount"],
///   "openGraph": { "og_locale": "fr_FR" }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MetadataInput {
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "ordered_pairs")]
    pub data: Vec<(String, String)>,
    #[serde(default)]
    pub standard_property_names: BTreeSet<String>,
    #[serde(default)]
    pub user_defined_property_names: BTreeSet<String>,
    /// Custom fields; only `og_` names are kept.
    #[serde(default, deserialize_with = "ordered_pairs")]
    pub open_graph: Vec<(String, String)>,
}

impl MetadataInput {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}

impl From<MetadataInput> for MetadataRecord {
    fn from(input: MetadataInput) -> Self {
        let mut record = Self::new();
        if let Some(content_type) = input.content_type {
            record.set_standard_type(content_type);
        }
        for (name, value) in input.data {
            record.set(name, value);
        }
        record.user_defined = input.user_defined_property_names;
        for name in input.standard_property_names {
            record.mark_standard(name);
        }
        for (name, value) in input.open_graph {
            record.add_custom_field(&name, value);
        }
        record
    }
}

/// A scalar JSON value stored as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(text) => text,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Boolean(true) => "True".into(),
            Scalar::Boolean(false) => "False".into(),
        }
    }
}

/// Deserialize a JSON object into pairs, keeping document order.
fn ordered_pairs<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of scalar values")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut pairs: Vec<(String, String)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, value)) = map.next_entry::<String, Scalar>()? {
                let value = String::from(value);
                match pairs.iter_mut().find(|(existing, _)| *existing == name) {
                    Some((_, slot)) => *slot = value,
                    None => pairs.push((name, value)),
                }
            }
            Ok(pairs)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(PairsVisitor)
}

// ============================================================================
// Tests
// ============================================================================
