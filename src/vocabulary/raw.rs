//! Raw vocabulary documents and their suppliers.
//!
//! The raw document follows the `all.json` layout published for Schema.org:
//!
//! ```json
//! {
//!   "types": {
//!     "Article": { "label": "Article", "properties": ["name", "author"] }
//!   },
//!   "properties": {
//!     "name": { "comment": "...", "comment_plain": "...", "ranges": ["Text"] }
//!   }
//! }
//! ```
//!
//! Unknown fields (`ancestors`, `supertypes`, `datatypes`, ...) are ignored.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SchemaError};

// ============================================================================
// Document Model
// ============================================================================

/// A parsed raw vocabulary document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVocabulary {
    #[serde(default)]
    pub types: BTreeMap<String, RawType>,
    #[serde(default)]
    pub properties: BTreeMap<String, RawProperty>,
}

/// A content type entry of the raw document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawType {
    #[serde(default)]
    pub label: Option<String>,
    /// Every property applicable to the type, inherited ones included.
    #[serde(default)]
    pub properties: Vec<String>,
}

/// A property entry of the raw document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProperty {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub comment_plain: Option<String>,
    /// Free-text type names; only some of them are primitive data types.
    #[serde(default)]
    pub ranges: Vec<String>,
}

impl RawVocabulary {
    /// Parse a JSON document.
    ///
    /// A malformed document, or one without any type or property, is
    /// reported as [`SchemaError::VocabularyUnavailable`].
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: Self = serde_json::from_str(content).map_err(|err| {
            SchemaError::VocabularyUnavailable(format!("malformed vocabulary document: {err}"))
        })?;

        if raw.is_empty() {
            return Err(SchemaError::VocabularyUnavailable(
                "vocabulary document declares no types and no properties".into(),
            ));
        }
        Ok(raw)
    }

    /// Read and parse a JSON document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| {
            SchemaError::VocabularyUnavailable(format!("cannot read `{}`: {err}", path.display()))
        })?;
        Self::from_json(&content)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.properties.is_empty()
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Supplies the raw vocabulary document.
///
/// Fetching is the only slow step of a vocabulary build; implementations
/// are free to read files, embedded snapshots or remote mirrors.
pub trait VocabularySource: Send + Sync {
    fn fetch(&self) -> Result<RawVocabulary>;

    /// Short description used in log lines.
    fn describe(&self) -> String;
}

/// Reads the vocabulary from a JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VocabularySource for FileSource {
    fn fetch(&self) -> Result<RawVocabulary> {
        RawVocabulary::from_path(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves a pinned, in-memory JSON document.
#[derive(Debug, Clone)]
pub struct StaticSource {
    document: String,
}

impl StaticSource {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }
}

impl VocabularySource for StaticSource {
    fn fetch(&self) -> Result<RawVocabulary> {
        RawVocabulary::from_json(&self.document)
    }

    fn describe(&self) -> String {
        "pinned snapshot".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let raw = RawVocabulary::from_json(
            r#"{
                "types": { "Thing": { "label": "Thing", "ancestors": [], "properties": ["name"] } },
                "properties": { "name": { "comment": "The name", "ranges": ["Text"], "domains": ["Thing"] } },
                "datatypes": {}
            }"#,
        )
        .unwrap();

        assert_eq!(raw.types["Thing"].properties, vec!["name"]);
        assert_eq!(raw.properties["name"].comment.as_deref(), Some("The name"));
        assert_eq!(raw.properties["name"].comment_plain, None);
    }

    #[test]
    fn test_parse_tolerates_null_comments() {
        let raw = RawVocabulary::from_json(
            r#"{ "properties": { "name": { "comment": null, "ranges": [] } } }"#,
        )
        .unwrap();
        assert!(raw.properties["name"].comment.is_none());
        assert!(raw.types.is_empty());
    }

    #[test]
    fn test_malformed_document_is_unavailable() {
        let err = RawVocabulary::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SchemaError::VocabularyUnavailable(_)));
    }

    #[test]
    fn test_empty_document_is_unavailable() {
        for doc in ["{}", r#"{ "types": {}, "properties": {} }"#] {
            let err = RawVocabulary::from_json(doc).unwrap_err();
            assert!(matches!(err, SchemaError::VocabularyUnavailable(_)));
        }
    }

    #[test]
    fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "types": {{ "Thing": {{ "label": "Thing" }} }} }}"#).unwrap();

        let source = FileSource::new(file.path());
        let raw = source.fetch().unwrap();
        assert!(raw.types.contains_key("Thing"));
        assert_eq!(source.describe(), file.path().display().to_string());
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("missing.json"));
        assert!(matches!(
            source.fetch(),
            Err(SchemaError::VocabularyUnavailable(_))
        ));
    }

    #[test]
    fn test_static_source() {
        let source = StaticSource::new(r#"{ "properties": { "name": {} } }"#);
        assert!(source.fetch().unwrap().properties.contains_key("name"));
    }
}
