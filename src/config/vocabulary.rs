//! `[vocabulary]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[vocabulary]` section in seamless.toml - where the vocabulary comes from.
///
/// # Example
/// ```toml
/// [vocabulary]
/// source = "schema/all.json"
/// types = "Article, Book, Person"
/// cache_dir = ""            # memory-only cache
/// tolerate_unavailable = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct VocabularyConfig {
    /// Raw vocabulary document (JSON), relative to the root.
    #[serde(default = "defaults::vocabulary::source")]
    #[educe(Default = defaults::vocabulary::source())]
    pub source: PathBuf,

    /// Content types to retain. Empty retains every type.
    #[serde(default = "defaults::vocabulary::types")]
    #[educe(Default = defaults::vocabulary::types())]
    pub types: String,

    /// Snapshot cache directory, tilde-expanded. Empty disables the file cache.
    #[serde(default = "defaults::vocabulary::cache_dir")]
    #[educe(Default = defaults::vocabulary::cache_dir())]
    pub cache_dir: String,

    /// Serve an empty vocabulary instead of failing when the source is unusable.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub tolerate_unavailable: bool,
}

#[cfg(test)]
mod tests {
    use super::super::SchemaConfig;

    #[test]
    fn test_vocabulary_config_defaults() {
        let config = SchemaConfig::parse("").unwrap();

        assert_eq!(config.vocabulary.source.to_str(), Some("schema/all.json"));
        assert!(config.vocabulary.types.starts_with("Article, Blog, WebPage"));
        assert_eq!(config.vocabulary.cache_dir, "~/.cache/seamless-schema");
        assert!(!config.vocabulary.tolerate_unavailable);
    }

    #[test]
    fn test_vocabulary_config_full() {
        let config = SchemaConfig::parse(
            r#"
            [vocabulary]
            source = "vendor/schema.json"
            types = "Article; Person"
            cache_dir = ""
            tolerate_unavailable = true
        "#,
        )
        .unwrap();

        assert_eq!(config.vocabulary.source.to_str(), Some("vendor/schema.json"));
        assert_eq!(config.allow_list().len(), 2);
        assert!(config.cache_dir().is_none());
        assert!(config.vocabulary.tolerate_unavailable);
    }

    #[test]
    fn test_vocabulary_config_unknown_field() {
        assert!(SchemaConfig::parse("[vocabulary]\nurl = \"http://schema.rdfs.org\"").is_err());
    }
}
