//! Schema.org vocabulary model, value validation and page metadata.
//!
//! # Overview
//!
//! ```text
//! VocabularySource ──► VocabularyStore ◄── VocabularyHandle (shared, cached)
//!                            │
//!        ┌───────────────────┼────────────────────┐
//!        ▼                   ▼                    ▼
//!   metadata::sources    validate            output
//!   (derive records)     (editor values)     (itemprop / og: tags)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let store = VocabularyStore::load(&RawVocabulary::from_path(path)?, &AllowList::parse("Article"))?;
//! let mut record = MetadataRecord::with_type("Article");
//! record.set("name", "Hello");
//! let tags = render_head(&record, &store, &OutputConfig::default())?;
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod metadata;
pub mod output;
pub mod utils;
pub mod validate;
pub mod vocabulary;

pub use error::{Result, SchemaError};
pub use metadata::{MetadataInput, MetadataRecord};
pub use validate::{ValidationResult, Validator};
pub use vocabulary::{
    AllowList, ContentType, DataType, PropertyDefinition, RawVocabulary, VocabularyHandle,
    VocabularyStore,
};
