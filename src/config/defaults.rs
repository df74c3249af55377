//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [vocabulary] Section Defaults
// ============================================================================

pub mod vocabulary {
    use std::path::PathBuf;

    pub fn source() -> PathBuf {
        "schema/all.json".into()
    }

    pub fn types() -> String {
        "Article, Blog, WebPage, Book, Event, LocalBusiness, Organization, Person, Product, \
         Review, ImageObject, AudioObject, VideoObject"
            .into()
    }

    pub fn cache_dir() -> String {
        "~/.cache/seamless-schema".into()
    }
}

// ============================================================================
// [output] Section Defaults
// ============================================================================

pub mod output {
    pub fn item_type_base() -> String {
        "http://schema.org/".into()
    }
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn locale() -> String {
        "en_US".into()
    }

    pub fn default_type() -> String {
        "Blog".into()
    }
}
