//! Configuration management for `seamless.toml`.
//!
//! # Sections
//!
//! | Section        | Purpose                                           |
//! |----------------|---------------------------------------------------|
//! | `[vocabulary]` | Raw vocabulary source, allowed types, cache       |
//! | `[output]`     | Which meta tags are emitted, `itemtype` base URL  |
//! | `[site]`       | Locale and default type of settings-derived pages |
//!
//! # Example
//!
//! ```toml
//! [vocabulary]
//! source = "schema/all.json"
//! types = "Article, Blog, Person, Product"
//!
//! [output]
//! opengraph = true
//!
//! [site]
//! locale = "en_US"
//! default_type = "Blog"
//! ```

pub mod defaults;
mod error;
mod output;
mod site;
mod vocabulary;

pub use error::ConfigError;
pub use output::OutputConfig;
pub use site::SiteConfig;
pub use vocabulary::VocabularyConfig;

use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::vocabulary::AllowList;

/// Default config file name.
pub const CONFIG_FILE: &str = "seamless.toml";

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing seamless.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Directory relative paths are resolved against (set after loading)
    #[serde(skip)]
    pub root: Option<PathBuf>,

    #[serde(default)]
    pub vocabulary: VocabularyConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub site: SiteConfig,
}

impl SchemaConfig {
    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_named(content, Path::new(CONFIG_FILE))
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Read(path.to_path_buf(), err))?;
        Self::parse_named(&content, path)
    }

    fn parse_named(content: &str, path: &Path) -> Result<Self> {
        let config: SchemaConfig = toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    /// Get the root directory path
    pub fn root(&self) -> &Path {
        self.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.root = Some(path.to_path_buf());
    }

    /// Raw vocabulary document, resolved against the root.
    pub fn source_path(&self) -> PathBuf {
        self.resolve(&self.vocabulary.source.to_string_lossy())
    }

    /// Snapshot cache directory, or `None` when the file cache is disabled.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        let dir = self.vocabulary.cache_dir.trim();
        (!dir.is_empty()).then(|| self.resolve(dir))
    }

    /// Allowed content types.
    pub fn allow_list(&self) -> AllowList {
        AllowList::parse(&self.vocabulary.types)
    }

    /// Tilde-expand `path` and resolve it against the root when relative.
    fn resolve(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(shellexpand::tilde(path).into_owned());
        if path.is_relative() {
            self.root().join(path)
        } else {
            path
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.vocabulary.source.as_os_str().is_empty() {
            bail!(ConfigError::Validation(
                "[vocabulary.source] must not be empty".into()
            ));
        }

        if !self.output.item_type_base.ends_with('/') {
            bail!(ConfigError::Validation(
                "[output.item_type_base] must end with `/`".into()
            ));
        }

        if self.site.default_type.trim().is_empty() {
            bail!(ConfigError::Validation(
                "[site.default_type] must not be empty".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
