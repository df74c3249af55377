//! Allow-list of retained content types.

use std::collections::BTreeSet;

use super::SNAPSHOT_VERSION;
use crate::utils::hash;

/// Content type names to retain from the raw vocabulary.
///
/// An empty list retains every type. Names are kept sorted by byte value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    names: BTreeSet<String>,
}

impl AllowList {
    /// Allow-list retaining every raw type.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse a configuration string such as `"Article, Book; Person"`.
    ///
    /// Any run of characters other than ASCII letters separates names.
    pub fn parse(config: &str) -> Self {
        Self::from_names(config.split(|c: char| !c.is_ascii_alphabetic()))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Cache key for vocabulary structures built with this allow-list.
    pub fn fingerprint(&self) -> String {
        let names: Vec<&str> = self.iter().collect();
        hash::fingerprint(&format!("v{SNAPSHOT_VERSION}:{}", names.join(",")))
    }
}
