//! `[site]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in seamless.toml - defaults for derived records.
///
/// # Example
/// ```toml
/// [site]
/// locale = "fr_FR"
/// default_type = "WebPage"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Locale suffix of stored settings options.
    #[serde(default = "defaults::site::locale")]
    #[educe(Default = defaults::site::locale())]
    pub locale: String,

    /// Content type of settings-derived records without a stored type.
    #[serde(default = "defaults::site::default_type")]
    #[educe(Default = defaults::site::default_type())]
    pub default_type: String,
}
