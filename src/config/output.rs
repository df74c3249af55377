//! `[output]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[output]` section in seamless.toml - which tags are emitted.
///
/// # Example
/// ```toml
/// [output]
/// schema = true
/// opengraph = false
/// item_type_base = "https://schema.org/"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Emit `itemprop` meta tags.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = defaults::r#true())]
    pub schema: bool,

    /// Emit `og:` meta tags.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = defaults::r#true())]
    pub opengraph: bool,

    /// Prefix of `itemtype` URLs. Must end with `/`.
    #[serde(default = "defaults::output::item_type_base")]
    #[educe(Default = defaults::output::item_type_base())]
    pub item_type_base: String,
}
