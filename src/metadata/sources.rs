//! Record derivation for the three page origins.
//!
//! ```text
//! PageRequest
//!   ├── FrontPage ─────────────► from_settings(Homepage)
//!   ├── Content(item) ─────────► from_content(item)
//!   ├── Author / Category / Tag / Search
//!   │                  ─────────► from_context(..)  (on top of Default settings)
//!   └── Other ─────────────────► from_settings(Default)
//! ```
//!
//! Every derived value is marked standard. Values stored through the editor
//! (post meta or settings options) are then applied on top and marked
//! user-defined.

use chrono::NaiveDateTime;
use md5::{Digest, Md5};
use std::collections::BTreeMap;

use super::MetadataRecord;
use crate::config::SiteConfig;
use crate::validate::{TYPE_META_KEY, property_from_meta_key};

/// `dateModified` layout for GMT modification times.
const DATE_MODIFIED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const GRAVATAR_BASE: &str = "http://gravatar.com/avatar/";

/// Separator between document title segments.
const TITLE_SEPARATOR: char = '—';

// ============================================================================
// Content Items
// ============================================================================

/// Kind of a content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    Post,
    Page,
    Attachment(Attachment),
    Other(String),
}

/// Media file attached to the site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    /// MIME type such as `image/png`.
    pub mime_type: String,
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A post, page or attachment as handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub kind: ContentKind,
    /// Title with HTML entities still encoded.
    pub title: String,
    pub excerpt: String,
    pub modified_gmt: Option<NaiveDateTime>,
    pub permalink: String,
    pub author: Option<String>,
    /// URL of the featured image, at display size.
    pub featured_image: Option<String>,
    /// Stored meta entries (`_schematype`, `_schemadata_*`, `og_*`, ...).
    pub meta: Vec<(String, String)>,
}

impl ContentItem {
    pub fn new(kind: ContentKind, title: impl Into<String>, permalink: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            excerpt: String::new(),
            modified_gmt: None,
            permalink: permalink.into(),
            author: None,
            featured_image: None,
            meta: Vec::new(),
        }
    }
}

/// Build a record from a content item and its stored meta entries.
pub fn from_content(item: &ContentItem) -> MetadataRecord {
    let mut record = MetadataRecord::new();

    let content_type = match &item.kind {
        ContentKind::Attachment(attachment) => attachment_type(attachment, &mut record),
        ContentKind::Post | ContentKind::Page | ContentKind::Other(_) => "Article",
    };
    record.set_content_type(content_type);

    record.set("name", decode_entities(&item.title).trim());
    record.set("description", decode_entities(&item.excerpt).trim());
    if let Some(modified) = item.modified_gmt {
        record.set("dateModified", modified.format(DATE_MODIFIED_FORMAT).to_string());
    }
    record.set("url", item.permalink.as_str());

    if let Some(author) = item.author.as_deref().filter(|author| !author.is_empty()) {
        record.set("author", author);
    }

    if let Some(image) = item.featured_image.as_deref()
        && !image.is_empty()
        && record.get("image").is_none_or(str::is_empty)
    {
        record.set("thumbnailUrl", image);
        record.set("image", image);
    }

    record.mark_standard_from_current();
    apply_stored_meta(&mut record, &item.meta);
    record
}

/// Pick the type for an attachment and set its media properties.
fn attachment_type(attachment: &Attachment, record: &mut MetadataRecord) -> &'static str {
    let mime = attachment.mime_type.to_ascii_lowercase();
    let major = mime.split('/').next().unwrap_or_default();

    let set_dimensions = |record: &mut MetadataRecord| {
        if let Some(width) = attachment.width.filter(|&width| width > 0) {
            record.set("width", width.to_string());
        }
        if let Some(height) = attachment.height.filter(|&height| height > 0) {
            record.set("height", height.to_string());
        }
    };

    match major {
        "image" => {
            set_dimensions(record);
            record.set("thumbnailUrl", attachment.url.as_str());
            record.set("image", attachment.url.as_str());
            "ImageObject"
        }
        "audio" => "AudioObject",
        "video" => {
            set_dimensions(record);
            "VideoObject"
        }
        _ => "Thing",
    }
}

/// Apply `_schematype`, `_schemadata_*` and `og_*` meta entries.
fn apply_stored_meta(record: &mut MetadataRecord, meta: &[(String, String)]) {
    for (key, value) in meta {
        if key == TYPE_META_KEY {
            if !value.trim().is_empty() {
                record.set_content_type(value.as_str());
            }
        } else if let Some(property) = property_from_meta_key(key) {
            record.set_user_defined(property, value.as_str());
        } else {
            record.add_custom_field(key, value.as_str());
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Settings section a record is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Homepage,
    Default,
}

impl Section {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Default => "default",
        }
    }
}

/// Option holding the stored type of a section.
pub fn type_option_name(section: Section, locale: &str) -> String {
    format!("seamless_schema_type_{}_{locale}", section.as_str())
}

/// Option holding the stored property values of a section.
pub fn data_option_name(section: Section, locale: &str) -> String {
    format!("seamless_schema_data_{}_{locale}", section.as_str())
}

/// Site-wide values used as standard properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteSettings {
    /// Document title with the site name as its last `—` segment.
    pub document_title: String,
    pub tagline: String,
    pub header_image: Option<String>,
}

/// Read access to site settings and stored options.
pub trait SettingsProvider {
    fn site(&self) -> SiteSettings;

    fn option_type(&self, name: &str) -> Option<String>;

    fn option_data(&self, name: &str) -> Vec<(String, String)>;
}

/// In-memory settings, keyed by option name.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    pub site: SiteSettings,
    pub types: BTreeMap<String, String>,
    pub data: BTreeMap<String, Vec<(String, String)>>,
}

impl StaticSettings {
    pub fn new(site: SiteSettings) -> Self {
        Self {
            site,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, section: Section, locale: &str, content_type: &str) -> Self {
        self.types
            .insert(type_option_name(section, locale), content_type.to_owned());
        self
    }

    pub fn with_data(mut self, section: Section, locale: &str, data: &[(&str, &str)]) -> Self {
        let data = data
            .iter()
            .map(|&(name, value)| (name.to_owned(), value.to_owned()))
            .collect();
        self.data.insert(data_option_name(section, locale), data);
        self
    }
}

impl SettingsProvider for StaticSettings {
    fn site(&self) -> SiteSettings {
        self.site.clone()
    }

    fn option_type(&self, name: &str) -> Option<String> {
        self.types.get(name).cloned()
    }

    fn option_data(&self, name: &str) -> Vec<(String, String)> {
        self.data.get(name).cloned().unwrap_or_default()
    }
}

/// Build a record from site settings for `section`.
pub fn from_settings(
    settings: &dyn SettingsProvider,
    section: Section,
    site: &SiteConfig,
) -> MetadataRecord {
    let mut record = MetadataRecord::new();
    let locale = site.locale.as_str();

    let content_type = settings
        .option_type(&type_option_name(section, locale))
        .filter(|content_type| !content_type.trim().is_empty())
        .unwrap_or_else(|| site.default_type.clone());
    record.set_content_type(content_type);

    let info = settings.site();
    record.set("name", page_name(&info.document_title));
    record.set("description", info.tagline.trim());
    if let Some(image) = info.header_image.filter(|image| !image.is_empty()) {
        record.set("image", image);
    }
    record.mark_standard_from_current();

    for (name, value) in settings.option_data(&data_option_name(section, locale)) {
        record.set_user_defined(name, value);
    }
    record
}

/// Drop the trailing site name segment from a document title.
fn page_name(document_title: &str) -> String {
    let mut segments: Vec<&str> = document_title.split(TITLE_SEPARATOR).collect();
    segments.pop();
    collapse_whitespace(&segments.join(" — "))
}

// ============================================================================
// Context
// ============================================================================

/// Public profile of an author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorProfile {
    pub display_name: String,
    /// Biography, may contain HTML.
    pub bio: String,
    pub url: String,
    pub email: String,
}

/// A category or tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Term {
    pub name: String,
    /// Description, may contain HTML.
    pub description: String,
}

/// Archive or listing context of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContext {
    Author(AuthorProfile),
    Category(Term),
    Tag(Term),
    Search,
    Other,
}

/// Build a record for an archive or listing page.
pub fn from_context(
    settings: &dyn SettingsProvider,
    context: &PageContext,
    site: &SiteConfig,
) -> MetadataRecord {
    let mut record = from_settings(settings, Section::Default, site);

    match context {
        PageContext::Author(author) => {
            record.set_standard_type("Person");
            record.set_standard("name", author.display_name.clone());
            record.set_standard("description", strip_tags(&author.bio));
            record.set_standard("url", author.url.clone());
            record.set_standard("image", gravatar_url(&author.email));
        }
        PageContext::Category(category) => {
            record.set_standard_type("CollectionPage");
            record.set_standard("name", category.name.clone());
            let description = strip_tags(&category.description);
            if !description.is_empty() {
                record.set_standard("description", description);
            }
        }
        PageContext::Tag(tag) => {
            record.set_standard_type("CollectionPage");
            let description = strip_tags(&tag.description);
            if !description.is_empty() {
                record.set_standard("description", description);
            }
        }
        PageContext::Search => record.set_standard_type("SearchResultsPage"),
        PageContext::Other => {}
    }
    record
}

/// Avatar URL for an e-mail address.
pub fn gravatar_url(email: &str) -> String {
    let digest = Md5::digest(email.trim().to_lowercase().as_bytes());
    format!("{GRAVATAR_BASE}{}", hex::encode(digest))
}

// ============================================================================
// Request Dispatch
// ============================================================================

/// What the host is rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    FrontPage,
    Content(ContentItem),
    Context(PageContext),
    Other,
}

/// Build the record for a page request.
pub fn record_for_request(
    request: &PageRequest,
    settings: &dyn SettingsProvider,
    site: &SiteConfig,
) -> MetadataRecord {
    match request {
        PageRequest::FrontPage => from_settings(settings, Section::Homepage, site),
        PageRequest::Content(item) => from_content(item),
        PageRequest::Context(context) => from_context(settings, context, site),
        PageRequest::Other => from_settings(settings, Section::Default, site),
    }
}

// ============================================================================
// Text Helpers
// ============================================================================

/// Decode the five markup entities and numeric references.
///
/// Text with unknown entities is returned unchanged.
fn decode_entities(text: &str) -> String {
    match quick_xml::escape::unescape(text) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => text.to_owned(),
    }
}

/// Remove markup tags and trim.
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.trim().to_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Tests
// ============================================================================
