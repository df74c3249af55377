//! `<meta>` tag rendering and the post-render page transform.
//!
//! ```text
//! <html lang="en">            ──►  <html lang="en" itemscope="itemscope" itemtype="http://schema.org/Article">
//! <head>                           <head>
//!   <title>..</title>                <title>..</title>
//! </head>                     ──►    <meta itemprop="name" content=".."/>
//!                                    <meta property="og:type" content="article"/>
//!                                  </head>
//! <body>..                    ──►  <body>..        (copied verbatim)
//! ```

use anyhow::Result;
use quick_xml::{
    Reader, Writer,
    escape::unescape,
    events::{BytesStart, Event},
};
use std::borrow::Cow;
use std::io::{Cursor, Write};

use super::opengraph::{custom_open_graph_attributes, to_open_graph_attributes};
use super::schema::{item_type_url, to_schema_attributes};
use crate::config::OutputConfig;
use crate::error::SchemaError;
use crate::metadata::MetadataRecord;
use crate::vocabulary::VocabularyStore;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

#[inline]
fn create_xml_reader(content: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(false);
    reader.config_mut().enable_all_checks(false);
    reader
}

// ============================================================================
// Meta Tags
// ============================================================================

/// Build the `<meta>` elements for a record.
fn meta_elements(
    record: &MetadataRecord,
    store: &VocabularyStore,
    options: &OutputConfig,
) -> Vec<BytesStart<'static>> {
    let mut elements = Vec::new();

    if options.schema {
        for (property, value) in to_schema_attributes(record, store) {
            elements.push(meta("itemprop", property, value));
        }
    }
    if options.opengraph {
        let mut attributes: Vec<(&str, &str)> = to_open_graph_attributes(record);
        attributes.extend(custom_open_graph_attributes(record));
        for (property, value) in attributes {
            elements.push(meta("property", property, value));
        }
    }
    elements
}

fn meta(key: &str, property: &str, value: &str) -> BytesStart<'static> {
    let mut elem = BytesStart::new("meta");
    elem.push_attribute((key, property));
    elem.push_attribute(("content", value));
    elem
}

/// Render the head tags of a record, one per line.
pub fn render_head(
    record: &MetadataRecord,
    store: &VocabularyStore,
    options: &OutputConfig,
) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    for elem in meta_elements(record, store, options) {
        writer.write_event(Event::Empty(elem))?;
        writer.get_mut().write_all(b"\n")?;
    }
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

fn write_meta_tags(
    writer: &mut XmlWriter,
    record: &MetadataRecord,
    store: &VocabularyStore,
    options: &OutputConfig,
) -> Result<()> {
    for elem in meta_elements(record, store, options) {
        writer.get_mut().write_all(b"\n")?;
        writer.write_event(Event::Empty(elem))?;
    }
    Ok(())
}

// ============================================================================
// Page Transform
// ============================================================================

/// Elements whose content is raw text, never markup.
const RAW_TEXT_ELEMENTS: &[&[u8]] = &[b"script", b"style"];

/// Annotate a rendered page with the record's metadata.
///
/// - every `<html>` start tag before `</head>` gets `itemscope` and
///   `itemtype`, replacing existing ones
/// - meta tags are written just before `</head>`
/// - everything else is copied byte for byte, including doctype and the
///   content of `<script>` and `<style>`
///
/// A page without `</head>` only gets its `<html>` tags annotated.
pub fn inject_metadata(
    html: &str,
    record: &MetadataRecord,
    store: &VocabularyStore,
    options: &OutputConfig,
) -> Result<String> {
    let content = html.as_bytes();
    let mut writer = Writer::new(Cursor::new(Vec::with_capacity(content.len() + 1024)));
    let item_type = item_type_url(record, &options.item_type_base);

    // Page bytes already written; everything is copied lazily from here.
    let mut copied = 0;
    // Byte offset the current reader started at.
    let mut offset = 0;
    let mut reader = create_xml_reader(content);

    loop {
        match reader.read_event() {
            Ok(Event::Start(elem)) if elem.name().as_ref().eq_ignore_ascii_case(b"html") => {
                let end = position(&reader, offset);
                let tag_start = end.saturating_sub(elem.len() + 2);
                writer.get_mut().write_all(page_slice(content, copied, tag_start))?;
                writer.write_event(Event::Start(annotate_html(&elem, item_type.as_deref())))?;
                copied = end;
            }
            Ok(Event::Start(elem)) if is_raw_text_element(elem.name().as_ref()) => {
                let body = position(&reader, offset);
                offset = find_end_tag(content, body, elem.name().as_ref()).unwrap_or(content.len());
                reader = create_xml_reader(content.get(offset..).unwrap_or_default());
            }
            Ok(Event::End(elem)) if elem.name().as_ref().eq_ignore_ascii_case(b"head") => {
                let end = position(&reader, offset);
                let tag_start = page_slice(content, copied, end)
                    .windows(2)
                    .rposition(|window| window == b"</")
                    .map_or(copied, |index| copied + index);
                writer.get_mut().write_all(page_slice(content, copied, tag_start))?;
                write_meta_tags(&mut writer, record, store, options)?;
                writer.get_mut().write_all(b"\n")?;
                copied = tag_start;
                break;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(SchemaError::Html(format!(
                    "parse error at position {}: {e}",
                    offset + usize::try_from(reader.error_position()).unwrap_or_default()
                ))
                .into());
            }
        }
    }
    writer
        .get_mut()
        .write_all(content.get(copied..).unwrap_or_default())?;

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

/// Render `html` with the record's metadata, or unchanged without a store.
///
/// A missing store stands for an unavailable vocabulary: the page is still
/// served, only without structured metadata.
pub fn render_page(
    html: &str,
    record: &MetadataRecord,
    store: Option<&VocabularyStore>,
    options: &OutputConfig,
) -> Result<String> {
    match store {
        Some(store) => inject_metadata(html, record, store, options),
        None => Ok(html.to_owned()),
    }
}

/// Page position of `reader`, which started reading at `offset`.
fn position(reader: &Reader<&[u8]>, offset: usize) -> usize {
    let consumed = usize::try_from(reader.buffer_position()).unwrap_or(usize::MAX);
    offset.saturating_add(consumed)
}

fn page_slice(content: &[u8], from: usize, to: usize) -> &[u8] {
    content.get(from..to).unwrap_or_default()
}

fn is_raw_text_element(name: &[u8]) -> bool {
    RAW_TEXT_ELEMENTS
        .iter()
        .any(|element| name.eq_ignore_ascii_case(element))
}

/// Start of the first `</name` at or after `from`, ignoring ASCII case.
fn find_end_tag(content: &[u8], from: usize, name: &[u8]) -> Option<usize> {
    let rest = content.get(from..)?;
    rest.windows(name.len() + 2)
        .position(|window| window.starts_with(b"</") && window[2..].eq_ignore_ascii_case(name))
        .map(|index| from + index)
}

/// Rebuild an `<html>` tag with fresh microdata attributes.
fn annotate_html(elem: &BytesStart<'_>, item_type: Option<&str>) -> BytesStart<'static> {
    let tag = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let mut annotated = BytesStart::new(tag);

    for attr in elem.html_attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if key.eq_ignore_ascii_case("itemscope") || key.eq_ignore_ascii_case("itemtype") {
            continue;
        }
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw).unwrap_or(Cow::Borrowed(raw.as_ref())).into_owned();
        annotated.push_attribute((key.as_str(), value.as_str()));
    }

    annotated.push_attribute(("itemscope", "itemscope"));
    if let Some(item_type) = item_type {
        annotated.push_attribute(("itemtype", item_type));
    }
    annotated
}
