//! Projection of a record into page metadata.
//!
//! | Function | Output |
//! |----------|--------|
//! | [`to_schema_attributes`] | `itemprop` pairs valid for the record's type |
//! | [`to_open_graph_attributes`] | `og:type` plus mapped `og:` pairs |
//! | [`custom_open_graph_attributes`] | tags from `og_` custom fields |
//! | [`render_head`] | `<meta>` tags, one per line |
//! | [`inject_metadata`] | rendered page with annotated `<html>` and head |
//! | [`render_page`] | [`inject_metadata`], or the page unchanged without a vocabulary |
//!
//! All projections are pure; they never fail on unknown types or values.

mod head;
mod opengraph;
mod schema;

pub use head::{inject_metadata, render_head, render_page};
pub use opengraph::{
    DEFAULT_OG_TYPE, PROPERTY_MAPPING, TYPE_MAPPING, custom_open_graph_attributes, og_type,
    to_open_graph_attributes,
};
pub use schema::{item_type_url, to_schema_attributes};
