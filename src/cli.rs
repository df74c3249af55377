//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Schema.org vocabulary and page metadata tool
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Root directory path
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: seamless.toml)
    #[arg(short = 'C', long, default_value = "seamless.toml")]
    pub config: PathBuf,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List the retained content types
    Types,

    /// List the properties of a content type
    Properties {
        /// Content type name, e.g. `Article`
        name: String,
    },

    /// List the primitive data types and their patterns
    Datatypes,

    /// Validate a value for a property
    Validate {
        /// Property name, e.g. `dateModified`
        property: String,

        /// Candidate value
        value: String,
    },

    /// Render the meta tags of a record document (JSON)
    Render {
        /// Record document
        record: PathBuf,

        /// Rendered page to annotate instead of printing bare tags
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Manage the vocabulary snapshot cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// `cache` subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CacheAction {
    /// Remove every cached vocabulary snapshot
    Clear,
}
