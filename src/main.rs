//! seamless-schema - Schema.org vocabulary and page metadata tool.

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{CacheAction, Cli, Commands};
use seamless_schema::{
    MetadataInput, MetadataRecord, SchemaError, VocabularyHandle, VocabularyStore,
    config::SchemaConfig,
    log, logger,
    output::{render_head, render_page},
    vocabulary::FileCache,
};
use std::{fs, path::Path, process::ExitCode, sync::Arc};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logger::set_quiet(cli.quiet);
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Types => list_types(&config),
        Commands::Properties { name } => list_properties(&config, name),
        Commands::Datatypes => list_data_types(&config),
        Commands::Validate { property, value } => validate_value(&config, property, value),
        Commands::Render { record, html } => render(&config, record, html.as_deref()),
        Commands::Cache {
            action: CacheAction::Clear,
        } => clear_cache(&config),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SchemaConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SchemaConfig::from_path(&config_path)?
    } else {
        log!("config"; "{} not found, using defaults", config_path.display());
        SchemaConfig::default()
    };
    config.set_root(root);
    config.validate()?;
    Ok(config)
}

fn vocabulary(config: &SchemaConfig) -> Result<Arc<VocabularyStore>> {
    VocabularyHandle::from_config(config)
        .get()
        .with_context(|| format!("cannot load vocabulary from {}", config.source_path().display()))
}

fn list_types(config: &SchemaConfig) -> Result<ExitCode> {
    let store = vocabulary(config)?;
    for content_type in store.content_types().values() {
        println!(
            "{:<24} {:<24} {} properties",
            content_type.name,
            content_type.label,
            content_type.properties.len()
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn list_properties(config: &SchemaConfig, name: &str) -> Result<ExitCode> {
    let store = vocabulary(config)?;
    if store.content_type(name).is_none() {
        bail!("unknown content type `{name}`");
    }

    for property in store.properties_for_type(name) {
        let Some(definition) = store.property(property) else {
            continue;
        };
        let ranges: Vec<&str> = definition.ranges.iter().map(|data_type| data_type.name()).collect();
        println!(
            "{:<28} {:<20} {}",
            definition.name,
            ranges.join(" | "),
            definition.comment_text
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn list_data_types(config: &SchemaConfig) -> Result<ExitCode> {
    let store = VocabularyStore::empty(&config.allow_list())?;
    for data_type in store.data_types() {
        println!(
            "{:<10} {:<24} {:<24} {}",
            data_type.name(),
            data_type.label(),
            data_type.format().unwrap_or("-"),
            data_type.pattern().unwrap_or("-")
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn validate_value(config: &SchemaConfig, property: &str, value: &str) -> Result<ExitCode> {
    let store = vocabulary(config)?;
    let result = store.validate(property, value);

    match (result.valid, result.matched_type) {
        (true, Some(data_type)) => println!("valid: {data_type}"),
        (true, None) => println!("valid: blank"),
        (false, _) => {
            let ranges: Vec<&str> = store
                .property(property)
                .map(|definition| definition.ranges.iter().map(|data_type| data_type.name()).collect())
                .unwrap_or_default();
            println!("invalid: expected {}", ranges.join(" | "));
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn render(config: &SchemaConfig, record: &Path, html: Option<&Path>) -> Result<ExitCode> {
    let content = fs::read_to_string(record)
        .with_context(|| format!("cannot read record `{}`", record.display()))?;
    let input = MetadataInput::from_json(&content)
        .with_context(|| format!("invalid record document `{}`", record.display()))?;
    let record = MetadataRecord::from(input);
    let page = html
        .map(|page| {
            fs::read_to_string(page).with_context(|| format!("cannot read page `{}`", page.display()))
        })
        .transpose()?;

    let store = match VocabularyHandle::from_config(config).get() {
        Ok(store) => Some(store),
        Err(err @ SchemaError::VocabularyUnavailable(_)) => {
            log!("error"; "{err}; rendering without structured metadata");
            None
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!("cannot load vocabulary from {}", config.source_path().display())
            });
        }
    };

    if let Some(store) = &store
        && let Err(err) = record.resolve_type(store)
    {
        log!("render"; "{err}; emitting Open Graph tags only");
    }

    let output = match (page, store.as_deref()) {
        (Some(page), store) => render_page(&page, &record, store, &config.output)?,
        (None, Some(store)) => render_head(&record, store, &config.output)?,
        (None, None) => String::new(),
    };
    print!("{output}");
    Ok(ExitCode::SUCCESS)
}

fn clear_cache(config: &SchemaConfig) -> Result<ExitCode> {
    let Some(dir) = config.cache_dir() else {
        log!("cache"; "file cache disabled, nothing to clear");
        return Ok(ExitCode::SUCCESS);
    };

    let removed = FileCache::new(&dir).clear()?;
    log!("cache"; "removed {removed} snapshot(s) from {}", dir.display());
    Ok(ExitCode::SUCCESS)
}
