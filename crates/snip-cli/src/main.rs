mod cli;

use crate::cli::{Command, LogFormatArg, CLI};
use anyhow::Context;
use clap::Parser;
use snip_core::{Mapping, Shortener};
use snip_generator::RandomGenerator;
use snip_redirector::{CachedRepository, HistoryReader, MokaMappingCache, RedirectorService};
use snip_shortener::{ShortenerConfig, ShortenerService};
use snip_storage::{SqliteConfig, SqliteRepository};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type Store = Arc<CachedRepository<SqliteRepository, MokaMappingCache>>;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    let generator = RandomGenerator::with_length(config.code_length)
        .with_context(|| format!("invalid code length {}", config.code_length))?;

    debug!(
        database = %config.database,
        code_length = generator.length(),
        code_space = generator.code_space(),
        max_attempts = config.max_attempts,
        "starting snip"
    );

    let sqlite_config = SqliteConfig::builder()
        .database_url(config.database.clone())
        .build();
    let repository = SqliteRepository::connect(&sqlite_config)
        .await
        .with_context(|| format!("failed to open database {}", config.database))?;
    let store: Store = Arc::new(CachedRepository::new(repository, MokaMappingCache::new()));

    match config.command {
        Command::Shorten { url } => {
            let shortener_config = ShortenerConfig::builder()
                .max_attempts(config.max_attempts)
                .build();
            let service = ShortenerService::with_config(store, generator, shortener_config);
            shorten(&service, &url, &config.base_url).await
        }
        Command::Resolve { code } => resolve(&RedirectorService::new(store), &code).await,
        Command::History { json } => history(&HistoryReader::new(store), json).await,
    }
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn shorten(
    service: &ShortenerService<Store, RandomGenerator>,
    url: &str,
    base_url: &str,
) -> anyhow::Result<ExitCode> {
    let outcome = service.shorten(url).await.context("failed to shorten URL")?;

    if outcome.was_existing {
        info!(code = %outcome.short_code, "URL already exists, returning the saved short link");
    } else {
        info!(code = %outcome.short_code, "URL shortened successfully");
    }
    println!("{}", outcome.short_code.to_url(base_url));

    Ok(ExitCode::SUCCESS)
}

async fn resolve(service: &RedirectorService<Store>, code: &str) -> anyhow::Result<ExitCode> {
    match service.resolve(code).await.context("failed to resolve short code")? {
        Some(url) => {
            println!("{url}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("short code '{code}' not found");
            Ok(ExitCode::from(2))
        }
    }
}

async fn history(reader: &HistoryReader<Store>, json: bool) -> anyhow::Result<ExitCode> {
    let mappings = reader
        .list_history()
        .await
        .context("failed to list history")?;

    if json {
        for mapping in &mappings {
            println!("{}", serde_json::to_string(mapping)?);
        }
    } else {
        print_table(&mappings);
    }

    Ok(ExitCode::SUCCESS)
}

fn print_table(mappings: &[Mapping]) {
    let width = mappings
        .iter()
        .map(|m| m.short_code.as_str().len())
        .max()
        .unwrap_or(0)
        .max("CODE".len());

    println!("{:<width$}  {:<24}  URL", "CODE", "CREATED");
    for mapping in mappings {
        println!(
            "{:<width$}  {:<24}  {}",
            mapping.short_code.as_str(),
            mapping.created_at.to_string(),
            mapping.original_url
        );
    }
}
