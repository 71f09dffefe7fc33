//! CLI command definitions and handlers.
//!
//! Each subcommand is implemented as a function that takes the parsed
//! arguments and returns a `Result`; `run_command` owns the tokio
//! runtime and the `anyhow` boundary.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::catalog::Library;
use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::resolver::{self, MetadataProvider, OmdbClient, ResolveRequest, TmdbClient};
use crate::source::{LiveSource, SnapshotSource, SourceAdapter};
use crate::sync::{Orchestrator, SyncOptions, worker_count};

/// Kinosync CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Ingest the catalog and bring the local library up to date
    Sync {
        /// Live catalog API base URL
        #[arg(long, conflicts_with = "snapshot")]
        source_url: Option<String>,

        /// Snapshot blob URL (its .sha256 companion must sit next to it)
        #[arg(long)]
        snapshot: Option<String>,

        /// Library root, overriding the configured path
        #[arg(short, long)]
        library: Option<PathBuf>,

        /// Country to ingest (repeatable), overriding the configured list
        #[arg(short, long = "country")]
        countries: Vec<String>,

        /// Concurrent item workers (0 = auto-size from core count)
        #[arg(short, long)]
        workers: Option<u32>,

        /// Skip external identifier resolution
        #[arg(long)]
        skip_external_metadata: bool,
    },
    /// Resolve external identifiers for a single title
    Resolve {
        /// Title to resolve
        title: String,

        /// Release year
        #[arg(short, long)]
        year: Option<i32>,

        /// Alternate/original title to fall back to
        #[arg(long)]
        original_title: Option<String>,

        /// TMDB API key (or set TMDB_API_KEY env var)
        #[arg(long, env = "TMDB_API_KEY")]
        tmdb_key: Option<String>,

        /// OMDb API key (or set OMDB_API_KEY env var)
        #[arg(long, env = "OMDB_API_KEY")]
        omdb_key: Option<String>,
    },
    /// Print the effective configuration
    ShowConfig,
}

/// Execute the parsed command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Sync {
            source_url,
            snapshot,
            library,
            countries,
            workers,
            skip_external_metadata,
        } => {
            cmd_sync(
                &rt,
                source_url.as_deref(),
                snapshot.as_deref(),
                library.as_deref(),
                countries,
                *workers,
                *skip_external_metadata,
            )?;
            Ok(())
        }
        Commands::Resolve {
            title,
            year,
            original_title,
            tmdb_key,
            omdb_key,
        } => {
            cmd_resolve(
                &rt,
                title,
                *year,
                original_title.as_deref(),
                tmdb_key.as_deref(),
                omdb_key.as_deref(),
            )?;
            Ok(())
        }
        Commands::ShowConfig => {
            cmd_show_config()?;
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_sync(
    rt: &Runtime,
    source_url: Option<&str>,
    snapshot: Option<&str>,
    library_override: Option<&std::path::Path>,
    country_override: &[String],
    workers_override: Option<u32>,
    skip_external_metadata: bool,
) -> Result<()> {
    let config = config::load();

    let library_root = library_override
        .map(PathBuf::from)
        .or_else(|| config.library.path.clone())
        .ok_or_else(|| Error::config("no library path configured (use --library)"))?;

    let countries: Vec<String> = if country_override.is_empty() {
        config.sync.countries.clone()
    } else {
        country_override.to_vec()
    };

    let source: Box<dyn SourceAdapter> = match (snapshot, source_url) {
        (Some(url), _) => Box::new(SnapshotSource::new(url)),
        (None, Some(url)) => {
            if countries.is_empty() {
                return Err(Error::config(
                    "live ingestion needs at least one country (use --country)",
                ));
            }
            Box::new(LiveSource::new(url, countries))
        }
        (None, None) => {
            return Err(Error::config("either --source-url or --snapshot is required"));
        }
    };

    let records = rt.block_on(async {
        source
            .fetch(&mut |p| {
                if p.total_countries > 0 {
                    info!(
                        "[{}/{}] {}: {} items so far",
                        p.current_country, p.total_countries, p.country, p.current_items
                    );
                }
            })
            .await
    })?;

    let mut library = Library::new();
    for record in records {
        library.add(record.into_item());
    }
    info!("Catalog ingested: {} distinct items", library.len());

    let skip_external = skip_external_metadata || config.sync.skip_external_metadata;
    let provider = if skip_external {
        None
    } else {
        provider_from_config(&config)
    };
    if !skip_external && provider.is_none() {
        warn!("No provider API key configured, skipping external metadata");
    }

    let options = SyncOptions {
        workers: worker_count(workers_override.unwrap_or(config.sync.concurrency)),
        skip_external_metadata: skip_external,
        auto_clean: config.sync.auto_clean,
        poll_interval: std::time::Duration::from_secs(config.host.poll_interval_secs),
        idle_timeout: std::time::Duration::from_secs(config.host.idle_timeout_secs),
    };

    let mut orchestrator = Orchestrator::new(library_root, config.library.base_url.clone(), options);
    if let Some(provider) = provider {
        orchestrator = orchestrator.with_provider(provider);
    }

    let summary = rt.block_on(orchestrator.run(&library, Utc::now()))?;
    println!("Sync complete: {summary}");
    Ok(())
}

fn cmd_resolve(
    rt: &Runtime,
    title: &str,
    year: Option<i32>,
    original_title: Option<&str>,
    tmdb_key: Option<&str>,
    omdb_key: Option<&str>,
) -> Result<()> {
    let config = config::load();
    let provider = match (tmdb_key, omdb_key) {
        (Some(key), _) => Arc::new(TmdbClient::new(key)) as Arc<dyn MetadataProvider>,
        (None, Some(key)) => Arc::new(OmdbClient::new(key)) as Arc<dyn MetadataProvider>,
        (None, None) => provider_from_config(&config)
            .ok_or_else(|| Error::config("no provider API key given or configured"))?,
    };

    let request = ResolveRequest {
        title,
        original_title,
        year,
    };

    match rt.block_on(resolver::resolve(provider.as_ref(), &request))? {
        Some(resolution) => {
            println!("Resolved via {}", resolution.provider);
            if let Some(tmdb_id) = &resolution.tmdb_id {
                println!("  tmdb: {tmdb_id}");
            }
            if let Some(imdb_id) = &resolution.imdb_id {
                println!("  imdb: {imdb_id}");
            }
            if let Some(url) = &resolution.imdb_url {
                println!("  url:  {url}");
            }
        }
        None => println!("No match for {title:?}"),
    }
    Ok(())
}

fn cmd_show_config() -> Result<()> {
    if let Some(path) = config::config_path() {
        println!("# {}", path.display());
    }
    let config = config::load();
    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| Error::config(format!("cannot render config: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Pick a provider from configured credentials; TMDB wins when both keys
/// are present.
fn provider_from_config(config: &Config) -> Option<Arc<dyn MetadataProvider>> {
    if let Some(key) = &config.providers.tmdb_api_key {
        return Some(Arc::new(TmdbClient::new(key)));
    }
    if let Some(key) = &config.providers.omdb_api_key {
        return Some(Arc::new(OmdbClient::new(key)));
    }
    None
}
