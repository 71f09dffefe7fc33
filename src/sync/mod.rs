//! Sync orchestration
//!
//! Drives one full pass: take the currently playable items, fan them out
//! across a bounded worker pool, bring each item's on-disk entry up to
//! date (descriptor, playback pointer, artwork), remove entries for
//! items that fell out of the catalog, then hand the library over to the
//! host indexer. A single-flight gate refuses overlapping runs.

pub mod artwork;
pub mod gate;
pub mod workers;

pub use gate::SyncState;
pub use workers::worker_count;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{CatalogItem, Library};
use crate::descriptor::{self, Descriptor, DescriptorError, sanitized_dir_name};
use crate::host::{HostError, HostIndex, IdleWait, wait_for_idle};
use crate::resolver::{MetadataProvider, ResolutionResult, ResolveRequest, ResolverError, resolve};

/// Orchestration errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("a sync is already running")]
    AlreadyRunning,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error("artwork download {0} failed: {1}")]
    Artwork(String, String),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// What happened to one item during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Created,
    Updated,
    Unchanged,
    Failed,
}

/// Batch-level result of a pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub removed_stale: usize,
}

impl SyncSummary {
    fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Created => self.created += 1,
            ItemOutcome::Updated => self.updated += 1,
            ItemOutcome::Unchanged => self.unchanged += 1,
            ItemOutcome::Failed => self.failed += 1,
        }
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} unchanged, {} failed, {} stale removed",
            self.created, self.updated, self.unchanged, self.failed, self.removed_stale
        )
    }
}

/// Tunables for a pass; worker count is already resolved to a concrete
/// number (see [`worker_count`]).
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub workers: usize,
    pub skip_external_metadata: bool,
    pub auto_clean: bool,
    pub poll_interval: Duration,
    pub idle_timeout: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            workers: 5,
            skip_external_metadata: false,
            auto_clean: false,
            poll_interval: Duration::from_secs(1),
            idle_timeout: Duration::from_secs(300),
        }
    }
}

/// Runs sync passes over a library directory.
pub struct Orchestrator {
    library_root: PathBuf,
    base_url: String,
    options: SyncOptions,
    state: SyncState,
    provider: Option<Arc<dyn MetadataProvider>>,
    host: Option<Arc<dyn HostIndex>>,
    http_client: reqwest::Client,
}

impl Orchestrator {
    pub fn new(library_root: PathBuf, base_url: String, options: SyncOptions) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            library_root,
            base_url,
            options,
            state: SyncState::new(),
            provider: None,
            host: None,
            http_client,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_host(mut self, host: Arc<dyn HostIndex>) -> Self {
        self.host = Some(host);
        self
    }

    /// Run one full pass. Refuses to overlap with an in-flight run; the
    /// refused call performs no work at all.
    pub async fn run(
        &self,
        library: &Library,
        now: DateTime<Utc>,
    ) -> Result<SyncSummary, SyncError> {
        let _guard = self.state.try_acquire().ok_or(SyncError::AlreadyRunning)?;

        std::fs::create_dir_all(&self.library_root)?;

        let items = library.valid_items(now);
        tracing::info!(
            total = library.len(),
            playable = items.len(),
            workers = self.options.workers,
            "starting sync pass"
        );

        let mut summary = SyncSummary::default();
        let mut tasks = futures::stream::iter(items.iter().copied().map(|item| async move {
            let outcome = match self.process_item(item).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(id = %item.id, title = %item.title, "item failed: {e}");
                    ItemOutcome::Failed
                }
            };
            (item, outcome)
        }))
        .buffer_unordered(self.options.workers.max(1));

        let mut done = 0usize;
        while let Some((item, outcome)) = tasks.next().await {
            done += 1;
            tracing::debug!(
                done,
                total = items.len(),
                title = %item.title,
                ?outcome,
                "item processed"
            );
            summary.record(outcome);
        }
        drop(tasks);

        summary.removed_stale = self.remove_stale(&items);

        // The summary is the user-visible result; a broken host handshake
        // must not discard it after the items already completed.
        if let Some(host) = &self.host
            && let Err(e) = self.refresh_host_index(host.as_ref()).await
        {
            tracing::warn!("host index refresh failed: {e}");
        }

        tracing::info!("sync pass finished: {summary}");
        Ok(summary)
    }

    /// Bring one item's on-disk entry up to date.
    async fn process_item(&self, item: &CatalogItem) -> Result<ItemOutcome, SyncError> {
        let name = sanitized_dir_name(&item.title, item.year);
        let dir = self.library_root.join(&name);

        let descriptor_path = dir.join(format!("{name}.json"));
        let existing = descriptor::load(&descriptor_path)?;

        if !descriptor::needs_rewrite(existing.as_ref(), item) {
            return Ok(ItemOutcome::Unchanged);
        }

        let resolution = self.resolve_item(item).await?;

        std::fs::create_dir_all(&dir)?;

        // The descriptor is the marker needs_rewrite trusts, so it goes
        // last: a failure in any earlier step leaves no descriptor (or an
        // outdated one) and the item is retried on the next pass instead
        // of being frozen half-built.
        if let Some(url) = &item.artwork_url {
            artwork::download_if_missing(&self.http_client, url, &dir.join("poster.jpg")).await?;
        }
        descriptor::write_pointer(
            &dir.join(format!("{name}.strm")),
            &self.base_url,
            &item.id,
        )?;
        descriptor::write(&descriptor_path, &Descriptor::from_item(item, resolution.as_ref()))?;

        Ok(match existing {
            None => ItemOutcome::Created,
            Some(_) => ItemOutcome::Updated,
        })
    }

    async fn resolve_item(
        &self,
        item: &CatalogItem,
    ) -> Result<Option<ResolutionResult>, ResolverError> {
        if self.options.skip_external_metadata {
            return Ok(None);
        }
        let Some(provider) = &self.provider else {
            return Ok(None);
        };

        let request = ResolveRequest {
            title: &item.title,
            original_title: item.original_title.as_deref(),
            year: item.year,
        };
        resolve(provider.as_ref(), &request).await
    }

    /// Delete library directories that no longer correspond to a
    /// playable item. Individual deletion failures are logged and
    /// skipped; the pass keeps going.
    fn remove_stale(&self, items: &[&CatalogItem]) -> usize {
        let expected: HashSet<String> = items
            .iter()
            .map(|item| sanitized_dir_name(&item.title, item.year))
            .collect();

        let entries = match std::fs::read_dir(&self.library_root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("cannot list library root for reconciliation: {e}");
                return 0;
            }
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            if !entry.path().is_dir() {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().to_string();
            if expected.contains(&dir_name) {
                continue;
            }
            match std::fs::remove_dir_all(entry.path()) {
                Ok(()) => {
                    tracing::info!("removed stale entry {dir_name}");
                    removed += 1;
                }
                Err(e) => tracing::warn!("failed to remove stale entry {dir_name}: {e}"),
            }
        }
        removed
    }

    /// Hand the updated library to the host indexer: wait for it to go
    /// idle, then clean (when enabled) and scan.
    async fn refresh_host_index(&self, host: &dyn HostIndex) -> Result<(), SyncError> {
        match wait_for_idle(host, self.options.poll_interval, self.options.idle_timeout).await? {
            IdleWait::Idle => {}
            IdleWait::Aborted => {
                tracing::info!("host is shutting down, skipping index refresh");
                return Ok(());
            }
            IdleWait::TimedOut => {
                tracing::warn!("timed out waiting for idle host, refreshing anyway");
            }
        }

        if self.options.auto_clean {
            host.request_clean().await?;
        }
        host.request_scan().await?;
        Ok(())
    }
}
