//! Fetch orchestration
//!
//! Drives one harvest pass: for each configured source, fetch raw listings,
//! normalize them, and insert the results into the store in normalizer
//! output order. Sources run either sequentially with a pacing pause between
//! them, or concurrently as a fan-out bounded by a worker cap, with a
//! fan-in barrier before the pass is considered done.

use crate::config::{SearchConfig, SourceId};
use crate::fetch::SourceFetcher;
use crate::harvest::pacing::Pacing;
use crate::normalize::Normalizer;
use crate::storage::ListingStore;
use crate::GleanerError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Upper bound on concurrent per-source workers
///
/// A tick still attempts every configured source; sources beyond the cap
/// wait for a free slot instead of getting their own thread of control.
pub const MAX_CONCURRENT_SOURCES: usize = 8;

/// Coordinates fetch, normalize, and store for the configured sources
///
/// Collaborators are injected at construction; the orchestrator holds no
/// other state and can be cloned cheaply into worker tasks.
#[derive(Clone)]
pub struct FetchOrchestrator {
    fetcher: Arc<dyn SourceFetcher>,
    normalizer: Arc<dyn Normalizer>,
    store: Arc<dyn ListingStore>,
    pacing: Pacing,
}

impl FetchOrchestrator {
    pub fn new(
        fetcher: Arc<dyn SourceFetcher>,
        normalizer: Arc<dyn Normalizer>,
        store: Arc<dyn ListingStore>,
        pacing: Pacing,
    ) -> Self {
        Self {
            fetcher,
            normalizer,
            store,
            pacing,
        }
    }

    /// Harvests one source: fetch, normalize, store
    ///
    /// Entries are inserted one at a time, in normalizer output order. Any
    /// collaborator failure propagates to the caller untouched; isolation
    /// across sources happens in [`run_all`](Self::run_all).
    ///
    /// # Returns
    ///
    /// The number of entries that were new to the store.
    pub async fn run_source(&self, source: &SourceId, pages: u32) -> Result<usize, GleanerError> {
        tracing::info!(source = %source, pages, "fetching latest listings");

        let records = self.fetcher.fetch(source, pages).await?;
        tracing::info!(source = %source, found = records.len(), "fetched raw listings");

        let entries = self.normalizer.normalize(records)?;

        let mut stored = 0;
        for entry in &entries {
            if self.store.insert_if_absent(entry)? {
                stored += 1;
            }
        }

        tracing::info!(
            source = %source,
            normalized = entries.len(),
            stored,
            "stored new listings"
        );

        Ok(stored)
    }

    /// Harvests every configured source once
    ///
    /// A failing source is logged and never stops the others; this call
    /// returns only when every source has been attempted.
    pub async fn run_all(&self, config: &SearchConfig) {
        if config.groups.is_empty() {
            tracing::warn!("no groups configured, nothing to fetch");
            return;
        }

        tracing::info!(
            groups = config.groups.len(),
            multithreaded = config.multithreaded,
            "fetching new listings from all sources"
        );

        if config.multithreaded {
            self.run_all_concurrent(config).await;
        } else {
            self.run_all_sequential(config).await;
        }
    }

    /// Visits sources in declared order, pausing between fetches
    async fn run_all_sequential(&self, config: &SearchConfig) {
        for source in &config.groups {
            if let Err(e) = self.run_source(source, config.pages).await {
                tracing::error!(source = %source, error = %e, "harvest failed for source");
            }
            self.pacing.pause().await;
        }
    }

    /// Fans out one worker per source and waits for all of them
    async fn run_all_concurrent(&self, config: &SearchConfig) {
        let slots = config.groups.len().min(MAX_CONCURRENT_SOURCES);
        let permits = Arc::new(Semaphore::new(slots));
        let mut workers = JoinSet::new();

        for source in config.groups.iter().cloned() {
            let orchestrator = self.clone();
            let permits = Arc::clone(&permits);
            let pages = config.pages;

            workers.spawn(async move {
                // The semaphore is never closed while workers hold it
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };

                if let Err(e) = orchestrator.run_source(&source, pages).await {
                    tracing::error!(source = %source, error = %e, "harvest failed for source");
                }
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "harvest worker panicked");
            }
        }
    }
}
