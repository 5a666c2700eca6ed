//! Quote store — the refresh-cycle orchestrator.
//!
//! Owns the cached last-known quote and the in-flight guard, drives the
//! fetch→extract→persist pipeline (one `refresh()` per timer tick), and
//! exposes the current value to the presentation layer through a watch
//! channel: `current_quote()` to pull, `subscribe()` to be pushed.
//!
//! Two states, Idle and Refreshing, encoded in one atomic flag. A tick
//! that lands while a cycle is running is dropped, not queued. Failed
//! cycles never touch the cache — it only ever advances on success.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::extract::Extractor;
use crate::source::ExcuseSource;
use crate::storage;
use crate::types::{PersistedQuote, Quote, RefreshOutcome, StoreStats};

pub struct QuoteStore {
    source: Arc<dyn ExcuseSource>,
    extractor: Extractor,
    /// State file override; `None` means the storage module's default.
    state_file: Option<String>,
    /// Single-writer cache: the refresh cycle replaces the value, any
    /// number of readers observe it.
    current: watch::Sender<Option<Quote>>,
    /// Idle (false) / Refreshing (true).
    in_flight: AtomicBool,
    stats: RwLock<StoreStats>,
}

impl QuoteStore {
    pub fn new(
        source: Arc<dyn ExcuseSource>,
        extractor: Extractor,
        state_file: Option<String>,
    ) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            source,
            extractor,
            state_file,
            current,
            in_flight: AtomicBool::new(false),
            stats: RwLock::new(StoreStats::default()),
        }
    }

    /// Restore the last quote written by a previous run, if any.
    ///
    /// Called once at startup, before any network activity. Not a cycle:
    /// no fetch, no extraction, no counter bumps. A missing file is a
    /// fresh start; a corrupt one is logged and treated the same —
    /// startup never dies on a bad state file.
    pub fn seed_from_disk(&self) {
        match storage::load_state(self.state_file.as_deref()) {
            Ok(Some(persisted)) => {
                self.stats_mut().last_updated = Some(persisted.fetched_at);
                self.current.send_replace(Some(Quote::new(persisted.text)));
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Could not restore saved quote, starting fresh");
            }
        }
    }

    /// Run one fetch→extract→persist cycle, unless one is already running.
    ///
    /// Always returns the store to Idle before returning, success or not.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Refresh already in flight, dropping tick");
            self.stats_mut().skipped_in_flight += 1;
            return RefreshOutcome::SkippedInFlight;
        }

        let outcome = self.run_cycle().await;
        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_cycle(&self) -> RefreshOutcome {
        self.stats_mut().cycles_started += 1;

        let page = match self.source.fetch_page().await {
            Ok(page) => page,
            Err(e) => {
                warn!(source = self.source.name(), error = %e, "Fetch failed, keeping last quote");
                self.stats_mut().fetch_failures += 1;
                return RefreshOutcome::FetchFailed(e);
            }
        };

        let quote = match self.extractor.extract(&page) {
            Some(quote) => quote,
            None => {
                debug!(source = self.source.name(), "No excuse found in page");
                self.stats_mut().no_match_cycles += 1;
                return RefreshOutcome::NoMatch;
            }
        };

        let fetched_at = Utc::now();
        self.current.send_replace(Some(quote.clone()));
        {
            let mut stats = self.stats_mut();
            stats.quotes_updated += 1;
            stats.last_updated = Some(fetched_at);
        }

        // Persisted after the cache update; a write failure costs only
        // the restart seed, not the current value.
        let persisted = PersistedQuote::new(&quote, fetched_at);
        if let Err(e) = storage::save_state(&persisted, self.state_file.as_deref()) {
            warn!(error = %e, "Failed to persist quote");
        }

        info!(quote = %quote, "Quote updated");
        RefreshOutcome::Updated(quote)
    }

    /// The cached quote, immediately and without blocking.
    ///
    /// `None` until the first successful cycle (or disk seed); the
    /// presentation layer renders that as a placeholder.
    pub fn current_quote(&self) -> Option<Quote> {
        self.current.borrow().clone()
    }

    /// Receiver that observes every successful replacement — the
    /// "on updated" half of the presentation interface.
    pub fn subscribe(&self) -> watch::Receiver<Option<Quote>> {
        self.current.subscribe()
    }

    /// Timestamp of the most recent successful update (or of the seeded
    /// quote after a restart).
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.stats().last_updated
    }

    /// Snapshot of the daemon counters.
    pub fn stats(&self) -> StoreStats {
        self.stats_read().clone()
    }

    // Poisoning can only happen if a holder panicked; the counters are
    // still usable, so recover the guard instead of propagating.
    fn stats_read(&self) -> RwLockReadGuard<'_, StoreStats> {
        self.stats.read().unwrap_or_else(|e| e.into_inner())
    }

    fn stats_mut(&self) -> RwLockWriteGuard<'_, StoreStats> {
        self.stats.write().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
