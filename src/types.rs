//! Shared types for the devexcuses daemon.
//!
//! These types form the data model used across all modules: the quote
//! itself, the persisted form written to disk, the per-cycle outcome
//! report, and the daemon counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// A single excuse as displayed to the presentation layer.
///
/// Immutable once produced — the cache replaces it wholesale on a
/// successful cycle, it is never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
}

impl Quote {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

// ---------------------------------------------------------------------------
// Persisted state
// ---------------------------------------------------------------------------

/// The on-disk record of the last good quote.
///
/// Written on every successful cycle, read once at startup to seed the
/// cache so a restart does not show a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedQuote {
    pub text: String,
    /// When the quote was fetched, not when the file was written — the
    /// two coincide in practice but the fetch time is the meaningful one.
    pub fetched_at: DateTime<Utc>,
}

impl PersistedQuote {
    pub fn new(quote: &Quote, fetched_at: DateTime<Utc>) -> Self {
        Self {
            text: quote.text.clone(),
            fetched_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Refresh outcome
// ---------------------------------------------------------------------------

/// What a single refresh cycle did.
///
/// Every variant except `Updated` leaves the cached quote untouched.
/// Consumed by logging and the counters; never an error for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fetch and extraction succeeded; the cache now holds this quote.
    Updated(Quote),
    /// The page was fetched but contained no matching fragment.
    NoMatch,
    /// The fetch itself failed (transport, status, or decoding).
    FetchFailed(FetchError),
    /// Another cycle was already running; this tick did nothing.
    SkippedInFlight,
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshOutcome::Updated(q) => write!(f, "updated: {q}"),
            RefreshOutcome::NoMatch => write!(f, "no match in page"),
            RefreshOutcome::FetchFailed(e) => write!(f, "{e}"),
            RefreshOutcome::SkippedInFlight => write!(f, "skipped, refresh in flight"),
        }
    }
}

// ---------------------------------------------------------------------------
// Daemon counters
// ---------------------------------------------------------------------------

/// Monotonic counters for the refresh loop, exposed via `/api/status`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    pub cycles_started: u64,
    pub quotes_updated: u64,
    pub fetch_failures: u64,
    pub no_match_cycles: u64,
    pub skipped_in_flight: u64,
    /// Timestamp of the last successful update (or of the seeded quote
    /// after a restart, until the first live cycle succeeds).
    pub last_updated: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Any network, non-2xx status, or decoding failure while fetching the
/// source page.
///
/// Deliberately a single kind: the orchestrator's only reaction is "skip
/// this cycle and keep the last good value", so finer granularity would
/// buy nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fetch failed: {0}")]
pub struct FetchError(pub String);

impl FetchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_display_is_bare_text() {
        let q = Quote::new("My code works, your environment is broken");
        assert_eq!(format!("{q}"), "My code works, your environment is broken");
    }

    #[test]
    fn test_quote_equality_is_textual() {
        assert_eq!(Quote::new("same"), Quote::new("same"));
        assert_ne!(Quote::new("same"), Quote::new("different"));
    }

    #[test]
    fn test_persisted_quote_roundtrips_through_json() {
        let quote = Quote::new("It works on my machine");
        let persisted = PersistedQuote::new(&quote, Utc::now());

        let json = serde_json::to_string(&persisted).unwrap();
        let back: PersistedQuote = serde_json::from_str(&json).unwrap();

        assert_eq!(back, persisted);
    }

    #[test]
    fn test_fetch_error_display_carries_reason() {
        let e = FetchError::new("connection refused");
        assert_eq!(e.to_string(), "fetch failed: connection refused");
    }

    #[test]
    fn test_outcome_display() {
        let updated = RefreshOutcome::Updated(Quote::new("excuse"));
        assert!(format!("{updated}").contains("excuse"));

        let skipped = RefreshOutcome::SkippedInFlight;
        assert!(format!("{skipped}").contains("in flight"));

        let failed = RefreshOutcome::FetchFailed(FetchError::new("timeout"));
        assert!(format!("{failed}").contains("timeout"));
    }

    #[test]
    fn test_stats_default_is_zeroed() {
        let stats = StoreStats::default();
        assert_eq!(stats.cycles_started, 0);
        assert_eq!(stats.quotes_updated, 0);
        assert!(stats.last_updated.is_none());
    }
}
