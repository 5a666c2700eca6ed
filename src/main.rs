//! devexcuses — background excuse fetcher.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! restores the last quote from disk (or starts fresh), and runs the
//! periodic fetch→extract→cache loop with graceful shutdown.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use devexcuses::config;
use devexcuses::extract::Extractor;
use devexcuses::server;
use devexcuses::server::routes::ServerState;
use devexcuses::source::DevExcuses;
use devexcuses::store::QuoteStore;

const BANNER: &str = r#"
  ┌──────────────────────────────────────────┐
  │  devexcuses — excuse-of-the-moment feed  │
  │  v0.1.0 — background fetch daemon        │
  └──────────────────────────────────────────┘
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML (built-in defaults when absent)
    let cfg = config::AppConfig::load_or_default("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        refresh_interval_secs = cfg.daemon.refresh_interval_secs,
        fetch_timeout_secs = cfg.daemon.fetch_timeout_secs,
        state_file = %cfg.storage.state_file,
        "devexcuses starting up"
    );

    // -- Initialise components -------------------------------------------

    let source = Arc::new(DevExcuses::new(Duration::from_secs(
        cfg.daemon.fetch_timeout_secs,
    ))?);

    // A pattern that does not compile is a build defect — fail here, not
    // once per cycle.
    let extractor = Extractor::new()?;

    let store = Arc::new(QuoteStore::new(
        source,
        extractor,
        Some(cfg.storage.state_file.clone()),
    ));

    // Restore the quote from a previous run before any network activity,
    // so a restart does not show the placeholder.
    store.seed_from_disk();

    if cfg.server.enabled {
        server::spawn_server(Arc::new(ServerState::new(store.clone())), cfg.server.port)?;
    }

    // -- Main loop -------------------------------------------------------

    let mut interval =
        tokio::time::interval(Duration::from_secs(cfg.daemon.refresh_interval_secs));
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_secs = cfg.daemon.refresh_interval_secs,
        "Entering refresh loop. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            // The first tick fires immediately, so a fetch happens right
            // at startup. Each tick runs on its own task: a slow fetch
            // never delays the loop, and the in-flight guard drops the
            // ticks that land while it runs.
            _ = interval.tick() => {
                let store = store.clone();
                tokio::spawn(async move {
                    let outcome = store.refresh().await;
                    debug!(%outcome, "Refresh tick complete");
                });
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    // A cycle still in flight is simply abandoned — the cache only ever
    // mutates on full success, so there is nothing to unwind.
    let stats = store.stats();
    info!(
        cycles = stats.cycles_started,
        updates = stats.quotes_updated,
        fetch_failures = stats.fetch_failures,
        "devexcuses shut down cleanly."
    );

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("devexcuses=info"));

    let json_logging = std::env::var("DEVEXCUSES_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
