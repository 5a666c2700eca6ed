//! Excuse page sources.
//!
//! Defines the `ExcuseSource` trait and the production implementation
//! for developerexcuses.com. The trait seam exists so the refresh loop
//! can be tested against deterministic in-memory sources.

pub mod devexcuses;

use async_trait::async_trait;

use crate::types::FetchError;

pub use self::devexcuses::DevExcuses;

/// Abstraction over the page the excuse is scraped from.
///
/// One read operation, no state worth speaking of. Implementors must be
/// `Send + Sync` because the refresh task runs off the presentation path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExcuseSource: Send + Sync {
    /// Fetch the raw page body as UTF-8 text.
    ///
    /// All failure conditions — transport, non-2xx status, decoding —
    /// collapse into the single [`FetchError`] kind.
    async fn fetch_page(&self) -> Result<String, FetchError>;

    /// Source name for logging and identification.
    fn name(&self) -> &str;
}
