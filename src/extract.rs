//! Excuse extraction from raw page markup.
//!
//! One fixed pattern, isolated here so a markup change on the source
//! site means editing this module and nothing else. The orchestration
//! layer only ever sees `Option<Quote>`.

use anyhow::{Context, Result};
use regex::Regex;

use crate::types::Quote;

/// The anchor carrying the excuse on the source page. Capture group 1 is
/// the excuse text. Configuration-equivalent: update this when the site's
/// markup changes.
///
/// Non-greedy capture, so several anchors on one line cannot swallow the
/// markup between them.
const EXCUSE_PATTERN: &str =
    r##"<a href="/" rel="nofollow" style="text-decoration: none; color: #333;">(.+?)</a>"##;

/// Compiled extraction pattern.
pub struct Extractor {
    pattern: Regex,
}

impl Extractor {
    /// Compile the pattern once.
    ///
    /// A compile failure is a build defect in [`EXCUSE_PATTERN`], not a
    /// runtime condition — callers propagate it out of startup.
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(EXCUSE_PATTERN)
            .context("Failed to compile excuse extraction pattern")?;
        Ok(Self { pattern })
    }

    /// Return the first matching excuse in document order, or `None`.
    ///
    /// Absence of a match is a normal outcome. Pure: same input, same
    /// answer, every time.
    pub fn extract(&self, html: &str) -> Option<Quote> {
        self.pattern
            .captures_iter(html)
            .next()
            .map(|caps| Quote::new(&caps[1]))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
