//! Scrape error types.

use thiserror::Error;

use jhub_client::FetchError;

/// Why a scrape produced no user data.
///
/// Never returned to the scraper; `collect()` turns it into the
/// last-scrape-error gauge and an empty user set.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("hub fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to decode user listing: {0}")]
    Decode(#[from] serde_json::Error),
}
