#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Catalogue scraping pipeline for the imhonet rating archiver.
//!
//! Fetches a user's paginated rating listing, extracts the embedded
//! application-state payload from each page ([`app_state`], [`listing`]),
//! enriches every rated item through its detail page ([`detail`]), and
//! exposes the whole crawl as a lazy pull-based stream of records
//! ([`rates::RateStream`] via the [`RateSource`] trait).
//!
//! Every fetch is awaited before the next one starts; pages are visited
//! in increasing order and items within a page in listing order, so the
//! crawl is strictly sequential and deterministic.

pub mod app_state;
pub mod detail;
pub mod listing;
pub mod progress;
pub mod rates;

use imho_rates_models::RatedItem;

/// Errors that can occur during scraping operations.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// An HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Parsing the response body failed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An embedded JSON payload was malformed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Issues a single HTTP GET for `url` and returns the response body.
///
/// `accept` overrides the `Accept` header; listing pages only hand out
/// their embedded payload when asked for `application/json`.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] on transport failure or a non-success
/// status. Callers decide whether that stops pagination or drops a
/// single item.
pub async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    accept: Option<&str>,
) -> Result<String, ScrapeError> {
    let mut request = client.get(url);
    if let Some(accept) = accept {
        request = request.header(reqwest::header::ACCEPT, accept);
    }
    let response = request.send().await?.error_for_status()?;
    Ok(response.text().await?)
}

/// A pull-based source of enriched rated items.
///
/// Implementations fetch and enrich on demand: the caller pulls one
/// fully populated record at a time, and nothing further happens until
/// the next pull. Exhaustion is final; a source cannot be restarted.
pub trait RateSource {
    /// Pulls the next item, or `None` once the source is exhausted.
    fn next_rate(&mut self) -> impl std::future::Future<Output = Option<RatedItem>> + Send;
}
