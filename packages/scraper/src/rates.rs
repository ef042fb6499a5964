//! Paginated rate stream.
//!
//! Drives the listing endpoint page by page and enriches every summary
//! through its detail page, yielding one fully populated record at a
//! time. The stream is lazy and non-restartable: the next listing page
//! is only requested once every item of the current page has been
//! yielded, so interrupting the consumer never wastes fetches.

use std::collections::VecDeque;

use imho_rates_models::{RatedItem, Subject};

use crate::detail::enrich;
use crate::listing::{RateSummary, parse_listing};
use crate::{RateSource, fetch_text};

/// Hard cap on listing pages per crawl.
///
/// The remote signals the end of a listing with an empty page; the cap
/// bounds the crawl when it never does.
const MAX_PAGES: u32 = 1000;

/// Lazy stream of a user's rated items across all listing pages.
pub struct RateStream {
    client: reqwest::Client,
    user_id: String,
    subject: Subject,
    /// Next page to request (1-based).
    page: u32,
    /// Summaries from the current page not yet enriched.
    pending: VecDeque<RateSummary>,
    /// First detail URL of the previously fetched page; a page opening
    /// with the same URL is treated as the remote repeating itself.
    prev_first_url: Option<String>,
    exhausted: bool,
}

impl RateStream {
    /// Creates a stream over `user_id`'s ratings in `subject`.
    #[must_use]
    pub fn new(user_id: &str, subject: Subject) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_id: user_id.to_owned(),
            subject,
            page: 1,
            pending: VecDeque::new(),
            prev_first_url: None,
            exhausted: false,
        }
    }

    fn listing_url(&self, page: u32) -> String {
        format!(
            "http://user.imhonet.ru/web.php?path=content/{}/rates/&user_domain={}&domain=user&page={page}",
            self.subject, self.user_id
        )
    }

    /// Fetches and parses the next listing page into `pending`.
    ///
    /// Returns `false` when the listing is exhausted: a failed fetch, a
    /// parse failure, an empty page, a repeated page, or the page cap.
    async fn advance_page(&mut self) -> bool {
        if self.page > MAX_PAGES {
            log::warn!("Reached page cap ({MAX_PAGES}), stopping");
            return false;
        }

        let url = self.listing_url(self.page);
        log::info!("Processing listing page {url}");

        let body = match fetch_text(&self.client, &url, Some("application/json")).await {
            Ok(body) => body,
            Err(e) => {
                log::info!("Listing fetch failed, stopping: {e}");
                return false;
            }
        };

        let summaries = match parse_listing(&body) {
            Ok(summaries) => summaries,
            Err(e) => {
                log::error!("Listing parse failed, stopping: {e}");
                return false;
            }
        };

        if summaries.is_empty() {
            log::info!("Page {} carries no rated items, done", self.page);
            return false;
        }

        let first_url = summaries
            .first()
            .map(|summary| summary.url.clone())
            .unwrap_or_default();
        if self.prev_first_url.as_deref() == Some(first_url.as_str()) {
            log::warn!("Page {} repeats the previous page, stopping", self.page);
            return false;
        }
        self.prev_first_url = Some(first_url);

        log::debug!("Page {}: {} rated items", self.page, summaries.len());
        self.pending.extend(summaries);
        self.page += 1;
        true
    }
}

impl RateSource for RateStream {
    async fn next_rate(&mut self) -> Option<RatedItem> {
        loop {
            if self.exhausted {
                return None;
            }

            if let Some(summary) = self.pending.pop_front() {
                match enrich(&self.client, self.subject, summary).await {
                    Ok(item) => return Some(item),
                    Err(e) => {
                        // One unreachable detail page drops one item;
                        // the rest of the page and the listing go on.
                        log::warn!("Dropping item, detail fetch failed: {e}");
                        continue;
                    }
                }
            }

            if !self.advance_page().await {
                self.exhausted = true;
            }
        }
    }
}
