//! Listing-page parser.
//!
//! A listing page's app-state payload carries one page of the user's
//! rated items under `data.content.user_rates.content_rated`.

use serde::Deserialize;

use crate::ScrapeError;
use crate::app_state::extract_app_state;

/// One rated-item summary as embedded in a listing page.
#[derive(Debug, Clone, Deserialize)]
pub struct RateSummary {
    /// Title as listed. May carry a trailing `(year)` suffix.
    pub title: String,
    /// Detail-page URL. Unique key of the final record.
    pub url: String,
    /// Release year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Rating on the source-native 1-10 scale.
    pub rate: u8,
    /// Production countries (films).
    #[serde(default)]
    pub countries: Vec<String>,
}

/// Extracts the rated-item summaries from one listing page, in listing
/// order.
///
/// An empty list means the payload carries no rated content — the
/// paginator treats that as the end of the listing.
///
/// # Errors
///
/// Returns [`ScrapeError`] when the app-state marker is absent or the
/// payload is malformed; pagination stops there.
pub fn parse_listing(html: &str) -> Result<Vec<RateSummary>, ScrapeError> {
    let state = extract_app_state(html)?;

    let Some(rated) = state.pointer("/data/content/user_rates/content_rated") else {
        return Ok(Vec::new());
    };

    Ok(serde_json::from_value(rated.clone())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_page(payload: &str) -> String {
        format!("<html><script id=\"appState\">window.__app_state__ = {payload};</script></html>")
    }

    fn rated(items: &str) -> String {
        listing_page(&format!(
            "{{\"data\": {{\"content\": {{\"user_rates\": {{\"content_rated\": [{items}]}}}}}}}}"
        ))
    }

    #[test]
    fn parses_items_in_listing_order() {
        let html = rated(
            "{\"title\": \"Сталкер (1979)\", \"url\": \"http://imhonet.ru/f/1\", \
             \"year\": 1979, \"rate\": 10, \"countries\": [\"СССР\"]},\
             {\"title\": \"Солярис\", \"url\": \"http://imhonet.ru/f/2\", \
             \"year\": 1972, \"rate\": 9, \"countries\": []}",
        );
        let summaries = parse_listing(&html).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].title, "Сталкер (1979)");
        assert_eq!(summaries[0].rate, 10);
        assert_eq!(summaries[0].countries, ["СССР"]);
        assert_eq!(summaries[1].url, "http://imhonet.ru/f/2");
    }

    #[test]
    fn missing_countries_and_year_default() {
        let html = rated("{\"title\": \"Дюна\", \"url\": \"http://imhonet.ru/b/1\", \"rate\": 7}");
        let summaries = parse_listing(&html).unwrap();
        assert_eq!(summaries[0].year, None);
        assert!(summaries[0].countries.is_empty());
    }

    #[test]
    fn absent_content_structure_yields_empty() {
        let html = listing_page("{\"data\": {}}");
        assert!(parse_listing(&html).unwrap().is_empty());
    }

    #[test]
    fn zero_items_yield_empty() {
        assert!(parse_listing(&rated("")).unwrap().is_empty());
    }

    #[test]
    fn missing_marker_propagates_as_parse_failure() {
        let err = parse_listing("<html><body>plain page</body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::Parse(_)));
    }
}
