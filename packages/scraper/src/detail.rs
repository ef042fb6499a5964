//! Detail-page enrichment.
//!
//! Fetches an item's detail page and fills in the subject-specific
//! metadata the listing omits: the original-language title, and for
//! books the author. Missing metadata is recorded as absent, never as
//! an error; only the detail fetch itself can fail.

use imho_rates_models::{RatedItem, Subject};
use scraper::Html;

use crate::app_state::{extract_app_state, parse_selector};
use crate::listing::RateSummary;
use crate::{ScrapeError, fetch_text};

/// CSS selector for the original-language title block on a book page.
const BOOK_TITLE_ORIG_SELECTOR: &str = "div.m-elementprimary-language";

/// CSS selector for the author link on a book page.
const BOOK_AUTHOR_SELECTOR: &str = "div.m_row.is-actors a.m_value";

/// Fetches `summary`'s detail page and builds the full record.
///
/// # Errors
///
/// Returns [`ScrapeError`] only when the detail fetch fails; the caller
/// drops the item and pagination continues.
pub async fn enrich(
    client: &reqwest::Client,
    subject: Subject,
    summary: RateSummary,
) -> Result<RatedItem, ScrapeError> {
    log::info!("Processing \"{}\"", summary.title);

    let body = fetch_text(client, &summary.url, None).await?;

    let (title_orig, author) = match subject {
        Subject::Films => (film_title_orig(&body), None),
        Subject::Books => book_fields(&body),
        Subject::Games | Subject::Serials => (None, None),
    };

    log::debug!("Original title: {title_orig:?}");
    log::debug!("Year: {:?}", summary.year);

    let country = (subject == Subject::Films).then(|| summary.countries.join(","));

    Ok(RatedItem {
        title_ru: strip_year_suffix(&summary.title, summary.year),
        title_orig,
        rating: summary.rate,
        year: summary.year,
        details_url: summary.url,
        country,
        author,
    })
}

/// Original-language title from a film detail page's app-state payload.
fn film_title_orig(body: &str) -> Option<String> {
    let state = match extract_app_state(body) {
        Ok(state) => state,
        Err(e) => {
            log::debug!("No app-state payload on detail page: {e}");
            return None;
        }
    };

    match state
        .pointer("/data/content/content/title_original")
        .and_then(serde_json::Value::as_str)
    {
        Some(title) if !title.is_empty() => Some(title.to_owned()),
        _ => {
            log::debug!("No original-language title declared");
            None
        }
    }
}

/// Original-language title and author from a book detail page's markup.
fn book_fields(body: &str) -> (Option<String>, Option<String>) {
    let document = Html::parse_document(body);

    let title_orig = select_text(&document, BOOK_TITLE_ORIG_SELECTOR);
    if title_orig.is_none() {
        log::debug!("No original-language title declared");
    }

    let author = select_text(&document, BOOK_AUTHOR_SELECTOR);
    if author.is_none() {
        log::info!("No author found");
    }

    (title_orig, author)
}

/// Trimmed text of the first element matching `selector`, if any.
fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = parse_selector(selector).ok()?;
    let element = document.select(&selector).next()?;
    let text: String = element.text().collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

/// Removes a trailing `(year)` suffix from a listing title.
fn strip_year_suffix(title: &str, year: Option<i32>) -> String {
    year.map_or_else(
        || title.trim().to_owned(),
        |year| title.replace(&format!("({year})"), "").trim().to_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_year_suffix_matching_item_year() {
        assert_eq!(strip_year_suffix("Сталкер (1979)", Some(1979)), "Сталкер");
    }

    #[test]
    fn keeps_year_suffix_of_a_different_year() {
        assert_eq!(
            strip_year_suffix("Сталкер (1979)", Some(1980)),
            "Сталкер (1979)"
        );
    }

    #[test]
    fn no_year_leaves_title_untouched() {
        assert_eq!(strip_year_suffix(" Солярис ", None), "Солярис");
    }

    #[test]
    fn film_title_orig_reads_app_state() {
        let html = "<html><script id=\"appState\">window.__app_state__ = \
                    {\"data\": {\"content\": {\"content\": \
                    {\"title_original\": \"Stalker\"}}}};</script></html>";
        assert_eq!(film_title_orig(html), Some("Stalker".to_owned()));
    }

    #[test]
    fn film_title_orig_absent_field_is_none() {
        let html = "<html><script id=\"appState\">window.__app_state__ = \
                    {\"data\": {\"content\": {\"content\": {}}}};</script></html>";
        assert_eq!(film_title_orig(html), None);
    }

    #[test]
    fn film_title_orig_without_app_state_is_none() {
        assert_eq!(film_title_orig("<html><body></body></html>"), None);
    }

    #[test]
    fn book_fields_read_markup_regions() {
        let html = "<html><body>\
                    <div class=\"m-elementprimary-language\">Dune</div>\
                    <div class=\"m_row is-actors\">\
                    <a class=\"m_value\">Frank Herbert</a></div>\
                    </body></html>";
        let document = Html::parse_document(html);
        assert_eq!(
            select_text(&document, BOOK_TITLE_ORIG_SELECTOR),
            Some("Dune".to_owned())
        );
        assert_eq!(
            select_text(&document, BOOK_AUTHOR_SELECTOR),
            Some("Frank Herbert".to_owned())
        );
    }

    #[test]
    fn book_fields_tolerate_missing_regions() {
        let (title_orig, author) = book_fields("<html><body></body></html>");
        assert_eq!(title_orig, None);
        assert_eq!(author, None);
    }
}
