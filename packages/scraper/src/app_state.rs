//! Embedded application-state payload extraction.
//!
//! Catalogue pages carry their data as a JSON object assigned to
//! `window.__app_state__` inside a `<script id="appState">` tag. Both
//! listing pages and film detail pages use this layout.

use scraper::{Html, Selector};

use crate::ScrapeError;

/// Marker prefixing the JSON payload inside the app-state script tag.
pub const APP_STATE_MARKER: &str = "window.__app_state__ = ";

/// CSS selector for the script tag carrying the payload.
const SCRIPT_SELECTOR: &str = "script#appState";

/// Extracts and parses the app-state JSON object from a page.
///
/// # Errors
///
/// Returns [`ScrapeError::Parse`] when the script tag or the marker is
/// absent, and [`ScrapeError::Json`] when the payload is malformed.
/// Partial extraction is never attempted.
pub fn extract_app_state(html: &str) -> Result<serde_json::Value, ScrapeError> {
    let document = Html::parse_document(html);
    let selector = parse_selector(SCRIPT_SELECTOR)?;

    let script = document.select(&selector).next().ok_or_else(|| {
        ScrapeError::Parse(format!(
            "no element matching '{SCRIPT_SELECTOR}' found in response"
        ))
    })?;

    let text: String = script.text().collect();
    let (_, payload) = text.split_once(APP_STATE_MARKER).ok_or_else(|| {
        ScrapeError::Parse(format!("app-state marker '{APP_STATE_MARKER}' not found"))
    })?;

    // The assignment ends with a `;` that is not part of the JSON.
    let payload = payload.trim_end().trim_end_matches(';');

    Ok(serde_json::from_str(payload)?)
}

/// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Parse(format!("invalid CSS selector '{selector}': {e}")))
}
