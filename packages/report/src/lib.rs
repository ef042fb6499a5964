#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Static HTML report rendering for the imhonet rating archiver.
//!
//! Turns a persisted rates file into a self-contained HTML document:
//! inline styles, no external assets, one block per record with the
//! native and derived five-point ratings and outbound search links to
//! the subject's configured reference sites.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use imho_rates_models::{RateBook, RatedItem, Subject};

/// Errors that can occur while rendering a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Writing the report file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inline stylesheet for the report document.
const STYLE: &str = "\
        body {
            color: #333;
            font-family: Verdana, Arial, Helvetica, sans-serif;
        }
        h1, h6 {
            color: #999;
        }
        .rate_block {
            border-bottom: 1px solid #eee;
            padding: 0.4em;
            padding-bottom: 1.2em;
        }
        .rating {
            font-size: 1.5em;
        }
        .info, .description {
            display: inline-block;
            margin-left: 0.7em;
            vertical-align: middle;
        }
        .rating .current {
            color: #800;
        }
        .rating .total {
            font-size: 0.7em;
            color: #aaa;
        }
        .title_ru {
            font-size: 1.7em;
        }
        .title_orig {
            color: #aaa;
        }
        .links {
            padding-top: 0.5em;
            font-size: 0.8em;
        }
        .link {
            display: inline-block;
            margin-right: 0.5em;
        }";

/// Renders the persisted collection at `path` into a sibling `.html`
/// report, returning the report path.
///
/// # Errors
///
/// Returns [`ReportError`] if the report file cannot be written. An
/// unreadable rates file renders as an empty report instead.
pub fn render(path: &Path, subject: Subject) -> Result<PathBuf, ReportError> {
    let book = imho_rates_store::load(path);
    let target = path.with_extension("html");

    log::info!("Rendering HTML report to {}", target.display());
    std::fs::write(&target, render_document(subject, &book))?;

    Ok(target)
}

/// Derived five-point rating: the native ten-point score, halved and
/// rounded up.
#[must_use]
pub const fn five_point(rating: u8) -> u8 {
    rating.div_ceil(2)
}

/// Builds the full report document for `book`.
#[must_use]
pub fn render_document(subject: Subject, book: &RateBook) -> String {
    let mut rows = String::new();
    for item in book {
        rows.push_str(&render_record(subject, item));
    }

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
             <title>imhonet {subject} ratings</title>\n\
             <meta http-equiv=\"content-type\" content=\"text/html; charset=utf-8\" />\n\
             <style>\n{STYLE}\n    </style>\n\
         </head>\n\
         <body>\n\
             <h1>imhonet {subject} ratings</h1>\n\
             <h6>Total ratings: {count}</h6>\n\
             {rows}\n\
         </body>\n\
         </html>\n",
        count = book.len(),
    )
}

/// Builds one record block: year, ratings, titles, and search links.
fn render_record(subject: Subject, item: &RatedItem) -> String {
    let year = item.year.map(|y| y.to_string()).unwrap_or_default();
    let title_orig = item
        .title_orig
        .as_deref()
        .map(escape_html)
        .unwrap_or_default();

    let mut block = format!(
        "<div class=\"rate_block\">\n\
             <div class=\"info\">\n\
                 <div class=\"year\">{year}</div>\n\
                 <div class=\"rating\">\n\
                     <span class=\"current\">{rating}</span><span class=\"total\">/10</span>\n\
                     <span class=\"current\">{five}</span><span class=\"total\">/5</span>\n\
                 </div>\n\
             </div>\n\
             <div class=\"description\">\n\
                 <div class=\"titles\">\n\
                     <div class=\"title_ru\"><label>{title_ru}</label></div>\n\
                     <div class=\"title_orig\">{title_orig}</div>\n\
                 </div>\n",
        rating = item.rating,
        five = five_point(item.rating),
        title_ru = escape_html(&item.title_ru),
    );

    let links = render_links(subject, item);
    if !links.is_empty() {
        let _ = write!(block, "        <div class=\"links\">\n            Search:\n{links}        </div>\n");
    }

    block.push_str("    </div>\n</div>\n");
    block
}

/// Builds the outbound search links for one record: one link per
/// configured target per non-empty title variant, original title first.
fn render_links(subject: Subject, item: &RatedItem) -> String {
    let variants = [
        ("title_orig", item.title_orig.as_deref()),
        ("title_ru", Some(item.title_ru.as_str())),
    ];

    let mut links = String::new();
    for target in subject.targets() {
        for (variant, title) in variants {
            let Some(term) = title.filter(|t| !t.is_empty()) else {
                continue;
            };
            let _ = writeln!(
                links,
                "            <div class=\"link\"><a href=\"{href}\" target=\"_blank\">{label} ({variant})</a></div>",
                href = escape_html(&target.search_url(term)),
                label = escape_html(target.name()),
            );
        }
    }
    links
}

/// Minimal HTML escaping for text and attribute positions.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use imho_rates_models::RatedItem;

    use super::*;

    fn item(rating: u8) -> RatedItem {
        RatedItem {
            title_ru: "Мастер и Маргарита".to_owned(),
            title_orig: None,
            rating,
            year: Some(1967),
            details_url: "http://imhonet.ru/b/1".to_owned(),
            country: None,
            author: None,
        }
    }

    #[test]
    fn five_point_rounds_up() {
        assert_eq!(five_point(7), 4);
        assert_eq!(five_point(10), 5);
        assert_eq!(five_point(1), 1);
    }

    #[test]
    fn record_shows_native_and_derived_ratings() {
        let html = render_record(Subject::Books, &item(7));
        assert!(html.contains("<span class=\"current\">7</span><span class=\"total\">/10</span>"));
        assert!(html.contains("<span class=\"current\">4</span><span class=\"total\">/5</span>"));
    }

    #[test]
    fn both_title_variants_produce_one_link_each() {
        let mut book_item = item(8);
        book_item.title_orig = Some("The Master and Margarita".to_owned());
        let html = render_record(Subject::Books, &book_item);
        assert_eq!(html.matches("class=\"link\"").count(), 2);
        assert!(html.contains("Goodreads (title_orig)"));
        assert!(html.contains("Goodreads (title_ru)"));
        assert!(html.contains("q=The%20Master%20and%20Margarita"));
    }

    #[test]
    fn absent_original_title_yields_only_russian_link() {
        let html = render_record(Subject::Books, &item(8));
        assert_eq!(html.matches("class=\"link\"").count(), 1);
        assert!(html.contains("Goodreads (title_ru)"));
    }

    #[test]
    fn games_render_no_links_block() {
        let html = render_record(Subject::Games, &item(8));
        assert!(!html.contains("class=\"links\""));
        assert!(!html.contains("class=\"link\""));
    }

    #[test]
    fn document_shows_total_count() {
        let book: RateBook = vec![item(7)].into_iter().collect();
        let html = render_document(Subject::Books, &book);
        assert!(html.contains("Total ratings: 1"));
        assert!(html.contains("<style>"));
    }

    #[test]
    fn details_url_never_appears_in_output() {
        let book: RateBook = vec![item(7)].into_iter().collect();
        let html = render_document(Subject::Books, &book);
        assert!(!html.contains("imhonet.ru/b/1"));
    }

    #[test]
    fn titles_are_escaped() {
        let mut hostile = item(5);
        hostile.title_ru = "<script>alert(1)</script>".to_owned();
        let html = render_record(Subject::Games, &hostile);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn render_writes_html_next_to_rates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imho_rates_games_someuser.json");
        std::fs::write(&path, "[{}]").unwrap();

        let target = render(&path, Subject::Games).unwrap();

        assert_eq!(
            target.file_name().unwrap().to_str().unwrap(),
            "imho_rates_games_someuser.html"
        );
        let html = std::fs::read_to_string(&target).unwrap();
        assert!(html.contains("Total ratings: 0"));
    }
}
