#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! JSON persistence for the imhonet rating archiver.
//!
//! Records are kept as a JSON array in a per-user, per-subject file.
//! New records are appended and flushed one by one while the crawl is
//! still running, and the array is always terminated with a harmless
//! empty-object sentinel, so the file stays parseable no matter where
//! a crawl stops.

pub mod backup;

pub use backup::backup;

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use imho_rates_models::{RateBook, RatedItem, Subject};
use imho_rates_scraper::RateSource;
use imho_rates_scraper::progress::ProgressCallback;

/// Errors that can occur during persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Canonical rates filename for a user and subject.
#[must_use]
pub fn output_filename(user_id: &str, subject: Subject) -> String {
    format!("imho_rates_{subject}_{user_id}.json")
}

/// Loads previously collected records from `path`.
///
/// A missing file yields an empty collection; a file that fails to read
/// or parse is logged and likewise treated as empty, so the caller
/// proceeds as if no prior data existed. Null entries and the
/// empty-object sentinel are skipped.
#[must_use]
pub fn load(path: &Path) -> RateBook {
    if !path.exists() {
        return RateBook::new();
    }

    log::info!("Loading previously collected rates from {}", path.display());

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            log::error!("Failed reading {}: {e}", path.display());
            return RateBook::new();
        }
    };

    match parse_records(&text) {
        Ok(book) => book,
        Err(e) => {
            log::error!("Failed parsing {}: {e}", path.display());
            RateBook::new()
        }
    }
}

fn parse_records(text: &str) -> Result<RateBook, StoreError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(text)?;

    let mut book = RateBook::new();
    for entry in entries {
        if entry.is_null() || entry.as_object().is_some_and(serde_json::Map::is_empty) {
            continue;
        }
        book.insert(serde_json::from_value(entry)?);
    }
    Ok(book)
}

/// Collects `source` into the file at `path`, merged with `existing`.
///
/// Returns the number of newly written records. See [`dump_to`] for the
/// write semantics.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be created or finalized;
/// failures inside the write loop are absorbed instead.
pub async fn dump<S: RateSource>(
    path: &Path,
    existing: &RateBook,
    source: &mut S,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<u64, StoreError> {
    log::info!("Collecting rates into {}", path.display());
    let mut file = File::create(path)?;
    dump_to(&mut file, existing, source, progress).await
}

/// Writes the merged record document to `out`.
///
/// Existing records are written first, in their stored order; records
/// pulled from `source` follow as they arrive, each flushed before the
/// next pull so partial progress survives interruption. Items whose
/// `details_url` is already in `existing` are skipped. A failure inside
/// the write loop is logged and swallowed, and the closing sentinel is
/// still appended so the document remains a syntactically valid JSON
/// array.
///
/// # Errors
///
/// Returns [`StoreError`] if the opening bracket or the closing
/// sentinel cannot be written.
pub async fn dump_to<W: Write, S: RateSource>(
    out: &mut W,
    existing: &RateBook,
    source: &mut S,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<u64, StoreError> {
    out.write_all(b"[")?;

    let mut written = 0u64;
    if let Err(e) = write_records(out, existing, source, progress, &mut written).await {
        log::error!("Collection interrupted: {e:?}");
    }

    out.write_all(b"{}]")?;
    out.flush()?;

    Ok(written)
}

async fn write_records<W: Write, S: RateSource>(
    out: &mut W,
    existing: &RateBook,
    source: &mut S,
    progress: &Arc<dyn ProgressCallback>,
    written: &mut u64,
) -> Result<(), StoreError> {
    for item in existing {
        write_record(out, item)?;
    }

    while let Some(item) = source.next_rate().await {
        if existing.contains(&item.details_url) {
            log::debug!("Already stored, skipping {}", item.details_url);
            continue;
        }
        progress.set_message(item.title_ru.clone());
        write_record(out, &item)?;
        progress.inc(1);
        *written += 1;
    }

    Ok(())
}

/// Serializes one record followed by the element separator, then
/// flushes. The record is rendered to a string first so a failed write
/// never leaves a half-serialized element behind.
fn write_record<W: Write>(out: &mut W, item: &RatedItem) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(item)?;
    out.write_all(json.as_bytes())?;
    out.write_all(b",")?;
    out.flush()?;
    Ok(())
}
