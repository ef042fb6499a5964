//! Progress reporting trait for the crawl.
//!
//! Decouples progress reporting from any specific rendering backend
//! (an `indicatif` bar, log-only reporting, or silence). The crawl's
//! total is never known up front, so reporting is delta-based.

use std::sync::Arc;

/// Trait for reporting crawl progress.
///
/// Implementations must be `Send + Sync` to support `Arc`-based
/// sharing.
pub trait ProgressCallback: Send + Sync {
    /// Advance progress by `delta` records.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);

    /// Mark progress as complete and remove the progress indicator.
    fn finish_and_clear(&self);
}

/// A no-op implementation of [`ProgressCallback`] that silently ignores
/// all progress updates.
///
/// Useful for `--html_only` runs and tests that do not need visual
/// progress reporting.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// Returns a shared [`NullProgress`] instance for convenient use.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
