//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive events
//! as the batch driver works through the discovered files.
//!
//! # Example
//!
//! ```rust
//! use udf2docx::{BatchConfig, BatchProgressCallback, FileReport};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct FailureCounter {
//!     failed: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for FailureCounter {
//!     fn on_file_complete(&self, _index: usize, _total: usize, report: &FileReport) {
//!         if !report.outcome.success {
//!             self.failed.fetch_add(1, Ordering::SeqCst);
//!         }
//!     }
//! }
//!
//! let counter = Arc::new(FailureCounter { failed: AtomicUsize::new(0) });
//!
//! let config = BatchConfig::builder()
//!     .progress_callback(counter as Arc<dyn BatchProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{BatchStats, FileReport};
use std::path::Path;
use std::sync::Arc;

/// Called by the batch driver as it processes each file.
///
/// Files are processed one at a time, but the trait is `Send + Sync` so
/// implementations can be shared with other threads (e.g. a UI thread).
/// All methods have default no-op implementations.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after discovery, before the first file.
    ///
    /// # Arguments
    /// * `total_files` — number of discovered candidates
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before the orchestrator runs for a file.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position in the batch
    /// * `total` — number of candidates
    /// * `input` — the legacy document
    fn on_file_start(&self, index: usize, total: usize, input: &Path) {
        let _ = (index, total, input);
    }

    /// Called after the orchestrator returns, whatever the outcome.
    fn on_file_complete(&self, index: usize, total: usize, report: &FileReport) {
        let _ = (index, total, report);
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, stats: &BatchStats) {
        let _ = stats;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{Outcome, Reason};
    use std::path::PathBuf;

    fn report(outcome: Outcome) -> FileReport {
        FileReport {
            input: PathBuf::from("a.udf"),
            output: PathBuf::from("a.docx"),
            outcome,
            duration_ms: 1,
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_file_start(1, 2, Path::new("a.udf"));
        cb.on_file_complete(1, 2, &report(Outcome::ok(Reason::Pandoc)));
        cb.on_batch_complete(&BatchStats::default());
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_file_start(1, 10, Path::new("x.UDF"));
    }
}
