//! Streaming batch API: emit a [`FileReport`] as each file finishes.
//!
//! Unlike the eager [`crate::convert::convert_dir`], which returns only
//! after the whole tree is done, [`convert_stream`] hands back a `Stream`
//! that converts lazily as it is polled. Files are still processed one at a
//! time and in discovery order.

use crate::config::BatchConfig;
use crate::convert::{plan_blocking, Converter};
use crate::error::UdfError;
use crate::output::FileReport;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-file reports.
pub type ReportStream = Pin<Box<dyn Stream<Item = FileReport> + Send>>;

/// Discover legacy files under `root` and convert them as the stream is polled.
///
/// Batch-level progress events (`on_batch_start`, `on_batch_complete`) are
/// not fired; per-file events are.
///
/// # Returns
/// - `Ok(ReportStream)` — one `FileReport` per discovered file
/// - `Err(UdfError)` — the root is missing, not a directory, or unreadable
///
/// # Example
/// ```rust,no_run
/// use futures::StreamExt;
/// use udf2docx::{convert_stream, BatchConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut reports = convert_stream("./archive", &BatchConfig::default()).await?;
/// while let Some(r) = reports.next().await {
///     println!("{} -> {}", r.input.display(), r.outcome.reason);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn convert_stream(
    root: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<ReportStream, UdfError> {
    let root = root.as_ref();
    info!("Starting streaming batch: {}", root.display());

    let planned = plan_blocking(root, config).await?;
    let total = planned.len();
    let converter = Arc::new(Converter::new(config.clone()));

    let s = stream::iter(planned.into_iter().enumerate()).then(move |(i, file)| {
        let converter = Arc::clone(&converter);
        async move { converter.process(i + 1, total, file).await }
    });

    Ok(Box::pin(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Reason;

    #[tokio::test]
    async fn streams_in_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.udf"), "second").unwrap();
        std::fs::write(dir.path().join("a.udf"), "first").unwrap();
        let config = BatchConfig::builder().dry_run(true).build().unwrap();

        let reports: Vec<FileReport> = convert_stream(dir.path(), &config)
            .await
            .unwrap()
            .collect()
            .await;

        let names: Vec<_> = reports
            .iter()
            .map(|r| r.input.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.udf", "b.udf"]);
        assert!(reports.iter().all(|r| r.outcome.reason == Reason::DryRun));
    }

    #[tokio::test]
    async fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert_stream(dir.path().join("missing"), &BatchConfig::default()).await;
        assert!(matches!(result, Err(UdfError::RootNotFound { .. })));
    }
}
