//! Conversion entry points: the per-file orchestrator and the batch driver.
//!
//! [`Converter`] owns the strategy chain and applies the overwrite and
//! dry-run policy before any strategy runs. [`convert_dir`] walks a tree,
//! drives a `Converter` over every discovered file one at a time, and
//! tallies the outcomes. A failed file is recorded and the batch continues;
//! only an invalid root is fatal.

use crate::config::BatchConfig;
use crate::error::UdfError;
use crate::output::{BatchReport, BatchStats, FileReport, Outcome, OutcomeKind, Reason};
use crate::pipeline::discover::{find_legacy_files, output_path_for, validate_root};
use crate::pipeline::strategy::{default_chain, run_chain, Chain};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A discovered input and the output it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Runs the strategy chain for single files under one configuration.
pub struct Converter {
    config: BatchConfig,
    chain: Chain,
}

impl Converter {
    /// A converter using the standard pandoc → LibreOffice → zip → text chain.
    pub fn new(config: BatchConfig) -> Self {
        let chain = default_chain(&config);
        Self { config, chain }
    }

    /// A converter using a caller-supplied chain, tried in the given order.
    pub fn with_chain(config: BatchConfig, chain: Chain) -> Result<Self, UdfError> {
        if chain.is_empty() {
            return Err(UdfError::InvalidConfig(
                "strategy chain must not be empty".into(),
            ));
        }
        Ok(Self { config, chain })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Convert one file, honouring the overwrite and dry-run policy.
    ///
    /// 1. Destination exists and overwrite is off → `(true, exists)`.
    /// 2. Dry run → `(true, dry-run)`.
    /// 3. Otherwise the first successful strategy's outcome, or the last
    ///    strategy's failure.
    ///
    /// Steps 1 and 2 never touch the filesystem beyond the existence check.
    pub async fn convert_file(&self, input: &Path, output: &Path) -> Outcome {
        if !self.config.overwrite && output.exists() {
            return Outcome::ok(Reason::Exists);
        }
        if self.config.dry_run {
            return Outcome::ok(Reason::DryRun);
        }
        run_chain(&self.chain, input, output)
            .await
            .unwrap_or_else(|| {
                Outcome::failed(Reason::DocxSaveFailed(
                    "no conversion strategies configured".into(),
                ))
            })
    }

    /// Convert one planned file, firing progress events and logging the result.
    pub async fn process(&self, index: usize, total: usize, file: PlannedFile) -> FileReport {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_file_start(index, total, &file.input);
        }

        let start = Instant::now();
        let outcome = self.convert_file(&file.input, &file.output).await;
        let report = FileReport {
            input: file.input,
            output: file.output,
            outcome,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        match report.outcome.kind() {
            OutcomeKind::Failed => warn!(
                "FAILED ({}): {} -> {}",
                report.outcome.reason,
                report.input.display(),
                report.output.display()
            ),
            _ => info!(
                "{} ({}): {} -> {}",
                label(report.outcome.kind()),
                report.outcome.reason,
                report.input.display(),
                report.output.display()
            ),
        }

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_file_complete(index, total, &report);
        }
        report
    }

    /// Convert every legacy file under `root`.
    pub async fn convert_dir(&self, root: &Path) -> Result<BatchReport, UdfError> {
        let start = Instant::now();
        info!("Starting batch: {}", root.display());

        let planned = plan_blocking(root, &self.config).await?;
        let total = planned.len();
        info!("Found {} candidate files", total);

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_batch_start(total);
        }

        let mut stats = BatchStats {
            total,
            ..Default::default()
        };
        let mut files = Vec::with_capacity(total);
        for (i, file) in planned.into_iter().enumerate() {
            let report = self.process(i + 1, total, file).await;
            stats.record(&report.outcome);
            files.push(report);
        }
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!("Batch complete: {}", stats);
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_batch_complete(&stats);
        }

        Ok(BatchReport {
            root: root.to_path_buf(),
            files,
            stats,
        })
    }
}

/// Convert a single file with the standard chain.
pub async fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &BatchConfig,
) -> Outcome {
    Converter::new(config.clone())
        .convert_file(input.as_ref(), output.as_ref())
        .await
}

/// Convert every legacy file under `root` with the standard chain.
///
/// # Errors
/// Only fatal errors: the root is missing, not a directory, or unreadable.
/// Per-file failures are reported in [`BatchReport::files`].
pub async fn convert_dir(
    root: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<BatchReport, UdfError> {
    Converter::new(config.clone())
        .convert_dir(root.as_ref())
        .await
}

/// Synchronous wrapper around [`convert_dir`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_dir_sync(
    root: impl AsRef<Path>,
    config: &BatchConfig,
) -> Result<BatchReport, UdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| UdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_dir(root, config))
}

/// Discover inputs and compute their outputs without converting anything.
pub fn plan(root: impl AsRef<Path>, config: &BatchConfig) -> Result<Vec<PlannedFile>, UdfError> {
    let root = root.as_ref();
    validate_root(root)?;
    let inputs = find_legacy_files(root, &config.extension)?;
    let output_root = config.output_root.as_deref();
    Ok(inputs
        .into_iter()
        .map(|input| {
            let output = output_path_for(&input, root, output_root);
            PlannedFile { input, output }
        })
        .collect())
}

/// [`plan`] on the blocking pool; large trees take a while to walk.
pub(crate) async fn plan_blocking(
    root: &Path,
    config: &BatchConfig,
) -> Result<Vec<PlannedFile>, UdfError> {
    let root = root.to_path_buf();
    let config = config.clone();
    let planned = tokio::task::spawn_blocking(move || plan(&root, &config))
        .await
        .map_err(|e| UdfError::Internal(format!("Discovery task panicked: {}", e)))??;
    debug!("Planned {} conversions", planned.len());
    Ok(planned)
}

fn label(kind: OutcomeKind) -> &'static str {
    match kind {
        OutcomeKind::Converted => "OK",
        OutcomeKind::Skipped => "SKIP",
        OutcomeKind::DryRun => "DRY-RUN",
        OutcomeKind::Failed => "FAILED",
    }
}
