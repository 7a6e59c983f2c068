//! The common interface of all conversion strategies, and the fallback chain.

use crate::config::BatchConfig;
use crate::output::Outcome;
use crate::pipeline::archive::ArchiveStrategy;
use crate::pipeline::office::OfficeStrategy;
use crate::pipeline::pandoc::PandocStrategy;
use crate::pipeline::plaintext::PlainTextStrategy;
use crate::pipeline::tools::{SystemToolbox, Toolbox};
use futures::future::BoxFuture;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// One self-contained attempt at turning `input` into a document at `output`.
///
/// Implementations never panic or return errors: every failure, including
/// "required tool not installed", comes back as a failed [`Outcome`].
pub trait Strategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn attempt<'a>(&'a self, input: &'a Path, output: &'a Path) -> BoxFuture<'a, Outcome>;
}

/// Shared, ordered list of strategies.
pub type Chain = Vec<Arc<dyn Strategy>>;

/// The standard chain: pandoc, LibreOffice, zip content, plain text.
pub fn default_chain(config: &BatchConfig) -> Chain {
    let toolbox: Arc<dyn Toolbox> = match config.toolbox {
        Some(ref tb) => Arc::clone(tb),
        None => Arc::new(SystemToolbox::new(
            config.tool_timeout_secs.map(Duration::from_secs),
        )),
    };

    vec![
        Arc::new(PandocStrategy::new(
            Arc::clone(&toolbox),
            config.pandoc_program.clone(),
            config.overwrite,
        )),
        Arc::new(OfficeStrategy::new(
            Arc::clone(&toolbox),
            config.office_programs.clone(),
            config.overwrite,
        )),
        Arc::new(ArchiveStrategy::new(config.overwrite)),
        Arc::new(PlainTextStrategy::new(config.overwrite)),
    ]
}

/// Try each strategy in order and stop at the first success.
///
/// When every strategy fails the outcome of the *last* one is returned, not
/// the first: callers see why the final fallback gave up. Returns `None` only
/// for an empty chain.
pub async fn run_chain(chain: &[Arc<dyn Strategy>], input: &Path, output: &Path) -> Option<Outcome> {
    let mut last = None;
    for strategy in chain {
        let outcome = strategy.attempt(input, output).await;
        debug!(
            "{}: {} -> {}",
            strategy.name(),
            input.display(),
            outcome.reason
        );
        if outcome.success {
            return Some(outcome);
        }
        last = Some(outcome);
    }
    last
}
