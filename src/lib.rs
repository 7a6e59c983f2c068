//! # udf2docx
//!
//! Batch-convert legacy `.udf` word-processor documents to `.docx`.
//!
//! The crate does not parse or render documents itself. For each file it
//! tries a fixed chain of conversion strategies and keeps the first one that
//! succeeds:
//!
//! ```text
//! .udf
//!  │
//!  ├─ A. pandoc        external converter, best for text-like inputs
//!  ├─ B. LibreOffice   headless soffice, widest binary-format coverage
//!  ├─ C. zip-content   .udf that is a zip with content.xml → paragraphs
//!  └─ D. plain-text    raw text (UTF-8, else Latin-1) → paragraphs
//! ```
//!
//! Existing outputs are skipped unless overwrite is enabled, and a dry run
//! reports what would happen without touching the disk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use udf2docx::{convert_dir, BatchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::builder().output_root("./converted").build()?;
//!     let report = convert_dir("./archive", &config).await?;
//!     for failed in report.failures() {
//!         eprintln!("{}: {}", failed.input.display(), failed.outcome.reason);
//!     }
//!     println!("{}", report.stats);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `udf2docx` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BatchConfig, BatchConfigBuilder, DEFAULT_EXTENSION, TARGET_EXTENSION};
pub use convert::{convert_dir, convert_dir_sync, convert_file, plan, Converter, PlannedFile};
pub use error::UdfError;
pub use output::{BatchReport, BatchStats, FileReport, Outcome, OutcomeKind, Reason};
pub use pipeline::strategy::{Chain, Strategy};
pub use pipeline::tools::{SystemToolbox, ToolExit, Toolbox};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{convert_stream, ReportStream};
