//! Result types: per-file outcomes and the batch tally.
//!
//! Every strategy reports an [`Outcome`], a `(success, reason)` pair whose
//! reason comes from the closed [`Reason`] set. Three reasons carry the
//! captured cause of an unexpected failure (`zip-failed:…`, `read-failed:…`,
//! `docx-save-failed:…`); all others are bare tags, which keeps them easy to
//! aggregate and to assert on in tests.

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Why a conversion step ended the way it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    // ── Orchestrator ──────────────────────────────────────────────────────
    /// Destination already exists and overwrite is disabled.
    Exists,
    /// Dry-run: nothing was attempted.
    DryRun,

    // ── Strategy A: pandoc ────────────────────────────────────────────────
    Pandoc,
    PandocNotInstalled,
    PandocFailed,

    // ── Strategy B: LibreOffice headless ──────────────────────────────────
    LibreOffice,
    LibreOfficeNotInstalled,
    LibreOfficeFailed,
    LibreOfficeNoOutput,

    // ── Strategy C: zip archive with content.xml ──────────────────────────
    ZipContent,
    NotZip,
    NoContentXml,
    NoContentTag,
    ZipFailed(String),

    // ── Strategy D: plain-text fallback ───────────────────────────────────
    FallbackDocx,
    ReadFailed(String),
    DocxSaveFailed(String),
}

impl Reason {
    /// The tag without any captured cause, e.g. `"read-failed"`.
    pub fn tag(&self) -> &'static str {
        match self {
            Reason::Exists => "exists",
            Reason::DryRun => "dry-run",
            Reason::Pandoc => "pandoc",
            Reason::PandocNotInstalled => "pandoc-not-installed",
            Reason::PandocFailed => "pandoc-failed",
            Reason::LibreOffice => "libreoffice",
            Reason::LibreOfficeNotInstalled => "libreoffice-not-installed",
            Reason::LibreOfficeFailed => "libreoffice-failed",
            Reason::LibreOfficeNoOutput => "libreoffice-no-output",
            Reason::ZipContent => "zip-content",
            Reason::NotZip => "not-zip",
            Reason::NoContentXml => "no-content-xml",
            Reason::NoContentTag => "no-content-tag",
            Reason::ZipFailed(_) => "zip-failed",
            Reason::FallbackDocx => "fallback-docx",
            Reason::ReadFailed(_) => "read-failed",
            Reason::DocxSaveFailed(_) => "docx-save-failed",
        }
    }

    /// The captured cause, for the three reasons that carry one.
    pub fn cause(&self) -> Option<&str> {
        match self {
            Reason::ZipFailed(c) | Reason::ReadFailed(c) | Reason::DocxSaveFailed(c) => {
                Some(c.as_str())
            }
            _ => None,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cause() {
            Some(cause) => write!(f, "{}:{}", self.tag(), cause),
            None => f.write_str(self.tag()),
        }
    }
}

impl Serialize for Reason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The result of one conversion attempt (a strategy, or the whole chain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub success: bool,
    pub reason: Reason,
}

impl Outcome {
    pub fn ok(reason: Reason) -> Self {
        Self {
            success: true,
            reason,
        }
    }

    pub fn failed(reason: Reason) -> Self {
        Self {
            success: false,
            reason,
        }
    }

    /// Which tally bucket this outcome lands in.
    pub fn kind(&self) -> OutcomeKind {
        match (self.success, &self.reason) {
            (true, Reason::Exists) => OutcomeKind::Skipped,
            (true, Reason::DryRun) => OutcomeKind::DryRun,
            (true, _) => OutcomeKind::Converted,
            (false, _) => OutcomeKind::Failed,
        }
    }
}

/// Tally category of a per-file outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeKind {
    Converted,
    Skipped,
    DryRun,
    Failed,
}

/// What happened to one discovered file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub outcome: Outcome,
    pub duration_ms: u64,
}

/// Aggregate counters for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Number of discovered candidate files.
    pub total: usize,
    pub converted: usize,
    /// Destination existed and overwrite was off.
    pub skipped: usize,
    pub dry_run: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

impl BatchStats {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome.kind() {
            OutcomeKind::Converted => self.converted += 1,
            OutcomeKind::Skipped => self.skipped += 1,
            OutcomeKind::DryRun => self.dry_run += 1,
            OutcomeKind::Failed => self.failed += 1,
        }
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {}, Converted: {}, Skipped: {}, Dry-run: {}, Failed: {}",
            self.total, self.converted, self.skipped, self.dry_run, self.failed
        )
    }
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub root: PathBuf,
    pub files: Vec<FileReport>,
    pub stats: BatchStats,
}

impl BatchReport {
    /// Reports whose outcome was a failure, in processing order.
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.outcome.success)
    }
}
