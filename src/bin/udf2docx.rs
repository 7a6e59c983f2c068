//! CLI binary for udf2docx.
//!
//! A thin shim over the library crate that maps CLI flags to `BatchConfig`,
//! prints per-file results and the final tally.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use udf2docx::{
    plan, BatchConfig, BatchProgressCallback, BatchStats, Converter, FileReport, OutcomeKind,
    ProgressCallback,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

#[derive(Clone, Copy)]
struct Palette {
    enabled: bool,
}

impl Palette {
    fn paint(&self, code: &str, s: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }
    fn green(&self, s: &str) -> String {
        self.paint("32", s)
    }
    fn red(&self, s: &str) -> String {
        self.paint("31", s)
    }
    fn dim(&self, s: &str) -> String {
        self.paint("2", s)
    }
    fn bold(&self, s: &str) -> String {
        self.paint("1", s)
    }
    fn cyan(&self, s: &str) -> String {
        self.paint("36", s)
    }
}

// ── Per-file reporter ────────────────────────────────────────────────────────

/// Prints one line per file and drives an optional progress bar.
///
/// Failures and dry-run lines are always printed; successes and skips only
/// with `--verbose`. With a bar active, lines go through `bar.println` so
/// they scroll above it instead of tearing it.
struct CliReporter {
    bar: Option<ProgressBar>,
    verbose: bool,
    quiet: bool,
    /// Keep stdout clean for `--json`.
    to_stderr: bool,
    palette: Palette,
}

impl CliReporter {
    fn new(show_bar: bool, cli: &Cli, palette: Palette) -> Arc<Self> {
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} {prefix:.bold}  \
                     [{bar:42.green/238}] {pos:>4}/{len} files  \
                     ⏱ {elapsed_precise}  {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
            );
            bar.set_prefix("Converting");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });

        Arc::new(Self {
            bar,
            verbose: cli.verbose,
            quiet: cli.quiet,
            to_stderr: cli.json,
            palette,
        })
    }

    fn emit(&self, line: String) {
        match self.bar {
            Some(ref bar) => bar.println(line),
            None if self.to_stderr => eprintln!("{line}"),
            None => println!("{line}"),
        }
    }
}

impl BatchProgressCallback for CliReporter {
    fn on_batch_start(&self, total_files: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_length(total_files as u64);
        }
    }

    fn on_file_start(&self, _index: usize, _total: usize, input: &Path) {
        if let Some(ref bar) = self.bar {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            bar.set_message(name);
        }
    }

    fn on_file_complete(&self, _index: usize, _total: usize, report: &FileReport) {
        let p = self.palette;
        let pair = format!("{} -> {}", report.input.display(), report.output.display());
        let reason = report.outcome.reason.to_string();

        let line = match report.outcome.kind() {
            OutcomeKind::Failed => Some(format!("{} ({}): {}", p.red("FAILED"), reason, pair)),
            OutcomeKind::DryRun if !self.quiet => Some(format!("{}: {}", p.cyan("DRY-RUN"), pair)),
            OutcomeKind::Skipped if self.verbose => {
                Some(format!("{} ({}): {}", p.dim("SKIP"), reason, pair))
            }
            OutcomeKind::Converted if self.verbose => Some(format!(
                "{} ({}): {}  {}",
                p.green("OK"),
                reason,
                pair,
                p.dim(&format!("{}ms", report.duration_ms))
            )),
            _ => None,
        };
        if let Some(line) = line {
            self.emit(line);
        }

        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_batch_complete(&self, _stats: &BatchStats) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert in place (.docx written next to each .udf)
  udf2docx ./archive

  # Mirror the tree into another directory
  udf2docx ./archive --out-dir ./converted

  # See what would happen, write nothing
  udf2docx ./archive --dry-run

  # Redo everything, printing every file
  udf2docx ./archive --overwrite -v

  # Machine-readable report
  udf2docx ./archive --json > report.json

STRATEGIES (tried in order, first success wins):
  pandoc        <pandoc> <input> -o <output>
  libreoffice   <soffice> --headless --convert-to docx --outdir <tmp> <input>
  zip-content   .udf that is a zip archive with content.xml
  fallback-docx raw text (UTF-8, else Latin-1), one paragraph per line

EXIT STATUS:
  1 if the input directory is missing or not a directory, otherwise 0,
  even when individual files fail.
"#;

/// Convert legacy .udf documents to .docx, recursively.
#[derive(Parser, Debug)]
#[command(
    name = "udf2docx",
    version,
    about = "Convert .udf files to .docx recursively",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Root folder to search for .udf files.
    input_dir: PathBuf,

    /// Output root. If omitted, .docx files are written next to the originals.
    #[arg(long, env = "UDF2DOCX_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Overwrite existing .docx files.
    #[arg(long, env = "UDF2DOCX_OVERWRITE")]
    overwrite: bool,

    /// Show what would be done without writing files.
    #[arg(long, env = "UDF2DOCX_DRY_RUN")]
    dry_run: bool,

    /// Print successes and skips too, and enable DEBUG-level logs.
    #[arg(short, long, env = "UDF2DOCX_VERBOSE")]
    verbose: bool,

    /// Print only failures and the summary.
    #[arg(short, long, env = "UDF2DOCX_QUIET", conflicts_with = "verbose")]
    quiet: bool,

    /// Disable the progress bar.
    #[arg(long, env = "UDF2DOCX_NO_PROGRESS")]
    no_progress: bool,

    /// Print the full batch report as JSON instead of the text summary.
    #[arg(long, env = "UDF2DOCX_JSON")]
    json: bool,

    /// List discovered files and their output paths, convert nothing.
    #[arg(long)]
    list: bool,

    /// Legacy extension to search for (case-insensitive).
    #[arg(long, env = "UDF2DOCX_EXTENSION", default_value = "udf")]
    extension: String,

    /// pandoc binary name or path.
    #[arg(long, env = "UDF2DOCX_PANDOC", default_value = "pandoc")]
    pandoc: String,

    /// Office-suite binary names, tried in order.
    #[arg(
        long = "office",
        env = "UDF2DOCX_OFFICE",
        value_delimiter = ',',
        default_values = ["soffice", "libreoffice"]
    )]
    office: Vec<String>,

    /// Kill an external converter after this many seconds.
    #[arg(long, env = "UDF2DOCX_TOOL_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    tool_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Per-file results are printed by the reporter; library logs only
    // surface for errors unless --verbose asks for everything.
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let palette = Palette {
        enabled: io::stdout().is_terminal(),
    };

    let show_bar = !cli.quiet
        && !cli.no_progress
        && !cli.json
        && !cli.verbose
        && !cli.list
        && io::stderr().is_terminal();
    let reporter = CliReporter::new(show_bar, &cli, palette);

    let config = build_config(&cli, reporter as ProgressCallback)?;
    let root = cli.input_dir.as_path();

    // ── List-only mode ───────────────────────────────────────────────────
    if cli.list {
        let planned = plan(root, &config)
            .with_context(|| format!("Cannot scan {}", root.display()))?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&planned).context("Failed to serialise plan")?
            );
        } else {
            for f in &planned {
                println!("{} -> {}", f.input.display(), f.output.display());
            }
        }
        return Ok(());
    }

    // ── Run batch ────────────────────────────────────────────────────────
    let converter = Converter::new(config);
    let report = converter
        .convert_dir(root)
        .await
        .with_context(|| format!("Cannot convert {}", root.display()))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
        return Ok(());
    }

    if report.stats.total == 0 {
        println!(
            "No .{} files found under: {}",
            converter.config().extension,
            root.display()
        );
        return Ok(());
    }

    let stats = &report.stats;
    println!("---");
    println!(
        "{}  {}",
        if stats.failed == 0 {
            palette.green(&stats.to_string())
        } else {
            palette.bold(&stats.to_string())
        },
        palette.dim(&format!("{}ms", stats.duration_ms)),
    );

    Ok(())
}

/// Map CLI args to `BatchConfig`.
fn build_config(cli: &Cli, progress: ProgressCallback) -> Result<BatchConfig> {
    let mut builder = BatchConfig::builder()
        .overwrite(cli.overwrite)
        .dry_run(cli.dry_run)
        .extension(&cli.extension)
        .pandoc_program(cli.pandoc.clone())
        .office_programs(cli.office.iter().map(|s| s.trim().to_string()))
        .progress_callback(progress);

    if let Some(ref out) = cli.out_dir {
        builder = builder.output_root(out);
    }
    if let Some(secs) = cli.tool_timeout {
        builder = builder.tool_timeout_secs(secs);
    }

    builder.build().context("Invalid configuration")
}
