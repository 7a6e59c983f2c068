//! Strategy A: pandoc.
//!
//! Fast and faithful for text-like inputs. pandoc writes its output file
//! itself, so it is pointed at a `.docx` path (from which it picks the
//! writer) inside a scratch [`TempDir`]. The result is moved onto the
//! destination only after a zero exit status; until then nothing is created
//! under the output root.

use crate::config::TARGET_EXTENSION;
use crate::output::{Outcome, Reason};
use crate::pipeline::place::{kept_existing, move_into_place};
use crate::pipeline::strategy::Strategy;
use crate::pipeline::tools::Toolbox;
use futures::future::{BoxFuture, FutureExt};
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, warn};

pub struct PandocStrategy {
    toolbox: Arc<dyn Toolbox>,
    program: String,
    overwrite: bool,
}

impl PandocStrategy {
    pub fn new(toolbox: Arc<dyn Toolbox>, program: impl Into<String>, overwrite: bool) -> Self {
        Self {
            toolbox,
            program: program.into(),
            overwrite,
        }
    }

    async fn convert(&self, input: &Path, output: &Path) -> Outcome {
        let Some(program) = self.toolbox.locate(&self.program) else {
            return Outcome::failed(Reason::PandocNotInstalled);
        };

        let scratch = match TempDir::new() {
            Ok(d) => d,
            Err(e) => {
                warn!("pandoc: cannot create scratch dir: {}", e);
                return Outcome::failed(Reason::PandocFailed);
            }
        };
        let produced = scratch.path().join(format!("pandoc.{TARGET_EXTENSION}"));

        let args = vec![
            input.as_os_str().to_os_string(),
            OsString::from("-o"),
            produced.as_os_str().to_os_string(),
        ];

        match self.toolbox.run(&program, &args).await {
            Ok(exit) if exit.success => {}
            Ok(exit) => {
                debug!("pandoc exited with {:?}: {}", exit.code, exit.stderr);
                return Outcome::failed(Reason::PandocFailed);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Outcome::failed(Reason::PandocNotInstalled);
            }
            Err(e) => {
                debug!("pandoc could not run: {}", e);
                return Outcome::failed(Reason::PandocFailed);
            }
        }

        if !produced.is_file() {
            debug!("pandoc exited 0 but wrote nothing for {}", input.display());
            return Outcome::failed(Reason::PandocFailed);
        }

        match move_into_place(&produced, output, self.overwrite) {
            Ok(()) => Outcome::ok(Reason::Pandoc),
            Err(e) if kept_existing(&e, output) => {
                debug!("pandoc: {} appeared meanwhile, keeping it", output.display());
                Outcome::ok(Reason::Exists)
            }
            Err(e) => {
                warn!("pandoc: cannot place {}: {}", output.display(), e);
                Outcome::failed(Reason::PandocFailed)
            }
        }
    }
}

impl Strategy for PandocStrategy {
    fn name(&self) -> &'static str {
        "pandoc"
    }

    fn attempt<'a>(&'a self, input: &'a Path, output: &'a Path) -> BoxFuture<'a, Outcome> {
        self.convert(input, output).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tools::ToolExit;
    use std::path::PathBuf;

    /// Fake pandoc: optionally installed, optionally writes to the `-o` path.
    struct FakePandoc {
        installed: bool,
        exit: ToolExit,
        /// Created while pandoc "runs", as if another process wrote it.
        competitor: Option<PathBuf>,
    }

    impl Toolbox for FakePandoc {
        fn locate(&self, name: &str) -> Option<PathBuf> {
            self.installed.then(|| PathBuf::from("/usr/bin").join(name))
        }

        fn run<'a>(&'a self, _program: &'a Path, args: &'a [OsString]) -> BoxFuture<'a, io::Result<ToolExit>> {
            async move {
                if self.exit.success {
                    std::fs::write(&args[2], b"converted by pandoc")?;
                }
                if let Some(ref path) = self.competitor {
                    std::fs::write(path, b"written elsewhere")?;
                }
                Ok(self.exit.clone())
            }
            .boxed()
        }
    }

    fn strategy(installed: bool, exit: ToolExit) -> PandocStrategy {
        let tb = FakePandoc {
            installed,
            exit,
            competitor: None,
        };
        PandocStrategy::new(Arc::new(tb), "pandoc", false)
    }

    #[tokio::test]
    async fn not_installed() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a.docx");

        let outcome = strategy(false, ToolExit::succeeded())
            .attempt(Path::new("a.udf"), &out)
            .await;

        assert_eq!(outcome, Outcome::failed(Reason::PandocNotInstalled));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn non_zero_exit_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a.docx");

        let outcome = strategy(true, ToolExit::failed(64, "unknown reader"))
            .attempt(Path::new("a.udf"), &out)
            .await;

        assert_eq!(outcome, Outcome::failed(Reason::PandocFailed));
        assert!(!out.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn failure_creates_no_output_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("mirror/deep/a.docx");

        let outcome = strategy(true, ToolExit::failed(1, "bad input"))
            .attempt(Path::new("a.udf"), &out)
            .await;

        assert!(!outcome.success);
        assert!(!dir.path().join("mirror").exists());
    }

    #[tokio::test]
    async fn success_places_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("sub/a.docx");

        let outcome = strategy(true, ToolExit::succeeded())
            .attempt(Path::new("a.udf"), &out)
            .await;

        assert_eq!(outcome, Outcome::ok(Reason::Pandoc));
        assert_eq!(std::fs::read(&out).unwrap(), b"converted by pandoc");
    }

    #[tokio::test]
    async fn output_appearing_during_run_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a.docx");
        let tb = FakePandoc {
            installed: true,
            exit: ToolExit::succeeded(),
            competitor: Some(out.clone()),
        };

        let outcome = PandocStrategy::new(Arc::new(tb), "pandoc", false)
            .attempt(Path::new("a.udf"), &out)
            .await;

        assert_eq!(outcome, Outcome::ok(Reason::Exists));
        assert_eq!(std::fs::read(&out).unwrap(), b"written elsewhere");
    }

    #[tokio::test]
    async fn overwrite_replaces_output_appearing_during_run() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a.docx");
        let tb = FakePandoc {
            installed: true,
            exit: ToolExit::succeeded(),
            competitor: Some(out.clone()),
        };

        let outcome = PandocStrategy::new(Arc::new(tb), "pandoc", true)
            .attempt(Path::new("a.udf"), &out)
            .await;

        assert_eq!(outcome, Outcome::ok(Reason::Pandoc));
        assert_eq!(std::fs::read(&out).unwrap(), b"converted by pandoc");
    }
}
