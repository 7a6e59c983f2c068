//! External converter processes behind an injectable capability.
//!
//! Strategies never call `which` or spawn processes themselves; they go
//! through a [`Toolbox`]. Production code uses [`SystemToolbox`], tests
//! substitute fakes that simulate a missing tool, a tool that exits non-zero,
//! or a tool that succeeds and writes its output, without any converter
//! binary installed.

use futures::future::{BoxFuture, FutureExt};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// How an external process finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExit {
    /// Exit status was zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
    /// Captured standard error, trimmed.
    pub stderr: String,
}

impl ToolExit {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            code: Some(0),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stderr: stderr.into(),
        }
    }
}

/// Locating and running external converter binaries.
pub trait Toolbox: Send + Sync {
    /// Resolve `name` to an executable, or `None` if it is not installed.
    fn locate(&self, name: &str) -> Option<PathBuf>;

    /// Run `program` with `args` to completion.
    ///
    /// `Err` means the process could not be started or did not finish
    /// (e.g. a timeout); a non-zero exit is `Ok` with `success == false`.
    fn run<'a>(&'a self, program: &'a Path, args: &'a [OsString]) -> BoxFuture<'a, io::Result<ToolExit>>;

    /// First of `names` that [`Toolbox::locate`] resolves.
    fn locate_any(&self, names: &[String]) -> Option<PathBuf> {
        names
            .iter()
            .filter(|n| !n.trim().is_empty())
            .find_map(|n| self.locate(n))
    }
}

/// The real toolbox: `PATH` lookup plus `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemToolbox {
    timeout: Option<Duration>,
}

impl SystemToolbox {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl Toolbox for SystemToolbox {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn run<'a>(&'a self, program: &'a Path, args: &'a [OsString]) -> BoxFuture<'a, io::Result<ToolExit>> {
        async move {
            debug!("exec {} {:?}", program.display(), args);
            let mut cmd = Command::new(program);
            cmd.args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let output = match self.timeout {
                Some(limit) => tokio::time::timeout(limit, cmd.output())
                    .await
                    .map_err(|_| {
                        io::Error::new(
                            io::ErrorKind::TimedOut,
                            format!("{} did not finish within {:?}", program.display(), limit),
                        )
                    })??,
                None => cmd.output().await?,
            };

            Ok(ToolExit {
                success: output.status.success(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
        .boxed()
    }
}
