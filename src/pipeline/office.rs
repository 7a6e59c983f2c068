//! Strategy B: LibreOffice in headless batch mode.
//!
//! Handles the widest range of binary layouts but is slow. `soffice` cannot
//! be told an output *file*, only an output *directory*, so it converts into
//! a scratch [`TempDir`] and the result is moved into place by name
//! (`<input stem>.docx`). The scratch directory is removed when it drops, on
//! every return path.

use crate::config::TARGET_EXTENSION;
use crate::output::{Outcome, Reason};
use crate::pipeline::place::{kept_existing, move_into_place};
use crate::pipeline::strategy::Strategy;
use crate::pipeline::tools::Toolbox;
use futures::future::{BoxFuture, FutureExt};
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, warn};

pub struct OfficeStrategy {
    toolbox: Arc<dyn Toolbox>,
    programs: Vec<String>,
    overwrite: bool,
}

impl OfficeStrategy {
    pub fn new(toolbox: Arc<dyn Toolbox>, programs: Vec<String>, overwrite: bool) -> Self {
        Self {
            toolbox,
            programs,
            overwrite,
        }
    }

    async fn convert(&self, input: &Path, output: &Path) -> Outcome {
        let Some(program) = self.toolbox.locate_any(&self.programs) else {
            return Outcome::failed(Reason::LibreOfficeNotInstalled);
        };

        let scratch = match TempDir::new() {
            Ok(d) => d,
            Err(e) => {
                warn!("libreoffice: cannot create scratch dir: {}", e);
                return Outcome::failed(Reason::LibreOfficeFailed);
            }
        };

        let args = vec![
            OsString::from("--headless"),
            OsString::from("--convert-to"),
            OsString::from(TARGET_EXTENSION),
            OsString::from("--outdir"),
            scratch.path().as_os_str().to_os_string(),
            input.as_os_str().to_os_string(),
        ];

        match self.toolbox.run(&program, &args).await {
            Ok(exit) if exit.success => {}
            Ok(exit) => {
                debug!("libreoffice exited with {:?}: {}", exit.code, exit.stderr);
                return Outcome::failed(Reason::LibreOfficeFailed);
            }
            Err(e) => {
                debug!("libreoffice could not run: {}", e);
                return Outcome::failed(Reason::LibreOfficeFailed);
            }
        }

        let Some(produced) = converted_name(input).map(|name| scratch.path().join(name)) else {
            return Outcome::failed(Reason::LibreOfficeNoOutput);
        };
        if !produced.is_file() {
            return Outcome::failed(Reason::LibreOfficeNoOutput);
        }

        match move_into_place(&produced, output, self.overwrite) {
            Ok(()) => Outcome::ok(Reason::LibreOffice),
            Err(e) if kept_existing(&e, output) => {
                debug!("libreoffice: {} appeared meanwhile, keeping it", output.display());
                Outcome::ok(Reason::Exists)
            }
            Err(e) => {
                warn!("libreoffice: cannot place {}: {}", output.display(), e);
                Outcome::failed(Reason::LibreOfficeFailed)
            }
        }
    }
}

/// File name soffice gives its result: the whole input stem plus `.docx`.
///
/// `Karar 2023.01.15.udf` becomes `Karar 2023.01.15.docx`; the dots inside
/// the stem are kept.
fn converted_name(input: &Path) -> Option<OsString> {
    let mut name = input.file_stem()?.to_os_string();
    name.push(".");
    name.push(TARGET_EXTENSION);
    Some(name)
}

impl Strategy for OfficeStrategy {
    fn name(&self) -> &'static str {
        "libreoffice"
    }

    fn attempt<'a>(&'a self, input: &'a Path, output: &'a Path) -> BoxFuture<'a, Outcome> {
        self.convert(input, output).boxed()
    }
}
