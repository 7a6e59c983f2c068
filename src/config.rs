//! Configuration for a batch conversion run.
//!
//! Every knob lives in [`BatchConfig`], built via [`BatchConfigBuilder`].
//! Callers set only what they care about and rely on the documented
//! defaults for the rest.

use crate::error::UdfError;
use crate::pipeline::tools::Toolbox;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Extension written for every converted document.
pub const TARGET_EXTENSION: &str = "docx";

/// Legacy extension searched for by default.
pub const DEFAULT_EXTENSION: &str = "udf";

/// Configuration for a batch `.udf` → `.docx` run.
///
/// # Example
/// ```rust
/// use udf2docx::BatchConfig;
///
/// let config = BatchConfig::builder()
///     .output_root("/tmp/converted")
///     .overwrite(true)
///     .build()
///     .unwrap();
/// assert!(config.overwrite);
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Output-root override. When set, each output mirrors its input's path
    /// relative to the discovery root under this directory. Default: None
    /// (outputs are written beside their inputs).
    pub output_root: Option<PathBuf>,

    /// Overwrite destination files that already exist. Default: false.
    pub overwrite: bool,

    /// Report intended actions without writing anything. Default: false.
    pub dry_run: bool,

    /// Legacy extension to discover, lowercase and without the dot. Default: "udf".
    pub extension: String,

    /// Program name (or path) of the general document converter. Default: "pandoc".
    pub pandoc_program: String,

    /// Office-suite program names, tried in order. Default: soffice, libreoffice.
    pub office_programs: Vec<String>,

    /// Wall-clock limit for each external process, in seconds. Default: None.
    ///
    /// With no limit a hung converter stalls the batch until it exits.
    pub tool_timeout_secs: Option<u64>,

    /// External-tool capability. If None, uses [`crate::pipeline::tools::SystemToolbox`].
    pub toolbox: Option<Arc<dyn Toolbox>>,

    /// Per-file progress events. Default: None.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            output_root: None,
            overwrite: false,
            dry_run: false,
            extension: DEFAULT_EXTENSION.to_string(),
            pandoc_program: "pandoc".to_string(),
            office_programs: vec!["soffice".to_string(), "libreoffice".to_string()],
            tool_timeout_secs: None,
            toolbox: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("output_root", &self.output_root)
            .field("overwrite", &self.overwrite)
            .field("dry_run", &self.dry_run)
            .field("extension", &self.extension)
            .field("pandoc_program", &self.pandoc_program)
            .field("office_programs", &self.office_programs)
            .field("tool_timeout_secs", &self.tool_timeout_secs)
            .field("toolbox", &self.toolbox.as_ref().map(|_| "<dyn Toolbox>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn output_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_root = Some(dir.into());
        self
    }

    pub fn overwrite(mut self, v: bool) -> Self {
        self.config.overwrite = v;
        self
    }

    pub fn dry_run(mut self, v: bool) -> Self {
        self.config.dry_run = v;
        self
    }

    /// Accepts `"udf"`, `".udf"` or `"UDF"`; stored as `"udf"`.
    pub fn extension(mut self, ext: impl AsRef<str>) -> Self {
        self.config.extension = ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase();
        self
    }

    pub fn pandoc_program(mut self, program: impl Into<String>) -> Self {
        self.config.pandoc_program = program.into();
        self
    }

    pub fn office_programs<I, S>(mut self, programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.office_programs = programs.into_iter().map(Into::into).collect();
        self
    }

    pub fn tool_timeout_secs(mut self, secs: u64) -> Self {
        self.config.tool_timeout_secs = Some(secs);
        self
    }

    pub fn toolbox(mut self, toolbox: Arc<dyn Toolbox>) -> Self {
        self.config.toolbox = Some(toolbox);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, UdfError> {
        let c = &self.config;
        if c.extension.is_empty() {
            return Err(UdfError::InvalidConfig(
                "extension must not be empty".into(),
            ));
        }
        if c.pandoc_program.trim().is_empty() {
            return Err(UdfError::InvalidConfig(
                "pandoc program name must not be empty".into(),
            ));
        }
        if c.office_programs.iter().all(|p| p.trim().is_empty()) {
            return Err(UdfError::InvalidConfig(
                "at least one office program name is required".into(),
            ));
        }
        if c.tool_timeout_secs == Some(0) {
            return Err(UdfError::InvalidConfig(
                "tool timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = BatchConfig::default();
        assert_eq!(c.extension, "udf");
        assert_eq!(c.pandoc_program, "pandoc");
        assert_eq!(c.office_programs, vec!["soffice", "libreoffice"]);
        assert!(!c.overwrite);
        assert!(!c.dry_run);
        assert!(c.output_root.is_none());
        assert!(c.tool_timeout_secs.is_none());
    }

    #[test]
    fn extension_is_normalised() {
        let c = BatchConfig::builder().extension(".UDF").build().unwrap();
        assert_eq!(c.extension, "udf");
    }

    #[test]
    fn empty_extension_rejected() {
        let err = BatchConfig::builder().extension(".").build().unwrap_err();
        assert!(matches!(err, UdfError::InvalidConfig(_)));
    }

    #[test]
    fn empty_office_list_rejected() {
        let err = BatchConfig::builder()
            .office_programs(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, UdfError::InvalidConfig(_)));
    }

    #[test]
    fn zero_timeout_rejected() {
        assert!(BatchConfig::builder().tool_timeout_secs(0).build().is_err());
        let c = BatchConfig::builder().tool_timeout_secs(30).build().unwrap();
        assert_eq!(c.tool_timeout_secs, Some(30));
    }

    #[test]
    fn debug_hides_trait_objects() {
        let s = format!("{:?}", BatchConfig::default());
        assert!(s.contains("BatchConfig"));
        assert!(s.contains("toolbox: None"));
    }
}
