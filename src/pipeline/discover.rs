//! Input discovery: validate the root, find legacy files, map output paths.
//!
//! Discovery returns files in sorted path order so two runs over the same
//! tree process (and report) files identically.

use crate::config::TARGET_EXTENSION;
use crate::error::UdfError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Check that `root` exists and is a directory.
pub fn validate_root(root: &Path) -> Result<(), UdfError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(UdfError::NotADirectory {
            path: root.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(UdfError::RootNotFound {
            path: root.to_path_buf(),
        }),
        Err(e) => Err(UdfError::Discovery {
            path: root.to_path_buf(),
            detail: e.to_string(),
        }),
    }
}

/// True if `path` has extension `ext`, ignoring ASCII case.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Every non-directory entry under `root` with extension `ext`, sorted.
///
/// Symlinks are listed but not followed, so a link cycle cannot hang the
/// walk. Entries that cannot be read below the root are logged and skipped.
pub fn find_legacy_files(root: &Path, ext: &str) -> Result<Vec<PathBuf>, UdfError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(UdfError::Discovery {
                    path: root.to_path_buf(),
                    detail: e.to_string(),
                });
            }
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }
        if has_extension(entry.path(), ext) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!("Found {} .{} files under {}", files.len(), ext, root.display());
    Ok(files)
}

/// Where the converted document for `input` goes.
///
/// Without an output root the document sits beside its input. With one, the
/// input's path relative to `root` is mirrored beneath it. Either way the
/// extension becomes `.docx`, whatever the case of the original.
pub fn output_path_for(input: &Path, root: &Path, output_root: Option<&Path>) -> PathBuf {
    let base = match output_root {
        Some(out) => match input.strip_prefix(root) {
            Ok(rel) => out.join(rel),
            Err(_) => out.join(input.file_name().unwrap_or_default()),
        },
        None => input.to_path_buf(),
    };
    base.with_extension(TARGET_EXTENSION)
}
