//! Atomic placement of finished documents.
//!
//! Every strategy that produces a file funnels it through here. A result is
//! first written under a hidden temp name in the destination directory, then
//! renamed onto the final name; a rename within one directory is atomic, so
//! readers see either no file or a complete one. Without overwrite the
//! rename refuses an existing destination, so a file that appeared after the
//! batch checked for it is kept.

use std::fs;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Create a temp file in the directory that will hold `dest`.
///
/// Parent directories are created as needed. The suffix keeps the target
/// extension so converters that pick their writer by extension still work.
pub fn sibling_tempfile(dest: &Path) -> io::Result<NamedTempFile> {
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let suffix = match dest.extension() {
        Some(ext) => format!(".tmp.{}", ext.to_string_lossy()),
        None => ".tmp".to_string(),
    };
    tempfile::Builder::new()
        .prefix(".udf2docx-")
        .suffix(&suffix)
        .tempfile_in(parent)
}

/// Rename `tmp` onto `dest`.
///
/// Unless `overwrite` is set an existing `dest` is left alone and the call
/// fails with [`io::ErrorKind::AlreadyExists`]; `tmp` is removed either way.
pub fn persist_tempfile(tmp: NamedTempFile, dest: &Path, overwrite: bool) -> io::Result<()> {
    let placed = if overwrite {
        tmp.persist(dest)
    } else {
        tmp.persist_noclobber(dest)
    };
    placed.map(drop).map_err(|e| e.error)
}

/// True if `e` is a no-clobber refusal because `dest` now exists.
///
/// `create_dir_all` reports a file in place of a parent directory with the
/// same error kind, hence the check on `dest` itself.
pub fn kept_existing(e: &io::Error, dest: &Path) -> bool {
    e.kind() == io::ErrorKind::AlreadyExists && dest.exists()
}

/// Move a finished file from `src` to `dest`.
///
/// With `overwrite` this is a plain rename; without it a hard link, which
/// refuses an existing `dest`. Across filesystems (e.g. from `/tmp` to a
/// mounted volume) both fail, so the bytes are copied into a sibling temp
/// file and that is persisted instead.
pub fn move_into_place(src: &Path, dest: &Path, overwrite: bool) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let direct = if overwrite {
        fs::rename(src, dest)
    } else {
        fs::hard_link(src, dest).map(|()| {
            let _ = fs::remove_file(src);
        })
    };
    match direct {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(e),
        Err(e) => debug!(
            "moving {} -> {} failed ({}), copying instead",
            src.display(),
            dest.display(),
            e
        ),
    }

    let tmp = sibling_tempfile(dest)?;
    fs::copy(src, tmp.path())?;
    persist_tempfile(tmp, dest, overwrite)?;
    let _ = fs::remove_file(src);
    Ok(())
}
