//! Minimal `.docx` writer: one paragraph per line of text.
//!
//! Used by the two in-process strategies. The document is packed into a
//! temp file next to the destination and then persisted (renamed) onto it,
//! so a crash mid-write never leaves a truncated file under the final name.

use crate::pipeline::place::{persist_tempfile, sibling_tempfile};
use docx_rs::{Docx, Paragraph, Run};
use std::io;
use std::path::Path;
use tracing::debug;

/// Write `lines` as a new document at `path`, creating parent directories.
///
/// Without `overwrite` an existing `path` is kept and the call fails with
/// [`io::ErrorKind::AlreadyExists`].
///
/// Blocking; call from `spawn_blocking` inside async code.
pub fn write_paragraphs<'a, I>(path: &Path, lines: I, overwrite: bool) -> io::Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut docx = Docx::new();
    let mut count = 0usize;
    for line in lines {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
        count += 1;
    }

    let mut tmp = sibling_tempfile(path)?;
    docx.build()
        .pack(tmp.as_file_mut())
        .map_err(|e| io::Error::other(format!("docx pack failed: {e}")))?;
    tmp.as_file().sync_all()?;
    persist_tempfile(tmp, path, overwrite)?;

    debug!("Wrote {} paragraphs to {}", count, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn document_xml(path: &Path) -> String {
        let file = std::fs::File::open(path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    #[test]
    fn writes_a_readable_package() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/deeper/out.docx");

        write_paragraphs(&out, ["first line", "second & <last>"], false).unwrap();

        assert!(out.exists());
        let xml = document_xml(&out);
        assert!(xml.contains("first line"));
        assert!(xml.contains("second &amp; &lt;last&gt;"));
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.docx");

        write_paragraphs(&out, ["only"], false).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.docx")]);
    }

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.docx");
        std::fs::write(&out, b"stale").unwrap();

        write_paragraphs(&out, ["fresh"], true).unwrap();

        assert!(document_xml(&out).contains("fresh"));
    }

    #[test]
    fn keeps_existing_file_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.docx");
        std::fs::write(&out, b"stale").unwrap();

        let err = write_paragraphs(&out, ["fresh"], false).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read(&out).unwrap(), b"stale");
    }
}
