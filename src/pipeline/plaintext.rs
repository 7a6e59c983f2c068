//! Strategy D: read the file as text and write it out line by line.
//!
//! The last resort. Decoding cannot fail: bytes that are not valid UTF-8 are
//! re-read as ISO-8859-1, where every byte maps to the code point of the
//! same value. Only an I/O error on reading or a failed save ends in failure.

use crate::output::{Outcome, Reason};
use crate::pipeline::docx::write_paragraphs;
use crate::pipeline::place::kept_existing;
use crate::pipeline::sanitize::{paragraphs, sanitize_text};
use crate::pipeline::strategy::Strategy;
use futures::future::{BoxFuture, FutureExt};
use std::io;
use std::path::Path;
use tracing::debug;

pub struct PlainTextStrategy {
    overwrite: bool,
}

impl PlainTextStrategy {
    pub fn new(overwrite: bool) -> Self {
        Self { overwrite }
    }
}

impl Strategy for PlainTextStrategy {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn attempt<'a>(&'a self, input: &'a Path, output: &'a Path) -> BoxFuture<'a, Outcome> {
        async move {
            let bytes = match tokio::fs::read(input).await {
                Ok(b) => b,
                Err(e) => return Outcome::failed(Reason::ReadFailed(e.to_string())),
            };
            let text = sanitize_text(&decode_text(bytes));

            let dest = output.to_path_buf();
            let overwrite = self.overwrite;
            let saved = tokio::task::spawn_blocking(move || {
                write_paragraphs(&dest, paragraphs(&text), overwrite)
            })
            .await
            .unwrap_or_else(|e| Err(io::Error::other(format!("task panicked: {e}"))));

            match saved {
                Ok(()) => Outcome::ok(Reason::FallbackDocx),
                Err(e) if kept_existing(&e, output) => Outcome::ok(Reason::Exists),
                Err(e) => {
                    let cause = e.to_string();
                    debug!("plain-text save failed for {}: {}", input.display(), cause);
                    Outcome::failed(Reason::DocxSaveFailed(cause))
                }
            }
        }
        .boxed()
    }
}

/// UTF-8 if valid, otherwise ISO-8859-1.
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_prefers_utf8() {
        assert_eq!(decode_text("Merhaba dünya".as_bytes().to_vec()), "Merhaba dünya");
    }

    #[test]
    fn decode_falls_back_to_latin1() {
        // 0xFC is 'ü' in Latin-1 and an invalid lone byte in UTF-8.
        assert_eq!(decode_text(vec![b'd', 0xFC, b'n']), "dün");
        assert_eq!(decode_text(vec![0xFF, 0xFE]), "\u{FF}\u{FE}");
    }

    #[test]
    fn latin1_next_line_splits_paragraphs() {
        let text = sanitize_text(&decode_text(vec![b'a', 0x85, b'b']));
        assert_eq!(paragraphs(&text), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn read_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing.docx");

        let outcome = PlainTextStrategy::new(false)
            .attempt(&dir.path().join("missing.udf"), &out)
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.reason.tag(), "read-failed");
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.udf");
        std::fs::write(&input, "text").unwrap();
        // A regular file where the output's parent directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let outcome = PlainTextStrategy::new(false)
            .attempt(&input, &blocker.join("a.docx"))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.reason.tag(), "docx-save-failed");
    }

    #[tokio::test]
    async fn converts_latin1_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("latin.udf");
        std::fs::write(&input, [b'A', 0xE7, b'\n', b'B', 0x00, b'C']).unwrap();
        let out = dir.path().join("latin.docx");

        let outcome = PlainTextStrategy::new(false).attempt(&input, &out).await;

        assert_eq!(outcome, Outcome::ok(Reason::FallbackDocx));
        assert!(out.exists());
    }
}
