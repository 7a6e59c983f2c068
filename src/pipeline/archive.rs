//! Strategy C: zip archive with a `content.xml` member.
//!
//! Many `.udf` files are really zip archives whose `content.xml` holds the
//! body text inside a `<content>` element, usually wrapped in CDATA. This
//! strategy pulls that text out and writes it as plain paragraphs. It is a
//! structural heuristic: styling, tables and images are lost.
//!
//! Detection is by signature, never by file name.

use crate::output::{Outcome, Reason};
use crate::pipeline::docx::write_paragraphs;
use crate::pipeline::place::kept_existing;
use crate::pipeline::sanitize::{paragraphs, sanitize_text, strip_cdata};
use crate::pipeline::strategy::Strategy;
use futures::future::{BoxFuture, FutureExt};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

/// Archive member holding the document body.
pub const CONTENT_MEMBER: &str = "content.xml";

/// Local file header, empty archive, and spanned archive markers.
const ZIP_SIGNATURES: [&[u8; 4]; 3] = [b"PK\x03\x04", b"PK\x05\x06", b"PK\x07\x08"];

static RE_CONTENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<content[^>]*>(.*?)</content>").unwrap());

pub struct ArchiveStrategy {
    overwrite: bool,
}

impl ArchiveStrategy {
    pub fn new(overwrite: bool) -> Self {
        Self { overwrite }
    }
}

impl Strategy for ArchiveStrategy {
    fn name(&self) -> &'static str {
        "zip-content"
    }

    fn attempt<'a>(&'a self, input: &'a Path, output: &'a Path) -> BoxFuture<'a, Outcome> {
        let input = input.to_path_buf();
        let output = output.to_path_buf();
        let overwrite = self.overwrite;
        async move {
            tokio::task::spawn_blocking(move || convert_blocking(&input, &output, overwrite))
                .await
                .unwrap_or_else(|e| Outcome::failed(Reason::ZipFailed(format!("task panicked: {e}"))))
        }
        .boxed()
    }
}

/// True if the file starts with a zip signature. Unreadable files are not zips.
pub fn looks_like_zip(path: &Path) -> bool {
    let mut magic = [0u8; 4];
    match File::open(path).and_then(|mut f| f.read_exact(&mut magic)) {
        Ok(()) => ZIP_SIGNATURES.iter().any(|sig| **sig == magic),
        Err(_) => false,
    }
}

/// The inner text of the first `<content …>…</content>` element.
pub fn extract_content(xml: &str) -> Option<&str> {
    RE_CONTENT
        .captures(xml)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn convert_blocking(input: &Path, output: &Path, overwrite: bool) -> Outcome {
    if !looks_like_zip(input) {
        return Outcome::failed(Reason::NotZip);
    }
    match try_convert(input, output, overwrite) {
        Ok(outcome) => outcome,
        Err(cause) => {
            debug!("zip-content failed for {}: {}", input.display(), cause);
            Outcome::failed(Reason::ZipFailed(cause))
        }
    }
}

fn try_convert(input: &Path, output: &Path, overwrite: bool) -> Result<Outcome, String> {
    let file = File::open(input).map_err(|e| e.to_string())?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| e.to_string())?;

    let raw = {
        let mut member = match archive.by_name(CONTENT_MEMBER) {
            Ok(m) => m,
            Err(ZipError::FileNotFound) => return Ok(Outcome::failed(Reason::NoContentXml)),
            Err(e) => return Err(e.to_string()),
        };
        let mut bytes = Vec::new();
        member.read_to_end(&mut bytes).map_err(|e| e.to_string())?;
        bytes
    };
    let xml = String::from_utf8_lossy(&raw);

    let Some(content) = extract_content(&xml) else {
        return Ok(Outcome::failed(Reason::NoContentTag));
    };
    let text = sanitize_text(strip_cdata(content));

    match write_paragraphs(output, paragraphs(&text), overwrite) {
        Ok(()) => Ok(Outcome::ok(Reason::ZipContent)),
        Err(e) if kept_existing(&e, output) => Ok(Outcome::ok(Reason::Exists)),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, members: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for (name, body) in members {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn extract_content_allows_attributes() {
        let xml = r#"<template><content type="text" id="1"><![CDATA[Hello]]></content></template>"#;
        assert_eq!(extract_content(xml), Some("<![CDATA[Hello]]>"));
        assert_eq!(extract_content("<template/>"), None);
    }

    #[test]
    fn extract_content_spans_lines_non_greedy() {
        let xml = "<content>a\nb</content><content>second</content>";
        assert_eq!(extract_content(xml), Some("a\nb"));
    }

    #[tokio::test]
    async fn plain_file_is_not_zip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plain.udf");
        std::fs::write(&input, "just text").unwrap();

        let outcome = ArchiveStrategy::new(false)
            .attempt(&input, &dir.path().join("plain.docx"))
            .await;

        assert_eq!(outcome, Outcome::failed(Reason::NotZip));
    }

    #[tokio::test]
    async fn missing_file_is_not_zip() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = ArchiveStrategy::new(false)
            .attempt(&dir.path().join("gone.udf"), &dir.path().join("gone.docx"))
            .await;
        assert_eq!(outcome, Outcome::failed(Reason::NotZip));
    }

    #[tokio::test]
    async fn zip_without_content_member() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.udf");
        write_zip(&input, &[("styles.xml", "<styles/>")]);

        let outcome = ArchiveStrategy::new(false)
            .attempt(&input, &dir.path().join("doc.docx"))
            .await;

        assert_eq!(outcome, Outcome::failed(Reason::NoContentXml));
    }

    #[tokio::test]
    async fn content_member_without_tag() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.udf");
        write_zip(&input, &[(CONTENT_MEMBER, "<template><body/></template>")]);

        let outcome = ArchiveStrategy::new(false)
            .attempt(&input, &dir.path().join("doc.docx"))
            .await;

        assert_eq!(outcome, Outcome::failed(Reason::NoContentTag));
        assert!(!dir.path().join("doc.docx").exists());
    }

    #[tokio::test]
    async fn truncated_zip_is_captured() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.udf");
        std::fs::write(&input, b"PK\x03\x04 truncated garbage").unwrap();

        let outcome = ArchiveStrategy::new(false)
            .attempt(&input, &dir.path().join("broken.docx"))
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.reason.tag(), "zip-failed");
        assert!(outcome.reason.cause().is_some());
    }

    #[tokio::test]
    async fn writes_document_from_cdata() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.udf");
        write_zip(
            &input,
            &[(
                CONTENT_MEMBER,
                "<template><content><![CDATA[Line1\r\nLine2]]></content></template>",
            )],
        );
        let out = dir.path().join("out/doc.docx");

        let outcome = ArchiveStrategy::new(false).attempt(&input, &out).await;

        assert_eq!(outcome, Outcome::ok(Reason::ZipContent));
        assert!(out.exists());
    }

    #[tokio::test]
    async fn existing_output_is_kept_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.udf");
        write_zip(&input, &[(CONTENT_MEMBER, "<content>text</content>")]);
        let out = dir.path().join("doc.docx");
        std::fs::write(&out, b"earlier").unwrap();

        let outcome = ArchiveStrategy::new(false).attempt(&input, &out).await;
        assert_eq!(outcome, Outcome::ok(Reason::Exists));
        assert_eq!(std::fs::read(&out).unwrap(), b"earlier");

        let outcome = ArchiveStrategy::new(true).attempt(&input, &out).await;
        assert_eq!(outcome, Outcome::ok(Reason::ZipContent));
        assert_ne!(std::fs::read(&out).unwrap(), b"earlier");
    }
}
