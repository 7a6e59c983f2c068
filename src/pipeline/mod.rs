//! Pipeline stages for `.udf` → `.docx` conversion.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ strategy chain ──────────────────────────────▶ place
//! (walkdir)    pandoc ─▶ libreoffice ─▶ zip-content ─▶ plain-text
//! ```
//!
//! 1. [`discover`]  — validate the root, list `.udf` files, map output paths
//! 2. [`strategy`]  — the common [`strategy::Strategy`] interface and the
//!    ordered fallback chain
//! 3. [`pandoc`], [`office`] — external converters, reached through the
//!    injectable [`tools::Toolbox`]
//! 4. [`archive`], [`plaintext`] — in-process fallbacks built on
//!    [`sanitize`] and [`docx`]
//! 5. [`place`]     — temp-file-then-rename so destinations are never half written

pub mod archive;
pub mod discover;
pub mod docx;
pub mod office;
pub mod pandoc;
pub mod place;
pub mod plaintext;
pub mod sanitize;
pub mod strategy;
pub mod tools;
