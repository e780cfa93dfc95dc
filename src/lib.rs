//! xml2hwpx - A Rust library for compiling structured XML into HWPX documents
//!
//! This library converts a small, restricted XML vocabulary (headings,
//! paragraphs, tables, lists, breaks and rules) into complete HWPX files,
//! the OWPML-based zip package format used by Hancom Office Hangul.
//!
//! # Features
//!
//! - **Strict schema**: unknown elements and attributes are rejected with
//!   precise errors instead of being dropped
//! - **Full packages**: every emitted file carries the complete HWPX part
//!   set, opening cleanly in Hangul and compatible viewers
//! - **Deterministic output**: identical input produces byte-identical
//!   packages, with no embedded timestamps
//! - **Configurable layout**: font family and paper geometry are chosen by
//!   the caller; everything else follows fixed, Hangul-native styling
//!
//! # Example
//!
//! ```
//! use xml2hwpx::{convert, LayoutConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let xml = r#"<document title="Report">
//!     <heading level="1">Results</heading>
//!     <p>All tests passed.</p>
//!     <table header="true">
//!         <row><cell>Case</cell><cell>Status</cell></row>
//!         <row><cell>parser</cell><cell>ok</cell></row>
//!     </table>
//! </document>"#;
//!
//! let bytes = convert(xml, None, Some("QA team"), &LayoutConfig::default())?;
//! assert_eq!(&bytes[..2], b"PK");
//! # Ok(())
//! # }
//! ```
//!
//! The pipeline runs in four stages, each usable on its own: [`schema::parse`]
//! builds the document model, [`layout::layout`] resolves styling and
//! geometry, [`emit::emit`] serializes the OWPML parts, and [`package::pack`]
//! assembles the archive.

pub mod emit;
pub mod error;
pub mod layout;
pub mod package;
pub mod schema;
pub mod xmlutil;

pub use error::{HwpxError, Result};
pub use layout::{DocumentMeta, LayoutConfig, Paper};
pub use schema::Document;

/// Convert schema-conforming XML into a complete HWPX package.
///
/// `title` and `author` override metadata embedded in the input; empty
/// strings count as absent. When neither source supplies a value, fixed
/// defaults are used.
pub fn convert(
    xml: &str,
    title: Option<&str>,
    author: Option<&str>,
    config: &LayoutConfig,
) -> Result<Vec<u8>> {
    let doc = schema::parse(xml)?;
    let meta = DocumentMeta::resolve(title, author, &doc);
    let styled = layout::layout(&doc, meta, config);
    let parts = emit::emit(&styled)?;
    package::pack(&parts)
}
