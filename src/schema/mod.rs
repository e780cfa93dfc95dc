//! Schema model for the restricted input document description.
//!
//! Plain data types mirroring the recognized tag surface. Surface
//! synonyms (`p`, `ul`, `ol`) are already normalized away by the parser,
//! so downstream stages see exactly one shape per concept.

pub mod parser;

pub use parser::parse;

/// Root of a parsed input document.
///
/// `title`/`author` hold the attributes embedded in the input, when
/// present. Precedence against caller-supplied metadata is decided by
/// [`crate::layout::DocumentMeta::resolve`], not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: Option<String>,
    pub author: Option<String>,
    pub blocks: Vec<Block>,
}

/// Section heading depth. Values outside 1–3 are rejected at parse time,
/// never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Parse the `level` attribute value.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "1" => Some(Self::H1),
            "2" => Some(Self::H2),
            "3" => Some(Self::H3),
            _ => None,
        }
    }

    /// Numeric depth, 1 being the largest heading.
    pub fn depth(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
        }
    }
}

/// One structural unit of document content, in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: HeadingLevel, text: String },
    Paragraph { text: String, bold: bool },
    Table { has_header: bool, rows: Vec<Row> },
    List { ordered: bool, items: Vec<String> },
    /// A deliberate blank line (`<br/>`), not the absence of a paragraph.
    Break,
    /// A full-width horizontal divider (`<hr/>`).
    Rule,
}

/// One table row. Guaranteed non-empty after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
}
