//! Fixed style catalogs shared by the layout engine and the markup emitter.
//!
//! Both the header part (which declares properties) and the section part
//! (which references them by id) are generated from these enums, so a
//! dangling reference can only come from the two sides disagreeing on the
//! catalog — which the emitter checks before assembly.

/// Character property buckets declared in the header part.
///
/// Discriminant order is the id order in `Contents/header.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharStyle {
    /// 10pt plain body text
    Body,
    /// 10pt bold body text
    BodyBold,
    /// 22pt bold, level-1 heading
    Heading1,
    /// 16pt bold, level-2 heading
    Heading2,
    /// 13pt bold, level-3 heading
    Heading3,
    /// 10pt bold on the header-row cell fill
    TableHeader,
}

impl CharStyle {
    /// Every bucket, in header-part id order.
    pub const ALL: [CharStyle; 6] = [
        CharStyle::Body,
        CharStyle::BodyBold,
        CharStyle::Heading1,
        CharStyle::Heading2,
        CharStyle::Heading3,
        CharStyle::TableHeader,
    ];

    /// Id referenced from section markup (`charPrIDRef`).
    pub fn id(self) -> u32 {
        match self {
            CharStyle::Body => 0,
            CharStyle::BodyBold => 1,
            CharStyle::Heading1 => 2,
            CharStyle::Heading2 => 3,
            CharStyle::Heading3 => 4,
            CharStyle::TableHeader => 5,
        }
    }

    /// Glyph height in HWP units (points × 100).
    pub fn height(self) -> u32 {
        match self {
            CharStyle::Body | CharStyle::BodyBold | CharStyle::TableHeader => 1000,
            CharStyle::Heading1 => 2200,
            CharStyle::Heading2 => 1600,
            CharStyle::Heading3 => 1300,
        }
    }

    /// Run weight.
    pub fn bold(self) -> bool {
        !matches!(self, CharStyle::Body)
    }
}

/// Paragraph property buckets declared in the header part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParaStyle {
    /// Justified body paragraph
    Body,
    /// Full-width horizontal divider: a paragraph whose border fill draws
    /// a solid bottom edge
    Rule,
}

impl ParaStyle {
    /// Every bucket, in header-part id order.
    pub const ALL: [ParaStyle; 2] = [ParaStyle::Body, ParaStyle::Rule];

    /// Id referenced from section markup (`paraPrIDRef`).
    pub fn id(self) -> u32 {
        match self {
            ParaStyle::Body => 0,
            ParaStyle::Rule => 1,
        }
    }
}

/// Border fill ids declared in the header part.
///
/// Referenced from char properties, paragraph properties and table cells.
pub mod border_fill {
    /// No visible border (page and plain paragraphs)
    pub const TRANSPARENT: u32 = 1;
    /// Solid border on all edges (table body cells)
    pub const TABLE_CELL: u32 = 2;
    /// Solid border plus gray fill (table header-row cells)
    pub const TABLE_HEADER_CELL: u32 = 3;
    /// Solid bottom edge only (horizontal rule paragraphs)
    pub const RULE: u32 = 4;

    /// Every declared id, in header-part order.
    pub const ALL: [u32; 4] = [TRANSPARENT, TABLE_CELL, TABLE_HEADER_CELL, RULE];
}
