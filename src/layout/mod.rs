//! Document model and layout/styling engine.
//!
//! Maps canonical schema blocks onto styled paragraph/run and table
//! structures carrying resolved property ids, ready for markup emission.
//! Layout is total: every structurally valid [`Document`] lays out; all
//! failure belongs to the parsing stage.

mod styles;

pub use styles::{CharStyle, ParaStyle, border_fill};

use crate::schema::{Block, Document, HeadingLevel};

/// Fixed fallbacks applied when neither the caller nor the input supplies
/// a value.
pub const DEFAULT_TITLE: &str = "문서";
pub const DEFAULT_AUTHOR: &str = "작성자";

/// The bullet glyph for unordered list items.
const BULLET: &str = "•";

/// Process-wide presentation defaults, passed explicitly into every call.
///
/// Nothing in the core mutates ambient configuration; a hosting process
/// that wants per-request settings builds one of these per request.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Default font family for every run (the format resolves per-language
    /// faces from this single name)
    pub font_family: String,
    /// Page geometry
    pub paper: Paper,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_family: "함초롬돋움".to_string(),
            paper: Paper::A4,
        }
    }
}

/// Page geometry in HWP units (1/7200 inch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paper {
    pub width: u32,
    pub height: u32,
}

impl Paper {
    /// A4 portrait, 210 × 297 mm.
    pub const A4: Paper = Paper {
        width: 59528,
        height: 84186,
    };
}

/// Resolved document metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub title: String,
    pub author: String,
}

impl DocumentMeta {
    /// Resolve metadata precedence: an explicit caller value wins only when
    /// non-empty, else the attribute embedded in the input, else the fixed
    /// default.
    pub fn resolve(
        caller_title: Option<&str>,
        caller_author: Option<&str>,
        doc: &Document,
    ) -> Self {
        Self {
            title: pick(caller_title, doc.title.as_deref(), DEFAULT_TITLE),
            author: pick(caller_author, doc.author.as_deref(), DEFAULT_AUTHOR),
        }
    }
}

fn pick(caller: Option<&str>, embedded: Option<&str>, fallback: &str) -> String {
    let non_empty = |s: &&str| !s.trim().is_empty();
    caller
        .filter(non_empty)
        .or(embedded.filter(non_empty))
        .unwrap_or(fallback)
        .to_string()
}

/// A styled span of text within a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub char_style: CharStyle,
    pub text: String,
}

/// One laid-out paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledParagraph {
    pub para_style: ParaStyle,
    pub runs: Vec<Run>,
}

impl StyledParagraph {
    fn single(para_style: ParaStyle, char_style: CharStyle, text: String) -> Self {
        Self {
            para_style,
            runs: vec![Run { char_style, text }],
        }
    }
}

/// One laid-out table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledCell {
    pub char_style: CharStyle,
    /// Header-row cells get the distinct border fill
    pub header: bool,
    pub text: String,
}

/// One laid-out table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRow {
    pub cells: Vec<StyledCell>,
}

/// One laid-out table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledTable {
    pub rows: Vec<StyledRow>,
    /// Column count of the widest row; short rows are padded at emission
    pub columns: usize,
}

/// A low-level structure ready for markup emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyledBlock {
    Paragraph(StyledParagraph),
    Table(StyledTable),
}

/// The renderer-independent output of the layout stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledDocument {
    pub meta: DocumentMeta,
    pub font_family: String,
    pub paper: Paper,
    pub blocks: Vec<StyledBlock>,
}

/// Lay a parsed document out into styled low-level structures.
pub fn layout(doc: &Document, meta: DocumentMeta, config: &LayoutConfig) -> StyledDocument {
    let mut blocks = Vec::with_capacity(doc.blocks.len());

    for block in &doc.blocks {
        match block {
            Block::Heading { level, text } => {
                blocks.push(StyledBlock::Paragraph(StyledParagraph::single(
                    ParaStyle::Body,
                    heading_style(*level),
                    text.clone(),
                )));
            }
            Block::Paragraph { text, bold } => {
                let style = if *bold {
                    CharStyle::BodyBold
                } else {
                    CharStyle::Body
                };
                blocks.push(StyledBlock::Paragraph(StyledParagraph::single(
                    ParaStyle::Body,
                    style,
                    text.clone(),
                )));
            }
            Block::Table { has_header, rows } => {
                blocks.push(StyledBlock::Table(layout_table(*has_header, rows)));
            }
            Block::List { ordered, items } => {
                // Numbering restarts at 1 for every independent list block.
                for (index, item) in items.iter().enumerate() {
                    let text = if *ordered {
                        format!("{}. {}", index + 1, item)
                    } else {
                        format!("{} {}", BULLET, item)
                    };
                    blocks.push(StyledBlock::Paragraph(StyledParagraph::single(
                        ParaStyle::Body,
                        CharStyle::Body,
                        text,
                    )));
                }
            }
            Block::Break => {
                // A deliberate blank line, not an omitted paragraph.
                blocks.push(StyledBlock::Paragraph(StyledParagraph::single(
                    ParaStyle::Body,
                    CharStyle::Body,
                    String::new(),
                )));
            }
            Block::Rule => {
                blocks.push(StyledBlock::Paragraph(StyledParagraph::single(
                    ParaStyle::Rule,
                    CharStyle::Body,
                    String::new(),
                )));
            }
        }
    }

    log::debug!(
        "laid out {} schema blocks into {} styled blocks",
        doc.blocks.len(),
        blocks.len()
    );

    StyledDocument {
        meta,
        font_family: config.font_family.clone(),
        paper: config.paper,
        blocks,
    }
}

fn heading_style(level: HeadingLevel) -> CharStyle {
    match level {
        HeadingLevel::H1 => CharStyle::Heading1,
        HeadingLevel::H2 => CharStyle::Heading2,
        HeadingLevel::H3 => CharStyle::Heading3,
    }
}

fn layout_table(has_header: bool, rows: &[crate::schema::Row]) -> StyledTable {
    let columns = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);

    let styled_rows = rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            let header = has_header && row_index == 0;
            let char_style = if header {
                CharStyle::TableHeader
            } else {
                CharStyle::Body
            };
            StyledRow {
                cells: row
                    .cells
                    .iter()
                    .map(|cell| StyledCell {
                        char_style,
                        header,
                        text: cell.text.clone(),
                    })
                    .collect(),
            }
        })
        .collect();

    StyledTable {
        rows: styled_rows,
        columns,
    }
}
