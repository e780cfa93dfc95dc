//! XML parser/normalizer for the restricted input schema.
//!
//! Consumes the raw input string and builds a [`Document`] tree, or fails
//! with a [`SchemaError`] naming the offending construct. Surface synonyms
//! (`p`, `ul`, `ol`) are normalized to canonical blocks here, so the
//! layout and emission stages only ever see one shape per concept.
//!
//! DOCTYPE declarations are rejected outright and no external resource is
//! ever fetched, so the input cannot act as an attack surface against the
//! host process.

use crate::error::SchemaError;
use crate::schema::{Block, Cell, Document, HeadingLevel, Row};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

type Result<T> = std::result::Result<T, SchemaError>;

/// Parse a raw XML string into the schema model.
pub fn parse(raw: &str) -> Result<Document> {
    let mut reader = Reader::from_str(raw);
    let mut buf = Vec::new();
    let mut builder = Builder::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => builder.open(e, false)?,
            Ok(Event::Empty(ref e)) => builder.open(e, true)?,
            Ok(Event::End(ref e)) => builder.close(e.name().as_ref())?,
            Ok(Event::Text(ref t)) => {
                let text = String::from_utf8(t.to_vec())
                    .map_err(|e| SchemaError::Malformed(e.to_string()))?;
                builder.text(&text)?;
            }
            Ok(Event::CData(ref t)) => {
                let text = String::from_utf8(t.to_vec())
                    .map_err(|e| SchemaError::Malformed(e.to_string()))?;
                builder.text(&text)?;
            }
            Ok(Event::GeneralRef(ref e)) => {
                // quick-xml reports references as separate events instead of
                // resolving them inside Text.
                if let Some(ch) = e
                    .resolve_char_ref()
                    .map_err(|err| SchemaError::Malformed(err.to_string()))?
                {
                    builder.text(ch.encode_utf8(&mut [0u8; 4]))?;
                } else {
                    let name = e
                        .decode()
                        .map_err(|err| SchemaError::Malformed(err.to_string()))?;
                    builder.text(resolve_entity(&name)?)?;
                }
            }
            Ok(Event::DocType(_)) => return Err(SchemaError::DoctypeForbidden),
            Ok(Event::Decl(_)) | Ok(Event::Comment(_)) | Ok(Event::PI(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => return Err(SchemaError::Malformed(e.to_string())),
        }
        buf.clear();
    }

    builder.finish()
}

/// Resolve a named entity reference to its character data.
///
/// Only the five predefined XML entities are supported; anything else
/// would require a DTD, which is rejected.
fn resolve_entity(name: &str) -> Result<&'static str> {
    match name {
        "amp" => Ok("&"),
        "lt" => Ok("<"),
        "gt" => Ok(">"),
        "quot" => Ok("\""),
        "apos" => Ok("'"),
        _ => Err(SchemaError::Malformed(format!(
            "unsupported entity reference &{name};"
        ))),
    }
}

/// One partially-built element on the container stack.
enum Frame {
    Document {
        title: Option<String>,
        author: Option<String>,
        blocks: Vec<Block>,
    },
    Heading {
        level: HeadingLevel,
        text: String,
    },
    Paragraph {
        bold: bool,
        text: String,
    },
    Table {
        has_header: bool,
        rows: Vec<Row>,
    },
    Row {
        cells: Vec<Cell>,
    },
    Cell {
        text: String,
    },
    List {
        ordered: bool,
        items: Vec<String>,
    },
    Item {
        text: String,
    },
    Break,
    Rule,
}

impl Frame {
    /// Canonical tag name, for diagnostics.
    fn tag(&self) -> &'static str {
        match self {
            Frame::Document { .. } => "document",
            Frame::Heading { .. } => "heading",
            Frame::Paragraph { .. } => "paragraph",
            Frame::Table { .. } => "table",
            Frame::Row { .. } => "row",
            Frame::Cell { .. } => "cell",
            Frame::List { .. } => "list",
            Frame::Item { .. } => "item",
            Frame::Break => "br",
            Frame::Rule => "hr",
        }
    }

    /// Whether this element holds character data rather than children.
    fn takes_text(&self) -> bool {
        matches!(
            self,
            Frame::Heading { .. } | Frame::Paragraph { .. } | Frame::Cell { .. } | Frame::Item { .. }
        )
    }
}

/// Stack-based tree builder driven by the event loop.
struct Builder {
    /// Open elements, innermost last, paired with their surface spelling
    /// so mismatched end tags are caught even across synonyms.
    frames: Vec<(String, Frame)>,
    finished: Option<Document>,
}

impl Builder {
    fn new() -> Self {
        Self {
            frames: Vec::new(),
            finished: None,
        }
    }

    fn open(&mut self, e: &BytesStart<'_>, self_closing: bool) -> Result<()> {
        let surface = String::from_utf8_lossy(e.name().as_ref()).into_owned();

        if let Some((_, top)) = self.frames.last()
            && top.takes_text()
        {
            // Nested markup inside text content is never interpreted.
            return Err(SchemaError::MisplacedElement {
                parent: top.tag().to_string(),
                child: surface,
            });
        }

        let frame = match self.frames.last() {
            None => self.open_root(&surface, e)?,
            Some((_, Frame::Document { .. })) => self.open_block(&surface, e)?,
            Some((_, Frame::Table { .. })) => match surface.as_str() {
                "row" => {
                    require_no_attributes(e, "row")?;
                    Frame::Row { cells: Vec::new() }
                }
                _ => return Err(misplaced_or_unknown("table", &surface)),
            },
            Some((_, Frame::Row { .. })) => match surface.as_str() {
                "cell" => {
                    require_no_attributes(e, "cell")?;
                    Frame::Cell {
                        text: String::new(),
                    }
                }
                _ => return Err(misplaced_or_unknown("row", &surface)),
            },
            Some((_, Frame::List { .. })) => match surface.as_str() {
                "item" => {
                    require_no_attributes(e, "item")?;
                    Frame::Item {
                        text: String::new(),
                    }
                }
                _ => return Err(misplaced_or_unknown("list", &surface)),
            },
            // Break/Rule are childless; text frames were handled above.
            Some((_, parent)) => {
                return Err(SchemaError::MisplacedElement {
                    parent: parent.tag().to_string(),
                    child: surface,
                });
            }
        };

        self.frames.push((surface, frame));
        if self_closing {
            self.close(e.name().as_ref())?;
        }
        Ok(())
    }

    fn open_root(&mut self, surface: &str, e: &BytesStart<'_>) -> Result<Frame> {
        if self.finished.is_some() {
            return Err(SchemaError::TrailingContent);
        }
        if surface != "document" {
            return Err(SchemaError::UnexpectedRoot(surface.to_string()));
        }

        let mut title = None;
        let mut author = None;
        for (key, value) in attributes(e)? {
            match key.as_str() {
                "title" => title = Some(value),
                "author" => author = Some(value),
                _ => {
                    return Err(SchemaError::UnknownAttribute {
                        element: "document".to_string(),
                        attribute: key,
                    });
                }
            }
        }
        Ok(Frame::Document {
            title,
            author,
            blocks: Vec::new(),
        })
    }

    /// Open a body-level block, normalizing tag synonyms.
    fn open_block(&mut self, surface: &str, e: &BytesStart<'_>) -> Result<Frame> {
        match surface {
            "heading" => {
                let mut level = None;
                for (key, value) in attributes(e)? {
                    match key.as_str() {
                        "level" => {
                            level = Some(HeadingLevel::from_attr(&value).ok_or_else(|| {
                                SchemaError::InvalidAttributeValue {
                                    element: "heading".to_string(),
                                    attribute: "level".to_string(),
                                    value,
                                }
                            })?);
                        }
                        _ => return Err(unknown_attribute("heading", key)),
                    }
                }
                let level = level.ok_or_else(|| SchemaError::MissingAttribute {
                    element: "heading".to_string(),
                    attribute: "level".to_string(),
                })?;
                Ok(Frame::Heading {
                    level,
                    text: String::new(),
                })
            }
            "paragraph" | "p" => {
                let mut bold = false;
                for (key, value) in attributes(e)? {
                    match key.as_str() {
                        "bold" => bold = parse_bool(surface, "bold", &value)?,
                        _ => return Err(unknown_attribute(surface, key)),
                    }
                }
                Ok(Frame::Paragraph {
                    bold,
                    text: String::new(),
                })
            }
            "table" => {
                let mut has_header = false;
                for (key, value) in attributes(e)? {
                    match key.as_str() {
                        "header" => has_header = parse_bool("table", "header", &value)?,
                        _ => return Err(unknown_attribute("table", key)),
                    }
                }
                Ok(Frame::Table {
                    has_header,
                    rows: Vec::new(),
                })
            }
            "list" | "ul" => {
                let mut ordered = false;
                for (key, value) in attributes(e)? {
                    match key.as_str() {
                        "type" => match value.as_str() {
                            "ordered" => ordered = true,
                            _ => {
                                return Err(SchemaError::InvalidAttributeValue {
                                    element: surface.to_string(),
                                    attribute: "type".to_string(),
                                    value,
                                });
                            }
                        },
                        _ => return Err(unknown_attribute(surface, key)),
                    }
                }
                Ok(Frame::List {
                    ordered,
                    items: Vec::new(),
                })
            }
            "ol" => {
                require_no_attributes(e, "ol")?;
                Ok(Frame::List {
                    ordered: true,
                    items: Vec::new(),
                })
            }
            "br" => {
                require_no_attributes(e, "br")?;
                Ok(Frame::Break)
            }
            "hr" => {
                require_no_attributes(e, "hr")?;
                Ok(Frame::Rule)
            }
            "document" | "row" | "cell" | "item" => Err(SchemaError::MisplacedElement {
                parent: "document".to_string(),
                child: surface.to_string(),
            }),
            _ => Err(SchemaError::UnknownElement(surface.to_string())),
        }
    }

    fn close(&mut self, end_name: &[u8]) -> Result<()> {
        let (surface, frame) = self
            .frames
            .pop()
            .ok_or_else(|| SchemaError::Malformed("unmatched closing tag".to_string()))?;
        if surface.as_bytes() != end_name {
            return Err(SchemaError::Malformed(format!(
                "expected </{}>, found </{}>",
                surface,
                String::from_utf8_lossy(end_name)
            )));
        }

        let block = match frame {
            Frame::Document {
                title,
                author,
                blocks,
            } => {
                self.finished = Some(Document {
                    title,
                    author,
                    blocks,
                });
                return Ok(());
            }
            Frame::Heading { level, text } => Block::Heading {
                level,
                text: text.trim().to_string(),
            },
            Frame::Paragraph { bold, text } => Block::Paragraph {
                text: text.trim().to_string(),
                bold,
            },
            Frame::Table { has_header, rows } => {
                if rows.is_empty() {
                    return Err(SchemaError::EmptyTable);
                }
                Block::Table { has_header, rows }
            }
            Frame::Row { cells } => {
                if cells.is_empty() {
                    return Err(SchemaError::EmptyRow);
                }
                self.push_row(Row { cells });
                return Ok(());
            }
            Frame::Cell { text } => {
                self.push_cell(Cell {
                    text: text.trim().to_string(),
                });
                return Ok(());
            }
            Frame::List { ordered, items } => {
                if items.is_empty() {
                    return Err(SchemaError::EmptyList);
                }
                Block::List { ordered, items }
            }
            Frame::Item { text } => {
                self.push_item(text.trim().to_string());
                return Ok(());
            }
            Frame::Break => Block::Break,
            Frame::Rule => Block::Rule,
        };

        self.push_block(block);
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        match self.frames.last_mut() {
            Some((_, Frame::Heading { text: buf, .. }))
            | Some((_, Frame::Paragraph { text: buf, .. }))
            | Some((_, Frame::Cell { text: buf }))
            | Some((_, Frame::Item { text: buf })) => {
                buf.push_str(text);
                Ok(())
            }
            Some((_, frame)) => {
                // Whitespace between elements carries no meaning.
                if text.trim().is_empty() {
                    Ok(())
                } else {
                    Err(SchemaError::UnexpectedText(frame.tag().to_string()))
                }
            }
            None => {
                if text.trim().is_empty() {
                    Ok(())
                } else if self.finished.is_some() {
                    Err(SchemaError::TrailingContent)
                } else {
                    Err(SchemaError::Malformed(
                        "text content outside the root element".to_string(),
                    ))
                }
            }
        }
    }

    fn finish(self) -> Result<Document> {
        if let Some((_, frame)) = self.frames.last() {
            return Err(SchemaError::Malformed(format!(
                "unexpected end of input inside <{}>",
                frame.tag()
            )));
        }
        self.finished.ok_or(SchemaError::MissingRoot)
    }

    fn push_block(&mut self, block: Block) {
        if let Some((_, Frame::Document { blocks, .. })) = self.frames.last_mut() {
            blocks.push(block);
        }
    }

    fn push_row(&mut self, row: Row) {
        if let Some((_, Frame::Table { rows, .. })) = self.frames.last_mut() {
            rows.push(row);
        }
    }

    fn push_cell(&mut self, cell: Cell) {
        if let Some((_, Frame::Row { cells })) = self.frames.last_mut() {
            cells.push(cell);
        }
    }

    fn push_item(&mut self, item: String) {
        if let Some((_, Frame::List { items, .. })) = self.frames.last_mut() {
            items.push(item);
        }
    }
}

/// Collect an element's attributes with entity values resolved.
fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| SchemaError::Malformed(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| SchemaError::Malformed(err.to_string()))?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

fn require_no_attributes(e: &BytesStart<'_>, element: &str) -> Result<()> {
    if let Some((key, _)) = attributes(e)?.into_iter().next() {
        return Err(unknown_attribute(element, key));
    }
    Ok(())
}

fn unknown_attribute(element: &str, attribute: String) -> SchemaError {
    SchemaError::UnknownAttribute {
        element: element.to_string(),
        attribute,
    }
}

fn parse_bool(element: &str, attribute: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SchemaError::InvalidAttributeValue {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Recognized elements in an unexpected container: misplaced, everything
/// else: unknown.
fn misplaced_or_unknown(parent: &str, child: &str) -> SchemaError {
    const RECOGNIZED: [&str; 12] = [
        "document", "heading", "paragraph", "p", "table", "row", "cell", "list", "ul", "ol", "br",
        "hr",
    ];
    if RECOGNIZED.contains(&child) {
        SchemaError::MisplacedElement {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    } else {
        SchemaError::UnknownElement(child.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_blocks(body: &str) -> Vec<Block> {
        parse(&format!("<document>{}</document>", body))
            .expect("valid document")
            .blocks
    }

    #[test]
    fn parses_document_attributes() {
        let doc = parse(r#"<document title="T" author="A"></document>"#).unwrap();
        assert_eq!(doc.title.as_deref(), Some("T"));
        assert_eq!(doc.author.as_deref(), Some("A"));
        assert!(doc.blocks.is_empty());
    }

    #[test]
    fn parses_the_full_tag_surface() {
        let blocks = parse_blocks(
            r#"
            <heading level="1">H</heading>
            <paragraph>body</paragraph>
            <paragraph bold="true">strong</paragraph>
            <table header="true"><row><cell>a</cell><cell>b</cell></row></table>
            <list><item>one</item></list>
            <list type="ordered"><item>first</item></list>
            <br/>
            <hr/>
            "#,
        );
        assert_eq!(blocks.len(), 8);
        assert!(matches!(
            blocks[0],
            Block::Heading {
                level: HeadingLevel::H1,
                ..
            }
        ));
        assert!(matches!(blocks[2], Block::Paragraph { bold: true, .. }));
        assert!(matches!(blocks[3], Block::Table { has_header: true, .. }));
        assert!(matches!(blocks[4], Block::List { ordered: false, .. }));
        assert!(matches!(blocks[5], Block::List { ordered: true, .. }));
        assert!(matches!(blocks[6], Block::Break));
        assert!(matches!(blocks[7], Block::Rule));
    }

    #[test]
    fn normalizes_tag_synonyms() {
        let blocks = parse_blocks(
            "<p>short</p><ul><item>u</item></ul><ol><item>o</item></ol>",
        );
        assert_eq!(
            blocks[0],
            Block::Paragraph {
                text: "short".to_string(),
                bold: false
            }
        );
        assert!(matches!(&blocks[1], Block::List { ordered: false, items } if items == &["u"]));
        assert!(matches!(&blocks[2], Block::List { ordered: true, items } if items == &["o"]));
    }

    #[test]
    fn unescapes_entities_in_text_and_attributes() {
        let doc = parse(
            r#"<document title="A &amp; B"><paragraph>Hi &amp; bye &lt;x&gt; &#65;</paragraph></document>"#,
        )
        .unwrap();
        assert_eq!(doc.title.as_deref(), Some("A & B"));
        assert_eq!(
            doc.blocks[0],
            Block::Paragraph {
                text: "Hi & bye <x> A".to_string(),
                bold: false
            }
        );
    }

    #[test]
    fn rejects_non_predefined_entities() {
        let err = parse("<document><paragraph>&copy;</paragraph></document>").unwrap_err();
        assert!(matches!(err, SchemaError::Malformed(msg) if msg.contains("copy")));
    }

    #[test]
    fn trims_block_edges_but_preserves_internal_whitespace() {
        let blocks = parse_blocks("<paragraph>  a  b  </paragraph>");
        assert_eq!(
            blocks[0],
            Block::Paragraph {
                text: "a  b".to_string(),
                bold: false
            }
        );
    }

    #[test]
    fn rejects_unknown_elements_instead_of_dropping_them() {
        // Control: the same document without the unknown tag parses.
        let control = "<paragraph>a</paragraph><paragraph>b</paragraph>";
        assert_eq!(parse_blocks(control).len(), 2);

        let err = parse(&format!(
            "<document>{}<foo>x</foo></document>",
            control
        ))
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownElement(name) if name == "foo"));
    }

    #[test]
    fn rejects_out_of_range_heading_level() {
        let err = parse(r#"<document><heading level="4">H</heading></document>"#).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidAttributeValue { ref value, .. } if value == "4"
        ));
    }

    #[test]
    fn rejects_heading_without_level() {
        let err = parse("<document><heading>H</heading></document>").unwrap_err();
        assert!(matches!(err, SchemaError::MissingAttribute { .. }));
    }

    #[test]
    fn rejects_attribute_values_outside_their_domain() {
        let err = parse(r#"<document><paragraph bold="yes">x</paragraph></document>"#).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidAttributeValue { .. }));

        let err = parse(r#"<document><list type="fancy"><item>x</item></list></document>"#)
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidAttributeValue { .. }));
    }

    #[test]
    fn rejects_unknown_attributes() {
        let err = parse(r#"<document><paragraph color="red">x</paragraph></document>"#).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownAttribute { ref attribute, .. } if attribute == "color"
        ));
    }

    #[test]
    fn rejects_empty_containers() {
        assert!(matches!(
            parse("<document><table header=\"false\"></table></document>").unwrap_err(),
            SchemaError::EmptyTable
        ));
        assert!(matches!(
            parse("<document><table><row></row></table></document>").unwrap_err(),
            SchemaError::EmptyRow
        ));
        assert!(matches!(
            parse("<document><list></list></document>").unwrap_err(),
            SchemaError::EmptyList
        ));
    }

    #[test]
    fn rejects_markup_nested_inside_text_content() {
        let err = parse("<document><paragraph>a<b>c</b></paragraph></document>").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MisplacedElement { ref parent, .. } if parent == "paragraph"
        ));
    }

    #[test]
    fn rejects_misplaced_structure_elements() {
        let err = parse("<document><row><cell>x</cell></row></document>").unwrap_err();
        assert!(matches!(err, SchemaError::MisplacedElement { .. }));

        let err = parse("<document><table><cell>x</cell></table></document>").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::MisplacedElement { ref parent, .. } if parent == "table"
        ));
    }

    #[test]
    fn rejects_wrong_root_and_missing_root() {
        assert!(matches!(
            parse("<html><p>x</p></html>").unwrap_err(),
            SchemaError::UnexpectedRoot(name) if name == "html"
        ));
        assert!(matches!(parse("").unwrap_err(), SchemaError::MissingRoot));
    }

    #[test]
    fn rejects_doctype() {
        let err = parse("<!DOCTYPE document []><document></document>").unwrap_err();
        assert!(matches!(err, SchemaError::DoctypeForbidden));
    }

    #[test]
    fn rejects_malformed_xml() {
        assert!(matches!(
            parse("<document><paragraph>x</document>").unwrap_err(),
            SchemaError::Malformed(_)
        ));
        assert!(matches!(
            parse("<document><paragraph>x").unwrap_err(),
            SchemaError::Malformed(_)
        ));
    }

    #[test]
    fn ignores_whitespace_between_elements_but_not_stray_text() {
        assert_eq!(parse_blocks("\n  <p>x</p>\n  ").len(), 1);

        let err = parse("<document>stray<p>x</p></document>").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnexpectedText(parent) if parent == "document"
        ));
    }

    #[test]
    fn preserves_document_order_of_blocks() {
        let blocks = parse_blocks("<p>1</p><hr/><p>2</p>");
        assert!(matches!(&blocks[0], Block::Paragraph { text, .. } if text == "1"));
        assert!(matches!(blocks[1], Block::Rule));
        assert!(matches!(&blocks[2], Block::Paragraph { text, .. } if text == "2"));
    }
}
