//! The body/section part (`Contents/section0.xml`).
//!
//! Lays styled paragraphs and tables out as OWPML markup in document
//! order. The first paragraph carries the section properties (page size,
//! margins), per the format's convention.

use crate::layout::{
    Paper, StyledBlock, StyledDocument, StyledParagraph, StyledTable, border_fill,
};
use crate::xmlutil::escape;

use super::HWPX_NAMESPACES;

/// Page margins in HWP units.
const MARGIN_LEFT: u32 = 8504;
const MARGIN_RIGHT: u32 = 8504;
const MARGIN_TOP: u32 = 5668;
const MARGIN_BOTTOM: u32 = 4252;
const MARGIN_HEADER: u32 = 4252;
const MARGIN_FOOTER: u32 = 4252;

/// Nominal row height in HWP units; Hangul grows rows to fit content.
const CELL_HEIGHT: u32 = 1000;

/// Floor for the usable content width; papers narrower than the fixed
/// margins still get a positive table grid.
const MIN_CONTENT_WIDTH: u32 = 1000;

pub(super) fn section_xml(styled: &StyledDocument) -> String {
    let sec_pr = section_properties(styled.paper);

    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#);
    xml.push_str("<hs:sec ");
    xml.push_str(HWPX_NAMESPACES);
    xml.push('>');

    if styled.blocks.is_empty() {
        // A section must contain at least one paragraph to anchor secPr.
        xml.push_str(
            r#"<hp:p id="0" paraPrIDRef="0" styleIDRef="0" pageBreak="0" columnBreak="0" merged="0">"#,
        );
        xml.push_str(r#"<hp:run charPrIDRef="0">"#);
        xml.push_str(&sec_pr);
        xml.push_str(r#"<hp:t/></hp:run></hp:p>"#);
    } else {
        let mut table_seq = 0u32;
        for (index, block) in styled.blocks.iter().enumerate() {
            let lead_in = if index == 0 { Some(sec_pr.as_str()) } else { None };
            match block {
                StyledBlock::Paragraph(p) => push_paragraph(&mut xml, index, p, lead_in),
                StyledBlock::Table(t) => {
                    table_seq += 1;
                    push_table_paragraph(
                        &mut xml,
                        index,
                        t,
                        table_seq,
                        content_width(styled.paper),
                        lead_in,
                    );
                }
            }
        }
    }

    xml.push_str("</hs:sec>");
    xml
}

/// Width available to content between the page margins.
///
/// `Paper` is caller-built, so the width may be smaller than the margin
/// total; the result is clamped rather than allowed to underflow.
fn content_width(paper: Paper) -> u32 {
    paper
        .width
        .saturating_sub(MARGIN_LEFT + MARGIN_RIGHT)
        .max(MIN_CONTENT_WIDTH)
}

fn section_properties(paper: Paper) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(concat!(
        r#"<hp:secPr id="" textDirection="HORIZONTAL" spaceColumns="1134" tabStop="8000" "#,
        r#"tabStopVal="4000" tabStopUnit="HWPUNIT" outlineShapeIDRef="1" memoShapeIDRef="0" "#,
        r#"textVerticalWidthHead="0" masterPageCnt="0">"#
    ));
    xml.push_str(r#"<hp:grid lineGrid="0" charGrid="0" wonggojiFormat="0"/>"#);
    xml.push_str(r#"<hp:startNum pageStartsOn="BOTH" page="0" pic="0" tbl="0" equation="0"/>"#);
    xml.push_str(concat!(
        r#"<hp:visibility hideFirstHeader="0" hideFirstFooter="0" hideFirstMasterPage="0" "#,
        r#"border="SHOW_ALL" fill="SHOW_ALL" hideFirstPageNum="0" hideFirstEmptyLine="0" "#,
        r#"showLineNumber="0"/>"#
    ));
    xml.push_str(r#"<hp:lineNumberShape restartType="0" countBy="0" distance="0" startNumber="0"/>"#);
    xml.push_str(&format!(
        r#"<hp:pagePr landscape="WIDELY" width="{}" height="{}" gutterType="LEFT_ONLY">"#,
        paper.width, paper.height
    ));
    xml.push_str(&format!(
        r#"<hp:margin header="{}" footer="{}" gutter="0" left="{}" right="{}" top="{}" bottom="{}"/>"#,
        MARGIN_HEADER, MARGIN_FOOTER, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP, MARGIN_BOTTOM
    ));
    xml.push_str("</hp:pagePr>");
    xml.push_str("</hp:secPr>");
    xml.push_str(
        r#"<hp:ctrl><hp:colPr id="" type="NEWSPAPER" layout="LEFT" colCount="1" sameSz="1" sameGap="0"/></hp:ctrl>"#,
    );
    xml
}

fn open_paragraph(xml: &mut String, id: usize, para_pr: u32) {
    xml.push_str(&format!(
        r#"<hp:p id="{}" paraPrIDRef="{}" styleIDRef="0" pageBreak="0" columnBreak="0" merged="0">"#,
        id, para_pr
    ));
}

fn push_paragraph(xml: &mut String, id: usize, para: &StyledParagraph, lead_in: Option<&str>) {
    open_paragraph(xml, id, para.para_style.id());
    if let Some(sec_pr) = lead_in {
        xml.push_str(r#"<hp:run charPrIDRef="0">"#);
        xml.push_str(sec_pr);
        xml.push_str("</hp:run>");
    }
    for run in &para.runs {
        xml.push_str(&format!(r#"<hp:run charPrIDRef="{}">"#, run.char_style.id()));
        if run.text.is_empty() {
            xml.push_str("<hp:t/>");
        } else {
            xml.push_str(&format!("<hp:t>{}</hp:t>", escape(&run.text)));
        }
        xml.push_str("</hp:run>");
    }
    xml.push_str("</hp:p>");
}

/// Tables are anchored inside a wrapping paragraph's run.
fn push_table_paragraph(
    xml: &mut String,
    id: usize,
    table: &StyledTable,
    table_seq: u32,
    content_width: u32,
    lead_in: Option<&str>,
) {
    open_paragraph(xml, id, 0);
    if let Some(sec_pr) = lead_in {
        xml.push_str(r#"<hp:run charPrIDRef="0">"#);
        xml.push_str(sec_pr);
        xml.push_str("</hp:run>");
    }
    xml.push_str(r#"<hp:run charPrIDRef="0">"#);
    push_table(xml, table, table_seq, content_width);
    xml.push_str("<hp:t/></hp:run></hp:p>");
}

fn push_table(xml: &mut String, table: &StyledTable, table_seq: u32, content_width: u32) {
    let row_cnt = table.rows.len();
    let col_cnt = table.columns.max(1);
    let col_width = content_width / col_cnt as u32;
    let total_width = col_width * col_cnt as u32;
    let repeat_header = table.rows.first().is_some_and(|r| r.cells.iter().any(|c| c.header));

    xml.push_str(&format!(
        concat!(
            r#"<hp:tbl id="{}" zOrder="0" numberingType="TABLE" textWrap="TOP_AND_BOTTOM" "#,
            r#"textFlow="BOTH_SIDES" lock="0" dropcapstyle="None" pageBreak="CELL" "#,
            r#"repeatHeader="{}" rowCnt="{}" colCnt="{}" cellSpacing="0" borderFillIDRef="{}" noAdjust="0">"#,
            r#"<hp:sz width="{}" widthRelTo="ABSOLUTE" height="{}" heightRelTo="ABSOLUTE" protect="0"/>"#,
            r#"<hp:pos treatAsChar="0" affectLSpacing="0" flowWithText="1" allowOverlap="0" "#,
            r#"holdAnchorAndSO="0" vertRelTo="PARA" horzRelTo="PARA" vertAlign="TOP" "#,
            r#"horzAlign="LEFT" vertOffset="0" horzOffset="0"/>"#,
            r#"<hp:outMargin left="283" right="283" top="283" bottom="283"/>"#,
            r#"<hp:inMargin left="510" right="510" top="142" bottom="142"/>"#
        ),
        table_seq,
        if repeat_header { 1 } else { 0 },
        row_cnt,
        col_cnt,
        border_fill::TABLE_CELL,
        total_width,
        CELL_HEIGHT * row_cnt as u32,
    ));

    for (row_index, row) in table.rows.iter().enumerate() {
        xml.push_str("<hp:tr>");
        for col_index in 0..col_cnt {
            // Short rows are padded with empty plain cells so every row
            // spans the full grid.
            let (text, char_pr, header) = match row.cells.get(col_index) {
                Some(cell) => (cell.text.as_str(), cell.char_style.id(), cell.header),
                None => ("", crate::layout::CharStyle::Body.id(), false),
            };
            let fill = if header {
                border_fill::TABLE_HEADER_CELL
            } else {
                border_fill::TABLE_CELL
            };
            push_cell(
                xml, text, char_pr, header, fill, col_index, row_index, col_width,
            );
        }
        xml.push_str("</hp:tr>");
    }

    xml.push_str("</hp:tbl>");
}

#[allow(clippy::too_many_arguments)]
fn push_cell(
    xml: &mut String,
    text: &str,
    char_pr: u32,
    header: bool,
    fill: u32,
    col: usize,
    row: usize,
    width: u32,
) {
    let t = if text.is_empty() {
        "<hp:t/>".to_string()
    } else {
        format!("<hp:t>{}</hp:t>", escape(text))
    };
    xml.push_str(&format!(
        concat!(
            r#"<hp:tc name="" header="{}" hasMargin="0" protect="0" editable="0" dirty="0" borderFillIDRef="{}">"#,
            r#"<hp:subList id="" textDirection="HORIZONTAL" lineWrap="BREAK" vertAlign="CENTER" "#,
            r#"linkListIDRef="0" linkListNextIDRef="0" textWidth="0" textHeight="0" hasTextRef="0" hasNumRef="0">"#,
            r#"<hp:p id="0" paraPrIDRef="0" styleIDRef="0" pageBreak="0" columnBreak="0" merged="0">"#,
            r#"<hp:run charPrIDRef="{}">{}</hp:run>"#,
            r#"</hp:p></hp:subList>"#,
            r#"<hp:cellAddr colAddr="{}" rowAddr="{}"/>"#,
            r#"<hp:cellSpan colSpan="1" rowSpan="1"/>"#,
            r#"<hp:cellSz width="{}" height="{}"/>"#,
            r#"<hp:cellMargin left="510" right="510" top="142" bottom="142"/>"#,
            r#"</hp:tc>"#
        ),
        if header { 1 } else { 0 },
        fill,
        char_pr,
        t,
        col,
        row,
        width,
        CELL_HEIGHT,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DocumentMeta, LayoutConfig, layout};
    use crate::schema::parse;

    fn section_for(xml: &str) -> String {
        let doc = parse(xml).unwrap();
        let meta = DocumentMeta::resolve(None, None, &doc);
        section_xml(&layout(&doc, meta, &LayoutConfig::default()))
    }

    #[test]
    fn first_paragraph_carries_section_properties() {
        let xml = section_for("<document><p>a</p><p>b</p></document>");
        let first_p = xml.find("<hp:p ").unwrap();
        let sec_pr = xml.find("<hp:secPr ").unwrap();
        let second_p = xml[first_p + 1..].find("<hp:p ").unwrap() + first_p + 1;
        assert!(first_p < sec_pr && sec_pr < second_p);
        assert_eq!(xml.matches("<hp:secPr ").count(), 1);
    }

    #[test]
    fn empty_document_still_anchors_section_properties() {
        let xml = section_for("<document></document>");
        assert!(xml.contains("<hp:secPr "));
        assert!(xml.contains("<hp:p "));
    }

    #[test]
    fn page_geometry_comes_from_the_config() {
        let xml = section_for("<document></document>");
        assert!(xml.contains(r#"width="59528" height="84186""#));
    }

    #[test]
    fn header_table_styles_row_zero_distinctly() {
        let xml = section_for(
            r#"<document><table header="true">
                 <row><cell>h1</cell><cell>h2</cell></row>
                 <row><cell>d1</cell><cell>d2</cell></row>
               </table></document>"#,
        );
        assert!(xml.contains(r#"repeatHeader="1" rowCnt="2" colCnt="2""#));
        assert_eq!(xml.matches(r#"<hp:tc name="" header="1""#).count(), 2);
        assert_eq!(xml.matches(r#"<hp:tc name="" header="0""#).count(), 2);
        assert_eq!(
            xml.matches(&format!(
                r#"header="1" hasMargin="0" protect="0" editable="0" dirty="0" borderFillIDRef="{}""#,
                border_fill::TABLE_HEADER_CELL
            ))
            .count(),
            2
        );
    }

    #[test]
    fn headerless_table_styles_all_rows_identically() {
        let xml = section_for(
            r#"<document><table>
                 <row><cell>a</cell></row><row><cell>b</cell></row>
               </table></document>"#,
        );
        assert!(xml.contains(r#"repeatHeader="0""#));
        assert!(!xml.contains(r#"<hp:tc name="" header="1""#));
        assert!(!xml.contains(&format!(
            r#"borderFillIDRef="{}""#,
            border_fill::TABLE_HEADER_CELL
        )));
    }

    #[test]
    fn rule_paragraph_references_the_rule_para_property() {
        let xml = section_for("<document><hr/></document>");
        assert!(xml.contains(&format!(
            r#"paraPrIDRef="{}""#,
            crate::layout::ParaStyle::Rule.id()
        )));
    }

    #[test]
    fn break_emits_an_empty_text_run() {
        let xml = section_for("<document><p>a</p><br/></document>");
        assert!(xml.contains("<hp:t/>"));
    }

    #[test]
    fn tables_survive_papers_narrower_than_the_margins() {
        let doc = parse(
            "<document><table><row><cell>x</cell></row></table></document>",
        )
        .unwrap();
        let meta = DocumentMeta::resolve(None, None, &doc);
        let config = LayoutConfig {
            paper: Paper {
                width: 100,
                height: 84186,
            },
            ..LayoutConfig::default()
        };
        let xml = section_xml(&layout(&doc, meta, &config));
        assert!(xml.contains("<hp:tbl "));
        assert!(xml.contains(&format!(r#"<hp:cellSz width="{}""#, MIN_CONTENT_WIDTH)));
    }

    #[test]
    fn blocks_appear_in_document_order() {
        let xml = section_for("<document><p>first</p><p>second</p></document>");
        assert!(xml.find("first").unwrap() < xml.find("second").unwrap());
    }
}
