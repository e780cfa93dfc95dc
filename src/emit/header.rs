//! The header/styles part (`Contents/header.xml`).
//!
//! Declares the fonts, border fills, character properties and paragraph
//! properties whose ids the section part references. Everything here is
//! generated from the fixed catalogs in [`crate::layout`], so the section
//! side can never reference an id this part does not declare.

use crate::layout::{CharStyle, ParaStyle, StyledDocument, border_fill};
use crate::xmlutil::escape;

use super::HWPX_NAMESPACES;

/// Languages a fontface must be declared for.
const FONT_LANGS: [&str; 7] = [
    "HANGUL", "LATIN", "HANJA", "JAPANESE", "OTHER", "SYMBOL", "USER",
];

/// Header-row cell fill color.
const HEADER_CELL_FILL: &str = "#E6E6E6";

pub(super) fn header_xml(styled: &StyledDocument) -> String {
    let mut xml = String::with_capacity(8192);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#);
    xml.push_str("<hh:head ");
    xml.push_str(HWPX_NAMESPACES);
    xml.push_str(r#" version="1.5" secCnt="1">"#);
    xml.push_str(
        r#"<hh:beginNum page="1" footnote="1" endnote="1" pic="1" tbl="1" equation="1"/>"#,
    );
    xml.push_str("<hh:refList>");

    push_fontfaces(&mut xml, &styled.font_family);
    push_border_fills(&mut xml);
    push_char_properties(&mut xml);
    push_tab_properties(&mut xml);
    push_para_properties(&mut xml);
    push_styles(&mut xml);

    xml.push_str("</hh:refList>");
    xml.push_str(
        r#"<hh:compatibleDocument targetProgram="HWP201X"><hh:layoutCompatibility/></hh:compatibleDocument>"#,
    );
    xml.push_str(r#"<hh:docOption><hh:linkinfo path="" pageInherit="0" footnoteInherit="0"/></hh:docOption>"#);
    xml.push_str("</hh:head>");
    xml
}

fn push_fontfaces(xml: &mut String, font_family: &str) {
    let face = escape(font_family);
    xml.push_str(&format!(
        r#"<hh:fontfaces itemCnt="{}">"#,
        FONT_LANGS.len()
    ));
    for lang in FONT_LANGS {
        xml.push_str(&format!(
            concat!(
                r#"<hh:fontface lang="{}" fontCnt="1">"#,
                r#"<hh:font id="0" face="{}" type="TTF" isEmbedded="0">"#,
                r#"<hh:typeInfo familyType="FCAT_UNKNOWN" weight="0" proportion="0" contrast="0" "#,
                r#"strokeVariation="0" armStyle="0" letterform="0" midline="0" xHeight="0"/>"#,
                r#"</hh:font></hh:fontface>"#
            ),
            lang, face
        ));
    }
    xml.push_str("</hh:fontfaces>");
}

/// One border edge in OWPML attribute form.
fn edge(name: &str, line: &str, width: &str) -> String {
    format!(
        r##"<hh:{name} type="{line}" width="{width} mm" color="#000000"/>"##,
        name = name,
        line = line,
        width = width
    )
}

fn push_border_fills(xml: &mut String) {
    xml.push_str(&format!(
        r#"<hh:borderFills itemCnt="{}">"#,
        border_fill::ALL.len()
    ));

    // 1: no visible border (pages, plain paragraphs, run backgrounds)
    push_border_fill(xml, border_fill::TRANSPARENT, "NONE", "NONE", None);
    // 2: solid border on all edges (table body cells)
    push_border_fill(xml, border_fill::TABLE_CELL, "SOLID", "SOLID", None);
    // 3: solid border plus gray fill (table header-row cells)
    push_border_fill(
        xml,
        border_fill::TABLE_HEADER_CELL,
        "SOLID",
        "SOLID",
        Some(HEADER_CELL_FILL),
    );
    // 4: bottom edge only (horizontal rule paragraphs)
    push_border_fill(xml, border_fill::RULE, "NONE", "SOLID", None);

    xml.push_str("</hh:borderFills>");
}

fn push_border_fill(
    xml: &mut String,
    id: u32,
    side_line: &str,
    bottom_line: &str,
    fill: Option<&str>,
) {
    xml.push_str(&format!(
        r#"<hh:borderFill id="{}" threeD="0" shadow="0" centerLine="NONE" breakCellSeparateLine="0">"#,
        id
    ));
    xml.push_str(r#"<hh:slash type="NONE" Crooked="0" isCounter="0"/>"#);
    xml.push_str(r#"<hh:backSlash type="NONE" Crooked="0" isCounter="0"/>"#);
    xml.push_str(&edge("leftBorder", side_line, "0.12"));
    xml.push_str(&edge("rightBorder", side_line, "0.12"));
    xml.push_str(&edge("topBorder", side_line, "0.12"));
    xml.push_str(&edge("bottomBorder", bottom_line, "0.12"));
    xml.push_str(&edge("diagonal", "NONE", "0.1"));
    if let Some(color) = fill {
        xml.push_str(&format!(
            r##"<hc:fillBrush><hc:winBrush faceColor="{}" hatchColor="#999999" alpha="0"/></hc:fillBrush>"##,
            color
        ));
    }
    xml.push_str("</hh:borderFill>");
}

fn push_char_properties(xml: &mut String) {
    xml.push_str(&format!(
        r#"<hh:charProperties itemCnt="{}">"#,
        CharStyle::ALL.len()
    ));
    for style in CharStyle::ALL {
        let bold_attr = if style.bold() { r#" bold="1""# } else { "" };
        xml.push_str(&format!(
            concat!(
                r##"<hh:charPr id="{}" height="{}"{} textColor="#000000" shadeColor="none" "##,
                r#"useFontSpace="0" useKerning="0" symMark="NONE" borderFillIDRef="{}">"#,
                r#"<hh:fontRef hangul="0" latin="0" hanja="0" japanese="0" other="0" symbol="0" user="0"/>"#,
                r#"<hh:ratio hangul="100" latin="100" hanja="100" japanese="100" other="100" symbol="100" user="100"/>"#,
                r#"<hh:spacing hangul="0" latin="0" hanja="0" japanese="0" other="0" symbol="0" user="0"/>"#,
                r#"<hh:relSz hangul="100" latin="100" hanja="100" japanese="100" other="100" symbol="100" user="100"/>"#,
                r#"<hh:offset hangul="0" latin="0" hanja="0" japanese="0" other="0" symbol="0" user="0"/>"#,
                r##"<hh:underline type="NONE" shape="SOLID" color="#000000"/>"##,
                r##"<hh:strikeout shape="NONE" color="#000000"/>"##,
                r#"<hh:outline type="NONE"/>"#,
                r##"<hh:shadow type="NONE" color="#808080" offsetX="10" offsetY="10"/>"##,
                r#"</hh:charPr>"#
            ),
            style.id(),
            style.height(),
            bold_attr,
            crate::layout::border_fill::TRANSPARENT,
        ));
    }
    xml.push_str("</hh:charProperties>");
}

fn push_tab_properties(xml: &mut String) {
    xml.push_str(
        r#"<hh:tabProperties itemCnt="1"><hh:tabPr id="0" autoTabLeft="0" autoTabRight="0"/></hh:tabProperties>"#,
    );
}

fn push_para_properties(xml: &mut String) {
    xml.push_str(&format!(
        r#"<hh:paraProperties itemCnt="{}">"#,
        ParaStyle::ALL.len()
    ));
    for style in ParaStyle::ALL {
        let fill_ref = match style {
            ParaStyle::Body => border_fill::TRANSPARENT,
            ParaStyle::Rule => border_fill::RULE,
        };
        xml.push_str(&format!(
            concat!(
                r#"<hh:paraPr id="{}" tabPrIDRef="0" condense="0" fontLineHeight="0" "#,
                r#"snapToGrid="1" suppressLineNumbers="0" checked="0">"#,
                r#"<hh:align horizontal="JUSTIFY" vertical="BASELINE"/>"#,
                r#"<hh:heading type="NONE" idRef="0" level="0"/>"#,
                r#"<hh:breakSetting breakLatinWord="KEEP_WORD" breakNonLatinWord="KEEP_WORD" "#,
                r#"widowOrphan="0" keepWithNext="0" keepLines="0" pageBreakBefore="0" lineWrap="BREAK"/>"#,
                r#"<hh:autoSpacing eAsianEng="0" eAsianNum="0"/>"#,
                r#"<hh:margin><hc:intent value="0" unit="HWPUNIT"/><hc:left value="0" unit="HWPUNIT"/>"#,
                r#"<hc:right value="0" unit="HWPUNIT"/><hc:prev value="0" unit="HWPUNIT"/>"#,
                r#"<hc:next value="0" unit="HWPUNIT"/></hh:margin>"#,
                r#"<hh:lineSpacing type="PERCENT" value="160" unit="HWPUNIT"/>"#,
                r#"<hh:border borderFillIDRef="{}" offsetLeft="0" offsetRight="0" offsetTop="0" "#,
                r#"offsetBottom="0" connect="0" ignoreMargin="0"/>"#,
                r#"</hh:paraPr>"#
            ),
            style.id(),
            fill_ref
        ));
    }
    xml.push_str("</hh:paraProperties>");
}

fn push_styles(xml: &mut String) {
    xml.push_str(r#"<hh:styles itemCnt="1">"#);
    xml.push_str(
        r#"<hh:style id="0" type="PARA" name="바탕글" engName="Normal" paraPrIDRef="0" charPrIDRef="0" nextStyleIDRef="0" langID="1042" lockForm="0"/>"#,
    );
    xml.push_str("</hh:styles>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DocumentMeta, LayoutConfig, StyledDocument};

    fn empty_styled() -> StyledDocument {
        StyledDocument {
            meta: DocumentMeta {
                title: "T".to_string(),
                author: "A".to_string(),
            },
            font_family: LayoutConfig::default().font_family,
            paper: crate::layout::Paper::A4,
            blocks: Vec::new(),
        }
    }

    #[test]
    fn declares_every_catalog_entry() {
        let xml = header_xml(&empty_styled());
        assert!(xml.contains(&format!(
            r#"<hh:charProperties itemCnt="{}">"#,
            CharStyle::ALL.len()
        )));
        for style in CharStyle::ALL {
            assert!(xml.contains(&format!(
                r#"<hh:charPr id="{}" height="{}""#,
                style.id(),
                style.height()
            )));
        }
        for id in border_fill::ALL {
            assert!(xml.contains(&format!(r#"<hh:borderFill id="{}""#, id)));
        }
    }

    #[test]
    fn font_family_is_escaped_and_declared_per_language() {
        let mut styled = empty_styled();
        styled.font_family = "A&B".to_string();
        let xml = header_xml(&styled);
        assert_eq!(xml.matches(r#"face="A&amp;B""#).count(), FONT_LANGS.len());
        assert!(!xml.contains(r#"face="A&B""#));
    }

    #[test]
    fn border_edges_and_fills_carry_explicit_colors() {
        let xml = header_xml(&empty_styled());
        assert!(xml.contains(r##"color="#000000""##));
        assert!(xml.contains(&format!(
            r##"faceColor="{}" hatchColor="#999999""##,
            HEADER_CELL_FILL
        )));
        assert!(xml.contains(r##"<hh:shadow type="NONE" color="#808080""##));
    }

    #[test]
    fn heading_properties_are_bold_and_sized() {
        let xml = header_xml(&empty_styled());
        assert!(xml.contains(r#"<hh:charPr id="2" height="2200" bold="1""#));
        // Plain body text carries no bold attribute.
        assert!(xml.contains(r#"<hh:charPr id="0" height="1000" textColor"#));
    }
}
