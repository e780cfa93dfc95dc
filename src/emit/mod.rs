//! Markup emitter: serializes a styled document into the package's
//! internal XML parts.
//!
//! Emission is total over content — every textual leaf was escaped through
//! [`crate::xmlutil::escape`] and every style id comes from the fixed
//! catalogs — so the only failure mode is an internal invariant violation,
//! surfaced as [`InternalError`] before any part is handed to the package
//! writer.

mod header;
mod manifest;
mod section;

use crate::error::InternalError;
use crate::layout::{CharStyle, ParaStyle, StyledBlock, StyledDocument};

/// Package part names, in archive order.
pub const MIMETYPE: &str = "mimetype";
pub const VERSION_XML: &str = "version.xml";
pub const CONTAINER_XML: &str = "META-INF/container.xml";
pub const MANIFEST_XML: &str = "META-INF/manifest.xml";
pub const CONTAINER_RDF: &str = "META-INF/container.rdf";
pub const CONTENT_HPF: &str = "Contents/content.hpf";
pub const HEADER_XML: &str = "Contents/header.xml";
pub const SECTION0_XML: &str = "Contents/section0.xml";
pub const SETTINGS_XML: &str = "settings.xml";
pub const PREVIEW_TEXT: &str = "Preview/PrvText.txt";

/// The complete, fixed entry set of an emitted package.
///
/// The package writer verifies every name is present exactly once and that
/// `mimetype` leads, so readers that sniff only the first entry succeed.
pub const REQUIRED_PARTS: [&str; 10] = [
    MIMETYPE,
    VERSION_XML,
    CONTAINER_XML,
    MANIFEST_XML,
    CONTAINER_RDF,
    CONTENT_HPF,
    HEADER_XML,
    SECTION0_XML,
    SETTINGS_XML,
    PREVIEW_TEXT,
];

/// The media type readers sniff from the leading stored entry.
pub const MIME_TYPE: &[u8] = b"application/hwp+zip";

/// OWPML namespace declarations carried by the header and section roots.
pub(crate) const HWPX_NAMESPACES: &str = concat!(
    r#"xmlns:ha="http://www.hancom.co.kr/hwpml/2011/app" "#,
    r#"xmlns:hp="http://www.hancom.co.kr/hwpml/2011/paragraph" "#,
    r#"xmlns:hp10="http://www.hancom.co.kr/hwpml/2016/paragraph" "#,
    r#"xmlns:hs="http://www.hancom.co.kr/hwpml/2011/section" "#,
    r#"xmlns:hc="http://www.hancom.co.kr/hwpml/2011/core" "#,
    r#"xmlns:hh="http://www.hancom.co.kr/hwpml/2011/head" "#,
    r#"xmlns:hhs="http://www.hancom.co.kr/hwpml/2011/history" "#,
    r#"xmlns:hm="http://www.hancom.co.kr/hwpml/2011/master-page" "#,
    r#"xmlns:hpf="http://www.hancom.co.kr/schema/2011/hpf" "#,
    r#"xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
    r#"xmlns:opf="http://www.idpf.org/2007/opf/" "#,
    r#"xmlns:ooxmlchart="http://www.hancom.co.kr/hwpml/2016/ooxmlchart" "#,
    r#"xmlns:hwpunitchar="http://www.hancom.co.kr/hwpml/2016/HwpUnitChar" "#,
    r#"xmlns:epub="http://www.idpf.org/2007/ops" "#,
    r#"xmlns:config="urn:oasis:names:tc:opendocument:xmlns:config:1.0""#
);

/// Storage mode for one archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Uncompressed, for the type-identifying entry
    Stored,
    Deflated,
}

/// One emitted package part.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: &'static str,
    pub data: Vec<u8>,
    pub compression: Compression,
}

impl Part {
    fn stored(name: &'static str, data: Vec<u8>) -> Self {
        Self {
            name,
            data,
            compression: Compression::Stored,
        }
    }

    fn deflated(name: &'static str, data: Vec<u8>) -> Self {
        Self {
            name,
            data,
            compression: Compression::Deflated,
        }
    }
}

/// Serialize a styled document into the fixed part set, in archive order.
pub fn emit(styled: &StyledDocument) -> Result<Vec<Part>, InternalError> {
    check_style_references(styled)?;

    let parts = vec![
        Part::stored(MIMETYPE, MIME_TYPE.to_vec()),
        Part::deflated(VERSION_XML, manifest::version_xml().into_bytes()),
        Part::deflated(CONTAINER_XML, manifest::container_xml().into_bytes()),
        Part::deflated(MANIFEST_XML, manifest::manifest_xml().into_bytes()),
        Part::deflated(CONTAINER_RDF, manifest::container_rdf().into_bytes()),
        Part::deflated(CONTENT_HPF, manifest::content_hpf(&styled.meta).into_bytes()),
        Part::deflated(HEADER_XML, header::header_xml(styled).into_bytes()),
        Part::deflated(SECTION0_XML, section::section_xml(styled).into_bytes()),
        Part::deflated(SETTINGS_XML, manifest::settings_xml().into_bytes()),
        Part::deflated(PREVIEW_TEXT, manifest::preview_text(styled).into_bytes()),
    ];

    log::debug!("emitted {} package parts", parts.len());
    Ok(parts)
}

/// Fail fast on a style id the header part will not declare.
///
/// Both sides are generated from the same catalogs, so a failure here is a
/// catalog divergence — a defect, not an input problem.
fn check_style_references(styled: &StyledDocument) -> Result<(), InternalError> {
    let char_count = CharStyle::ALL.len() as u32;
    let para_count = ParaStyle::ALL.len() as u32;

    for block in &styled.blocks {
        match block {
            StyledBlock::Paragraph(p) => {
                if p.para_style.id() >= para_count {
                    return Err(InternalError::DanglingParaProperty(p.para_style.id()));
                }
                for run in &p.runs {
                    if run.char_style.id() >= char_count {
                        return Err(InternalError::DanglingCharProperty(run.char_style.id()));
                    }
                }
            }
            StyledBlock::Table(t) => {
                for row in &t.rows {
                    for cell in &row.cells {
                        if cell.char_style.id() >= char_count {
                            return Err(InternalError::DanglingCharProperty(
                                cell.char_style.id(),
                            ));
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{DocumentMeta, LayoutConfig, layout};
    use crate::schema::parse;

    fn emit_doc(xml: &str) -> Vec<Part> {
        let doc = parse(xml).unwrap();
        let meta = DocumentMeta::resolve(None, None, &doc);
        let styled = layout(&doc, meta, &LayoutConfig::default());
        emit(&styled).unwrap()
    }

    fn part<'a>(parts: &'a [Part], name: &str) -> &'a Part {
        parts.iter().find(|p| p.name == name).expect("part present")
    }

    #[test]
    fn emits_every_required_part_exactly_once() {
        let parts = emit_doc("<document><p>x</p></document>");
        assert_eq!(parts.len(), REQUIRED_PARTS.len());
        for name in REQUIRED_PARTS {
            assert_eq!(parts.iter().filter(|p| p.name == name).count(), 1, "{name}");
        }
    }

    #[test]
    fn mimetype_is_first_and_stored() {
        let parts = emit_doc("<document></document>");
        assert_eq!(parts[0].name, MIMETYPE);
        assert_eq!(parts[0].compression, Compression::Stored);
        assert_eq!(parts[0].data, MIME_TYPE);
        assert!(
            parts[1..]
                .iter()
                .all(|p| p.compression == Compression::Deflated)
        );
    }

    #[test]
    fn every_xml_part_is_well_formed() {
        let parts = emit_doc(
            r#"<document title="T &amp; U"><heading level="1">H</heading>
               <p bold="true">x &amp; y</p>
               <table header="true"><row><cell>a</cell></row><row><cell>b</cell></row></table>
               <list type="ordered"><item>i</item></list><br/><hr/></document>"#,
        );
        for p in &parts {
            if !p.name.ends_with(".xml") && !p.name.ends_with(".hpf") && !p.name.ends_with(".rdf") {
                continue;
            }
            let text = std::str::from_utf8(&p.data).unwrap();
            let mut reader = quick_xml::Reader::from_str(text);
            let mut buf = Vec::new();
            loop {
                match reader.read_event_into(&mut buf) {
                    Ok(quick_xml::events::Event::Eof) => break,
                    Ok(_) => {}
                    Err(e) => panic!("{}: not well-formed: {}", p.name, e),
                }
                buf.clear();
            }
        }
    }

    #[test]
    fn text_reaches_the_section_part_only_in_escaped_form() {
        let parts = emit_doc(r#"<document><p>Hi &amp; "bye" &lt;x&gt;</p></document>"#);
        let section = std::str::from_utf8(&part(&parts, SECTION0_XML).data).unwrap();
        assert!(section.contains("Hi &amp; &quot;bye&quot; &lt;x&gt;"));
        assert!(!section.contains(r#"Hi & "bye""#));
    }
}
