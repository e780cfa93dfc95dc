//! Fixed package plumbing parts: version record, OCF container, package
//! manifest, settings and the plain-text preview.
//!
//! Everything here is deterministic: no timestamps, no random identifiers.
//! The date metas in `content.hpf` are deliberately left empty so that
//! identical input produces byte-identical packages.

use crate::layout::{DocumentMeta, StyledBlock, StyledDocument};
use crate::xmlutil::escape;

use super::HWPX_NAMESPACES;

pub(super) fn version_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#,
        r#"<hv:HCFVersion xmlns:hv="http://www.hancom.co.kr/hwpml/2011/version" "#,
        r#"tagetApplication="WORDPROCESSOR" major="5" minor="1" micro="1" "#,
        r#"buildNumber="0" os="1" xmlVersion="1.5" application="Hancom Office Hangul" "#,
        r#"appVersion="12, 0, 0, 0"/>"#
    )
    .to_string()
}

pub(super) fn settings_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#,
        r#"<ha:HWPApplicationSetting xmlns:ha="http://www.hancom.co.kr/hwpml/2011/app" "#,
        r#"xmlns:config="urn:oasis:names:tc:opendocument:xmlns:config:1.0">"#,
        r#"<ha:CaretPosition listIDRef="0" paraIDRef="0" pos="0"/>"#,
        r#"</ha:HWPApplicationSetting>"#
    )
    .to_string()
}

pub(super) fn container_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#,
        r#"<ocf:container xmlns:ocf="urn:oasis:names:tc:opendocument:xmlns:container" "#,
        r#"xmlns:hpf="http://www.hancom.co.kr/schema/2011/hpf">"#,
        r#"<ocf:rootfiles>"#,
        r#"<ocf:rootfile full-path="Contents/content.hpf" media-type="application/hwpml-package+xml"/>"#,
        r#"<ocf:rootfile full-path="Preview/PrvText.txt" media-type="text/plain"/>"#,
        r#"<ocf:rootfile full-path="META-INF/container.rdf" media-type="application/rdf+xml"/>"#,
        r#"</ocf:rootfiles></ocf:container>"#
    )
    .to_string()
}

pub(super) fn manifest_xml() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#,
        r#"<odf:manifest xmlns:odf="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0"/>"#
    )
    .to_string()
}

pub(super) fn container_rdf() -> String {
    concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#,
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">"#,
        r#"<rdf:Description rdf:about="">"#,
        r#"<ns0:hasPart xmlns:ns0="http://www.hancom.co.kr/hwpml/2016/meta/pkg#" rdf:resource="Contents/header.xml"/>"#,
        r#"</rdf:Description>"#,
        r#"<rdf:Description rdf:about="Contents/header.xml">"#,
        r#"<rdf:type rdf:resource="http://www.hancom.co.kr/hwpml/2016/meta/pkg#HeaderFile"/>"#,
        r#"</rdf:Description>"#,
        r#"<rdf:Description rdf:about="">"#,
        r#"<ns0:hasPart xmlns:ns0="http://www.hancom.co.kr/hwpml/2016/meta/pkg#" rdf:resource="Contents/section0.xml"/>"#,
        r#"</rdf:Description>"#,
        r#"<rdf:Description rdf:about="Contents/section0.xml">"#,
        r#"<rdf:type rdf:resource="http://www.hancom.co.kr/hwpml/2016/meta/pkg#SectionFile"/>"#,
        r#"</rdf:Description>"#,
        r#"<rdf:Description rdf:about="">"#,
        r#"<rdf:type rdf:resource="http://www.hancom.co.kr/hwpml/2016/meta/pkg#Document"/>"#,
        r#"</rdf:Description></rdf:RDF>"#
    )
    .to_string()
}

/// The OPF package descriptor (`Contents/content.hpf`): metadata plus the
/// manifest and spine declaring the document's other parts and roles.
pub(super) fn content_hpf(meta: &DocumentMeta) -> String {
    let title = escape(&meta.title);
    let creator = escape(&meta.author);

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#,
            r#"<opf:package {} version="" unique-identifier="" id="">"#,
            r#"<opf:metadata>"#,
            r#"<opf:title>{}</opf:title>"#,
            r#"<opf:language>ko</opf:language>"#,
            r#"<opf:meta name="creator" content="text">{}</opf:meta>"#,
            r#"<opf:meta name="subject" content="text"/>"#,
            r#"<opf:meta name="description" content="text"/>"#,
            r#"<opf:meta name="lastsaveby" content="text">{}</opf:meta>"#,
            r#"<opf:meta name="CreatedDate" content="text"/>"#,
            r#"<opf:meta name="ModifiedDate" content="text"/>"#,
            r#"<opf:meta name="date" content="text"/>"#,
            r#"<opf:meta name="keyword" content="text"/>"#,
            r#"</opf:metadata>"#,
            r#"<opf:manifest>"#,
            r#"<opf:item id="header" href="Contents/header.xml" media-type="application/xml"/>"#,
            r#"<opf:item id="section0" href="Contents/section0.xml" media-type="application/xml"/>"#,
            r#"<opf:item id="settings" href="settings.xml" media-type="application/xml"/>"#,
            r#"</opf:manifest>"#,
            r#"<opf:spine>"#,
            r#"<opf:itemref idref="header" linear="yes"/>"#,
            r#"<opf:itemref idref="section0" linear="yes"/>"#,
            r#"</opf:spine></opf:package>"#
        ),
        HWPX_NAMESPACES,
        title,
        creator,
        creator,
    )
}

/// Plain-text preview: one line per paragraph, cells joined by tabs.
pub(super) fn preview_text(styled: &StyledDocument) -> String {
    let mut lines = Vec::new();
    for block in &styled.blocks {
        match block {
            StyledBlock::Paragraph(p) => {
                let text: String = p.runs.iter().map(|r| r.text.as_str()).collect();
                lines.push(text);
            }
            StyledBlock::Table(t) => {
                for row in &t.rows {
                    lines.push(
                        row.cells
                            .iter()
                            .map(|c| c.text.as_str())
                            .collect::<Vec<_>>()
                            .join("\t"),
                    );
                }
            }
        }
    }
    let text = lines.join("\n");
    // Readers expect the preview entry to be non-empty.
    if text.is_empty() { " ".to_string() } else { text }
}
