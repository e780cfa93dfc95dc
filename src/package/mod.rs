//! Zip packaging of emitted parts.
//!
//! The package is an OCF-style container whose first entry must be an
//! uncompressed `mimetype` so that readers identifying the file by its
//! leading bytes can do so without inflating anything. The writer also
//! checks the part list against the fixed entry set before touching the
//! archive, so a miswired emitter fails loudly instead of producing a
//! package some readers open and others reject.

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::emit::{Compression, MIMETYPE, Part, REQUIRED_PARTS};
use crate::error::{HwpxError, InternalError, PackagingError};

/// Write the parts into a zip archive, in the order given.
///
/// Fails with [`InternalError`] if the part list does not match the fixed
/// entry set exactly or if `mimetype` is not the first part.
pub fn pack(parts: &[Part]) -> Result<Vec<u8>, HwpxError> {
    check_completeness(parts)?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for part in parts {
        let method = match part.compression {
            Compression::Stored => zip::CompressionMethod::Stored,
            Compression::Deflated => zip::CompressionMethod::Deflated,
        };
        // Fixed timestamp keeps identical input byte-identical across runs.
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(zip::DateTime::default());
        writer
            .start_file(part.name, options)
            .map_err(|e| PackagingError::Zip(e.to_string()))?;
        writer
            .write_all(&part.data)
            .map_err(PackagingError::from)?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| PackagingError::Zip(e.to_string()))?;
    let bytes = cursor.into_inner();
    log::debug!("packaged {} parts into {} bytes", parts.len(), bytes.len());
    Ok(bytes)
}

fn check_completeness(parts: &[Part]) -> Result<(), InternalError> {
    for name in REQUIRED_PARTS {
        if !parts.iter().any(|p| p.name == name) {
            return Err(InternalError::MissingPart(name));
        }
    }
    for part in parts {
        if !REQUIRED_PARTS.contains(&part.name) {
            return Err(InternalError::UnexpectedPart(part.name.to_string()));
        }
    }
    match parts.first() {
        Some(first) if first.name == MIMETYPE => Ok(()),
        Some(first) => Err(InternalError::MimetypeNotFirst(first.name.to_string())),
        None => Err(InternalError::MissingPart(MIMETYPE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{MIME_TYPE, emit};
    use crate::layout::{DocumentMeta, LayoutConfig, layout};
    use crate::schema::parse;

    fn emitted_parts() -> Vec<Part> {
        let doc = parse("<document><p>hello</p></document>").unwrap();
        let meta = DocumentMeta::resolve(None, None, &doc);
        let styled = layout(&doc, meta, &LayoutConfig::default());
        emit(&styled).unwrap()
    }

    #[test]
    fn archive_leads_with_a_stored_mimetype() {
        let bytes = pack(&emitted_parts()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let entry = archive.by_index(0).unwrap();
        assert_eq!(entry.name(), MIMETYPE);
        assert_eq!(entry.compression(), zip::CompressionMethod::Stored);
        assert_eq!(entry.size(), MIME_TYPE.len() as u64);
    }

    #[test]
    fn archive_contains_every_part() {
        let parts = emitted_parts();
        let bytes = pack(&parts).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), parts.len());
        for part in &parts {
            assert!(archive.file_names().any(|n| n == part.name), "{}", part.name);
        }
    }

    #[test]
    fn missing_part_is_rejected() {
        let mut parts = emitted_parts();
        parts.pop();
        match pack(&parts) {
            Err(HwpxError::Internal(InternalError::MissingPart(_))) => {}
            other => panic!("expected MissingPart, got {:?}", other.map(|b| b.len())),
        }
    }

    #[test]
    fn misordered_mimetype_is_rejected() {
        let mut parts = emitted_parts();
        parts.swap(0, 1);
        match pack(&parts) {
            Err(HwpxError::Internal(InternalError::MimetypeNotFirst(name))) => {
                assert_ne!(name, MIMETYPE);
            }
            other => panic!("expected MimetypeNotFirst, got {:?}", other.map(|b| b.len())),
        }
    }

    #[test]
    fn packaging_is_deterministic() {
        let parts = emitted_parts();
        assert_eq!(pack(&parts).unwrap(), pack(&parts).unwrap());
    }
}
