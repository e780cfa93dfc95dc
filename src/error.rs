//! Error types for the XML → HWPX pipeline.
//!
//! Three kinds are kept apart so a caller can decide what to surface to an
//! end user: [`SchemaError`] is always caused by untrusted input,
//! [`InternalError`] is always a defect in this crate, and
//! [`PackagingError`] is a resource-level failure of the archive writer.

use thiserror::Error;

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, HwpxError>;

/// The input failed to parse against the restricted document schema.
///
/// Every variant identifies the offending construct; nothing is dropped
/// silently.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The input is not well-formed XML
    #[error("input is not well-formed XML: {0}")]
    Malformed(String),

    /// The input contains no root element
    #[error("input contains no <document> root element")]
    MissingRoot,

    /// The root element is not the expected document container
    #[error("root element must be <document>, found <{0}>")]
    UnexpectedRoot(String),

    /// Content found after the closing document tag
    #[error("content is not allowed after </document>")]
    TrailingContent,

    /// An element outside the recognized tag surface
    #[error("unknown element <{0}>")]
    UnknownElement(String),

    /// A recognized element in a position the schema does not allow
    #[error("element <{child}> is not allowed inside <{parent}>")]
    MisplacedElement { parent: String, child: String },

    /// An attribute outside an element's enumerated surface
    #[error("element <{element}> does not accept attribute \"{attribute}\"")]
    UnknownAttribute { element: String, attribute: String },

    /// An attribute value outside its enumerated domain
    #[error("invalid value \"{value}\" for attribute \"{attribute}\" on <{element}>")]
    InvalidAttributeValue {
        element: String,
        attribute: String,
        value: String,
    },

    /// A required attribute is absent
    #[error("element <{element}> requires attribute \"{attribute}\"")]
    MissingAttribute { element: String, attribute: String },

    /// Non-whitespace text in an element that only takes child elements
    #[error("text content is not allowed directly inside <{0}>")]
    UnexpectedText(String),

    /// A table without rows is an authoring error, not something to drop
    #[error("<table> must contain at least one <row>")]
    EmptyTable,

    /// A row without cells
    #[error("<row> must contain at least one <cell>")]
    EmptyRow,

    /// A list without items
    #[error("<list> must contain at least one <item>")]
    EmptyList,

    /// DOCTYPE declarations are rejected; no entity expansion surface
    #[error("DOCTYPE declarations are not supported")]
    DoctypeForbidden,
}

/// An invariant this crate guarantees was violated.
///
/// Never caused by input; seeing one of these means a bug in the core.
#[derive(Error, Debug)]
pub enum InternalError {
    /// Body markup references a char property the header part does not declare
    #[error("section references char property {0} absent from the header part")]
    DanglingCharProperty(u32),

    /// Body markup references a para property the header part does not declare
    #[error("section references para property {0} absent from the header part")]
    DanglingParaProperty(u32),

    /// A required package part was not emitted
    #[error("required package part \"{0}\" was not emitted")]
    MissingPart(&'static str),

    /// A part outside the fixed entry set reached the package writer
    #[error("unexpected package part \"{0}\"")]
    UnexpectedPart(String),

    /// The type-identifying entry is not first in the part sequence
    #[error("\"mimetype\" must be the first package entry, found \"{0}\"")]
    MimetypeNotFirst(String),
}

/// The archive-assembly step failed for a resource reason.
#[derive(Error, Debug)]
pub enum PackagingError {
    /// ZIP writer error
    #[error("ZIP write failed: {0}")]
    Zip(String),

    /// IO error from the underlying buffer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Umbrella error for the whole pipeline.
#[derive(Error, Debug)]
pub enum HwpxError {
    /// Untrusted input failed schema validation
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Invariant violation inside the core
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// Archive assembly failure
    #[error(transparent)]
    Packaging(#[from] PackagingError),
}

impl HwpxError {
    /// Whether the error was caused by the caller's input.
    ///
    /// Callers typically show [`SchemaError`] messages to the document
    /// author and treat everything else as a fault to report.
    pub fn is_input_error(&self) -> bool {
        matches!(self, HwpxError::Schema(_))
    }
}
