use crate::units::Pt;
use thiserror::Error;

/// All errors that the crate can generate. Layout errors abort a render as a whole:
/// no partial page set is ever returned alongside one.
#[derive(Error, Debug)]
pub enum DocError {
    /// The record's document type is missing or is not one of the five known variants
    #[error("unrecognized document type: {}", .0.as_deref().unwrap_or("<missing>"))]
    UnrecognizedDocumentType(Option<String>),

    /// The record has no body paragraphs with content
    #[error("document has no body content")]
    EmptyBodyContent,

    /// The record has no sender name, so the signature block cannot be built
    #[error("document has no sender name")]
    MissingSender,

    /// A block that must not be split is taller than a whole page
    #[error("{unit} is {height} tall but a page only holds {usable}")]
    OversizedAtomicUnit { unit: String, height: Pt, usable: Pt },

    /// The text measurement adapter could not wrap or measure some text
    #[error("text measurement failed: {0}")]
    MeasurementFailure(String),

    #[error(transparent)]
    /// The document record JSON could not be parsed
    InvalidRecord(#[from] serde_json::Error),

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to parse the letterhead image
    Image(#[from] image::ImageError),

    /// A page referenced by the page order does not exist
    #[error("page missing from document")]
    PageMissing,
}
