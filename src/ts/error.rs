use thiserror::Error;

/// Errors raised while reading a `.ts` catalog.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The catalog file could not be read
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not well-formed XML
    #[error("Malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },
    /// The root element is not `<TS>`
    #[error("Expected <TS> root element, found <{0}>")]
    UnexpectedRoot(String),
    /// The document has no root element at all
    #[error("Document has no <TS> root element")]
    MissingRoot,
    /// A required child element is absent, e.g. a message without `<source>`
    #[error("<{parent}> at byte {position} has no <{element}>")]
    MissingElement { parent: &'static str, element: &'static str, position: u64 },
    /// An attribute carries a value outside the TS vocabulary
    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute { element: &'static str, attribute: &'static str, value: String },
}
