use thiserror::Error;

/// Main error type for i2b2prep
#[derive(Error, Debug)]
pub enum PrepError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal errors (missing or unreadable corpus directory)
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Document is still not well-formed XML after ampersand sanitization
    #[error("Malformed XML in {file} (after sanitization): {message}")]
    MalformedXml { file: String, message: String },

    /// Expected element is absent from the document
    #[error("Missing <{element}> element in {file}")]
    MissingElement { file: String, element: String },

    /// Expected attribute is absent from an element
    #[error("Missing attribute '{attribute}' on <{element}> in {file}")]
    MissingAttribute {
        file: String,
        element: String,
        attribute: String,
    },

    /// TEXT element exists but carries no character content
    #[error("<TEXT> element in {file} has no text content")]
    EmptyText { file: String },
}

/// Convenient Result type using PrepError
pub type Result<T> = std::result::Result<T, PrepError>;
