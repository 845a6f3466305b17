//! Error types for project export.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting a project.
///
/// Missing or empty project fields are not errors: the assemblers
/// substitute defaults for them. Everything here is a request-level
/// failure with no partial artifact.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read input or write output.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The project snapshot could not be parsed.
    #[error("Invalid project snapshot: {0}")]
    InvalidProject(String),

    /// The requested export format is not supported.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// ZIP archive error while packaging an artifact.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML serialization error while writing a package part.
    #[error("XML writing error: {0}")]
    XmlError(String),

    /// The structural tree does not match the renderer it was given.
    #[error("Render error: {0}")]
    RenderError(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidProject(err.to_string())
    }
}
