//! Error types for the xml2docx library.

use std::fmt;
use std::io;
use thiserror::Error;

use crate::xml2rfc::Location;

/// Result type alias for xml2docx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// The input could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not well-formed XML or lacks a required element or attribute.
    #[error("schema error at {location}: {message} (element `{element}`)")]
    Schema {
        /// Offending element name
        element: String,
        /// Approximate source location
        location: Location,
        /// What was wrong
        message: String,
    },

    /// A validated tree produced an impossible shape. This is an engine defect.
    #[error("internal model error: {0}")]
    InternalModel(String),

    /// Generated parts disagree with their content types or relationships.
    #[error("package invariant violated: {0}")]
    PackageInvariant(String),

    /// Writing the ZIP container failed.
    #[error("packaging error: {0}")]
    Packaging(String),

    /// A side output (JSON dump) could not be produced.
    #[error("render error: {0}")]
    Render(String),
}

/// Machine-readable error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input
    Schema,
    /// Engine bug
    InternalModel,
    /// Storage failure while writing the container
    Packaging,
    /// Input could not be read
    Io,
    /// Side output failure
    Render,
}

impl ErrorKind {
    /// Stable identifier for logs and exit messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Schema => "schema-error",
            ErrorKind::InternalModel => "internal-model-error",
            ErrorKind::Packaging => "packaging-error",
            ErrorKind::Io => "io-error",
            ErrorKind::Render => "render-error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Build a schema error for `element` at `location`.
    pub fn schema(element: impl Into<String>, location: Location, message: impl Into<String>) -> Self {
        Error::Schema {
            element: element.into(),
            location,
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Schema { .. } => ErrorKind::Schema,
            Error::InternalModel(_) | Error::PackageInvariant(_) => ErrorKind::InternalModel,
            Error::Packaging(_) => ErrorKind::Packaging,
            Error::Render(_) => ErrorKind::Render,
        }
    }

    /// The element named by a schema error, if any.
    pub fn element(&self) -> Option<&str> {
        match self {
            Error::Schema { element, .. } => Some(element),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Packaging(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}
