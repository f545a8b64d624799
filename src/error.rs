//! Error types for pdfproc.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::engine::ConversionStatus;

/// Result type alias for pdfproc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while processing a document.
///
/// Variants split into two kinds: input errors (bad path, bad flags, bad
/// configuration) and processing errors (anything raised by the engine or
/// while writing outputs). See [`Error::is_input_error`].
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input path exists but is not a regular file.
    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The input extension is not in the supported list.
    #[error("Unsupported file type: {0}")]
    UnsupportedExtension(String),

    /// The input exceeds the configured size limit.
    #[error("File too large: {size_mb:.1}MB > {limit_mb}MB")]
    FileTooLarge {
        /// Actual size in megabytes
        size_mb: f64,
        /// Configured limit in megabytes
        limit_mb: f64,
    },

    /// The input does not start with a PDF header.
    #[error("Not a valid PDF: {0}")]
    NotPdf(String),

    /// An option value or option combination is invalid.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// The configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error raised by the PDF object layer.
    #[error("PDF parsing error: {0}")]
    Pdf(String),

    /// The PDF document is encrypted and cannot be opened.
    #[error("Document is encrypted")]
    Encrypted,

    /// The engine failed while extracting content.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The engine finished with a non-success status.
    #[error("Conversion failed with status: {status}{}", format_errors(.errors))]
    ConversionFailed {
        /// Final engine status
        status: ConversionStatus,
        /// Errors reported by the engine
        errors: Vec<String>,
    },

    /// Error while rendering an output format.
    #[error("Rendering error: {0}")]
    Render(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error was caused by the caller's input rather than by
    /// processing.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::NotAFile(_)
                | Error::UnsupportedExtension(_)
                | Error::FileTooLarge { .. }
                | Error::NotPdf(_)
                | Error::InvalidOption(_)
                | Error::Config(_)
        )
    }
}

fn format_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        String::new()
    } else {
        format!(" ({})", errors.join("; "))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::Pdf(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Render(format!("TOML serialization error: {}", err))
    }
}
