//! # pdfproc
//!
//! Configurable PDF processing: one extraction call per document, written out
//! as JSON, Markdown, HTML, plain text and a summary report.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfproc::{process_file, Settings};
//!
//! fn main() -> pdfproc::Result<()> {
//!     let outcome = process_file("document.pdf", Settings::default())?;
//!     for (format, path) in &outcome.files.files {
//!         println!("{}: {}", format, path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Configuration**: defaults, optional TOML file, overrides ([`config`])
//! - **Engine options**: mapped from the configuration ([`pipeline`])
//! - **Extraction**: a [`ConversionEngine`] call, [`PdfEngine`] by default
//! - **Output**: every enabled format rendered in memory, then written ([`output`])

pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod processor;
pub mod record;

// Re-export commonly used types
pub use config::{ConfigOverrides, Device, ImageMode, LogLevel, Settings};
pub use detect::{is_pdf_bytes, sniff_bytes, sniff_path, PdfHeader};
pub use engine::{ConversionEngine, ConversionResult, ConversionStatus, PdfEngine};
pub use error::{Error, Result};
pub use model::{ExtractedDocument, Item, Metadata, Page, PictureItem, TableItem};
pub use output::{OutputFiles, OutputFormat, OutputWriter};
pub use pipeline::PipelineOptions;
pub use processor::{ProcessingOutcome, Processor};
pub use record::ProcessingRecord;

use std::path::Path;

/// Process a PDF file with the default engine and write all configured
/// outputs.
///
/// # Example
///
/// ```no_run
/// use pdfproc::{process_file, ConfigOverrides, Settings};
///
/// let mut settings = Settings::default();
/// settings.apply(&ConfigOverrides::new().simple()).unwrap();
/// let outcome = process_file("document.pdf", settings).unwrap();
/// println!("{} tables", outcome.record.statistics.num_tables);
/// ```
pub fn process_file<P: AsRef<Path>>(path: P, settings: Settings) -> Result<ProcessingOutcome> {
    Processor::new(settings)?.process(path)
}

/// Run the default engine on a file without writing anything.
pub fn extract<P: AsRef<Path>>(path: P, options: &PipelineOptions) -> Result<ConversionResult> {
    PdfEngine::new().convert(path.as_ref(), options)
}

/// Check if a file looks like a PDF.
pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
    sniff_path(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_missing_file() {
        assert!(!is_pdf("/nonexistent/file.pdf"));
    }

    #[test]
    fn test_process_file_missing() {
        let err = process_file("/nonexistent/file.pdf", Settings::default()).unwrap_err();
        assert!(err.is_input_error());
    }
}
