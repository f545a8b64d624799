//! Conversion engines.
//!
//! The processor treats extraction as a black box behind the
//! [`ConversionEngine`] trait: it hands over a path and
//! [`PipelineOptions`], gets back a [`ConversionResult`], and checks the
//! status. [`PdfEngine`] is the default implementation.
//!
//! # Example
//!
//! ```no_run
//! use pdfproc::engine::{ConversionEngine, PdfEngine};
//! use pdfproc::pipeline::PipelineOptions;
//! use std::path::Path;
//!
//! fn main() -> pdfproc::Result<()> {
//!     let engine = PdfEngine::new();
//!     let result = engine.convert(Path::new("document.pdf"), &PipelineOptions::default())?;
//!     println!("{}: {} pages", result.status, result.document.num_pages());
//!     Ok(())
//! }
//! ```

pub mod enrich;
mod pdf;

pub use pdf::PdfEngine;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::ExtractedDocument;
use crate::pipeline::PipelineOptions;

/// Final status of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversionStatus {
    /// Every page converted
    Success,
    /// Some pages failed; the document is incomplete
    PartialSuccess,
    /// Nothing usable was produced
    Failure,
}

impl fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConversionStatus::Success => "SUCCESS",
            ConversionStatus::PartialSuccess => "PARTIAL_SUCCESS",
            ConversionStatus::Failure => "FAILURE",
        };
        f.write_str(name)
    }
}

/// What an engine returns for one document.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// Final status
    pub status: ConversionStatus,

    /// Extracted document (possibly incomplete unless `status` is success)
    pub document: ExtractedDocument,

    /// Errors encountered, one entry per failed unit of work
    pub errors: Vec<String>,

    /// Non-fatal notes (unsupported options, fallbacks)
    pub warnings: Vec<String>,
}

impl ConversionResult {
    /// A successful result with no diagnostics.
    pub fn success(document: ExtractedDocument) -> Self {
        Self {
            status: ConversionStatus::Success,
            document,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a warning.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Whether the engine reported success.
    pub fn is_success(&self) -> bool {
        self.status == ConversionStatus::Success
    }
}

/// Features an engine can actually perform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineCapabilities {
    /// OCR of image-only pages
    pub ocr: bool,
    /// Table structure recovery
    pub table_structure: bool,
    /// Page image rendering
    pub page_images: bool,
}

impl EngineCapabilities {
    /// Warnings for options requested but not supported.
    pub fn unsupported(&self, options: &PipelineOptions) -> Vec<String> {
        let mut warnings = Vec::new();
        if options.do_ocr && !self.ocr {
            warnings.push(format!(
                "OCR requested ({}) but not available; image-only pages stay empty",
                options.ocr_languages.join(", ")
            ));
        }
        if options.do_table_structure && !self.table_structure {
            warnings.push("table structure recovery requested but not available".to_string());
        }
        if options.generate_page_images && !self.page_images {
            warnings.push("page image generation requested but not available".to_string());
        }
        warnings
    }
}

/// A document conversion engine.
///
/// Implementations must be usable from several threads and must not write
/// anything to disk.
pub trait ConversionEngine: Send + Sync {
    /// Short engine name recorded in the output metadata.
    fn name(&self) -> &str;

    /// Features this engine supports.
    fn capabilities(&self) -> EngineCapabilities;

    /// Convert the document at `source`.
    ///
    /// Errors are reserved for documents that cannot be opened at all;
    /// per-page failures are reported through [`ConversionResult::status`]
    /// and [`ConversionResult::errors`].
    fn convert(&self, source: &Path, options: &PipelineOptions) -> Result<ConversionResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(ConversionStatus::Success.to_string(), "SUCCESS");
        assert_eq!(ConversionStatus::Failure.to_string(), "FAILURE");
        assert_eq!(
            serde_json::to_string(&ConversionStatus::PartialSuccess).unwrap(),
            "\"PARTIAL_SUCCESS\""
        );
    }

    #[test]
    fn test_unsupported_warnings() {
        let none = EngineCapabilities::default();
        let options = PipelineOptions::default();
        assert_eq!(none.unsupported(&options).len(), 3);

        let options = PipelineOptions::default()
            .with_ocr(false)
            .with_table_structure(false);
        assert_eq!(none.unsupported(&options).len(), 1);

        let all = EngineCapabilities {
            ocr: true,
            table_structure: true,
            page_images: true,
        };
        assert!(all.unsupported(&PipelineOptions::default()).is_empty());
    }

    #[test]
    fn test_result_success() {
        let result = ConversionResult::success(ExtractedDocument::new("doc")).with_warning("note");
        assert!(result.is_success());
        assert_eq!(result.warnings, vec!["note"]);
    }
}
