//! The processing record: the JSON document written for each input.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::ProcessingConfig;
use crate::model::ExtractedDocument;

/// Characters of strict text kept in the preview.
pub const TEXT_PREVIEW_CHARS: usize = 500;

/// Version string recorded in every record.
pub const PROCESSOR_VERSION: &str = concat!("pdfproc ", env!("CARGO_PKG_VERSION"));

/// Wall-clock information about one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Time spent converting and rendering
    pub elapsed: Duration,
    /// When processing finished
    pub finished_at: DateTime<Local>,
}

impl Timing {
    /// Timing for a run that took `elapsed` and ends now.
    pub fn finished_now(elapsed: Duration) -> Self {
        Self {
            elapsed,
            finished_at: Local::now(),
        }
    }

    /// Elapsed seconds rounded to two decimals.
    pub fn seconds(&self) -> f64 {
        round2(self.elapsed.as_secs_f64())
    }

    /// Finish time as `YYYY-MM-DD HH:MM:SS`.
    pub fn timestamp(&self) -> String {
        self.finished_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Everything written to `{name}.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingRecord {
    /// Source and run information
    pub metadata: RecordMetadata,
    /// Content counts
    pub statistics: Statistics,
    /// The full extraction result
    pub document_content: ExtractedDocument,
    /// Condensed view of the content
    pub extraction_summary: ExtractionSummary,
}

/// Source and run information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Input path as given
    pub source_file: String,
    /// Input size in megabytes, two decimals
    pub file_size_mb: f64,
    /// Number of pages
    pub num_pages: u32,
    /// Processor name and version
    pub processor_version: String,
    /// Engine that produced the content
    pub engine: String,
    /// Feature switches in effect
    pub configuration: RecordConfiguration,
    /// Elapsed seconds (only with timing enabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_seconds: Option<f64>,
    /// Finish time (only with timing enabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_timestamp: Option<String>,
}

/// Feature switches recorded with the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConfiguration {
    /// OCR requested
    pub ocr_enabled: bool,
    /// Table structure requested
    pub table_extraction: bool,
    /// Picture images requested
    pub image_processing: bool,
    /// Picture classification requested
    pub picture_classification: bool,
}

impl From<&ProcessingConfig> for RecordConfiguration {
    fn from(config: &ProcessingConfig) -> Self {
        Self {
            ocr_enabled: config.enable_ocr,
            table_extraction: config.enable_tables,
            image_processing: config.generate_picture_images,
            picture_classification: config.enable_picture_classification,
        }
    }
}

/// Content counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Tables found
    pub num_tables: usize,
    /// Pictures found
    pub num_pictures: usize,
    /// Text items mentioning "Figure"
    pub num_figures: usize,
    /// Whitespace-separated words in the strict text
    pub estimated_word_count: usize,
}

impl Statistics {
    /// Count the content of a document.
    pub fn from_document(doc: &ExtractedDocument) -> Self {
        Self {
            num_tables: doc.tables().count(),
            num_pictures: doc.pictures().count(),
            num_figures: doc
                .text_items()
                .filter(|item| item.text().is_some_and(|t| t.contains("Figure")))
                .count(),
            estimated_word_count: doc.word_count(),
        }
    }
}

/// Condensed view of the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// Number of pages
    pub pages: u32,
    /// One entry per table, in reading order
    pub tables: Vec<TableSummary>,
    /// One entry per picture, in reading order
    pub images: Vec<ImageSummary>,
    /// Start of the strict text, followed by "..."
    pub text_preview: String,
}

/// Shape of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    /// 1-based table number
    pub table_id: usize,
    /// Row count
    pub rows: usize,
    /// Column count
    pub columns: usize,
    /// Whether header rows are declared
    pub has_headers: bool,
}

/// One picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    /// 1-based picture number
    pub image_id: usize,
    /// Item kind, always "picture"
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether a classification is attached
    pub has_classification: bool,
}

impl ExtractionSummary {
    /// Summarize a document.
    pub fn from_document(doc: &ExtractedDocument) -> Self {
        let tables = doc
            .tables()
            .enumerate()
            .map(|(i, table)| TableSummary {
                table_id: i + 1,
                rows: table.row_count(),
                columns: table.column_count(),
                has_headers: table.has_header(),
            })
            .collect();

        let images = doc
            .pictures()
            .enumerate()
            .map(|(i, picture)| ImageSummary {
                image_id: i + 1,
                kind: "picture".to_string(),
                has_classification: picture.classification.is_some(),
            })
            .collect();

        Self {
            pages: doc.num_pages(),
            tables,
            images,
            text_preview: text_preview(&doc.strict_text()),
        }
    }
}

impl ProcessingRecord {
    /// Build the record for a converted document.
    ///
    /// `timing` is only recorded when given; without it the record depends
    /// on nothing but the input and the configuration.
    pub fn new(
        source: &Path,
        size_bytes: u64,
        engine: &str,
        config: &ProcessingConfig,
        document: ExtractedDocument,
        timing: Option<&Timing>,
    ) -> Self {
        let metadata = RecordMetadata {
            source_file: source.display().to_string(),
            file_size_mb: round2(size_bytes as f64 / (1024.0 * 1024.0)),
            num_pages: document.num_pages(),
            processor_version: PROCESSOR_VERSION.to_string(),
            engine: engine.to_string(),
            configuration: RecordConfiguration::from(config),
            processing_time_seconds: timing.map(Timing::seconds),
            processing_timestamp: timing.map(Timing::timestamp),
        };

        Self {
            metadata,
            statistics: Statistics::from_document(&document),
            extraction_summary: ExtractionSummary::from_document(&document),
            document_content: document,
        }
    }
}

/// First [`TEXT_PREVIEW_CHARS`] characters followed by "...".
pub fn text_preview(text: &str) -> String {
    let mut preview: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
