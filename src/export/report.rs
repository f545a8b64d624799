//! Human-readable summary report.

use std::fmt::Write;

use crate::record::{ProcessingRecord, Timing};

const RULE_WIDTH: usize = 50;

/// Render the summary report for a record.
///
/// Timing lines are included only when `timing` is given.
pub fn to_report(record: &ProcessingRecord, timing: Option<&Timing>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, record, timing);
    out
}

fn write_report(
    out: &mut String,
    record: &ProcessingRecord,
    timing: Option<&Timing>,
) -> std::fmt::Result {
    let metadata = &record.metadata;
    let stats = &record.statistics;
    let config = &metadata.configuration;
    let summary = &record.extraction_summary;

    writeln!(out, "PDF PROCESSING REPORT")?;
    writeln!(out, "{}\n", "=".repeat(RULE_WIDTH))?;

    section(out, "DOCUMENT INFORMATION")?;
    writeln!(out, "Source File: {}", metadata.source_file)?;
    writeln!(out, "File Size: {} MB", metadata.file_size_mb)?;
    if let Some(timing) = timing {
        writeln!(out, "Processing Time: {} seconds", timing.seconds())?;
        writeln!(out, "Processed On: {}", timing.timestamp())?;
    }
    writeln!(out, "Total Pages: {}", metadata.num_pages)?;
    writeln!(out, "Engine: {}\n", metadata.engine)?;

    section(out, "CONTENT STATISTICS")?;
    writeln!(out, "Tables Found: {}", stats.num_tables)?;
    writeln!(out, "Images Found: {}", stats.num_pictures)?;
    writeln!(out, "Figures Found: {}", stats.num_figures)?;
    writeln!(out, "Estimated Word Count: {}\n", stats.estimated_word_count)?;

    section(out, "PROCESSING CONFIGURATION")?;
    writeln!(out, "OCR Enabled: {}", yes_no(config.ocr_enabled))?;
    writeln!(out, "Table Extraction: {}", yes_no(config.table_extraction))?;
    writeln!(out, "Image Processing: {}", yes_no(config.image_processing))?;
    writeln!(out, "Picture Classification: {}\n", yes_no(config.picture_classification))?;

    if !summary.tables.is_empty() {
        section(out, "TABLES SUMMARY")?;
        for table in &summary.tables {
            writeln!(
                out,
                "Table {}: {} rows × {} columns",
                table.table_id, table.rows, table.columns
            )?;
        }
        writeln!(out)?;
    }

    section(out, "TEXT PREVIEW")?;
    writeln!(out, "{}\n", summary.text_preview)?;

    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Report generated by {}", metadata.processor_version)
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessingConfig;
    use crate::model::{ExtractedDocument, Item, Page, TableItem, TableRow};
    use std::path::Path;
    use std::time::Duration;

    fn record(with_table: bool) -> ProcessingRecord {
        let mut doc = ExtractedDocument::new("sample");
        let mut page = Page::new(1, 612.0, 792.0);
        page.push(Item::paragraph("Hello report."));
        if with_table {
            let mut table = TableItem::new();
            table.add_row(TableRow::from_strings(["a", "b", "c"]));
            page.push(Item::Table(table));
        }
        doc.add_page(page);

        let config = ProcessingConfig {
            enable_ocr: false,
            ..ProcessingConfig::default()
        };
        ProcessingRecord::new(Path::new("sample.pdf"), 2048, "stub", &config, doc, None)
    }

    #[test]
    fn test_sections() {
        let report = to_report(&record(true), None);
        assert!(report.starts_with("PDF PROCESSING REPORT\n"));
        assert!(report.contains("DOCUMENT INFORMATION\n--------------------\n"));
        assert!(report.contains("Source File: sample.pdf\n"));
        assert!(report.contains("OCR Enabled: No\n"));
        assert!(report.contains("Table Extraction: Yes\n"));
        assert!(report.contains("TABLES SUMMARY\n--------------\nTable 1: 1 rows × 3 columns\n"));
        assert!(report.contains("TEXT PREVIEW\n------------\nHello report."));
        assert!(!report.contains("Processing Time"));
    }

    #[test]
    fn test_no_tables_section_without_tables() {
        let report = to_report(&record(false), None);
        assert!(!report.contains("TABLES SUMMARY"));
    }

    #[test]
    fn test_timing_lines() {
        let timing = Timing::finished_now(Duration::from_millis(2500));
        let report = to_report(&record(false), Some(&timing));
        assert!(report.contains("Processing Time: 2.5 seconds\n"));
        assert!(report.contains("Processed On: "));
    }
}
