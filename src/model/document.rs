//! Document-level types.

use super::{Item, Page, PictureItem, TableItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version of the serialized document layout.
pub const SCHEMA_VERSION: &str = "1.0";

/// The structured result of converting one PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Layout version of this structure
    pub schema_version: String,

    /// Document name (source file stem)
    pub name: String,

    /// Where the document came from
    pub origin: Origin,

    /// Document metadata (title, author, etc.)
    pub metadata: Metadata,

    /// Pages in the document
    pub pages: Vec<Page>,

    /// Document outline (bookmarks), flattened in document order
    pub outline: Vec<OutlineEntry>,
}

impl ExtractedDocument {
    /// Create a new empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            name: name.into(),
            origin: Origin::default(),
            metadata: Metadata::default(),
            pages: Vec::new(),
            outline: Vec::new(),
        }
    }

    /// Get the number of pages.
    pub fn num_pages(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// All items in reading order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.pages.iter().flat_map(|p| p.items.iter())
    }

    /// All tables in reading order.
    pub fn tables(&self) -> impl Iterator<Item = &TableItem> {
        self.items().filter_map(|item| match item {
            Item::Table(t) => Some(t),
            _ => None,
        })
    }

    /// All pictures in reading order.
    pub fn pictures(&self) -> impl Iterator<Item = &PictureItem> {
        self.items().filter_map(|item| match item {
            Item::Picture(p) => Some(p),
            _ => None,
        })
    }

    /// Textual items (headings, paragraphs, list items, code, formulas).
    pub fn text_items(&self) -> impl Iterator<Item = &Item> {
        self.items().filter(|item| item.text().is_some())
    }

    /// All textual content without markup.
    ///
    /// Items are separated by blank lines; table rows become lines with
    /// cells separated by tabs. Pictures contribute their caption, if any.
    pub fn strict_text(&self) -> String {
        self.items()
            .filter_map(|item| match item {
                Item::Table(t) => Some(t.plain_text()),
                Item::Picture(p) => p.caption.clone(),
                other => other.text().map(str::to_string),
            })
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Whitespace-separated word count of the strict text.
    pub fn word_count(&self) -> usize {
        self.strict_text().split_whitespace().count()
    }

    /// Title from metadata, falling back to the document name.
    pub fn display_title(&self) -> &str {
        self.metadata
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

/// Source file information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    /// File name without directories
    pub filename: String,

    /// MIME type of the source
    pub mimetype: String,

    /// MD5 hex digest of the source bytes
    pub binary_hash: String,

    /// Size of the source in bytes
    pub size_bytes: u64,
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of pages in the source
    pub page_count: u32,

    /// Whether the document is encrypted
    pub encrypted: bool,
}

/// A single outline (bookmark) entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Entry title
    pub title: String,

    /// Target page number (1-indexed)
    pub page: Option<u32>,

    /// Nesting level (0 = top level)
    pub level: u8,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(title: impl Into<String>, page: Option<u32>, level: u8) -> Self {
        Self {
            title: title.into(),
            page,
            level,
        }
    }
}
