//! Markdown rendering.

use crate::model::{ExtractedDocument, Item, PictureItem, TableItem, TableRow};

use super::images::{ImageRefs, IMAGE_PLACEHOLDER};

/// Convert a document to Markdown.
pub fn to_markdown(doc: &ExtractedDocument, images: &ImageRefs) -> String {
    MarkdownRenderer::new(images).render(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer<'a> {
    images: &'a ImageRefs,
}

impl<'a> MarkdownRenderer<'a> {
    /// Create a renderer using the given picture references.
    pub fn new(images: &'a ImageRefs) -> Self {
        Self { images }
    }

    /// Render a document.
    pub fn render(&self, doc: &ExtractedDocument) -> String {
        let mut output = String::new();
        let mut in_list = false;

        for page in &doc.pages {
            if page.is_empty() {
                if in_list {
                    output.push('\n');
                    in_list = false;
                }
                output.push_str(&empty_page_marker(page.number));
                output.push_str("\n\n");
                continue;
            }
            for item in &page.items {
                let is_list = matches!(item, Item::ListItem { .. });
                if in_list && !is_list {
                    output.push('\n');
                }
                in_list = is_list;
                self.render_item(&mut output, item);
            }
        }

        let trimmed = output.trim_end();
        if trimmed.is_empty() {
            // No pages at all: the title keeps the file non-empty.
            format!("# {}\n", escape_markdown(doc.display_title()))
        } else {
            format!("{}\n", trimmed)
        }
    }

    fn render_item(&self, output: &mut String, item: &Item) {
        match item {
            Item::Heading { text, level } => {
                output.push_str(&"#".repeat(*level as usize));
                output.push(' ');
                output.push_str(&escape_markdown(text));
                output.push_str("\n\n");
            }
            Item::Paragraph { text } => {
                output.push_str(&escape_markdown(text));
                output.push_str("\n\n");
            }
            Item::ListItem {
                text,
                marker,
                enumerated,
            } => {
                if *enumerated {
                    output.push_str(marker);
                } else {
                    output.push('-');
                }
                output.push(' ');
                output.push_str(&escape_markdown(text));
                output.push('\n');
            }
            Item::Code { text } => {
                let fence = code_fence(text);
                output.push_str(&fence);
                output.push('\n');
                output.push_str(text);
                output.push('\n');
                output.push_str(&fence);
                output.push_str("\n\n");
            }
            Item::Formula { text } => {
                output.push_str("$$\n");
                output.push_str(text);
                output.push_str("\n$$\n\n");
            }
            Item::Table(table) => self.render_table(output, table),
            Item::Picture(picture) => self.render_picture(output, picture),
        }
    }

    fn render_table(&self, output: &mut String, table: &TableItem) {
        let columns = table.column_count();
        if columns == 0 {
            return;
        }

        if let Some(ref caption) = table.caption {
            output.push_str(&escape_markdown(caption));
            output.push_str("\n\n");
        }

        // Markdown needs exactly one header row; the last declared header
        // row carries the separator, or the first row when none is declared.
        let separator_after = table.header_rows.clamp(1, table.row_count()) - 1;
        for (i, row) in table.rows.iter().enumerate() {
            push_row(output, row, columns);
            if i == separator_after {
                output.push('|');
                output.push_str(&" --- |".repeat(columns));
                output.push('\n');
            }
        }
        output.push('\n');
    }

    fn render_picture(&self, output: &mut String, picture: &PictureItem) {
        match self.images.source(picture) {
            Some(src) => {
                let alt = picture.caption.as_deref().unwrap_or("Image");
                output.push_str(&format!("![{}]({})", escape_markdown(alt), src));
            }
            None => output.push_str(IMAGE_PLACEHOLDER),
        }
        output.push_str("\n\n");

        if let Some(ref caption) = picture.caption {
            output.push_str(&escape_markdown(caption));
            output.push_str("\n\n");
        }
    }
}

/// Marker for a page that produced no items (typically a scan without OCR).
pub(crate) fn empty_page_marker(number: u32) -> String {
    format!("<!-- page {}: no text layer -->", number)
}

fn push_row(output: &mut String, row: &TableRow, columns: usize) {
    output.push('|');
    let mut width = 0;
    for cell in &row.cells {
        let content = escape_markdown(&cell.text.replace('\n', " "));
        output.push_str(&format!(" {} |", content.trim()));
        width += 1;
        // Spanned columns are emitted as empty cells.
        for _ in 1..cell.col_span {
            output.push_str("  |");
            width += 1;
        }
    }
    for _ in width..columns {
        output.push_str("  |");
    }
    output.push('\n');
}

/// A backtick fence longer than any backtick run inside the code.
fn code_fence(code: &str) -> String {
    let longest = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

/// Escape characters that would otherwise be read as Markdown syntax.
/// Only inline formatting, link brackets and table pipes are escaped.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '|') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}
