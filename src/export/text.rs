//! Plain text rendering.

use crate::model::ExtractedDocument;

/// Convert a document to plain text: all textual content, tables row by
/// row, no markup.
///
/// A document without any text yields one line per page saying so, or the
/// title when there are no pages.
pub fn to_text(doc: &ExtractedDocument) -> String {
    let text = doc.strict_text();
    let text = text.trim_end();
    if !text.is_empty() {
        return format!("{}\n", text);
    }

    if doc.pages.is_empty() {
        return format!("{}\n", doc.display_title());
    }
    doc.pages
        .iter()
        .map(|page| format!("[page {}: no text layer]\n", page.number))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Page, PictureItem};

    #[test]
    fn test_to_text() {
        let mut doc = ExtractedDocument::new("doc");
        let mut page = Page::new(1, 612.0, 792.0);
        page.push(Item::heading("Title", 1));
        page.push(Item::paragraph("Hello, *world*!"));
        page.push(Item::Picture(PictureItem::new("p1_img1", 1)));
        page.push(Item::list_item("item", "-", false));
        doc.add_page(page);

        assert_eq!(to_text(&doc), "Title\n\nHello, *world*!\n\nitem\n");
    }

    #[test]
    fn test_no_pages() {
        assert_eq!(to_text(&ExtractedDocument::new("doc")), "doc\n");
    }

    #[test]
    fn test_pages_without_text() {
        let mut doc = ExtractedDocument::new("scan");
        doc.add_page(Page::new(1, 612.0, 792.0));
        let mut page = Page::new(2, 612.0, 792.0);
        page.push(Item::Picture(PictureItem::new("p2_img1", 2)));
        doc.add_page(page);

        assert_eq!(
            to_text(&doc),
            "[page 1: no text layer]\n[page 2: no text layer]\n"
        );
    }
}
