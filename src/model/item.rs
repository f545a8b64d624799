//! Page-level types.

use super::{PictureItem, TableItem};
use serde::{Deserialize, Serialize};

/// A single page of the extraction result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Content items in reading order
    pub items: Vec<Item>,

    /// Whether the page carried a decodable text layer
    pub has_text_layer: bool,
}

impl Page {
    /// Create a new empty page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            items: Vec::new(),
            has_text_layer: false,
        }
    }

    /// Append an item.
    pub fn push(&mut self, item: Item) {
        if item.text().is_some() {
            self.has_text_layer = true;
        }
        self.items.push(item);
    }

    /// Check if the page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// A content item on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    /// A section heading
    Heading {
        /// Heading text
        text: String,
        /// Level (1 = top)
        level: u8,
    },

    /// A paragraph of running text
    Paragraph {
        /// Paragraph text
        text: String,
    },

    /// A bulleted or numbered list entry
    ListItem {
        /// Entry text without the marker
        text: String,
        /// Marker as found in the source ("-", "•", "3.", "b)")
        marker: String,
        /// Numbered rather than bulleted
        enumerated: bool,
    },

    /// A block of source code
    Code {
        /// Code text, lines separated by `\n`
        text: String,
    },

    /// A mathematical formula
    Formula {
        /// Formula text
        text: String,
    },

    /// A table
    Table(TableItem),

    /// A picture
    Picture(PictureItem),
}

impl Item {
    /// Create a heading.
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        Item::Heading {
            text: text.into(),
            level: level.clamp(1, 6),
        }
    }

    /// Create a paragraph.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Item::Paragraph { text: text.into() }
    }

    /// Create a list item.
    pub fn list_item(text: impl Into<String>, marker: impl Into<String>, enumerated: bool) -> Self {
        Item::ListItem {
            text: text.into(),
            marker: marker.into(),
            enumerated,
        }
    }

    /// Create a code block.
    pub fn code(text: impl Into<String>) -> Self {
        Item::Code { text: text.into() }
    }

    /// Create a formula.
    pub fn formula(text: impl Into<String>) -> Self {
        Item::Formula { text: text.into() }
    }

    /// Text of a textual item; `None` for tables and pictures.
    pub fn text(&self) -> Option<&str> {
        match self {
            Item::Heading { text, .. }
            | Item::Paragraph { text }
            | Item::ListItem { text, .. }
            | Item::Code { text }
            | Item::Formula { text } => Some(text),
            Item::Table(_) | Item::Picture(_) => None,
        }
    }

    /// Short lowercase name of the item kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Item::Heading { .. } => "heading",
            Item::Paragraph { .. } => "paragraph",
            Item::ListItem { .. } => "list_item",
            Item::Code { .. } => "code",
            Item::Formula { .. } => "formula",
            Item::Table(_) => "table",
            Item::Picture(_) => "picture",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_push_marks_text_layer() {
        let mut page = Page::new(1, 842.0, 595.0);
        assert!(page.is_empty());
        assert!(page.is_landscape());

        page.push(Item::Picture(PictureItem::new("p1_Im0", 1)));
        assert!(!page.has_text_layer);

        page.push(Item::paragraph("Hello"));
        assert!(page.has_text_layer);
    }

    #[test]
    fn test_heading_level_clamped() {
        assert_eq!(Item::heading("A", 0), Item::Heading { text: "A".into(), level: 1 });
        assert_eq!(Item::heading("A", 9), Item::Heading { text: "A".into(), level: 6 });
    }

    #[test]
    fn test_item_serialization_tag() {
        let json = serde_json::to_string(&Item::list_item("milk", "-", false)).unwrap();
        assert_eq!(
            json,
            r#"{"type":"list_item","text":"milk","marker":"-","enumerated":false}"#
        );

        let json = serde_json::to_value(Item::Table(TableItem::new())).unwrap();
        assert_eq!(json["type"], "table");
    }

    #[test]
    fn test_text_and_kind() {
        assert_eq!(Item::code("fn main() {}").text(), Some("fn main() {}"));
        assert_eq!(Item::Table(TableItem::new()).text(), None);
        assert_eq!(Item::formula("E = mc^2").kind(), "formula");
    }
}
