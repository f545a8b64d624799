//! Table types.

use serde::{Deserialize, Serialize};

/// A table recovered by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableItem {
    /// Rows in reading order
    pub rows: Vec<TableRow>,

    /// Number of leading header rows (0 = no header)
    pub header_rows: usize,

    /// Table caption
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl TableItem {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table whose first `header_rows` rows are headers.
    pub fn with_header(header_rows: usize) -> Self {
        Self {
            header_rows,
            ..Self::default()
        }
    }

    /// Set the caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns: the widest row, counting column spans.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(TableRow::width).max().unwrap_or(0)
    }

    /// Whether the table declares header rows.
    pub fn has_header(&self) -> bool {
        self.header_rows > 0 && !self.rows.is_empty()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header rows (clamped to the rows present).
    pub fn header(&self) -> &[TableRow] {
        &self.rows[..self.header_rows.min(self.rows.len())]
    }

    /// Body rows.
    pub fn body(&self) -> &[TableRow] {
        &self.rows[self.header_rows.min(self.rows.len())..]
    }

    /// Rows as lines with tab-separated cells.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(TableRow::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a row from cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::new).collect())
    }

    /// Number of grid columns covered by this row.
    pub fn width(&self) -> usize {
        self.cells.iter().map(|c| c.col_span.max(1)).sum()
    }

    fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell text
    pub text: String,

    /// Number of rows this cell spans
    pub row_span: usize,

    /// Number of columns this cell spans
    pub col_span: usize,
}

impl TableCell {
    /// Create a single-span cell.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            row_span: 1,
            col_span: 1,
        }
    }

    /// Set the column span.
    pub fn col_span(mut self, span: usize) -> Self {
        self.col_span = span.max(1);
        self
    }

    /// Set the row span.
    pub fn row_span(mut self, span: usize) -> Self {
        self.row_span = span.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let mut table = TableItem::with_header(1);
        table.add_row(TableRow::new(vec![
            TableCell::new("Region").col_span(2),
            TableCell::new("Total"),
        ]));
        table.add_row(TableRow::from_strings(["North", "Q1", "10"]));
        table.add_row(TableRow::from_strings(["South", "Q1"]));

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert!(table.has_header());
        assert_eq!(table.header().len(), 1);
        assert_eq!(table.body().len(), 2);
    }

    #[test]
    fn test_header_clamped() {
        let mut table = TableItem::with_header(3);
        assert!(!table.has_header());
        table.add_row(TableRow::from_strings(["only"]));
        assert_eq!(table.header().len(), 1);
        assert!(table.body().is_empty());
    }

    #[test]
    fn test_plain_text() {
        let mut table = TableItem::new();
        table.add_row(TableRow::from_strings(["a", "b"]));
        table.add_row(TableRow::from_strings(["c", "d"]));
        assert_eq!(table.plain_text(), "a\tb\nc\td");
        assert_eq!(TableItem::new().column_count(), 0);
    }
}
