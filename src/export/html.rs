//! HTML rendering.

use crate::model::{ExtractedDocument, Item, PictureItem, TableItem, TableRow};

use super::images::{ImageRefs, IMAGE_PLACEHOLDER};

const STYLE: &str = "body { font-family: sans-serif; max-width: 50em; margin: 2em auto; line-height: 1.5; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #999; padding: 0.25em 0.5em; }
pre { background: #f4f4f4; padding: 0.5em; overflow-x: auto; }
figure { margin: 1em 0; }
.formula { font-family: serif; margin: 1em 0; }";

/// Convert a document to a standalone HTML5 page.
pub fn to_html(doc: &ExtractedDocument, images: &ImageRefs) -> String {
    let mut output = String::new();
    output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(doc.display_title())));
    output.push_str(&format!("<style>\n{}\n</style>\n", STYLE));
    output.push_str("</head>\n<body>\n");

    let mut list: Option<&'static str> = None;
    for item in doc.items() {
        let wanted = match item {
            Item::ListItem { enumerated, .. } => Some(if *enumerated { "ol" } else { "ul" }),
            _ => None,
        };
        if list != wanted {
            if let Some(tag) = list {
                output.push_str(&format!("</{}>\n", tag));
            }
            if let Some(tag) = wanted {
                output.push_str(&format!("<{}>\n", tag));
            }
            list = wanted;
        }
        render_item(&mut output, item, images);
    }
    if let Some(tag) = list {
        output.push_str(&format!("</{}>\n", tag));
    }

    output.push_str("</body>\n</html>\n");
    output
}

fn render_item(output: &mut String, item: &Item, images: &ImageRefs) {
    match item {
        Item::Heading { text, level } => {
            output.push_str(&format!("<h{0}>{1}</h{0}>\n", level, escape_html(text)));
        }
        Item::Paragraph { text } => {
            output.push_str(&format!("<p>{}</p>\n", escape_html(text)));
        }
        Item::ListItem { text, .. } => {
            output.push_str(&format!("<li>{}</li>\n", escape_html(text)));
        }
        Item::Code { text } => {
            output.push_str(&format!("<pre><code>{}</code></pre>\n", escape_html(text)));
        }
        Item::Formula { text } => {
            output.push_str(&format!("<div class=\"formula\">{}</div>\n", escape_html(text)));
        }
        Item::Table(table) => render_table(output, table),
        Item::Picture(picture) => render_picture(output, picture, images),
    }
}

fn render_table(output: &mut String, table: &TableItem) {
    if table.is_empty() {
        return;
    }

    output.push_str("<table>\n");
    if let Some(ref caption) = table.caption {
        output.push_str(&format!("<caption>{}</caption>\n", escape_html(caption)));
    }
    if table.has_header() {
        output.push_str("<thead>\n");
        for row in table.header() {
            render_row(output, row, "th");
        }
        output.push_str("</thead>\n");
    }
    output.push_str("<tbody>\n");
    for row in table.body() {
        render_row(output, row, "td");
    }
    output.push_str("</tbody>\n</table>\n");
}

fn render_row(output: &mut String, row: &TableRow, tag: &str) {
    output.push_str("<tr>");
    for cell in &row.cells {
        let mut attrs = String::new();
        if cell.row_span > 1 {
            attrs.push_str(&format!(" rowspan=\"{}\"", cell.row_span));
        }
        if cell.col_span > 1 {
            attrs.push_str(&format!(" colspan=\"{}\"", cell.col_span));
        }
        output.push_str(&format!("<{0}{1}>{2}</{0}>", tag, attrs, escape_html(&cell.text)));
    }
    output.push_str("</tr>\n");
}

fn render_picture(output: &mut String, picture: &PictureItem, images: &ImageRefs) {
    output.push_str("<figure>");
    match images.source(picture) {
        Some(src) => {
            let alt = picture.caption.as_deref().unwrap_or("Image");
            output.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\">",
                escape_html(src),
                escape_html(alt)
            ));
        }
        None => output.push_str(IMAGE_PLACEHOLDER),
    }
    if let Some(ref caption) = picture.caption {
        output.push_str(&format!("<figcaption>{}</figcaption>", escape_html(caption)));
    }
    output.push_str("</figure>\n");
}

fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
