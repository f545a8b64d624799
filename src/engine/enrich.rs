//! Heuristics turning decoded page text into structured items.

use std::collections::HashMap;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::model::{Item, OutlineEntry, PictureClass};

const LIGATURES: [(&str, &str); 7] = [
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
    ("\u{FB05}", "st"),
    ("\u{FB06}", "st"),
];

/// NFC-normalize text, expand ligatures and drop replacement characters.
pub fn normalize_text(text: &str) -> String {
    let mut result: String = text.nfc().collect();
    for (ligature, replacement) in LIGATURES {
        if result.contains(ligature) {
            result = result.replace(ligature, replacement);
        }
    }
    result.replace('\u{FFFD}', "")
}

/// Groups lines of page text into headings, paragraphs, list items and,
/// when enabled, code blocks and formulas.
pub struct TextStructurer {
    headings: HashMap<String, u8>,
    code: bool,
    formula: bool,
    list_marker: Regex,
    code_line: Regex,
    page_number: Regex,
}

impl TextStructurer {
    /// Create a structurer. Lines matching an outline title become headings
    /// one level below the entry's depth.
    pub fn new(outline: &[OutlineEntry], code: bool, formula: bool) -> Self {
        let mut headings = HashMap::new();
        for entry in outline {
            let key = heading_key(&entry.title);
            if !key.is_empty() {
                headings
                    .entry(key)
                    .or_insert_with(|| entry.level.saturating_add(1).min(6));
            }
        }

        Self {
            headings,
            code,
            formula,
            list_marker: Regex::new(
                r"^(?P<marker>[-•*‣◦▪–]|\(?\d{1,3}[.)]|\(?[a-z]\))\s+(?P<text>\S.*)$",
            )
            .expect("list marker pattern"),
            code_line: Regex::new(
                r"^(?:(?:pub )?fn |def |class |import |from \S+ import |#include|let |const |var |return\b|for \(|while \(|if \(|[{}])|[{};]$",
            )
            .expect("code line pattern"),
            page_number: Regex::new(r"^[-–—]?\s*\d{1,4}\s*[-–—]?$").expect("page number pattern"),
        }
    }

    /// Structure one page of text.
    pub fn structure(&self, text: &str) -> Vec<Item> {
        let mut items: Vec<Item> = Vec::new();
        let mut open = false;
        let mut code_run: Vec<&str> = Vec::new();

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || self.page_number.is_match(line) {
                self.flush_code(&mut code_run, &mut items);
                open = false;
                continue;
            }

            if self.code && self.code_line.is_match(line) {
                code_run.push(line);
                continue;
            }
            if !code_run.is_empty() {
                open = self.flush_code(&mut code_run, &mut items);
            }

            if let Some(&level) = self.headings.get(&heading_key(line)) {
                items.push(Item::heading(line, level));
                open = false;
                continue;
            }

            if self.formula && is_formula(line) {
                items.push(Item::formula(line));
                open = false;
                continue;
            }

            if let Some(caps) = self.list_marker.captures(line) {
                let marker = &caps["marker"];
                let enumerated = marker.chars().any(|c| c.is_ascii_alphanumeric());
                items.push(Item::list_item(&caps["text"], marker, enumerated));
                open = true;
                continue;
            }

            if open {
                if let Some(last) = items.last_mut() {
                    if try_continue(last, line) {
                        continue;
                    }
                }
            }

            items.push(Item::paragraph(line));
            open = true;
        }
        self.flush_code(&mut code_run, &mut items);

        items
    }

    /// Emit pending code lines. Runs of two or more lines become a code
    /// block; a single line falls back to a paragraph. Returns whether the
    /// last emitted item accepts continuation lines.
    fn flush_code(&self, run: &mut Vec<&str>, items: &mut Vec<Item>) -> bool {
        match run.len() {
            0 => false,
            1 => {
                items.push(Item::paragraph(run[0]));
                run.clear();
                true
            }
            _ => {
                items.push(Item::code(run.join("\n")));
                run.clear();
                false
            }
        }
    }
}

fn heading_key(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Append `line` to a paragraph or list item when it reads as a wrapped
/// continuation: the item does not end a sentence and the line starts
/// lowercase.
fn try_continue(item: &mut Item, line: &str) -> bool {
    let text = match item {
        Item::Paragraph { text } | Item::ListItem { text, .. } => text,
        _ => return false,
    };
    if text.ends_with(&['.', ':', '!', '?'][..]) || !line.starts_with(char::is_lowercase) {
        return false;
    }

    let hyphenated = text.ends_with('-')
        && text[..text.len() - 1].ends_with(char::is_alphabetic);
    if hyphenated {
        text.pop();
    } else {
        text.push(' ');
    }
    text.push_str(line);
    true
}

/// Whether a line looks like a standalone formula: it carries a relation
/// or big operator and has at most two ordinary words.
pub fn is_formula(line: &str) -> bool {
    const RELATIONS: [char; 9] = ['=', '≤', '≥', '≠', '≈', '∑', '∫', '∏', '√'];

    if line.chars().count() > 120 || !line.contains(&RELATIONS[..]) {
        return false;
    }
    let words = line
        .split_whitespace()
        .filter(|w| w.chars().count() >= 4 && w.chars().all(char::is_alphabetic))
        .count();
    words <= 2
}

/// Classify a picture from its pixel size and stream filters.
pub fn classify_picture(width: u32, height: u32, filters: &[String]) -> PictureClass {
    if width == 0 || height == 0 {
        return PictureClass::Unknown;
    }
    if width.max(height) < 64 {
        return PictureClass::Icon;
    }

    let lossy = filters
        .iter()
        .any(|f| f == "DCTDecode" || f == "JPXDecode");
    match (lossy, width.min(height) >= 256) {
        (true, true) => PictureClass::Photograph,
        (true, false) => PictureClass::Unknown,
        (false, _) => PictureClass::Graphic,
    }
}
