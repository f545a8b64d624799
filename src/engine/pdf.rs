//! Default engine built on lopdf.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};
use md5::{Digest, Md5};
use rayon::prelude::*;

use super::enrich::{classify_picture, normalize_text, TextStructurer};
use super::{ConversionEngine, ConversionResult, ConversionStatus, EngineCapabilities};
use crate::config::Device;
use crate::error::{Error, Result};
use crate::model::{
    sniff_image_mime, ExtractedDocument, Item, Metadata, Origin, OutlineEntry, Page, PictureItem,
};
use crate::pipeline::PipelineOptions;

/// US Letter, used when a page has no usable MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Guard against cyclic outline and page-tree links.
const MAX_LINK_DEPTH: usize = 64;

/// Text and image extraction from the PDF text layer.
///
/// No OCR, table structure recovery or page rendering: requests for those
/// come back as warnings.
#[derive(Debug, Clone, Default)]
pub struct PdfEngine;

impl PdfEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }

    fn load(data: &[u8], password: Option<&str>) -> Result<(LopdfDocument, bool)> {
        let mut pdf = LopdfDocument::load_mem(data)?;
        let encrypted = pdf.is_encrypted();
        if encrypted {
            // Many encrypted files only carry an owner password; try the
            // empty user password when none was given.
            pdf.decrypt(password.unwrap_or(""))
                .map_err(|_| Error::Encrypted)?;
        }
        Ok((pdf, encrypted))
    }
}

impl ConversionEngine for PdfEngine {
    fn name(&self) -> &str {
        "lopdf"
    }

    fn capabilities(&self) -> EngineCapabilities {
        EngineCapabilities::default()
    }

    fn convert(&self, source: &Path, options: &PipelineOptions) -> Result<ConversionResult> {
        let data = std::fs::read(source)?;
        let (pdf, encrypted) = Self::load(&data, options.password.as_deref())?;

        let name = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let mut document = ExtractedDocument::new(name);
        document.origin = Origin {
            filename: source
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            mimetype: "application/pdf".to_string(),
            binary_hash: format!("{:x}", Md5::digest(&data)),
            size_bytes: data.len() as u64,
        };

        let pages: Vec<(u32, ObjectId)> = pdf.get_pages().into_iter().collect();
        document.metadata = extract_metadata(&pdf, pages.len() as u32, encrypted);
        document.outline = extract_outline(&pdf);

        let mut warnings = self.capabilities().unsupported(options);
        if options.accelerator.device == Device::Cuda {
            warnings.push("CUDA device requested; running on CPU".to_string());
        }

        let structurer = TextStructurer::new(
            &document.outline,
            options.do_code_enrichment,
            options.do_formula_enrichment,
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.accelerator.num_threads.max(1))
            .build()
            .map_err(|e| Error::Extraction(format!("cannot start worker pool: {}", e)))?;

        log::debug!(
            "Converting {} pages on {} threads",
            pages.len(),
            options.accelerator.num_threads
        );
        let outcomes: Vec<PageOutcome> = pool.install(|| {
            pages
                .par_iter()
                .map(|&(number, id)| convert_page(&pdf, number, id, &structurer, options))
                .collect()
        });

        let mut errors = Vec::new();
        for outcome in outcomes {
            if let Some(err) = outcome.error {
                errors.push(err);
            }
            document.add_page(outcome.page);
        }

        let status = if errors.is_empty() {
            ConversionStatus::Success
        } else if errors.len() == pages.len() {
            ConversionStatus::Failure
        } else {
            ConversionStatus::PartialSuccess
        };

        Ok(ConversionResult {
            status,
            document,
            errors,
            warnings,
        })
    }
}

struct PageOutcome {
    page: Page,
    error: Option<String>,
}

fn convert_page(
    pdf: &LopdfDocument,
    number: u32,
    page_id: ObjectId,
    structurer: &TextStructurer,
    options: &PipelineOptions,
) -> PageOutcome {
    let (width, height) = page_size(pdf, page_id);
    let mut page = Page::new(number, width, height);
    let mut error = None;

    match pdf.extract_text(&[number]) {
        Ok(text) => {
            for item in structurer.structure(&normalize_text(&text)) {
                page.push(item);
            }
        }
        Err(e) => {
            log::warn!("Failed to extract text from page {}: {}", number, e);
            error = Some(format!("page {}: {}", number, e));
        }
    }

    for picture in page_pictures(pdf, number, page_id, options) {
        page.push(Item::Picture(picture));
    }

    log::debug!("Page {}: {} items", number, page.items.len());
    PageOutcome { page, error }
}

fn page_pictures(
    pdf: &LopdfDocument,
    number: u32,
    page_id: ObjectId,
    options: &PipelineOptions,
) -> Vec<PictureItem> {
    // Pages without an XObject dictionary simply have no images.
    let Ok(images) = pdf.get_page_images(page_id) else {
        return Vec::new();
    };

    images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let width = u32::try_from(image.width).unwrap_or(0);
            let height = u32::try_from(image.height).unwrap_or(0);
            let filters = image.filters.clone().unwrap_or_default();
            let mut picture =
                PictureItem::new(format!("p{}_img{}", number, index + 1), number)
                    .with_dimensions(width, height);

            if options.generate_picture_images {
                if let Some(mime) = encoded_image_mime(&filters, image.content) {
                    picture = picture.with_data(image.content.to_vec(), mime);
                }
            }
            if options.do_picture_classification {
                picture.classification = Some(classify_picture(width, height, &filters));
            }
            picture
        })
        .collect()
}

/// MIME type of image streams stored in a self-contained file format.
/// Raw pixel streams have none.
fn encoded_image_mime(filters: &[String], content: &[u8]) -> Option<&'static str> {
    match filters.last().map(String::as_str) {
        Some("DCTDecode") => Some("image/jpeg"),
        Some("JPXDecode") => Some("image/jp2"),
        _ => sniff_image_mime(content),
    }
}

fn extract_metadata(pdf: &LopdfDocument, page_count: u32, encrypted: bool) -> Metadata {
    let mut metadata = Metadata {
        pdf_version: pdf.version.clone(),
        page_count,
        encrypted,
        ..Metadata::default()
    };

    let info = pdf
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|obj| pdf.dereference(obj).ok())
        .and_then(|(_, obj)| obj.as_dict().ok());

    if let Some(info) = info {
        metadata.title = info_string(info, b"Title");
        metadata.author = info_string(info, b"Author");
        metadata.subject = info_string(info, b"Subject");
        metadata.keywords = info_string(info, b"Keywords");
        metadata.creator = info_string(info, b"Creator");
        metadata.producer = info_string(info, b"Producer");
        metadata.created = info_string(info, b"CreationDate").and_then(|s| parse_pdf_date(&s));
        metadata.modified = info_string(info, b"ModDate").and_then(|s| parse_pdf_date(&s));
    }

    metadata
}

fn extract_outline(pdf: &LopdfDocument) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();

    let first = pdf
        .catalog()
        .ok()
        .and_then(|catalog| catalog.get(b"Outlines").ok())
        .and_then(|obj| pdf.dereference(obj).ok())
        .and_then(|(_, obj)| obj.as_dict().ok())
        .and_then(|outlines| outlines.get(b"First").ok())
        .and_then(|obj| obj.as_reference().ok());

    if let Some(first) = first {
        let mut visited = HashSet::new();
        collect_outline(pdf, first, 0, &mut visited, &mut entries);
    }

    entries
}

fn collect_outline(
    pdf: &LopdfDocument,
    first: ObjectId,
    level: u8,
    visited: &mut HashSet<ObjectId>,
    entries: &mut Vec<OutlineEntry>,
) {
    if level as usize > MAX_LINK_DEPTH {
        return;
    }

    let mut next = Some(first);
    while let Some(id) = next.take() {
        if !visited.insert(id) {
            break;
        }
        let Ok(item) = pdf.get_dictionary(id) else {
            break;
        };

        let title = info_string(item, b"Title")
            .map(|t| normalize_text(t.trim()))
            .unwrap_or_default();
        if !title.is_empty() {
            entries.push(OutlineEntry::new(title, outline_page(pdf, item), level));
        }

        if let Ok(child) = item.get(b"First").and_then(Object::as_reference) {
            collect_outline(pdf, child, level.saturating_add(1), visited, entries);
        }
        next = item.get(b"Next").and_then(Object::as_reference).ok();
    }
}

/// Target page of an outline item, from `/Dest` or a GoTo action's `/D`.
fn outline_page(pdf: &LopdfDocument, item: &Dictionary) -> Option<u32> {
    let dest = match item.get(b"Dest") {
        Ok(dest) => dest,
        Err(_) => pdf
            .dereference(item.get(b"A").ok()?)
            .ok()?
            .1
            .as_dict()
            .ok()?
            .get(b"D")
            .ok()?,
    };

    let (_, dest) = pdf.dereference(dest).ok()?;
    let target = dest.as_array().ok()?.first()?.as_reference().ok()?;
    pdf.get_pages()
        .into_iter()
        .find_map(|(number, id)| (id == target).then_some(number))
}

/// Page size from the MediaBox, following inheritance through `/Parent`.
fn page_size(pdf: &LopdfDocument, page_id: ObjectId) -> (f32, f32) {
    let mut node = pdf.get_dictionary(page_id).ok();
    let mut depth = 0;

    while let Some(dict) = node {
        let media_box = dict
            .get(b"MediaBox")
            .ok()
            .and_then(|obj| pdf.dereference(obj).ok())
            .and_then(|(_, obj)| obj.as_array().ok())
            .and_then(|array| box_size(array));
        if let Some(size) = media_box {
            return size;
        }

        depth += 1;
        if depth > MAX_LINK_DEPTH {
            break;
        }
        node = dict
            .get(b"Parent")
            .and_then(Object::as_reference)
            .and_then(|id| pdf.get_dictionary(id))
            .ok();
    }

    DEFAULT_PAGE_SIZE
}

fn box_size(array: &[Object]) -> Option<(f32, f32)> {
    if array.len() < 4 {
        return None;
    }
    let coords = array[..4]
        .iter()
        .map(|o| o.as_float().ok())
        .collect::<Option<Vec<f32>>>()?;
    Some(((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs()))
}

fn info_string(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let value = match dict.get(key).ok()? {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        Object::Name(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        _ => return None,
    };
    let value = value.trim_matches(char::from(0)).trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Decode a PDF text string: UTF-16BE with BOM, else UTF-8, else Latin-1.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Parse a PDF date (`D:YYYYMMDDHHmmSSOHH'mm'`), honoring the UTC offset.
fn parse_pdf_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);
    if s.len() < 4 || !s.is_char_boundary(4) {
        return None;
    }

    let digits = |range: std::ops::Range<usize>, default: u32| -> Option<u32> {
        match s.get(range) {
            Some(part) if part.bytes().all(|b| b.is_ascii_digit()) => part.parse().ok(),
            Some(_) => None,
            None => Some(default),
        }
    };

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month = digits(4..6, 1)?;
    let day = digits(6..8, 1)?;
    let hour = digits(8..10, 0)?;
    let minute = digits(10..12, 0)?;
    let second = digits(12..14, 0)?;

    let offset_secs = match s.get(14..15) {
        Some(sign @ ("+" | "-")) => {
            let tz = s.get(15..).unwrap_or("");
            let hh: i32 = tz.get(0..2).and_then(|h| h.parse().ok()).unwrap_or(0);
            let mm: i32 = tz
                .get(2..)
                .map(|rest| rest.trim_matches('\''))
                .and_then(|rest| rest.get(0..2))
                .and_then(|m| m.parse().ok())
                .unwrap_or(0);
            let secs = hh * 3600 + mm * 60;
            if sign == "-" {
                -secs
            } else {
                secs
            }
        }
        _ => 0,
    };

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    let offset = FixedOffset::east_opt(offset_secs)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
