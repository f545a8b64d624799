//! Pictures found in the document.

use serde::{Deserialize, Serialize};

/// A picture with optional image data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureItem {
    /// Identifier unique within the document (e.g., "p3_Im1")
    pub id: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Width in pixels
    pub width: Option<u32>,

    /// Height in pixels
    pub height: Option<u32>,

    /// MIME type of `data`, when known
    pub mime_type: Option<String>,

    /// Classification result, when classification ran
    pub classification: Option<PictureClass>,

    /// Caption text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Encoded image bytes; never serialized
    #[serde(skip)]
    pub data: Option<Vec<u8>>,
}

impl PictureItem {
    /// Create a picture without data.
    pub fn new(id: impl Into<String>, page: u32) -> Self {
        Self {
            id: id.into(),
            page,
            width: None,
            height: None,
            mime_type: None,
            classification: None,
            caption: None,
            data: None,
        }
    }

    /// Set pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Attach image bytes with their MIME type.
    pub fn with_data(mut self, data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        self.data = Some(data);
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Image bytes that can be shown by a browser: non-empty data with an
    /// `image/*` MIME type.
    pub fn image_data(&self) -> Option<(&[u8], &str)> {
        let data = self.data.as_deref().filter(|d| !d.is_empty())?;
        let mime = self.mime_type.as_deref().filter(|m| m.starts_with("image/"))?;
        Some((data, mime))
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        self.mime_type.as_deref().map(extension_for_mime).unwrap_or("bin")
    }
}

/// File extension for a MIME type.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/tiff" => "tiff",
        "image/bmp" => "bmp",
        "image/webp" => "webp",
        "image/jp2" => "jp2",
        _ => "bin",
    }
}

/// Guess an image MIME type from the leading bytes.
pub fn sniff_image_mime(data: &[u8]) -> Option<&'static str> {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (&[0xFF, 0xD8, 0xFF], "image/jpeg"),
        (&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A], "image/png"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (&[0x49, 0x49, 0x2A, 0x00], "image/tiff"),
        (&[0x4D, 0x4D, 0x00, 0x2A], "image/tiff"),
        (&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20], "image/jp2"),
        (&[0xFF, 0x4F, 0xFF, 0x51], "image/jp2"),
    ];

    SIGNATURES
        .iter()
        .find(|(magic, _)| data.starts_with(magic))
        .map(|(_, mime)| *mime)
}

/// Coarse picture category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PictureClass {
    /// Small decorative image (logo, bullet, icon)
    Icon,
    /// Continuous-tone photograph
    Photograph,
    /// Chart, diagram or other synthetic graphic
    Graphic,
    /// Could not be decided
    Unknown,
}

impl std::fmt::Display for PictureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PictureClass::Icon => "icon",
            PictureClass::Photograph => "photograph",
            PictureClass::Graphic => "graphic",
            PictureClass::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_never_serialized() {
        let pic = PictureItem::new("p1_Im0", 1).with_data(vec![0xFF, 0xD8, 0xFF], "image/jpeg");
        let json = serde_json::to_value(&pic).unwrap();
        assert!(json.get("data").is_none());
        assert_eq!(json["mime_type"], "image/jpeg");
    }

    #[test]
    fn test_image_data_requires_image_mime() {
        let jpeg = PictureItem::new("a", 1).with_data(vec![1, 2, 3], "image/jpeg");
        assert!(jpeg.image_data().is_some());
        assert_eq!(jpeg.extension(), "jpg");

        let raw = PictureItem::new("b", 1).with_data(vec![1, 2, 3], "application/octet-stream");
        assert!(raw.image_data().is_none());
        assert_eq!(raw.extension(), "bin");

        let empty = PictureItem::new("c", 1).with_data(Vec::new(), "image/png");
        assert!(empty.image_data().is_none());

        assert!(PictureItem::new("d", 1).image_data().is_none());
    }

    #[test]
    fn test_sniff_image_mime() {
        assert_eq!(sniff_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(
            sniff_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0]),
            Some("image/png")
        );
        assert_eq!(sniff_image_mime(b"GIF89a..."), Some("image/gif"));
        assert_eq!(sniff_image_mime(&[0, 0, 0, 0]), None);
    }

    #[test]
    fn test_class_display() {
        assert_eq!(PictureClass::Photograph.to_string(), "photograph");
        assert_eq!(
            serde_json::to_string(&PictureClass::Icon).unwrap(),
            "\"icon\""
        );
    }
}
