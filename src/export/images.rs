//! How pictures are referenced from Markdown and HTML.

use std::collections::BTreeMap;

use base64::Engine;

use crate::config::ImageMode;
use crate::model::{ExtractedDocument, PictureItem};

/// Marker emitted for pictures without a usable image.
pub const IMAGE_PLACEHOLDER: &str = "<!-- image -->";

/// What a renderer emits for one picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// `<!-- image -->`
    Placeholder,
    /// `data:` URI with base64 payload
    DataUri(String),
    /// Path relative to the output directory
    Path(String),
}

/// An image file to write next to the text outputs in referenced mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    /// Path relative to the output directory, `/`-separated
    pub relative_path: String,
    /// Encoded image bytes
    pub data: Vec<u8>,
}

/// Per-picture references for one document.
#[derive(Debug, Clone, Default)]
pub struct ImageRefs {
    refs: BTreeMap<String, ImageRef>,
}

impl ImageRefs {
    /// Every picture becomes a placeholder.
    pub fn placeholders() -> Self {
        Self::default()
    }

    /// Resolve references for every picture in `doc`.
    ///
    /// In referenced mode the returned artifacts hold the files to write,
    /// named `{name}_artifacts/image_NNNNNN.ext` in document order. Pictures
    /// without displayable image data stay placeholders in every mode.
    pub fn resolve(doc: &ExtractedDocument, mode: ImageMode) -> (Self, Vec<ImageArtifact>) {
        let mut refs = BTreeMap::new();
        let mut artifacts = Vec::new();

        if mode == ImageMode::Placeholder {
            return (Self { refs }, artifacts);
        }

        for picture in doc.pictures() {
            let Some((data, mime)) = picture.image_data() else {
                continue;
            };
            let reference = match mode {
                ImageMode::Placeholder => ImageRef::Placeholder,
                ImageMode::Embedded => ImageRef::DataUri(format!(
                    "data:{};base64,{}",
                    mime,
                    base64::engine::general_purpose::STANDARD.encode(data)
                )),
                ImageMode::Referenced => {
                    let relative_path = format!(
                        "{}/image_{:06}.{}",
                        artifacts_dir_name(&doc.name),
                        artifacts.len() + 1,
                        picture.extension()
                    );
                    artifacts.push(ImageArtifact {
                        relative_path: relative_path.clone(),
                        data: data.to_vec(),
                    });
                    ImageRef::Path(relative_path)
                }
            };
            refs.insert(picture.id.clone(), reference);
        }

        (Self { refs }, artifacts)
    }

    /// Reference for a picture; placeholder when none was resolved.
    pub fn get(&self, picture: &PictureItem) -> &ImageRef {
        self.refs.get(&picture.id).unwrap_or(&ImageRef::Placeholder)
    }

    /// Image source (data URI or path) for a picture, if it has one.
    pub fn source(&self, picture: &PictureItem) -> Option<&str> {
        match self.get(picture) {
            ImageRef::Placeholder => None,
            ImageRef::DataUri(uri) => Some(uri),
            ImageRef::Path(path) => Some(path),
        }
    }
}

/// Directory holding referenced images for a document.
pub fn artifacts_dir_name(doc_name: &str) -> String {
    format!("{}_artifacts", doc_name)
}
