//! Extraction result model.
//!
//! [`ExtractedDocument`] is what a [`ConversionEngine`](crate::engine::ConversionEngine)
//! returns: pages holding items in reading order, plus document metadata
//! and outline.

mod document;
mod item;
mod picture;
mod table;

pub use document::{ExtractedDocument, Metadata, Origin, OutlineEntry, SCHEMA_VERSION};
pub use item::{Item, Page};
pub use picture::{extension_for_mime, sniff_image_mime, PictureClass, PictureItem};
pub use table::{TableCell, TableItem, TableRow};
