//! Renderers for the output formats.
//!
//! Every renderer is a pure function of its inputs; nothing here touches
//! the filesystem.

mod html;
mod images;
mod json;
mod markdown;
mod report;
mod text;

pub use html::to_html;
pub use images::{artifacts_dir_name, ImageArtifact, ImageRef, ImageRefs, IMAGE_PLACEHOLDER};
pub use json::{to_json, JsonOptions};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use report::to_report;
pub use text::to_text;
